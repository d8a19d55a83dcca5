// Plot options: the user-facing form of a plot configuration

use crate::aes::Aes;
use crate::error::{PlotError, Result};
use crate::parser::projection::parse_fields;
use crate::plot::Config;
use crate::projection::{Field, Projection};
use crate::transform::Transform;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Projection marker for the dependent variable.
pub const VALUE_MARKER: &str = ".value";
/// Projection marker for every field not used elsewhere.
pub const RESIDUE_MARKER: &str = ".residue";

/// Options describing a plot, as given on the command line or in a JSON
/// config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    pub x: String,
    pub y: String,
    pub color: String,
    pub row: String,
    pub col: String,
    /// Fields excluded from `.residue`
    pub ignore: String,
    /// Units to keep; empty keeps all
    pub units: Vec<String>,
    /// Log-scaled aesthetics, e.g. "x,y:2"
    pub log_scale: String,
    pub transforms: Vec<String>,
    pub confidence: f64,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            x: ".fullname".to_string(),
            y: VALUE_MARKER.to_string(),
            color: RESIDUE_MARKER.to_string(),
            row: ".unit".to_string(),
            col: String::new(),
            ignore: String::new(),
            units: Vec::new(),
            log_scale: String::new(),
            transforms: Vec::new(),
            confidence: 0.95,
        }
    }
}

impl PlotOptions {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Projection expression for `aes`.
    pub fn expr(&self, aes: Aes) -> &str {
        match aes {
            Aes::X => &self.x,
            Aes::Y => &self.y,
            Aes::Color => &self.color,
            Aes::Row => &self.row,
            Aes::Col => &self.col,
        }
    }

    /// Resolve the projection expressions into a plot configuration.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::new();

        // 1. Explicit projections and markers
        let mut residue_aes = Vec::new();
        let mut used: Vec<Field> = Vec::new();
        for aes in Aes::ALL {
            match self.expr(aes).trim() {
                "" => config.unset(aes),
                VALUE_MARKER => config.set_dv(aes),
                RESIDUE_MARKER => residue_aes.push(aes),
                expr => {
                    let fields = parse_fields(expr).map_err(|message| PlotError::Projection {
                        aes: aes.name().to_string(),
                        message,
                    })?;
                    used.extend(fields.iter().cloned());
                    config.set_iv(aes, Projection::fields(fields));
                }
            }
        }

        // 2. Whatever is left goes to the residue
        if !self.ignore.trim().is_empty() {
            let ignored = parse_fields(&self.ignore).map_err(|message| PlotError::Projection {
                aes: "ignore".to_string(),
                message,
            })?;
            used.extend(ignored);
        }
        for aes in residue_aes {
            config.set_iv(aes, Projection::Residue { exclude: used.clone() });
        }

        // 3. Log scales
        for (aes, base) in parse_log_scale(&self.log_scale)? {
            config.set_log_scale(aes, base);
        }

        Ok(config)
    }

    /// The transforms to apply, in order.
    pub fn transforms(&self) -> Result<Vec<Transform>> {
        self.transforms
            .iter()
            .map(|name| Transform::from_name(name.trim()))
            .collect()
    }

    /// Units to keep, or `None` to keep every unit.
    pub fn unit_filter(&self) -> Option<HashSet<String>> {
        if self.units.is_empty() {
            return None;
        }
        Some(self.units.iter().map(|u| u.trim().to_string()).collect())
    }

    pub fn confidence(&self) -> Result<f64> {
        if self.confidence > 0.0 && self.confidence < 1.0 {
            Ok(self.confidence)
        } else {
            Err(PlotError::BadConfidence(self.confidence))
        }
    }
}

/// Parse a log-scale list such as "x,y:2". The base defaults to 10.
pub fn parse_log_scale(list: &str) -> Result<Vec<(Aes, u32)>> {
    let mut out = Vec::new();
    for opt in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, base) = match opt.split_once(':') {
            Some((name, base)) => (name, Some(base)),
            None => (opt, None),
        };
        let aes = Aes::from_name(name).ok_or_else(|| PlotError::UnknownAes(name.to_string()))?;
        let base = match base {
            None => 10,
            Some(s) => match s.parse::<u32>() {
                Ok(b) if b >= 2 => b,
                _ => {
                    return Err(PlotError::BadLogBase {
                        aes: name.to_string(),
                        base: s.to_string(),
                    })
                }
            },
        };
        out.push((aes, base));
    }
    Ok(out)
}

/// Split a comma-separated flag value, dropping empty items.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
