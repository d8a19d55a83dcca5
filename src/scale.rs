use crate::aes::Aes;
use crate::error::{PlotError, Result};
use crate::plot::{point_kinds, Plot, Point};
use crate::units::{self, Scaler, UnitClass};
use crate::value::{Kinds, Value};
use std::collections::HashMap;

/// Dense ordinal positions for the distinct values of one aesthetic.
///
/// Only valid against the points it was built from.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    aes: Aes,
    values: Vec<Value>,
    index: HashMap<Value, usize>,
}

impl OrdinalScale {
    /// Position of `value` in `[0, bound)`.
    ///
    /// # Panics
    ///
    /// Panics if `value` did not occur in the originating points.
    pub fn index(&self, value: &Value) -> usize {
        match self.index.get(value) {
            Some(&i) => i,
            None => panic!("{} value {} has no position in this scale", self.aes, value),
        }
    }

    /// Position of `pt`'s value for this scale's aesthetic.
    pub fn index_of(&self, pt: &Point) -> usize {
        self.index(pt.get(self.aes))
    }

    /// Number of distinct values.
    pub fn bound(&self) -> usize {
        self.values.len()
    }

    /// Distinct values in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Build an ordinal scale over the values of `aes` in `points`.
pub fn ordinal_scale(points: &[Point], aes: Aes) -> OrdinalScale {
    let mut values: Vec<Value> = Vec::new();
    let mut seen: HashMap<Value, ()> = HashMap::new();
    for pt in points {
        let v = pt.get(aes);
        if seen.insert(v.clone(), ()).is_none() {
            values.push(v.clone());
        }
    }
    values.sort_by(|a, b| a.compare(b));

    let index = values
        .iter()
        .enumerate()
        .map(|(i, v)| (v.clone(), i))
        .collect();

    OrdinalScale { aes, values, index }
}

/// A linear scale for numeric data plus its axis label.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousScale {
    /// Data min/max
    pub lo: f64,
    pub hi: f64,
    /// Values are divided by this factor
    pub factor: f64,
    pub label: String,
}

impl ContinuousScale {
    pub fn apply(&self, v: f64) -> f64 {
        v / self.factor
    }
}

impl Plot {
    /// Build a continuous scale for `aes` over `points`.
    ///
    /// Only the dependent variable is scaled: with `rescale`, values are
    /// divided so the largest magnitude gets a short unit prefix, and the
    /// label carries that prefix. Without it (for renderers that format
    /// their own ticks) the scale is the identity.
    pub fn continuous_scale(&self, points: &[Point], aes: Aes, rescale: bool) -> Result<ContinuousScale> {
        if !point_kinds(points, aes).contains(Kinds::CONTINUOUS) {
            return Err(PlotError::NonNumeric { op: "scale", aes });
        }

        // 1. Bounds
        let (lo, hi) = points.iter().map(|pt| pt.get(aes).val).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        );

        let binding = self.binding(aes);
        if points.is_empty() || !binding.is_value() {
            return Ok(ContinuousScale {
                lo,
                hi,
                factor: 1.0,
                label: binding.to_string(),
            });
        }

        // 2. Units. Several are possible if, say, color shows .unit.
        let mut unit_names: Vec<&str> = Vec::new();
        for pt in points {
            if let Some(name) = self.unit_name(pt) {
                if !unit_names.contains(&name) {
                    unit_names.push(name);
                }
            }
        }

        // 3. Scale from the largest value only; an axis needs precision at
        // its top, not its bottom.
        let scaler = if rescale {
            let class = match unit_names.as_slice() {
                [unit] => units::class_of(unit),
                _ => UnitClass::Decimal,
            };
            units::common_scale(&[hi], class)
        } else {
            Scaler::IDENTITY
        };

        let label = unit_names
            .iter()
            .map(|n| format!("{}{}", scaler.prefix, n))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(ContinuousScale {
            lo,
            hi,
            factor: scaler.factor,
            label,
        })
    }
}
