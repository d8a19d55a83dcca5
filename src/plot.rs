// Plot assembly: configuration, validation and point expansion

use crate::aes::{Aes, AesMap, AES_COUNT};
use crate::error::{PlotError, Result};
use crate::projection::{Binding, Projection, UNIT_FIELD};
use crate::record::Record;
use crate::units::UnitMetadataMap;
use crate::value::{Kinds, Value};

/// A point of the plot: one value per aesthetic.
pub type Point = AesMap<Value>;

/// Bindings and scale options for each aesthetic, before validation.
#[derive(Debug, Clone, Default)]
pub struct Config {
    aes: AesMap<Binding>,
    log_scale: AesMap<u32>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map independent variable `proj` to aesthetic `aes`.
    pub fn set_iv(&mut self, aes: Aes, proj: Projection) {
        self.aes.set(aes, Binding::Expr(proj));
    }

    /// Map the dependent variable to aesthetic `aes`.
    pub fn set_dv(&mut self, aes: Aes) {
        self.aes.set(aes, Binding::Value);
    }

    /// Leave aesthetic `aes` constant.
    pub fn unset(&mut self, aes: Aes) {
        self.aes.set(aes, Binding::Unbound);
    }

    /// Plot `aes` on a log scale in the given base. Base 0 is linear.
    pub fn set_log_scale(&mut self, aes: Aes, base: u32) {
        self.log_scale.set(aes, base);
    }

    pub fn binding(&self, aes: Aes) -> &Binding {
        self.aes.get(aes)
    }
}

/// A plot under construction: bindings plus the points added so far.
#[derive(Debug, Clone)]
pub struct Plot {
    aes: AesMap<Binding>,

    /// Aesthetic showing the unit and the one showing the dependent variable.
    /// Either both are set or neither is.
    unit_aes: Option<Aes>,
    dv_aes: Option<Aes>,

    log_scale: AesMap<u32>,
    units: UnitMetadataMap,

    pub(crate) points: Vec<Point>,
}

impl Plot {
    /// Validate `config` and create an empty plot from it.
    pub fn new(config: &Config) -> Result<Self> {
        let mut unit_aes = None;
        let mut dv_aes = None;
        for (aes, binding) in config.aes.iter() {
            if binding.has_unit() {
                if unit_aes.is_some() {
                    return Err(PlotError::MultipleUnitAes);
                }
                unit_aes = Some(aes);
            }
            if binding.is_value() {
                if dv_aes.is_some() {
                    return Err(PlotError::MultipleValueAes);
                }
                dv_aes = Some(aes);
            }
        }
        match (unit_aes, dv_aes) {
            (Some(aes), None) => return Err(PlotError::UnitWithoutValue(aes)),
            (None, Some(aes)) => return Err(PlotError::ValueWithoutUnit(aes)),
            _ => {}
        }

        Ok(Plot {
            aes: config.aes.clone(),
            unit_aes,
            dv_aes,
            log_scale: config.log_scale.clone(),
            units: UnitMetadataMap::new(),
            points: Vec::new(),
        })
    }

    /// Expand `rec` into points and append them.
    ///
    /// Takes the cartesian product of every aesthetic's projected values.
    /// A unit candidate the record has no metric for produces no point.
    pub fn add(&mut self, rec: &Record) {
        // Work-list of partial points and the next aesthetic to fill. Values
        // are pushed in reverse so points come out in projection order.
        let mut work: Vec<(usize, Point)> = vec![(0, Point::default())];
        while let Some((idx, mut pt)) = work.pop() {
            if idx == AES_COUNT {
                self.points.push(pt);
                continue;
            }
            let aes = Aes::ALL[idx];
            let binding = self.aes.get(aes);
            if binding.is_value() {
                // Filled in when the unit aesthetic is reached.
                work.push((idx + 1, pt));
                continue;
            }

            let mut next = Vec::new();
            for val in binding.project(rec) {
                if Some(aes) == self.unit_aes {
                    let Some(metric) = unit_metric(rec, &val) else {
                        tracing::trace!(unit = %val, name = %rec.full_name, "dropping point without metric");
                        continue;
                    };
                    if let Some(dv) = self.dv_aes {
                        pt.set(dv, Value::continuous(metric));
                    }
                }
                pt.set(aes, val);
                next.push((idx + 1, pt.clone()));
            }
            work.extend(next.into_iter().rev());
        }
    }

    /// Axis label for `aes` at point `pt`: the unit for the dependent
    /// variable, the projection otherwise.
    pub fn label(&self, pt: &Point, aes: Aes) -> String {
        let binding = self.aes.get(aes);
        if binding.is_value() {
            if let Some(unit) = self.unit_name(pt) {
                return unit.to_string();
            }
        }
        binding.to_string()
    }

    /// Unit of the metric at `pt`, if the plot shows units.
    pub fn unit_name<'a>(&self, pt: &'a Point) -> Option<&'a str> {
        let aes = self.unit_aes?;
        pt.get(aes).key.get(UNIT_FIELD)
    }

    pub fn binding(&self, aes: Aes) -> &Binding {
        self.aes.get(aes)
    }

    pub fn dv_aes(&self) -> Option<Aes> {
        self.dv_aes
    }

    pub fn unit_aes(&self) -> Option<Aes> {
        self.unit_aes
    }

    /// Log base for `aes`, or 0 for linear.
    pub fn log_scale(&self, aes: Aes) -> u32 {
        *self.log_scale.get(aes)
    }

    pub fn set_units(&mut self, units: UnitMetadataMap) {
        self.units = units;
    }

    pub fn units(&self) -> &UnitMetadataMap {
        &self.units
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// The record's metric for the unit named by `val`.
fn unit_metric(rec: &Record, val: &Value) -> Option<f64> {
    let unit = val.key.get(UNIT_FIELD)?;
    rec.value(unit)
}

/// Kinds shared by the `aes` value of every point. All kinds for no points.
pub fn point_kinds(points: &[Point], aes: Aes) -> Kinds {
    points
        .iter()
        .fold(Kinds::ALL, |kinds, pt| kinds & pt.get(aes).kinds)
}
