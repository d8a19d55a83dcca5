// Unit handling: tidying, unit classes and prefix scaling

use std::collections::HashMap;

/// Whether a unit scales with decimal (SI) or binary (IEC) prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitClass {
    Decimal,
    Binary,
}

/// A common scale to apply to a set of values: divide by `factor` and prefix
/// the unit with `prefix`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scaler {
    pub factor: f64,
    pub prefix: &'static str,
}

impl Scaler {
    pub const IDENTITY: Scaler = Scaler {
        factor: 1.0,
        prefix: "",
    };
}

const DECIMAL_UP: [&str; 9] = ["", "k", "M", "G", "T", "P", "E", "Z", "Y"];
const DECIMAL_DOWN: [&str; 9] = ["", "m", "µ", "n", "p", "f", "a", "z", "y"];
const BINARY_UP: [&str; 9] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi", "Yi"];

/// Class of `unit`. Units measuring bytes in the numerator are binary.
pub fn class_of(unit: &str) -> UnitClass {
    let numerator = unit.split('/').next().unwrap_or(unit);
    let is_bytes = numerator
        .split('*')
        .any(|part| part == "B" || part == "bytes");
    if is_bytes {
        UnitClass::Binary
    } else {
        UnitClass::Decimal
    }
}

/// Pick one scale for all of `values`: the largest prefix that keeps the
/// biggest magnitude at or above 1.
pub fn common_scale(values: &[f64], class: UnitClass) -> Scaler {
    let max = values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| v.abs())
        .fold(0.0, f64::max);
    if max == 0.0 {
        return Scaler::IDENTITY;
    }

    match class {
        UnitClass::Decimal => {
            let exp = (max.log10() / 3.0).floor() as i32;
            let exp = exp.clamp(-8, 8);
            let prefix = if exp >= 0 {
                DECIMAL_UP[exp as usize]
            } else {
                DECIMAL_DOWN[(-exp) as usize]
            };
            Scaler {
                factor: 1000f64.powi(exp),
                prefix,
            }
        }
        UnitClass::Binary => {
            let exp = (max.log2() / 10.0).floor() as i32;
            let exp = exp.clamp(0, 8);
            Scaler {
                factor: 1024f64.powi(exp),
                prefix: BINARY_UP[exp as usize],
            }
        }
    }
}

/// Normalize a benchmark unit to its base quantity, returning the factor to
/// multiply values by and the tidied unit name.
///
/// `ns/op` becomes `sec/op` and `MB/s` becomes `B/s`; other units are kept.
pub fn tidy_unit(unit: &str) -> (f64, String) {
    if let Some(rest) = unit.strip_prefix("ns/") {
        return (1e-9, format!("sec/{}", rest));
    }
    if unit == "ns" {
        return (1e-9, "sec".to_string());
    }
    if unit == "MB/s" {
        return (1e6, "B/s".to_string());
    }
    (1.0, unit.to_string())
}

/// How a unit's measurements may be treated statistically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assumption {
    #[default]
    Nothing,
    Exact,
}

impl Assumption {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "nothing" => Some(Assumption::Nothing),
            "exact" => Some(Assumption::Exact),
            _ => None,
        }
    }
}

/// Which direction of a unit is an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Better {
    #[default]
    Unknown,
    Higher,
    Lower,
}

impl Better {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "higher" => Some(Better::Higher),
            "lower" => Some(Better::Lower),
            _ => None,
        }
    }
}

/// Metadata declared for a unit by a `Unit` line in the input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnitMetadata {
    pub assume: Assumption,
    pub better: Better,
}

/// Unit metadata keyed by tidied unit name.
pub type UnitMetadataMap = HashMap<String, UnitMetadata>;
