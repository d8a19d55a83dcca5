use crate::aes::Aes;
use thiserror::Error;

/// Errors from configuring and transforming a plot.
#[derive(Debug, Error, PartialEq)]
pub enum PlotError {
    #[error("at most one dimension may show .unit")]
    MultipleUnitAes,

    #[error("at most one dimension may show .value")]
    MultipleValueAes,

    #[error(".unit is mapped to the {0} dimension, but no dimension shows .value")]
    UnitWithoutValue(Aes),

    #[error(".value is mapped to the {0} dimension, but no dimension shows .unit")]
    ValueWithoutUnit(Aes),

    #[error("{op}: {aes} data must be numeric")]
    NonNumeric { op: &'static str, aes: Aes },

    #[error("{0} requires a dimension showing .value")]
    NoValueAes(&'static str),

    #[error("unknown aesthetic {0:?}")]
    UnknownAes(String),

    #[error("unknown transform {0:?}")]
    UnknownTransform(String),

    #[error("bad log base {base:?} for {aes}")]
    BadLogBase { aes: String, base: String },

    #[error("confidence must be between 0 and 1, got {0}")]
    BadConfidence(f64),

    #[error("parsing -{aes}: {message}")]
    Projection { aes: String, message: String },
}

pub type Result<T> = std::result::Result<T, PlotError>;
