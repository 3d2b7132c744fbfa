//! Errors raised at the input boundary

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("{field} = {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid energy mix: {0}")]
    InvalidMix(String),

    #[error("Unknown preset '{0}' (expected custom, green-city, rapid-growth or drought-region)")]
    UnknownPreset(String),

    #[error("Unknown model profile '{0}' (expected standard or normalized)")]
    InvalidProfile(String),

    #[error("Unknown {question} answer '{answer}'")]
    UnknownAnswer {
        question: &'static str,
        answer: String,
    },
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
