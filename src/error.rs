//! Error types for setup validation and engine lifecycle.

use thiserror::Error;

/// Rejected user input. Nothing is started or advanced when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("select at least one demand response technology")]
    EmptyTechnologySelection,

    #[error("unknown customer class \"{0}\"")]
    UnknownCustomerClass(String),

    #[error("unknown rate plan \"{0}\"")]
    UnknownRatePlan(String),

    #[error("unknown technology \"{0}\"")]
    UnknownTechnology(String),

    #[error("technology \"{technology}\" is not eligible for customer class \"{class}\"")]
    IneligibleTechnology { technology: String, class: String },

    #[error("technology \"{0}\" selected more than once")]
    DuplicateTechnology(String),

    #[error("peak demand {value} kW outside [{min}, {max}] kW for this customer class")]
    PeakDemandOutOfRange { value: f64, min: f64, max: f64 },

    #[error("overall curtailment {0}% outside [0, 100]")]
    OverallCurtailmentOutOfRange(f64),

    #[error("curtailment {value}% for \"{technology}\" outside [0, {max}]")]
    TechnologyCurtailmentOutOfRange {
        technology: String,
        value: f64,
        max: f64,
    },

    #[error("technology \"{0}\" is not part of the running configuration")]
    TechnologyNotSelected(String),
}

/// Engine-level failure: bad input or an operation issued in the wrong phase.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no simulation is running; call start_simulation first")]
    NotRunning,

    #[error("a simulation is already running; reset it before starting another")]
    AlreadyRunning,
}

pub type SimResult<T> = Result<T, SimError>;
