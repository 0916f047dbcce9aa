//! Error types for the survey funnel.
//!
//! Input validation failures are not errors: a handler reports them as a
//! step outcome and the visitor stays on the step. The types here cover
//! configuration, malformed catalogs, host misuse of the engine, and the
//! delivery transport.

use crate::wizard::catalog::StepId;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Problems with a step catalog, detected when it is built.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog contains no steps")]
    Empty,

    #[error("Step id {0} appears more than once")]
    DuplicateStepId(StepId),

    #[error("Step {step_id} is a choice step without options")]
    MissingOptions { step_id: StepId },

    #[error("Step {0} does not exist in the catalog")]
    UnknownStep(StepId),

    #[error("Step {step_id} has {available} options, cannot take {requested} lowest tiers")]
    NotEnoughTiers {
        step_id: StepId,
        available: usize,
        requested: usize,
    },
}

/// Host misuse of the wizard engine.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Interaction {interaction} does not apply to step {step_id} ({kind})")]
    InteractionMismatch {
        step_id: StepId,
        kind: String,
        interaction: String,
    },

    #[error("Option {option:?} is not offered by step {step_id}")]
    UnknownOption { step_id: StepId, option: String },

    #[error("Survey was already submitted")]
    AlreadySubmitted,
}

/// Delivery transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Delivery transport is not configured")]
    NotConfigured,

    #[error("Delivery of {event} failed: {reason}")]
    RequestFailed { event: String, reason: String },

    #[error("Relay rejected {event} with status {status}")]
    Rejected { event: String, status: u16 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the funnel.
pub type Result<T> = std::result::Result<T, Error>;
