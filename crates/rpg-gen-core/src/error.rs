//! Error types for loading, compiling and sampling generators

use thiserror::Error;

/// The configuration document is not well-formed YAML (or JSON), or does not
/// have the expected top-level shape.
#[derive(Error, Debug)]
#[error("Failed to parse generator document: {0}")]
pub struct ParseError(#[from] pub serde_yaml::Error);

/// The document parsed but is semantically invalid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Unsupported document version {0} (expected 1)")]
    UnsupportedVersion(i64),

    #[error("Generator #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("Duplicate generator name '{0}'")]
    DuplicateName(String),

    #[error("Generator '{name}' has unknown type '{kind}' (expected 'weighted' or 'unweighted')")]
    UnknownKind { name: String, kind: String },

    #[error("Generator '{name}', entry {index}: {reason}")]
    MalformedEntry {
        name: String,
        index: usize,
        reason: String,
    },

    #[error("Generator '{name}', entry {index}: weight {weight} must be a finite number >= 0")]
    InvalidWeight {
        name: String,
        index: usize,
        weight: f64,
    },

    #[error("Generator '{0}' has no entry with a positive weight")]
    AllZeroWeight(String),

    #[error("Generator '{0}' weights overflow when summed")]
    WeightOverflow(String),
}

impl CompileError {
    /// Name of the generator the error was raised for, if any.
    pub fn generator(&self) -> Option<&str> {
        match self {
            CompileError::UnsupportedVersion(_) | CompileError::EmptyName { .. } => None,
            CompileError::DuplicateName(name)
            | CompileError::AllZeroWeight(name)
            | CompileError::WeightOverflow(name) => Some(name),
            CompileError::UnknownKind { name, .. }
            | CompileError::MalformedEntry { name, .. }
            | CompileError::InvalidWeight { name, .. } => Some(name),
        }
    }
}

/// Either stage of turning raw text into a `GeneratorSet` failed.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl From<serde_yaml::Error> for LoadError {
    fn from(err: serde_yaml::Error) -> Self {
        LoadError::Parse(ParseError(err))
    }
}

/// Lookup or sampling against a category that is not installed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Generator not found: {0}")]
pub struct NotFoundError(pub String);

/// Invalid runtime configuration of the catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid sample bounds: min {min}, max {max} (need 1 <= min <= max)")]
    InvalidBounds { min: usize, max: usize },
}
