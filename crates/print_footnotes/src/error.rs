use html::{DomError, SelectorError};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    EmptyField(&'static str),
    InvalidSelector(SelectorError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyField(field) => write!(f, "config field `{field}` is empty"),
            ConfigError::InvalidSelector(err) => write!(f, "invalid link selector: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidSelector(err) => Some(err),
            ConfigError::EmptyField(_) => None,
        }
    }
}

impl From<SelectorError> for ConfigError {
    fn from(err: SelectorError) -> Self {
        ConfigError::InvalidSelector(err)
    }
}

/// Failure to construct an element instance. Nothing after construction is
/// surfaced as an error; runtime conditions degrade to logged no-ops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementError {
    Config(ConfigError),
    Dom(DomError),
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementError::Config(err) => write!(f, "{err}"),
            ElementError::Dom(err) => write!(f, "cannot construct element: {err}"),
        }
    }
}

impl std::error::Error for ElementError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ElementError::Config(err) => Some(err),
            ElementError::Dom(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ElementError {
    fn from(err: ConfigError) -> Self {
        ElementError::Config(err)
    }
}

impl From<DomError> for ElementError {
    fn from(err: DomError) -> Self {
        ElementError::Dom(err)
    }
}
