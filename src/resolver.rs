//! The resolution engine: token consumption, scope walking, finalization.
mod engine;
mod finalize;

pub(crate) use engine::consume;
pub(crate) use finalize::finalize;

use thiserror::Error;

use crate::model::DeclarationError;
use crate::value::ConversionError;

/// A failure while resolving one token sequence.
/// Fail-fast: the first failure aborts the resolution call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown flag '--{name}'.")]
    UnknownFlag { name: String },

    #[error("Unknown flag '-{short}'.")]
    UnknownShort { short: char },

    #[error("Expected argument for flag '--{name}'.")]
    ExpectedValue { name: String },

    #[error("Flag '--{name}' does not take a value (got '{value}').")]
    UnexpectedValue { name: String, value: String },

    #[error("Unexpected token '{token}'.")]
    UnexpectedToken { token: String },

    #[error("Invalid value for '{name}': {source}.")]
    Conversion {
        name: String,
        #[source]
        source: ConversionError,
    },

    #[error("Missing required parameters: {}.", names.join(", "))]
    MissingRequired { names: Vec<String> },
}

/// Any failure from a resolution call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// The outcome of a successful resolution call.
#[derive(Debug, PartialEq, Eq, Default)]
pub struct Resolution {
    /// The chain of matched command names, outermost first.
    /// Empty when no subcommand was declared or matched.
    pub path: Vec<String>,
}

impl Resolution {
    /// The deepest matched command name, if any.
    pub fn command(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_command() {
        assert_eq!(Resolution::default().command(), None);
        assert_eq!(
            Resolution {
                path: vec!["remote".to_string(), "add".to_string()],
            }
            .command(),
            Some("add")
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ParseError::UnknownFlag {
                name: "moot".to_string()
            }
            .to_string(),
            "Unknown flag '--moot'."
        );
        assert_eq!(
            ParseError::MissingRequired {
                names: vec!["token".to_string(), "channel".to_string()],
            }
            .to_string(),
            "Missing required parameters: token, channel."
        );
    }
}
