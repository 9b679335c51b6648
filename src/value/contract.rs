use thiserror::Error;

/// A token was rejected by a typed destination.
/// Carries the offending token and a description of the expected format.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot convert '{token}': expected {expected}")]
pub struct ConversionError {
    /// The rejected input token.
    pub token: String,
    /// Human readable description of the expected format.
    pub expected: String,
}

impl ConversionError {
    pub(crate) fn new(token: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expected: expected.into(),
        }
    }
}

/// The contract every typed destination satisfies in order to participate in resolution.
///
/// The resolution engine never inspects the concrete type behind a destination.
/// It only ever feeds tokens through `set`, probes `is_bool` to decide the
/// value-less/`--no-` flag syntax, and reads `render` for display purposes.
pub trait Value {
    /// Parse `token` into the bound storage.
    /// Scalar destinations replace their value; list/map destinations accumulate.
    fn set(&mut self, token: &str) -> Result<(), ConversionError>;

    /// The canonical string form of the current value.
    fn render(&self) -> String;

    /// True only for boolean-valued destinations.
    fn is_bool(&self) -> bool {
        false
    }
}

/// Behaviour to convert a single input token into a typed value.
///
/// This sits at the bottom of the object graph so the compiler can maintain each
/// destination's type; the engine works above it through `dyn` [`Value`].
pub trait FromToken: Sized {
    /// Description of the expected format, quoted by [`ConversionError`].
    const EXPECTED: &'static str;

    /// True only for `bool`; drives the flag-negation and value-less syntax.
    const IS_BOOL: bool = false;

    /// Parse one token.
    fn from_token(token: &str) -> Result<Self, ConversionError>;

    /// The canonical string form of this value.
    fn render(&self) -> String;
}
