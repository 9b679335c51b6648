/// Configuration for a named `--flag` parameter.
///
/// A plain configuration struct rather than a mutable chained node handle;
/// the typed destination is bound afterwards via [`crate::Command::flag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    pub(crate) name: String,
    pub(crate) short: Option<char>,
    pub(crate) help: String,
    pub(crate) required: bool,
    pub(crate) default: Option<String>,
    pub(crate) env: Option<String>,
    pub(crate) hidden: bool,
}

impl FlagSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: None,
            help: String::default(),
            required: false,
            default: None,
            env: None,
            hidden: false,
        }
    }

    /// Single-character alias, usable as `-x` and in clusters.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn help(mut self, message: impl Into<String>) -> Self {
        self.help = message.into();
        self
    }

    /// The flag must be specified (or satisfied by its environment fallback).
    /// Mutually exclusive with [`FlagSpec::default`].
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// A textual default, applied through the conversion contract after
    /// consumption when the flag was never specified.
    pub fn default(mut self, token: impl Into<String>) -> Self {
        self.default = Some(token.into());
        self
    }

    /// An environment variable consulted before defaults when the flag was
    /// never specified.
    pub fn env(mut self, variable: impl Into<String>) -> Self {
        self.env = Some(variable.into());
        self
    }

    /// Exclude the flag from help output.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Configuration for a positional parameter, bound by position among non-flag
/// tokens in its scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionalSpec {
    pub(crate) name: String,
    pub(crate) help: String,
    pub(crate) required: bool,
    pub(crate) variadic: bool,
    pub(crate) default: Option<String>,
    pub(crate) env: Option<String>,
}

impl PositionalSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: String::default(),
            required: false,
            variadic: false,
            default: None,
            env: None,
        }
    }

    pub fn help(mut self, message: impl Into<String>) -> Self {
        self.help = message.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Consume every remaining positional token in this scope.
    /// Only the last declared positional may be variadic.
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn default(mut self, token: impl Into<String>) -> Self {
        self.default = Some(token.into());
        self
    }

    pub fn env(mut self, variable: impl Into<String>) -> Self {
        self.env = Some(variable.into());
        self
    }
}
