use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use thiserror::Error;

use crate::value::{ConversionError, Value};

/// A caller programming error in the declared model.
/// Detected before any token is consumed; never recovered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("Declaration error: duplicate parameter '{name}' in scope '{scope}'.")]
    DuplicateName { scope: String, name: String },

    #[error("Declaration error: duplicate short flag '-{short}' in scope '{scope}'.")]
    DuplicateShort { scope: String, short: char },

    #[error("Declaration error: duplicate command '{name}' in scope '{scope}'.")]
    DuplicateCommand { scope: String, name: String },

    #[error("Declaration error: parameter '{name}' cannot be required and carry a default.")]
    RequiredWithDefault { name: String },

    #[error("Declaration error: variadic positional '{name}' must be declared last in scope '{scope}'.")]
    VariadicNotLast { scope: String, name: String },
}

/// The attributes shared by every declared parameter, plus its bound destination.
pub(crate) struct NodeCore {
    pub(crate) name: String,
    pub(crate) help: String,
    pub(crate) required: bool,
    pub(crate) default: Option<String>,
    pub(crate) env: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) slot: Rc<RefCell<dyn Value>>,
    // Occurrence count for this resolution call; interior so the model stays
    // shared during resolution.
    hits: Cell<u32>,
}

impl NodeCore {
    pub(crate) fn new(
        name: String,
        help: String,
        required: bool,
        default: Option<String>,
        env: Option<String>,
        hidden: bool,
        slot: Rc<RefCell<dyn Value>>,
    ) -> Self {
        Self {
            name,
            help,
            required,
            default,
            env,
            hidden,
            slot,
            hits: Cell::new(0),
        }
    }

    /// Feed one token through the conversion contract, recording the occurrence.
    pub(crate) fn set(&self, token: &str) -> Result<(), ConversionError> {
        self.slot.borrow_mut().set(token)?;
        self.hits.set(self.hits.get() + 1);
        Ok(())
    }

    pub(crate) fn render(&self) -> String {
        self.slot.borrow().render()
    }

    pub(crate) fn is_bool(&self) -> bool {
        self.slot.borrow().is_bool()
    }

    pub(crate) fn touched(&self) -> bool {
        self.hits.get() > 0
    }

    fn reset(&self) {
        self.hits.set(0);
    }
}

impl std::fmt::Debug for NodeCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeCore")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("default", &self.default)
            .finish()
    }
}

#[derive(Debug)]
pub(crate) struct FlagNode {
    pub(crate) core: NodeCore,
    pub(crate) short: Option<char>,
}

#[derive(Debug)]
pub(crate) struct PositionalNode {
    pub(crate) core: NodeCore,
    pub(crate) variadic: bool,
}

/// A named scope of flags, positional arguments and child commands.
///
/// The root `Command` is the declaration model; children registered via
/// [`Command::command`] form a tree, built once and read-only during
/// resolution (only the bound destinations mutate).
pub struct Command {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) help: String,
    pub(crate) hidden: bool,
    pub(crate) flags: Vec<FlagNode>,
    pub(crate) positionals: Vec<PositionalNode>,
    pub(crate) commands: Vec<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("flags", &self.flags.len())
            .field("positionals", &self.positionals.len())
            .field("commands", &self.commands.len())
            .finish()
    }
}

impl Command {
    /// Create an empty scope.
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::default(),
            help: help.into(),
            hidden: false,
            flags: Vec::default(),
            positionals: Vec::default(),
            commands: Vec::default(),
        }
    }

    /// Register an additional name this command matches under.
    pub fn alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.aliases.push(alias.into());
        self
    }

    /// Exclude this command from help output.
    pub fn hidden(&mut self) -> &mut Self {
        self.hidden = true;
        self
    }

    pub(crate) fn matches(&self, token: &str) -> bool {
        self.name == token || self.aliases.iter().any(|alias| alias == token)
    }

    pub(crate) fn find_command(&self, token: &str) -> Option<&Command> {
        self.commands.iter().find(|command| command.matches(token))
    }

    /// Verify the sibling-scope invariants, recursively.
    pub(crate) fn check(&self) -> Result<(), DeclarationError> {
        let mut names: HashSet<&str> = HashSet::default();
        let mut shorts: HashSet<char> = HashSet::default();

        for flag in &self.flags {
            if !names.insert(&flag.core.name) {
                return Err(DeclarationError::DuplicateName {
                    scope: self.name.clone(),
                    name: flag.core.name.clone(),
                });
            }

            if let Some(short) = flag.short {
                if !shorts.insert(short) {
                    return Err(DeclarationError::DuplicateShort {
                        scope: self.name.clone(),
                        short,
                    });
                }
            }

            Self::check_node(&flag.core)?;
        }

        for (index, positional) in self.positionals.iter().enumerate() {
            if !names.insert(&positional.core.name) {
                return Err(DeclarationError::DuplicateName {
                    scope: self.name.clone(),
                    name: positional.core.name.clone(),
                });
            }

            if positional.variadic && index + 1 != self.positionals.len() {
                return Err(DeclarationError::VariadicNotLast {
                    scope: self.name.clone(),
                    name: positional.core.name.clone(),
                });
            }

            Self::check_node(&positional.core)?;
        }

        let mut command_names: HashSet<&str> = HashSet::default();

        for command in &self.commands {
            for name in std::iter::once(&command.name).chain(command.aliases.iter()) {
                if !command_names.insert(name.as_str()) {
                    return Err(DeclarationError::DuplicateCommand {
                        scope: self.name.clone(),
                        name: name.clone(),
                    });
                }
            }

            command.check()?;
        }

        Ok(())
    }

    fn check_node(core: &NodeCore) -> Result<(), DeclarationError> {
        if core.required && core.default.is_some() {
            return Err(DeclarationError::RequiredWithDefault {
                name: core.name.clone(),
            });
        }

        Ok(())
    }

    /// Clear the occurrence counters ahead of a resolution call.
    pub(crate) fn reset(&self) {
        for flag in &self.flags {
            flag.core.reset();
        }

        for positional in &self.positionals {
            positional.core.reset();
        }

        for command in &self.commands {
            command.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FlagSpec, PositionalSpec};

    #[test]
    fn command_matches() {
        let mut command = Command::new("register", "Register a channel.");
        command.alias("r");

        assert!(command.matches("register"));
        assert!(command.matches("r"));
        assert!(!command.matches("reg"));
    }

    #[test]
    fn check_empty() {
        Command::new("program", "").check().unwrap();
    }

    #[test]
    fn check_duplicate_flag() {
        // Setup
        let mut command = Command::new("program", "");
        command.flag(FlagSpec::new("verbose")).bool();
        command.flag(FlagSpec::new("verbose")).string();

        // Execute & verify
        assert_eq!(
            command.check().unwrap_err(),
            DeclarationError::DuplicateName {
                scope: "program".to_string(),
                name: "verbose".to_string(),
            }
        );
    }

    #[test]
    fn check_duplicate_short() {
        // Setup
        let mut command = Command::new("program", "");
        command.flag(FlagSpec::new("verbose").short('v')).bool();
        command.flag(FlagSpec::new("version").short('v')).bool();

        // Execute & verify
        assert_eq!(
            command.check().unwrap_err(),
            DeclarationError::DuplicateShort {
                scope: "program".to_string(),
                short: 'v',
            }
        );
    }

    #[test]
    fn check_duplicate_flag_positional() {
        // Setup
        let mut command = Command::new("program", "");
        command.flag(FlagSpec::new("item")).string();
        command.positional(PositionalSpec::new("item")).string();

        // Execute & verify
        assert_eq!(
            command.check().unwrap_err(),
            DeclarationError::DuplicateName {
                scope: "program".to_string(),
                name: "item".to_string(),
            }
        );
    }

    #[test]
    fn check_duplicate_command_alias() {
        // Setup
        let mut root = Command::new("program", "");
        root.command("post", "");
        root.command("publish", "").alias("post");

        // Execute & verify
        assert_eq!(
            root.check().unwrap_err(),
            DeclarationError::DuplicateCommand {
                scope: "program".to_string(),
                name: "post".to_string(),
            }
        );
    }

    #[test]
    fn check_required_with_default() {
        // Setup
        let mut command = Command::new("program", "");
        command
            .flag(FlagSpec::new("token").required().default("abc"))
            .string();

        // Execute & verify
        assert_eq!(
            command.check().unwrap_err(),
            DeclarationError::RequiredWithDefault {
                name: "token".to_string(),
            }
        );
    }

    #[test]
    fn check_variadic_not_last() {
        // Setup
        let mut command = Command::new("program", "");
        command
            .positional(PositionalSpec::new("items").variadic())
            .strings();
        command.positional(PositionalSpec::new("target")).string();

        // Execute & verify
        assert_eq!(
            command.check().unwrap_err(),
            DeclarationError::VariadicNotLast {
                scope: "program".to_string(),
                name: "items".to_string(),
            }
        );
    }

    #[test]
    fn check_nested_scope() {
        // Setup
        let mut root = Command::new("program", "");
        root.flag(FlagSpec::new("verbose")).bool();
        let child = root.command("post", "");
        // A child scope may reuse a name declared by its ancestor.
        child.flag(FlagSpec::new("verbose")).bool();
        child.flag(FlagSpec::new("channel")).string();
        child.flag(FlagSpec::new("channel")).string();

        // Execute & verify
        assert_eq!(
            root.check().unwrap_err(),
            DeclarationError::DuplicateName {
                scope: "post".to_string(),
                name: "channel".to_string(),
            }
        );
    }

    #[test]
    fn reset_clears_occurrences() {
        // Setup
        let mut command = Command::new("program", "");
        command.flag(FlagSpec::new("count")).int();
        command.flags[0].core.set("5").unwrap();
        assert!(command.flags[0].core.touched());

        // Execute
        command.reset();

        // Verify
        assert!(!command.flags[0].core.touched());
    }
}
