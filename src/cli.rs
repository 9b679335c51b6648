use std::env;

use crate::constant::*;
use crate::help::{Console, Printer, UserInterface};
use crate::model::{Command, FlagNode};
use crate::resolver::Resolution;

/// Process-level middleware over a declared [`Command`] model.
///
/// Handles `-h`/`--help` (scoped to the deepest matched command), prints
/// resolution failures, and exits with the conventional status codes.
pub struct Cli {
    program: String,
    root: Command,
}

impl Cli {
    pub fn new(root: Command) -> Self {
        let program = root.name.clone();
        Self { program, root }
    }

    /// Resolve the process arguments.
    ///
    /// Exits the process after printing help (status 0) or a resolution
    /// failure (status 1).
    pub fn run(self) -> Resolution {
        let tokens: Vec<String> = env::args().skip(1).collect();
        let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();

        match self.run_tokens(&tokens, &Console::default()) {
            Ok(resolution) => resolution,
            Err(code) => std::process::exit(code),
        }
    }

    /// The testable core of [`Cli::run`]: resolve `tokens`, writing help and
    /// errors through `user_interface`, yielding the would-be exit status on
    /// anything but a successful resolution.
    pub fn run_tokens(
        &self,
        tokens: &[&str],
        user_interface: &(impl UserInterface + ?Sized),
    ) -> Result<Resolution, i32> {
        let long_help = format!("{LONG_PREFIX}{HELP_NAME}");
        let short_help = format!("{SHORT_PREFIX}{HELP_SHORT}");
        let mut scopes: Vec<&Command> = vec![&self.root];
        let mut program = self.program.clone();
        let mut flag_value = false;

        // Help short-circuits resolution entirely. Walk into command scopes
        // while scanning so 'program post --help' documents 'post', skipping
        // tokens consumed as flag values so they neither dispatch nor read as
        // a help request.
        for token in tokens {
            if flag_value {
                flag_value = false;
                continue;
            }

            if *token == TERMINATOR {
                break;
            }

            if *token == long_help || *token == short_help {
                let scope = scopes
                    .last()
                    .expect("internal error - the scope chain is never empty");
                Printer::terminal(program, scope).print_help(user_interface);
                return Err(0);
            }

            if let Some(body) = token.strip_prefix(LONG_PREFIX) {
                // An attached '=value' leaves nothing for the next token.
                if !body.contains('=') {
                    flag_value = matches!(
                        find_flag(&scopes, body), Some(flag) if !flag.core.is_bool()
                    );
                }
                continue;
            }

            if token.len() > 1 && token.starts_with(SHORT_PREFIX) {
                flag_value = cluster_takes_next(&scopes, &token[1..]);
                continue;
            }

            let scope = scopes
                .last()
                .expect("internal error - the scope chain is never empty");

            if let Some(child) = scope.find_command(token) {
                program = format!("{program} {name}", name = child.name);
                scopes.push(child);
            }
        }

        match self.root.resolve(tokens) {
            Ok(resolution) => Ok(resolution),
            Err(error) => {
                user_interface.print_error(error);
                Err(1)
            }
        }
    }
}

fn find_flag<'c>(scopes: &[&'c Command], name: &str) -> Option<&'c FlagNode> {
    scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.flags.iter())
        .find(|flag| flag.core.name == name)
}

fn find_short<'c>(scopes: &[&'c Command], short: char) -> Option<&'c FlagNode> {
    scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.flags.iter())
        .find(|flag| flag.short == Some(short))
}

/// Whether a short cluster ends in a value-taking flag with no attached value.
fn cluster_takes_next(scopes: &[&Command], cluster: &str) -> bool {
    for (index, single) in cluster.char_indices() {
        let flag = match find_short(scopes, single) {
            Some(flag) => flag,
            None => return false,
        };

        if flag.core.is_bool() {
            continue;
        }

        // A nonempty remainder (or '=value') is the attached value.
        return cluster[index + single.len_utf8()..].is_empty();
    }

    false
}
