use terminal_size::{terminal_size, Width};

use crate::constant::*;
use crate::model::{Command, FlagNode, PositionalNode};
use crate::resolver::Error;

/// The output seam for help text and resolution failures.
pub trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, error: Error);
}

/// Writes messages to stdout and errors to stderr.
#[derive(Default)]
pub struct Console {}

impl UserInterface for Console {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: Error) {
        eprintln!("{error}");
    }
}

const PADDING_WIDTH: usize = 2;
const MAIN_INDENT: usize = 1;
// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
const MINIMUM_DESCRIPTION_WIDTH: usize = 17;

/// Renders the help page for one scope.
pub(crate) struct Printer<'c> {
    program: String,
    command: &'c Command,
    terminal_width: Option<usize>,
}

impl<'c> Printer<'c> {
    pub(crate) fn terminal(program: impl Into<String>, command: &'c Command) -> Self {
        let terminal_width = terminal_size().map(|(Width(width), _)| width as usize);
        Self::new(program, command, terminal_width)
    }

    pub(crate) fn new(
        program: impl Into<String>,
        command: &'c Command,
        terminal_width: Option<usize>,
    ) -> Self {
        Self {
            program: program.into(),
            command,
            terminal_width,
        }
    }

    pub(crate) fn print_help(&self, user_interface: &(impl UserInterface + ?Sized)) {
        let help_flags = format!("-{HELP_SHORT}, --{HELP_NAME}");
        let mut summary = vec![format!("[-{HELP_SHORT}]")];
        let mut column_width = help_flags.len();

        let flags: Vec<&FlagNode> = self
            .command
            .flags
            .iter()
            .filter(|flag| !flag.core.hidden)
            .collect();
        let positionals: Vec<&PositionalNode> = self
            .command
            .positionals
            .iter()
            .filter(|positional| !positional.core.hidden)
            .collect();
        let commands: Vec<&Command> = self
            .command
            .commands
            .iter()
            .filter(|command| !command.hidden)
            .collect();

        for flag in &flags {
            let left = flag_grammar(flag);

            if column_width < left.len() {
                column_width = left.len();
            }

            let value = value_grammar(flag);
            match flag.short {
                Some(short) => summary.push(format!("[-{short}{value}]")),
                None => summary.push(format!("[--{name}{value}]", name = flag.core.name)),
            };
        }

        for positional in &positionals {
            let grammar = positional_grammar(positional);

            if column_width < grammar.len() {
                column_width = grammar.len();
            }

            summary.push(grammar);
        }

        for command in &commands {
            let left = command_grammar(command);

            if column_width < left.len() {
                column_width = left.len();
            }
        }

        if !commands.is_empty() {
            summary.push("COMMAND [...]".to_string());
        }

        user_interface.print(format!(
            "usage: {p} {s}",
            p = self.program,
            s = summary.join(" ")
        ));

        if !self.command.help.is_empty() {
            user_interface.print("".to_string());
            user_interface.print(self.command.help.clone());
        }

        if !commands.is_empty() {
            user_interface.print("".to_string());
            user_interface.print("commands:".to_string());

            for command in &commands {
                for line in self.render(&command_grammar(command), &command.help, column_width) {
                    user_interface.print(line);
                }
            }
        }

        if !positionals.is_empty() {
            user_interface.print("".to_string());
            user_interface.print("positional arguments:".to_string());

            for positional in &positionals {
                for line in self.render(
                    &positional_grammar(positional),
                    &describe(&positional.core.help, &positional.core.default, &positional.core.env),
                    column_width,
                ) {
                    user_interface.print(line);
                }
            }
        }

        user_interface.print("".to_string());
        user_interface.print("options:".to_string());

        for line in self.render(&help_flags, HELP_MESSAGE, column_width) {
            user_interface.print(line);
        }

        for flag in &flags {
            for line in self.render(
                &flag_grammar(flag),
                &describe(&flag.core.help, &flag.core.default, &flag.core.env),
                column_width,
            ) {
                user_interface.print(line);
            }
        }
    }

    fn render(&self, left: &str, description: &str, column_width: usize) -> Vec<String> {
        if description.is_empty() {
            return vec![format!("{:MAIN_INDENT$}{left}", "")];
        }

        let description_width = match self.terminal_width {
            Some(terminal_width) => std::cmp::max(
                terminal_width.saturating_sub(MAIN_INDENT + column_width + PADDING_WIDTH),
                MINIMUM_DESCRIPTION_WIDTH,
            ),
            None => usize::MAX,
        };
        let mut lines = Vec::default();

        for (index, segment) in wrap(description, description_width).into_iter().enumerate() {
            if index == 0 {
                lines.push(format!(
                    "{:MAIN_INDENT$}{left:column_width$}{:PADDING_WIDTH$}{segment}",
                    "", ""
                ));
            } else {
                lines.push(format!(
                    "{:width$}{segment}",
                    "",
                    width = MAIN_INDENT + column_width + PADDING_WIDTH
                ));
            }
        }

        lines
    }
}

fn value_grammar(flag: &FlagNode) -> String {
    if flag.core.is_bool() {
        "".to_string()
    } else {
        format!(
            " {}",
            flag.core.name.to_ascii_uppercase().replace('-', "_")
        )
    }
}

fn flag_grammar(flag: &FlagNode) -> String {
    let value = value_grammar(flag);
    match flag.short {
        Some(short) => format!("-{short}, --{name}{value}", name = flag.core.name),
        None => format!("--{name}{value}", name = flag.core.name),
    }
}

fn positional_grammar(positional: &PositionalNode) -> String {
    let name = positional.core.name.to_ascii_uppercase().replace('-', "_");
    if positional.variadic {
        format!("[{name} ...]")
    } else {
        name
    }
}

fn command_grammar(command: &Command) -> String {
    if command.aliases.is_empty() {
        command.name.clone()
    } else {
        format!("{} ({})", command.name, command.aliases.join(", "))
    }
}

fn describe(help: &str, default: &Option<String>, env: &Option<String>) -> String {
    let mut description = help.to_string();

    if let Some(default) = default {
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(&format!("(default: {default})"));
    }

    if let Some(env) = env {
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(&format!("(env: {env})"));
    }

    description
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::default();
    let mut current = String::default();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(' ');
        }

        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
