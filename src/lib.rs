//! `declarg` is a declarative command line parser for Rust.
//!
//! Programs describe their parameters up front as a tree of flags, positional
//! arguments and sub-commands; resolving a token sequence against that
//! declaration converts each matched token through a typed destination.
//! Specifically, `declarg` prioritizes the following design concerns:
//! * *Type safe argument parsing*:
//! The user should not call any `&str -> T` conversion functions directly.
//! Every destination is bound through the [`FromToken`] contract, and custom
//! types plug in by implementing it.
//! * *Declaration before consumption*:
//! The full parameter tree exists before the first token is read.
//! Programming errors in the declaration (duplicate names, a variadic
//! positional that is not last) surface as [`DeclarationError`], distinct from
//! user input mistakes.
//! * *Sub-command paradigm*:
//! Commands nest arbitrarily, and a flag declared on an ancestor scope stays
//! recognizable after descending into a sub-command.
//! * *Detailed yet basic UX*:
//! The help and error output should leave no ambiguity in how to use the
//! program, without rich display configuration such as colour output or shell
//! completions.
//!
//! # Usage
//! ```no_run
//! use declarg::{Cli, Command, FlagSpec, PositionalSpec};
//!
//! let mut root = Command::new("messenger", "Message the team.");
//! let verbose = root
//!     .flag(FlagSpec::new("verbose").short('v').help("Print more."))
//!     .bool();
//! let post = root.command("post", "Send a message.");
//! let channel = post.positional(PositionalSpec::new("channel")).string();
//! let message = post
//!     .positional(PositionalSpec::new("message").variadic())
//!     .strings();
//!
//! let resolution = Cli::new(root).run();
//!
//! if resolution.command() == Some("post") {
//!     if verbose.get() {
//!         println!("posting to #{}", channel.get());
//!     }
//!     println!("{}", message.get().join(" "));
//! }
//! ```
//!
//! ```console
//! $ messenger post -h
//! usage: messenger post [-h] CHANNEL [MESSAGE ...]
//!
//! Send a message.
//!
//! positional arguments:
//!  CHANNEL
//!  [MESSAGE ...]
//!
//! options:
//!  -h, --help     Show this help message and exit.
//!
//! $ messenger -v post general hello team
//! posting to #general
//! hello team
//! ```
//!
//! # Cli Semantics
//! `declarg` resolves the token sequence according to the following rules.
//! * Long flags match as `--name value` or `--name=value`; only the first `=`
//! separates, so `--header=a=b` carries the value `a=b`.
//! * Boolean flags take no value token. `--name` sets true, `--no-name` sets
//! false, and `--name=true`/`--name=false` work explicitly.
//! * Short flags cluster: `-abc` is `--apple --banana --carrot` while all but
//! the last are boolean. The first value-taking member consumes the rest of
//! the cluster (`-c3`), an `=` (`-c=3`), or the next token.
//! * Positional arguments match in declaration order. A variadic positional
//! must be last and consumes every remaining positional token.
//! * A bare token matching a sub-command name (or alias) descends into that
//! command's scope; an exact command match always wins over a positional.
//! * `--` terminates flag matching: everything after it is positional,
//! verbatim.
//! * After consumption, untouched parameters fall back to their environment
//! variable, then their default; still-unset required parameters are reported
//! together in a single error.
mod api;
mod cli;
mod constant;
mod help;
mod model;
mod resolver;
mod tokens;
mod value;

pub use api::{Binder, FlagSpec, PositionalSpec};
pub use cli::Cli;
pub use help::{Console, UserInterface};
pub use model::{Command, DeclarationError};
pub use resolver::{Error, ParseError, Resolution};
pub use value::{
    ConversionError, ExistingDir, ExistingFile, FromToken, Handle, HostPort, OpenedFile, Value,
};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
