use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::time::Duration;

use assert_matches::assert_matches;

use declarg::{
    Cli, Command, Error, FlagSpec, HostPort, ParseError, PositionalSpec, UserInterface,
};

#[derive(Default)]
struct RecordingInterface {
    messages: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl UserInterface for RecordingInterface {
    fn print(&self, message: String) {
        self.messages.borrow_mut().push(message);
    }

    fn print_error(&self, error: Error) {
        self.errors.borrow_mut().push(error.to_string());
    }
}

fn messaging_root() -> (
    Command,
    declarg::Handle<bool>,
    declarg::Handle<String>,
    declarg::Handle<String>,
    declarg::Handle<Vec<String>>,
) {
    let mut root = Command::new("messenger", "Message the team.");
    let verbose = root
        .flag(FlagSpec::new("verbose").short('v').help("Print more."))
        .bool();
    let register = root.command("register", "Register a channel.");
    let token = register
        .flag(FlagSpec::new("token").required().help("The API token."))
        .string();
    let post = root.command("post", "Send a message.");
    post.alias("p");
    let channel = post
        .positional(PositionalSpec::new("channel").required())
        .string();
    let message = post
        .positional(PositionalSpec::new("message").variadic())
        .strings();
    (root, verbose, token, channel, message)
}

#[test]
fn messaging_program() {
    let (root, verbose, token, channel, message) = messaging_root();

    let resolution = root
        .resolve(&["-v", "post", "general", "hello", "team"])
        .unwrap();

    assert_eq!(resolution.path, vec!["post".to_string()]);
    assert_eq!(resolution.command(), Some("post"));
    assert!(verbose.get());
    assert_eq!(channel.get(), "general");
    assert_eq!(
        message.get(),
        vec!["hello".to_string(), "team".to_string()]
    );

    // The same model resolves again; 'register' enforces its own requireds.
    let resolution = root.resolve(&["register", "--token", "abc"]).unwrap();

    assert_eq!(resolution.command(), Some("register"));
    assert_eq!(token.get(), "abc");
    assert!(!verbose.get());
}

#[test]
fn alias_resolves_to_canonical_name() {
    let (root, _, _, channel, _) = messaging_root();

    let resolution = root.resolve(&["p", "general"]).unwrap();

    assert_eq!(resolution.path, vec!["post".to_string()]);
    assert_eq!(channel.get(), "general");
}

#[test]
fn unmatched_command_requireds_not_enforced() {
    let (root, _, _, _, _) = messaging_root();

    // 'register' declares a required 'token', but only the matched command
    // chain participates in validation.
    root.resolve(&["post", "general"]).unwrap();
}

#[test]
fn ancestor_flag_after_dispatch() {
    let (root, verbose, _, channel, _) = messaging_root();

    root.resolve(&["post", "general", "--verbose"]).unwrap();

    assert!(verbose.get());
    assert_eq!(channel.get(), "general");
}

#[test]
fn defaults_idempotent_across_resolutions() {
    let mut root = Command::new("program", "");
    let items = root.flag(FlagSpec::new("item").default("x")).strings();

    root.resolve(&[]).unwrap();
    root.resolve(&[]).unwrap();

    assert_eq!(items.get(), vec!["x".to_string()]);
}

#[test]
fn short_cluster_with_attached_value() {
    let mut root = Command::new("program", "");
    let all = root.flag(FlagSpec::new("all").short('a')).bool();
    let count = root.flag(FlagSpec::new("count").short('c')).int();

    root.resolve(&["-ac3"]).unwrap();

    assert!(all.get());
    assert_eq!(count.get(), 3);
}

#[test]
fn negation_overrides_default() {
    let mut root = Command::new("program", "");
    let debug = root.flag(FlagSpec::new("debug").default("true")).bool();

    root.resolve(&["--no-debug"]).unwrap();

    assert!(!debug.get());
}

#[test]
fn terminator_literalizes_remainder() {
    let mut root = Command::new("program", "");
    let files = root
        .positional(PositionalSpec::new("file").variadic())
        .strings();

    root.resolve(&["--", "--verbose", "-x", "post"]).unwrap();

    assert_eq!(
        files.get(),
        vec![
            "--verbose".to_string(),
            "-x".to_string(),
            "post".to_string()
        ]
    );
}

#[test]
fn missing_requireds_batched() {
    let mut root = Command::new("program", "");
    root.flag(FlagSpec::new("token").required()).string();
    root.positional(PositionalSpec::new("channel").required())
        .string();

    let error = root.resolve(&[]).unwrap_err();

    assert_eq!(
        error.to_string(),
        "Missing required parameters: token, channel."
    );
}

#[test]
fn map_splits_on_first_equals() {
    let mut root = Command::new("program", "");
    let headers = root.flag(FlagSpec::new("header")).string_map();

    root.resolve(&["--header=Content-Type=application/json", "--header", "Accept=*/*"])
        .unwrap();

    assert_eq!(
        headers.get(),
        HashMap::from([
            (
                "Content-Type".to_string(),
                "application/json".to_string()
            ),
            ("Accept".to_string(), "*/*".to_string()),
        ])
    );
}

#[test]
fn env_fallback() {
    let mut root = Command::new("program", "");
    let token = root
        .flag(FlagSpec::new("token").env("DECLARG_IT_TOKEN").required())
        .string();
    let count = root
        .flag(FlagSpec::new("count").env("DECLARG_IT_COUNT").default("7"))
        .int();
    env::set_var("DECLARG_IT_TOKEN", "from-env");

    let result = root.resolve(&[]);
    env::remove_var("DECLARG_IT_TOKEN");
    result.unwrap();

    assert_eq!(token.get(), "from-env");
    // Unset environment variable: the default still applies.
    assert_eq!(count.get(), 7);
}

#[test]
fn typed_flags() {
    let mut root = Command::new("program", "");
    let timeout = root.flag(FlagSpec::new("timeout")).duration();
    let peer = root.flag(FlagSpec::new("peer")).tcp();
    let endpoint = root.flag(FlagSpec::new("endpoint")).url();

    root.resolve(&[
        "--timeout",
        "1m30s",
        "--peer",
        "example.com:8080",
        "--endpoint",
        "https://example.com/api",
    ])
    .unwrap();

    assert_eq!(timeout.get(), Duration::from_secs(90));
    assert_eq!(
        peer.get(),
        Some(HostPort {
            host: "example.com".to_string(),
            port: 8080,
        })
    );
    assert_eq!(endpoint.get().unwrap().as_str(), "https://example.com/api");
}

#[test]
fn conversion_failure_names_parameter() {
    let mut root = Command::new("program", "");
    root.flag(FlagSpec::new("count")).int();

    let error = root.resolve(&["--count", "three"]).unwrap_err();

    assert_matches!(
        error,
        Error::Parse(ParseError::Conversion { name, .. }) if name == "count"
    );
}

#[test]
fn existing_file_flag() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();
    let mut root = Command::new("program", "");
    let notes = root.flag(FlagSpec::new("notes")).existing_file();

    root.resolve(&["--notes", path.to_str().unwrap()]).unwrap();
    assert_eq!(notes.get().unwrap().path(), path);

    let missing = directory.path().join("missing.txt");
    let error = root
        .resolve(&["--notes", missing.to_str().unwrap()])
        .unwrap_err();
    assert_matches!(error, Error::Parse(ParseError::Conversion { .. }));
}

#[test]
fn cli_prints_scoped_help() {
    let (root, _, _, _, _) = messaging_root();
    let cli = Cli::new(root);
    let interface = RecordingInterface::default();

    let code = cli.run_tokens(&["post", "--help"], &interface).unwrap_err();

    assert_eq!(code, 0);
    let output = interface.messages.borrow().join("\n");
    assert!(output.starts_with("usage: messenger post [-h] CHANNEL [MESSAGE ...]"));
    assert!(interface.errors.borrow().is_empty());
}

#[test]
fn cli_prints_resolution_error() {
    let (root, _, _, _, _) = messaging_root();
    let cli = Cli::new(root);
    let interface = RecordingInterface::default();

    let code = cli.run_tokens(&["post"], &interface).unwrap_err();

    assert_eq!(code, 1);
    assert_eq!(
        interface.errors.borrow().as_slice(),
        ["Missing required parameters: channel."]
    );
}
