use std::cell::RefCell;
use std::collections::HashMap;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;

use url::Url;

use crate::api::parameter::{FlagSpec, PositionalSpec};
use crate::model::{Command, FlagNode, NodeCore, PositionalNode};
use crate::resolver::{self, Error, Resolution};
use crate::value::{
    ExistingDir, ExistingFile, FromToken, Handle, HostPort, ListSlot, MapSlot, OpenedFile,
    OptionalSlot, ScalarSlot, Value,
};

enum Target {
    Flag(FlagSpec),
    Positional(PositionalSpec),
}

/// Binds a typed destination to a declared parameter.
///
/// Produced by [`Command::flag`] and [`Command::positional`]; consumed by one
/// of the typed methods, which hands back a [`Handle`] onto the storage.
pub struct Binder<'c> {
    command: &'c mut Command,
    target: Target,
}

impl<'c> Binder<'c> {
    fn push(self, slot: Rc<RefCell<dyn Value>>) {
        match self.target {
            Target::Flag(spec) => {
                let FlagSpec {
                    name,
                    short,
                    help,
                    required,
                    default,
                    env,
                    hidden,
                } = spec;
                self.command.flags.push(FlagNode {
                    core: NodeCore::new(name, help, required, default, env, hidden, slot),
                    short,
                });
            }
            Target::Positional(spec) => {
                let PositionalSpec {
                    name,
                    help,
                    required,
                    variadic,
                    default,
                    env,
                } = spec;
                self.command.positionals.push(PositionalNode {
                    core: NodeCore::new(name, help, required, default, env, false, slot),
                    variadic,
                });
            }
        }
    }

    /// Bind a scalar destination of any token-convertible type.
    pub fn of<T>(self) -> Handle<T>
    where
        T: FromToken + Default + 'static,
    {
        let handle = Handle::new(T::default());
        let slot = ScalarSlot::new(&handle);
        self.push(Rc::new(RefCell::new(slot)));
        handle
    }

    /// Bind an `Option<T>` destination; for types without a zero value.
    pub fn optional<T>(self) -> Handle<Option<T>>
    where
        T: FromToken + 'static,
    {
        let handle = Handle::new(None);
        let slot = OptionalSlot::new(&handle);
        self.push(Rc::new(RefCell::new(slot)));
        handle
    }

    /// Bind a repeatable `Vec<T>` destination; occurrences accumulate.
    pub fn list<T>(self) -> Handle<Vec<T>>
    where
        T: FromToken + 'static,
    {
        let handle = Handle::new(Vec::default());
        let slot = ListSlot::new(&handle);
        self.push(Rc::new(RefCell::new(slot)));
        handle
    }

    /// Bind a repeatable `key=value` map destination.
    pub fn map(self) -> Handle<HashMap<String, String>> {
        let handle = Handle::new(HashMap::default());
        let slot = MapSlot::new(&handle);
        self.push(Rc::new(RefCell::new(slot)));
        handle
    }

    pub fn bool(self) -> Handle<bool> {
        self.of::<bool>()
    }

    pub fn string(self) -> Handle<String> {
        self.of::<String>()
    }

    pub fn strings(self) -> Handle<Vec<String>> {
        self.list::<String>()
    }

    pub fn string_map(self) -> Handle<HashMap<String, String>> {
        self.map()
    }

    pub fn int(self) -> Handle<i64> {
        self.of::<i64>()
    }

    pub fn uint(self) -> Handle<u64> {
        self.of::<u64>()
    }

    pub fn float(self) -> Handle<f64> {
        self.of::<f64>()
    }

    pub fn duration(self) -> Handle<Duration> {
        self.of::<Duration>()
    }

    pub fn ip(self) -> Handle<Option<IpAddr>> {
        self.optional::<IpAddr>()
    }

    /// A TCP `host:port` address.
    pub fn tcp(self) -> Handle<Option<HostPort>> {
        self.optional::<HostPort>()
    }

    /// A repeatable list of TCP `host:port` addresses.
    pub fn tcp_list(self) -> Handle<Vec<HostPort>> {
        self.list::<HostPort>()
    }

    /// A path that must name an existing file when its token converts.
    pub fn existing_file(self) -> Handle<Option<ExistingFile>> {
        self.optional::<ExistingFile>()
    }

    /// A path that must name an existing directory when its token converts.
    pub fn existing_dir(self) -> Handle<Option<ExistingDir>> {
        self.optional::<ExistingDir>()
    }

    /// A file validated and opened when its token converts.
    pub fn file(self) -> Handle<Option<OpenedFile>> {
        self.optional::<OpenedFile>()
    }

    pub fn url(self) -> Handle<Option<Url>> {
        self.optional::<Url>()
    }
}

impl Command {
    /// Declare a flag in this scope; the returned [`Binder`] selects its type.
    pub fn flag(&mut self, spec: FlagSpec) -> Binder<'_> {
        Binder {
            command: self,
            target: Target::Flag(spec),
        }
    }

    /// Declare the next positional argument in this scope.
    pub fn positional(&mut self, spec: PositionalSpec) -> Binder<'_> {
        Binder {
            command: self,
            target: Target::Positional(spec),
        }
    }

    /// Declare a child command and return its scope for further declaration.
    pub fn command(&mut self, name: impl Into<String>, help: impl Into<String>) -> &mut Command {
        self.commands.push(Command::new(name, help));
        self.commands
            .last_mut()
            .expect("internal error - command was just pushed")
    }

    /// Resolve a raw token sequence against this model.
    ///
    /// A pure function of (model, tokens): no hidden process-wide state, no
    /// output formatting. Bound destinations mutate in place; the returned
    /// [`Resolution`] carries the matched command chain.
    pub fn resolve(&self, tokens: &[&str]) -> Result<Resolution, Error> {
        self.check()?;
        self.reset();
        let (scopes, path) = resolver::consume(self, tokens)?;
        resolver::finalize(&scopes)?;
        Ok(Resolution { path })
    }
}
