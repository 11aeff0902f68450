//! Caller-owned session: variable store, configuration, and program info.

use std::sync::OnceLock;

use crate::config::Config;
use crate::error::Error;
use crate::prog::Prog;
use crate::vars::Variables;
use crate::words;

/// A scripting session.
///
/// Declaring methods return `&Self` so calls chain:
///
/// ```
/// let session = shellglue::Session::new();
/// session.set_var("name", "world").var("greeting=hello");
/// assert_eq!(session.eval("$greeting, ${name}!"), "hello, world!");
/// ```
///
/// Errors do not break the chain; check [`Session::err`] afterwards.
#[derive(Debug)]
pub struct Session {
    vars: Variables,
    config: Config,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A session built from the embedded default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default_config())
    }

    /// A session built from the default configuration merged with the user's.
    pub fn load() -> Self {
        Self::with_config(Config::load())
    }

    /// A session built from `config`. Its `[vars]` are declared first, then
    /// its `[env]`, each in name order.
    pub fn with_config(config: Config) -> Self {
        let vars = Variables::new()
            .with_escape_char(config.session.escape_char)
            .with_panic_on_err(config.session.panic_on_err);
        for (name, value) in &config.vars {
            vars.set_var(name, value);
        }
        for (name, value) in &config.env {
            vars.set_env(name, value);
        }
        Self { vars, config }
    }

    /// The process-wide shared session, built with [`Session::load`] on first use.
    ///
    /// It is one mutable instance shared by every caller; concurrent writers
    /// are serialized by the store's lock, and environment writes remain
    /// process-global.
    pub fn global() -> &'static Session {
        static GLOBAL: OnceLock<Session> = OnceLock::new();
        GLOBAL.get_or_init(Session::load)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying variable store.
    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    /// Declare a local variable; the value is expanded first.
    pub fn set_var(&self, name: &str, value: &str) -> &Self {
        self.vars.set_var(name, value);
        self
    }

    /// Declare a process environment variable; clears a local of the same name.
    pub fn set_env(&self, name: &str, value: &str) -> &Self {
        self.vars.set_env(name, value);
        self
    }

    /// Declare local variables from `NAME=VALUE` text.
    pub fn var(&self, text: &str) -> &Self {
        self.vars.var(text);
        self
    }

    pub fn vars<I, S>(&self, items: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.vars.vars(items);
        self
    }

    /// Declare environment variables from `NAME=VALUE` text.
    pub fn env(&self, text: &str) -> &Self {
        self.vars.env(text);
        self
    }

    pub fn envs<I, S>(&self, items: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.vars.envs(items);
        self
    }

    pub fn unset_var(&self, name: &str) -> &Self {
        self.vars.unset_var(name);
        self
    }

    pub fn val(&self, name: &str) -> String {
        self.vars.val(name)
    }

    pub fn eval(&self, text: &str) -> String {
        self.vars.eval(text)
    }

    /// The most recent error from a declaring call or a program info lookup.
    pub fn err(&self) -> Option<Error> {
        self.vars.err()
    }

    pub fn clear_err(&self) {
        self.vars.clear_err();
    }

    /// An error whose message has its variables expanded, e.g.
    /// `session.error(&format!("failed to process {file} in ${{HOME}}"))`.
    pub fn error(&self, message: &str) -> Error {
        Error::Message(self.eval(message))
    }

    /// Expand `command` and split it into words for process spawning.
    pub fn words(&self, command: &str) -> Vec<String> {
        words::split(&self.eval(command))
    }

    pub fn prog(&self) -> Prog<'_> {
        Prog::new(self)
    }

    pub(crate) fn record(&self, err: Error) {
        self.vars.record(err);
    }
}
