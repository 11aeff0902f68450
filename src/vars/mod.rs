//! Session variable store.
//!
//! Local variables live in an in-memory map and shadow process environment
//! variables of the same name. Environment declarations write through to the
//! OS and clear any local shadow, so the two tiers never disagree about
//! which value wins.

pub mod declare;

pub use declare::{Declaration, is_identifier};

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::expand::{self, DEFAULT_ESCAPE, Resolver};

/// Name → value store with process environment fallback.
///
/// All methods take `&self`; the map sits behind a reader/writer lock so a
/// store can be shared by several threads. Declaring methods return `&Self`
/// so calls chain, and failures land in [`Variables::err`].
#[derive(Debug)]
pub struct Variables {
    vars: RwLock<HashMap<String, String>>,
    escape_char: char,
    panic_on_err: bool,
    err: Mutex<Option<Error>>,
}

impl Default for Variables {
    fn default() -> Self {
        Self::new()
    }
}

impl Variables {
    pub fn new() -> Self {
        Self {
            vars: RwLock::new(HashMap::new()),
            escape_char: DEFAULT_ESCAPE,
            panic_on_err: false,
            err: Mutex::new(None),
        }
    }

    /// Use `escape` instead of `\` to suppress expansion of a following `$`.
    ///
    /// Unlike a plain setter, this rejects `$`: passing it logs a warning and
    /// leaves the current escape character in place, so
    /// `Variables::new().with_escape_char('$').escape_char()` is still `\`.
    pub fn with_escape_char(mut self, escape: char) -> Self {
        if escape == '$' {
            warn!("'$' cannot be the escape character; keeping {:?}", self.escape_char);
            return self;
        }
        self.escape_char = escape;
        self
    }

    /// Panic on the first recorded error instead of storing it.
    pub fn with_panic_on_err(mut self, panic_on_err: bool) -> Self {
        self.panic_on_err = panic_on_err;
        self
    }

    pub fn escape_char(&self) -> char {
        self.escape_char
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.vars.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.vars.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Declare a local variable. The value is expanded before it is stored.
    pub fn set_var(&self, name: &str, value: &str) -> &Self {
        let value = self.eval(value);
        debug!("var {name}");
        self.write().insert(name.to_string(), value);
        self
    }

    /// Declare a process environment variable and drop any local shadow.
    pub fn set_env(&self, name: &str, value: &str) -> &Self {
        if let Err(e) = self.try_set_env(name, value) {
            self.record(e);
        }
        self
    }

    fn try_set_env(&self, name: &str, value: &str) -> Result<()> {
        if name.is_empty() || name.contains(['=', '\0']) {
            return Err(Error::InvalidEnvName(name.to_string()));
        }
        let value = self.eval(value);
        if value.contains('\0') {
            return Err(Error::InvalidEnvValue {
                name: name.to_string(),
            });
        }
        debug!("env {name}");
        // SAFETY: the environment is process-global. Callers that mutate it
        // while other threads spawn processes or read it through libc accept
        // the race inherent to the OS environment model.
        unsafe { std::env::set_var(name, &value) };
        self.write().remove(name);
        Ok(())
    }

    /// Declare local variables from `NAME=VALUE` text, e.g. `foo=bar fuzz=buzz`.
    pub fn var(&self, text: &str) -> &Self {
        self.vars([text])
    }

    /// Declare local variables from several items, each holding one or more
    /// pairs. Later pairs win over earlier ones with the same name.
    pub fn vars<I, S>(&self, items: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for decl in declare::parse_all(items) {
            self.set_var(&decl.name, &decl.value);
        }
        self
    }

    /// Declare environment variables from `NAME=VALUE` text, e.g. `GOOS=linux GOARCH=amd64`.
    pub fn env(&self, text: &str) -> &Self {
        self.envs([text])
    }

    /// Declare environment variables from several items. Stops at the first
    /// pair the OS rejects.
    pub fn envs<I, S>(&self, items: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for decl in declare::parse_all(items) {
            if let Err(e) = self.try_set_env(&decl.name, &decl.value) {
                self.record(e);
                break;
            }
        }
        self
    }

    /// Value of `name`: the local variable if declared, else the process
    /// environment variable, else the empty string.
    pub fn val(&self, name: &str) -> String {
        lookup(&self.read(), name)
    }

    /// Local value of `name`, ignoring the environment.
    pub fn local(&self, name: &str) -> Option<String> {
        self.read().get(name).cloned()
    }

    /// Sorted names of all local variables.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Expand `$NAME` and `${NAME}` references in `text` against this store.
    pub fn eval(&self, text: &str) -> String {
        let vars = self.read();
        expand::expand_with(text, self.escape_char, &|name: &str| lookup(&vars, name))
    }

    /// Remove a local variable. The process environment is not touched.
    pub fn unset_var(&self, name: &str) -> &Self {
        self.write().remove(name);
        self
    }

    /// The most recent error recorded by a declaring call.
    pub fn err(&self) -> Option<Error> {
        self.err.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear_err(&self) {
        *self.err.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub(crate) fn record(&self, err: Error) {
        if self.panic_on_err {
            panic!("{err}");
        }
        warn!("{err}");
        *self.err.lock().unwrap_or_else(PoisonError::into_inner) = Some(err);
    }
}

impl Resolver for Variables {
    fn resolve(&self, name: &str) -> String {
        self.val(name)
    }
}

fn lookup(vars: &HashMap<String, String>, name: &str) -> String {
    match vars.get(name) {
        Some(v) => v.clone(),
        None => expand::resolve::env_value(name),
    }
}
