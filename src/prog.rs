//! Information about the running program.

use std::path::Path;

use crate::error::Error;
use crate::session::Session;

/// Program info bound to a session.
///
/// Lookups that fail return an empty string and record an [`Error::Prog`]
/// on the session.
#[derive(Debug, Clone, Copy)]
pub struct Prog<'a> {
    session: &'a Session,
}

impl<'a> Prog<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Program arguments, lossily converted to UTF-8.
    pub fn args(&self) -> Vec<String> {
        std::env::args_os()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    pub fn pid(&self) -> u32 {
        std::process::id()
    }

    /// Parent process id; 0 where the platform does not expose it.
    pub fn ppid(&self) -> u32 {
        #[cfg(unix)]
        {
            std::os::unix::process::parent_id()
        }
        #[cfg(not(unix))]
        {
            0
        }
    }

    /// Full path of the running executable.
    pub fn path(&self) -> String {
        match std::env::current_exe() {
            Ok(p) => p.to_string_lossy().into_owned(),
            Err(e) => self.fail(format!("executable path: {e}")),
        }
    }

    /// File name of the running executable.
    pub fn name(&self) -> String {
        let path = self.path();
        Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn workdir(&self) -> String {
        match std::env::current_dir() {
            Ok(p) => p.to_string_lossy().into_owned(),
            Err(e) => self.fail(format!("working directory: {e}")),
        }
    }

    /// Full path of `program` if it is an executable file on `PATH`.
    ///
    /// `PATH` is read through the session, so a local `PATH` variable takes
    /// precedence over the process environment. Names containing a path
    /// separator are resolved against the working directory.
    pub fn avail(&self, program: &str) -> String {
        if program.is_empty() {
            return self.fail("empty program name".into());
        }
        let cwd = match std::env::current_dir() {
            Ok(dir) => dir,
            Err(e) => return self.fail(format!("working directory: {e}")),
        };
        match which::which_in(program, Some(self.session.val("PATH")), cwd) {
            Ok(path) => path.to_string_lossy().into_owned(),
            Err(e) => self.fail(format!("{program}: {e}")),
        }
    }

    /// Print `message`, expanded through the session, to stderr and exit
    /// the process with `code`.
    pub fn exit(&self, code: i32, message: &str) -> ! {
        let message = self.session.eval(message);
        if !message.is_empty() {
            eprintln!("{message}");
        }
        std::process::exit(code)
    }

    fn fail(&self, msg: String) -> String {
        self.session.record(Error::Prog(msg));
        String::new()
    }
}
