// ============================================================================
// src/cmd/base.rs – Allowlisted external command runner (tty, grub installer)
// ============================================================================

use crate::error::CommandError;
use std::cell::RefCell;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Absolute locations the pipeline may spawn. A bare name such as
/// `grub2-install` is looked up only among these, never through PATH.
pub const ALLOWED_PATHS: &[&str] = &[
    // console query
    "/usr/bin/tty",
    "/bin/tty",
    // grub2 naming (Fedora, openSUSE)
    "/usr/sbin/grub2-install",
    "/sbin/grub2-install",
    "/usr/bin/grub2-install",
    "/usr/local/sbin/grub2-install",
    // upstream naming (Debian, Arch)
    "/usr/sbin/grub-install",
    "/sbin/grub-install",
    "/usr/bin/grub-install",
    "/usr/local/sbin/grub-install",
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputData {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl OutputData {
    /// stdout followed by stderr, the way an operator would see it.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }
}

/// One program run, as recorded by [`RecordingRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Process-execution capability. `Ok` only for a zero exit status; anything
/// else comes back as [`CommandError`].
pub trait Runner {
    fn run(&self, program: &str, args: &[String]) -> Result<OutputData, CommandError>;
}

/// Runs allowlisted programs on the host, blocking until they exit.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    /// An absolute path must appear verbatim in [`ALLOWED_PATHS`]; a bare
    /// name must be the file name of one of its entries.
    pub fn is_allowed(program: &str) -> bool {
        if program.contains('/') {
            ALLOWED_PATHS.contains(&program)
        } else {
            candidates(program).next().is_some()
        }
    }

    /// The allowlisted path `program` would run as. Bare names resolve to the
    /// first existing allowlisted location.
    pub fn resolve(program: &str) -> Result<PathBuf, CommandError> {
        if !Self::is_allowed(program) {
            return Err(CommandError::NotAllowed(program.to_string()));
        }
        if program.contains('/') {
            return Ok(PathBuf::from(program));
        }
        candidates(program)
            .find(|path| path.is_file())
            .map(Path::to_path_buf)
            .ok_or_else(|| CommandError::Spawn {
                program: program.to_string(),
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{program} not found in any allowlisted location"),
                ),
            })
    }
}

fn candidates<'a>(name: &'a str) -> impl Iterator<Item = &'static Path> + 'a {
    ALLOWED_PATHS
        .iter()
        .map(Path::new)
        .filter(move |path| path.file_name().is_some_and(|n| n == name))
}

impl Runner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<OutputData, CommandError> {
        let path = Self::resolve(program)?;
        tracing::debug!(program, path = %path.display(), "spawning");

        // stdin stays inherited: `tty` reports the terminal attached to it.
        let out = Command::new(&path)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let data = OutputData {
            status: out.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        };

        if !out.status.success() {
            return Err(CommandError::Exit {
                program: program.to_string(),
                status: data.status,
                output: data.combined().trim().to_string(),
            });
        }
        Ok(data)
    }
}

/// Records runs of the intercepted programs instead of executing them and
/// forwards everything else to `inner`.
#[derive(Debug)]
pub struct RecordingRunner<R> {
    inner: R,
    intercepted: Vec<String>,
    calls: RefCell<Vec<Invocation>>,
}

impl<R: Runner> RecordingRunner<R> {
    pub fn intercepting<S: AsRef<str>>(inner: R, programs: &[S]) -> Self {
        Self {
            inner,
            intercepted: programs.iter().map(|p| p.as_ref().to_string()).collect(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl<R: Runner> Runner for RecordingRunner<R> {
    fn run(&self, program: &str, args: &[String]) -> Result<OutputData, CommandError> {
        if self.intercepted.iter().any(|p| p == program) {
            tracing::debug!(program, "recording instead of executing");
            self.calls.borrow_mut().push(Invocation {
                program: program.to_string(),
                args: args.to_vec(),
            });
            return Ok(OutputData::default());
        }
        self.inner.run(program, args)
    }
}

#[cfg(test)]
pub use scripted::ScriptedRunner;

#[cfg(test)]
mod scripted {
    use super::{Invocation, OutputData, Runner};
    use crate::error::CommandError;
    use std::cell::RefCell;
    use std::collections::HashMap;

    enum Reply {
        Stdout(String),
        Exit(i32, String),
        SpawnFails,
    }

    /// Runner double answering from a per-program script and logging calls.
    #[derive(Default)]
    pub struct ScriptedRunner {
        replies: HashMap<String, Reply>,
        calls: RefCell<Vec<Invocation>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn prints(mut self, program: &str, stdout: &str) -> Self {
            self.replies
                .insert(program.to_string(), Reply::Stdout(stdout.to_string()));
            self
        }

        pub fn exits(mut self, program: &str, status: i32, output: &str) -> Self {
            self.replies
                .insert(program.to_string(), Reply::Exit(status, output.to_string()));
            self
        }

        pub fn missing(mut self, program: &str) -> Self {
            self.replies.insert(program.to_string(), Reply::SpawnFails);
            self
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.borrow().clone()
        }

        pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
            self.calls()
                .into_iter()
                .filter(|c| c.program == program)
                .collect()
        }
    }

    impl Runner for ScriptedRunner {
        fn run(&self, program: &str, args: &[String]) -> Result<OutputData, CommandError> {
            self.calls.borrow_mut().push(Invocation {
                program: program.to_string(),
                args: args.to_vec(),
            });
            match self.replies.get(program) {
                None => Ok(OutputData::default()),
                Some(Reply::Stdout(s)) => Ok(OutputData {
                    status: 0,
                    stdout: s.clone(),
                    stderr: String::new(),
                }),
                Some(Reply::Exit(status, output)) => Err(CommandError::Exit {
                    program: program.to_string(),
                    status: *status,
                    output: output.clone(),
                }),
                Some(Reply::SpawnFails) => Err(CommandError::Spawn {
                    program: program.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                }),
            }
        }
    }
}
