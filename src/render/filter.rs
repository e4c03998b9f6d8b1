//! External source filter
//!
//! Pipes blob content through a line-oriented program (e.g. a syntax
//! highlighter) and streams its stdout into the response. The child process
//! is always reaped before control returns: either by `pump`, or by the drop
//! guard killing it.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use tracing::debug;

/// A spawned filter process, killed and reaped on drop if not finished
pub struct FilterProcess {
    child: Child,
    program: PathBuf,
    reaped: bool,
}

impl FilterProcess {
    /// Start `program` with the file's base name as its only argument.
    pub fn spawn(program: &Path, basename: &str) -> io::Result<Self> {
        let child = Command::new(program)
            .arg(basename)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;
        debug!(program = %program.display(), basename, pid = child.id(), "Spawned source filter");
        Ok(FilterProcess {
            child,
            program: program.to_path_buf(),
            reaped: false,
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Feed `input` on stdin while streaming stdout into `sink`, then wait.
    ///
    /// A filter that exits before reading all of its input is not an error;
    /// the broken pipe on stdin is ignored.
    pub fn pump(mut self, input: &[u8], sink: &mut dyn Write) -> io::Result<ExitStatus> {
        let mut stdin = self
            .child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "filter stdin missing"))?;
        let mut stdout = self
            .child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "filter stdout missing"))?;
        let child = &mut self.child;

        let copied = thread::scope(|scope| {
            let feeder = scope.spawn(move || {
                let fed = stdin.write_all(input);
                drop(stdin);
                fed
            });
            let copied = io::copy(&mut stdout, sink);
            if copied.is_err() {
                // Unblock the feeder if the filter is stuck on a full stdout pipe.
                let _ = child.kill();
            }
            drop(stdout);
            let fed = feeder
                .join()
                .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "filter feeder panicked")));
            match fed {
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => debug!(error = %e, "Filter stdin write failed"),
                _ => {}
            }
            copied
        });

        let status = self.child.wait();
        self.reaped = true;
        copied?;
        status
    }
}

impl Drop for FilterProcess {
    fn drop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
