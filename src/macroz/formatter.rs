//! # External JSON formatters
//!
//! The store can pipe its JSON through an external filter on the way in and
//! out of the backing file. A filter reads JSON on stdin, writes
//! semantically identical JSON on stdout, and must exit 0.
//!
//! Two well-known pretty-printers are built in (`jq` and Python's
//! `json.tool`), and an arbitrary command can be configured as `custom`.
//! Each formatter has two invocations:
//!
//! - [`Direction::Normalize`]: applied to file bytes before parsing.
//! - [`Direction::Pretty`]: applied to canonical bytes before writing.
//!
//! Availability is probed on `PATH` before spawning, and the probe result is
//! cached for the lifetime of the process. Every run is bounded by a timeout;
//! a filter that hangs is killed.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::str::FromStr;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum FormatterError {
    #[error("formatter '{program}' was not found on PATH")]
    Unavailable { program: String },

    #[error("formatter '{program}' failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("formatter '{program}' timed out after {}ms", .timeout.as_millis())]
    Timeout { program: String, timeout: Duration },

    #[error("formatter '{program}' produced unusable output: {reason}")]
    InvalidOutput { program: String, reason: String },

    #[error("failed to run formatter '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Which way the bytes are travelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// File bytes on their way to the JSON parser.
    Normalize,
    /// Canonical bytes on their way to disk.
    Pretty,
}

/// A concrete filter process: program name (or path) plus arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl FilterCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for FilterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Formatter {
    #[default]
    None,
    Jq,
    JsonTool,
    /// Same argv in both directions.
    Custom(FilterCommand),
}

impl Formatter {
    pub fn is_none(&self) -> bool {
        matches!(self, Formatter::None)
    }

    /// The process to run for `direction`, or `None` for the identity formatter.
    pub fn command(&self, direction: Direction) -> Option<FilterCommand> {
        match (self, direction) {
            (Formatter::None, _) => None,
            (Formatter::Jq, Direction::Normalize) => Some(FilterCommand::new("jq", ["-c", "."])),
            (Formatter::Jq, Direction::Pretty) => Some(FilterCommand::new("jq", ["."])),
            (Formatter::JsonTool, Direction::Normalize) => Some(FilterCommand::new(
                "python3",
                ["-m", "json.tool", "--compact"],
            )),
            (Formatter::JsonTool, Direction::Pretty) => {
                Some(FilterCommand::new("python3", ["-m", "json.tool"]))
            }
            (Formatter::Custom(cmd), _) => Some(cmd.clone()),
        }
    }

    /// Whether the formatter's program can be found. Always true for `none`.
    pub fn is_available(&self) -> bool {
        match self.command(Direction::Pretty) {
            None => true,
            Some(cmd) => find_executable(&cmd.program).is_some(),
        }
    }

    /// Pipes `input` through the formatter. `none` returns the input as is.
    pub fn apply(
        &self,
        direction: Direction,
        input: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, FormatterError> {
        match self.command(direction) {
            None => Ok(input.to_vec()),
            Some(cmd) => run_filter(&cmd, input, timeout),
        }
    }
}

impl fmt::Display for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formatter::None => write!(f, "none"),
            Formatter::Jq => write!(f, "jq"),
            Formatter::JsonTool => write!(f, "json-tool"),
            Formatter::Custom(cmd) => write!(f, "custom ({})", cmd),
        }
    }
}

impl FromStr for Formatter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Formatter::None),
            "jq" => Ok(Formatter::Jq),
            "json-tool" | "json.tool" | "python" => Ok(Formatter::JsonTool),
            other => Err(format!(
                "Unknown formatter '{}' (expected none, jq or json-tool)",
                other
            )),
        }
    }
}

static PROBE_CACHE: Lazy<Mutex<HashMap<String, Option<PathBuf>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Locates `program` on `PATH` (or checks it directly if it contains a path
/// separator). Results are cached per program name.
pub fn find_executable(program: &str) -> Option<PathBuf> {
    let mut cache = PROBE_CACHE.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(hit) = cache.get(program) {
        return hit.clone();
    }

    let found = probe(program);
    debug!(program, found = ?found, "probed formatter executable");
    cache.insert(program.to_string(), found.clone());
    found
}

fn probe(program: &str) -> Option<PathBuf> {
    let direct = Path::new(program);
    if direct.is_absolute() || program.contains('/') || program.contains('\\') {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .flat_map(|dir| candidates(&dir, program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program), dir.join(format!("{}.exe", program))]
}

#[cfg(not(windows))]
fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    vec![dir.join(program)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Runs `command` as a stdin→stdout filter over `input`.
///
/// Stdin is fed and stdout/stderr are drained on helper threads so a filter
/// that produces a lot of output cannot deadlock against a full pipe. If the
/// process does not exit within `timeout` it is killed and
/// [`FormatterError::Timeout`] is returned.
pub fn run_filter(
    command: &FilterCommand,
    input: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, FormatterError> {
    let path =
        find_executable(&command.program).ok_or_else(|| FormatterError::Unavailable {
            program: command.program.clone(),
        })?;

    debug!(command = %command, bytes = input.len(), "running formatter");
    let io_err = |source: io::Error| FormatterError::Io {
        program: command.program.clone(),
        source,
    };

    let mut child = Command::new(&path)
        .args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(io_err)?;

    let stdin = child.stdin.take();
    let payload = input.to_vec();
    let writer = thread::spawn(move || -> io::Result<()> {
        if let Some(mut stdin) = stdin {
            stdin.write_all(&payload)?;
        }
        Ok(())
    });
    let stdout = spawn_reader(child.stdout.take());
    let stderr = spawn_reader(child.stderr.take());

    let status = match child.wait_timeout(timeout).map_err(io_err)? {
        Some(status) => status,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            warn!(command = %command, ?timeout, "formatter timed out, killed");
            return Err(FormatterError::Timeout {
                program: command.program.clone(),
                timeout,
            });
        }
    };

    if let Ok(Err(e)) = writer.join() {
        debug!(command = %command, error = %e, "formatter closed stdin early");
    }
    let stdout = join_reader(stdout).map_err(io_err)?;
    let stderr = join_reader(stderr).map_err(io_err)?;

    if !status.success() {
        return Err(FormatterError::Failed {
            program: command.program.clone(),
            status,
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        });
    }

    Ok(stdout)
}

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut source) = source {
            source.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join_reader(handle: JoinHandle<io::Result<Vec<u8>>>) -> io::Result<Vec<u8>> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("pipe reader panicked")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_identity() {
        let out = Formatter::None
            .apply(Direction::Pretty, b"{\"macros\":[]}", DEFAULT_TIMEOUT)
            .unwrap();
        assert_eq!(out, b"{\"macros\":[]}");
        assert!(Formatter::None.is_available());
    }

    #[test]
    fn named_formatters_have_distinct_invocations() {
        let read = Formatter::Jq.command(Direction::Normalize).unwrap();
        let write = Formatter::Jq.command(Direction::Pretty).unwrap();
        assert_eq!(read.program, "jq");
        assert_ne!(read.args, write.args);

        let read = Formatter::JsonTool.command(Direction::Normalize).unwrap();
        assert_eq!(read.program, "python3");
        assert!(read.args.contains(&"--compact".to_string()));
    }

    #[test]
    fn parses_formatter_names() {
        assert_eq!("none".parse::<Formatter>().unwrap(), Formatter::None);
        assert_eq!("JQ".parse::<Formatter>().unwrap(), Formatter::Jq);
        assert_eq!(
            "json.tool".parse::<Formatter>().unwrap(),
            Formatter::JsonTool
        );
        assert!("prettier".parse::<Formatter>().is_err());
    }

    #[test]
    fn serializes_as_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Formatter::JsonTool).unwrap(),
            "\"json-tool\""
        );
        let custom: Formatter =
            serde_json::from_str(r#"{"custom":{"program":"cat"}}"#).unwrap();
        assert_eq!(custom, Formatter::Custom(FilterCommand::new("cat", [] as [&str; 0])));
    }

    #[test]
    fn missing_program_is_unavailable() {
        let cmd = FilterCommand::new("macroz-no-such-formatter", [] as [&str; 0]);
        let err = run_filter(&cmd, b"{}", DEFAULT_TIMEOUT).unwrap_err();
        assert!(matches!(err, FormatterError::Unavailable { .. }));
        assert!(!Formatter::Custom(cmd).is_available());
    }

    #[cfg(unix)]
    #[test]
    fn pipes_bytes_through_filter() {
        let cmd = FilterCommand::new("cat", [] as [&str; 0]);
        let out = run_filter(&cmd, b"{\"a\":1}", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(out, b"{\"a\":1}");
    }

    #[cfg(unix)]
    #[test]
    fn large_payload_does_not_deadlock() {
        let cmd = FilterCommand::new("cat", [] as [&str; 0]);
        let input = vec![b'x'; 4 * 1024 * 1024];
        let out = run_filter(&cmd, &input, Duration::from_secs(30)).unwrap();
        assert_eq!(out.len(), input.len());
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_failure_with_stderr() {
        let cmd = FilterCommand::new("sh", ["-c", "echo broken >&2; exit 3"]);
        match run_filter(&cmd, b"{}", DEFAULT_TIMEOUT).unwrap_err() {
            FormatterError::Failed { status, stderr, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn hung_filter_times_out() {
        let cmd = FilterCommand::new("sleep", ["5"]);
        let started = std::time::Instant::now();
        let err = run_filter(&cmd, b"{}", Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, FormatterError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn probe_result_is_cached() {
        let first = find_executable("sh");
        assert!(first.is_some());
        assert_eq!(find_executable("sh"), first);
    }
}
