//! Shared plumbing for analyzers that wrap an external linter
//!
//! Analyzers follow a common pattern:
//! 1. Stage the snippet in a scoped temporary file
//! 2. Run the linter as a subprocess with a bounded timeout
//! 3. Parse its JSON output into `Issue` records
//!
//! The staged file is a `NamedTempFile`, so it is removed on every exit path
//! (including panics) when it drops. Analyzers still close it explicitly to
//! surface removal failures.

use crate::error::{CodevibeError, ExternalToolError, Result};
use serde_json::Value as JsonValue;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Captured output of a finished tool run
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub return_code: Option<i32>,
}

impl ToolOutput {
    /// Parse stdout as JSON. Empty output means "no findings" and yields `None`.
    pub fn json_output(&self, tool_name: &str) -> std::result::Result<Option<JsonValue>, ExternalToolError> {
        let trimmed = self.stdout.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(trimmed)
            .map(Some)
            .map_err(|e| ExternalToolError::MalformedOutput {
                tool: tool_name.to_string(),
                detail: e.to_string(),
            })
    }
}

/// Write `code` to a fresh temporary file ending in `suffix`
pub fn stage_source(code: &str, suffix: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("codevibe-")
        .suffix(suffix)
        .tempfile()
        .map_err(|e| CodevibeError::resource("Failed to create temporary file", e))?;

    file.write_all(code.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| CodevibeError::resource("Failed to write temporary file", e))?;

    debug!("Staged {} bytes at {}", code.len(), file.path().display());
    Ok(file)
}

/// Remove a staged file, reporting failures as resource errors
pub fn remove_staged(file: NamedTempFile) -> Result<()> {
    file.close()
        .map_err(|e| CodevibeError::resource("Failed to remove temporary file", e))
}

/// Cached JavaScript runtime detection
static JS_RUNTIME: OnceLock<JsRuntime> = OnceLock::new();

/// JavaScript package runner available on this machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsRuntime {
    Bun,
    Npm,
    None,
}

impl JsRuntime {
    /// Get the package executor command (bunx or npx)
    pub fn exec_cmd(&self) -> &'static str {
        match self {
            JsRuntime::Bun => "bunx",
            // npx is still the best guess; the spawn reports it missing
            JsRuntime::Npm | JsRuntime::None => "npx",
        }
    }
}

fn probe(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Detect available JavaScript runtime (bun preferred)
pub fn get_js_runtime() -> JsRuntime {
    *JS_RUNTIME.get_or_init(|| {
        if probe("bun") {
            debug!("Using Bun runtime for JavaScript tools");
            return JsRuntime::Bun;
        }
        if probe("npm") {
            debug!("Using npm runtime for JavaScript tools");
            return JsRuntime::Npm;
        }
        warn!("No JavaScript runtime (bun or npm) found. ESLint invocations will fail.");
        JsRuntime::None
    })
}

/// Command prefix to execute a JS package binary
pub fn js_exec_command(package: &str) -> Vec<String> {
    vec![get_js_runtime().exec_cmd().to_string(), package.to_string()]
}

/// Run an external tool and wait at most `timeout` for it
///
/// # Arguments
/// * `cmd` - Command and arguments to run
/// * `tool_name` - Human-readable tool name for errors and logs
/// * `install_hint` - Message reported when the binary is missing
/// * `timeout` - Wall-clock limit; `Duration::ZERO` waits forever
/// * `cwd` - Working directory for the tool
pub fn run_external_tool(
    cmd: &[String],
    tool_name: &str,
    install_hint: &str,
    timeout: Duration,
    cwd: Option<&Path>,
) -> std::result::Result<ToolOutput, ExternalToolError> {
    let Some((program, args)) = cmd.split_first() else {
        return Err(ExternalToolError::Spawn {
            tool: tool_name.to_string(),
            message: "Empty command".to_string(),
        });
    };

    debug!("Running {}: {} {:?}", tool_name, program, args);

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            warn!("{} not found ({})", tool_name, program);
            ExternalToolError::BinaryNotFound {
                tool: tool_name.to_string(),
                install_hint: install_hint.to_string(),
            }
        } else {
            ExternalToolError::Spawn {
                tool: tool_name.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    // Drain both pipes concurrently so a chatty tool cannot fill a pipe
    // buffer and stall before the timeout check sees it exit.
    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let status = wait_with_timeout(&mut child, tool_name, timeout)?;

    Ok(ToolOutput {
        stdout: join_reader(stdout_reader),
        stderr: join_reader(stderr_reader),
        return_code: status.code(),
    })
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Poll for completion with small sleep intervals, killing on timeout
fn wait_with_timeout(
    child: &mut Child,
    tool_name: &str,
    timeout: Duration,
) -> std::result::Result<std::process::ExitStatus, ExternalToolError> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if !timeout.is_zero() && start.elapsed() > timeout {
                    let _ = child.kill();
                    // Reap so the process does not linger as a zombie
                    let _ = child.wait();
                    warn!("{} timed out after {}s", tool_name, timeout.as_secs());
                    return Err(ExternalToolError::Timeout {
                        tool: tool_name.to_string(),
                        secs: timeout.as_secs(),
                    });
                }
                thread::sleep(Duration::from_millis(25));
            }
            Err(e) => {
                return Err(ExternalToolError::Spawn {
                    tool: tool_name.to_string(),
                    message: format!("Failed to wait: {}", e),
                });
            }
        }
    }
}
