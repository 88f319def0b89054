// src/utils/shell.rs

use std::{
    io::{BufRead, BufReader, Read},
    process::{Command, Stdio},
    thread,
};

use tracing::{debug, error};

/// Captured outcome of one external command.
///
/// `success` is true iff the process started and exited with code 0. A start
/// failure (binary not found, elevation declined) reports `success = false`
/// with `exit_code = None` and the explanatory message in `stderr`.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    fn start_failure(message: String) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message,
            exit_code: None,
        }
    }

    fn from_process_output(output: std::process::Output) -> Self {
        let exit_code = output.status.code();
        Self {
            success: exit_code == Some(0),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        }
    }
}

/// Spawns external processes (elevated or not) and captures stdout, stderr,
/// and the exit code. No retry and no timeout: callers that need pacing apply
/// their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// Runs `program` with `args`, blocking until it exits.
    pub fn run(&self, program: &str, args: &[&str]) -> CommandOutput {
        debug!("Running '{}' with args {:?}", program, args);
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        hide_console_window(&mut command);

        match command.output() {
            Ok(output) => CommandOutput::from_process_output(output),
            Err(e) => {
                error!("Failed to start '{}': {}", program, e);
                CommandOutput::start_failure(format!("Failed to start '{}': {}", program, e))
            }
        }
    }

    /// Like [`run`], but hands each stdout line to `on_line` as it is
    /// produced. Used by installers that scrape progress from tool output.
    ///
    /// [`run`]: CommandRunner::run
    pub fn run_with_output_lines(
        &self,
        program: &str,
        args: &[&str],
        on_line: &mut dyn FnMut(&str),
    ) -> CommandOutput {
        debug!("Running '{}' with args {:?} (streaming)", program, args);
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        hide_console_window(&mut command);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                error!("Failed to start '{}': {}", program, e);
                return CommandOutput::start_failure(format!(
                    "Failed to start '{}': {}",
                    program, e
                ));
            }
        };

        // drain stderr on a separate thread so neither pipe can fill up and
        // stall the child
        let stderr_handle = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf);
                buf
            })
        });

        let mut stdout = String::new();
        if let Some(out) = child.stdout.take() {
            for line in BufReader::new(out).lines() {
                match line {
                    Ok(line) => {
                        on_line(&line);
                        stdout.push_str(&line);
                        stdout.push('\n');
                    }
                    Err(e) => {
                        debug!("Stopped reading output of '{}': {}", program, e);
                        break;
                    }
                }
            }
        }

        let stderr = stderr_handle
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        match child.wait() {
            Ok(status) => {
                let exit_code = status.code();
                CommandOutput {
                    success: exit_code == Some(0),
                    stdout,
                    stderr,
                    exit_code,
                }
            }
            Err(e) => CommandOutput::start_failure(format!("Failed to wait on '{}': {}", program, e)),
        }
    }

    /// Runs a script through `powershell -NoProfile -ExecutionPolicy Bypass`.
    pub fn run_powershell(&self, script: &str) -> CommandOutput {
        self.run(
            "powershell",
            &[
                "-NoProfile",
                "-ExecutionPolicy",
                "Bypass",
                "-WindowStyle",
                "Hidden",
                "-Command",
                script,
            ],
        )
    }

    /// Relaunches `program` elevated via `Start-Process -Verb RunAs` and waits
    /// for it to finish. A declined UAC prompt surfaces as a start failure.
    pub fn run_elevated(&self, program: &str, args: &[&str]) -> CommandOutput {
        self.run_powershell(&build_elevated_script(program, args))
    }

    /// Launches `command` detached with shell-execute semantics (resolves
    /// control-panel applets, `.msc` snap-ins, and URLs). Output is not
    /// captured.
    pub fn spawn_detached(&self, command: &str, args: &[&str]) -> bool {
        debug!("Launching '{}' detached with args {:?}", command, args);
        let mut c = Command::new("cmd");
        c.arg("/C").arg("start").arg("").arg(command).args(args);
        hide_console_window(&mut c);
        match c.spawn() {
            Ok(_) => true,
            Err(e) => {
                error!("Failed to launch '{}': {}", command, e);
                false
            }
        }
    }
}

/// Quotes a value for interpolation into a PowerShell command line.
fn powershell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn build_elevated_script(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        format!(
            "Start-Process -FilePath {} -Verb RunAs -Wait",
            powershell_quote(program)
        )
    } else {
        let arg_list = args
            .iter()
            .map(|a| powershell_quote(a))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "Start-Process -FilePath {} -ArgumentList {} -Verb RunAs -Wait",
            powershell_quote(program),
            arg_list
        )
    }
}

#[cfg(windows)]
fn hide_console_window(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console_window(_command: &mut Command) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_failure_reports_message_instead_of_output() {
        let runner = CommandRunner::new();
        let output = runner.run("tweakhub-no-such-binary", &[]);
        assert!(!output.success);
        assert_eq!(output.exit_code, None);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.contains("tweakhub-no-such-binary"));
    }

    #[test]
    fn streaming_start_failure_matches_blocking_behavior() {
        let runner = CommandRunner::new();
        let mut lines = Vec::new();
        let output = runner.run_with_output_lines("tweakhub-no-such-binary", &[], &mut |l| {
            lines.push(l.to_string())
        });
        assert!(!output.success);
        assert!(lines.is_empty());
    }

    #[test]
    fn elevated_script_quotes_program_and_arguments() {
        let script = build_elevated_script("winget", &["install", "Microsoft.PowerToys"]);
        assert_eq!(
            script,
            "Start-Process -FilePath 'winget' -ArgumentList 'install','Microsoft.PowerToys' -Verb RunAs -Wait"
        );
    }

    #[test]
    fn elevated_script_escapes_single_quotes() {
        let script = build_elevated_script("cmd", &["/C", "echo it's fine"]);
        assert!(script.contains("'echo it''s fine'"));
    }

    #[cfg(windows)]
    #[test]
    fn run_captures_exit_code_and_stdout() {
        let runner = CommandRunner::new();
        let output = runner.run("cmd", &["/C", "echo tweakhub"]);
        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert!(output.stdout.contains("tweakhub"));
    }

    #[cfg(windows)]
    #[test]
    fn nonzero_exit_is_not_success() {
        let runner = CommandRunner::new();
        let output = runner.run("cmd", &["/C", "exit 3"]);
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));
    }
}
