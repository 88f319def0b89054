// src/tools/installer.rs

use std::path::PathBuf;

use crossbeam::channel::Sender;
use tracing::{debug, error};

use crate::{
    tools::{
        download::{is_github_release_url, DownloadClient},
        InstallEvent, InstallStrategy, ToolDefinition,
    },
    utils::shell::CommandRunner,
};

/// Acquires external tools by dispatching on their strategy, reporting
/// progress and completion over the event channel. Every failure is converted
/// to a `false` return plus a completion event; nothing propagates.
pub struct ToolInstaller {
    runner: CommandRunner,
    tools_dir: PathBuf,
    events: Sender<InstallEvent>,
}

impl ToolInstaller {
    pub fn new(runner: CommandRunner, tools_dir: PathBuf, events: Sender<InstallEvent>) -> Self {
        Self {
            runner,
            tools_dir,
            events,
        }
    }

    fn progress(&self, tool: &ToolDefinition, percent: u8, message: &str) {
        let _ = self.events.send(InstallEvent::Progress {
            tool: tool.name.to_string(),
            percent,
            message: message.to_string(),
        });
    }

    fn completed(&self, tool: &ToolDefinition, success: bool, message: String) -> bool {
        let _ = self.events.send(InstallEvent::Completed {
            tool: tool.name.to_string(),
            success,
            message,
            post_install: success.then(|| tool.post_install.map(str::to_string)).flatten(),
        });
        success
    }

    pub fn install(&self, tool: &ToolDefinition) -> bool {
        debug!("Installing '{}' via {:?}", tool.name, tool.strategy);
        match &tool.strategy {
            InstallStrategy::Shell {
                command,
                requires_admin,
            } => self.run_shell(tool, command, *requires_admin),
            InstallStrategy::Winget { id } => self.run_winget(
                tool,
                &[
                    "install",
                    id,
                    "--accept-source-agreements",
                    "--accept-package-agreements",
                ],
            ),
            InstallStrategy::WingetArgs { args } => {
                let parts: Vec<&str> = args.split_whitespace().collect();
                self.run_winget(tool, &parts)
            }
            InstallStrategy::Download { url } => self.download(tool, url),
            InstallStrategy::Link { url } => self.resolve_link(tool, url),
        }
    }

    /// Uninstalls a tool previously installed through winget. Tools acquired
    /// any other way have nothing to uninstall here.
    pub fn uninstall(&self, tool: &ToolDefinition) -> bool {
        match &tool.strategy {
            InstallStrategy::Winget { id } => {
                self.progress(tool, 0, "Starting uninstall...");
                let args = [
                    "uninstall",
                    id,
                    "--accept-source-agreements",
                    "--accept-package-agreements",
                ];
                let success = self.stream_command("winget", &args, tool);
                self.completed(
                    tool,
                    success,
                    if success {
                        format!("Uninstall completed: {}", tool.name)
                    } else {
                        format!("Uninstall failed: {}", tool.name)
                    },
                )
            }
            _ => {
                error!("'{}' was not installed through winget", tool.name);
                self.completed(
                    tool,
                    false,
                    format!("'{}' cannot be uninstalled here", tool.name),
                )
            }
        }
    }

    fn run_winget(&self, tool: &ToolDefinition, args: &[&str]) -> bool {
        self.progress(tool, 0, "Starting installation...");
        let success = self.stream_command("winget", args, tool);
        self.completed(
            tool,
            success,
            if success {
                format!("Installation completed: {}", tool.name)
            } else {
                format!("Installation failed: {}", tool.name)
            },
        )
    }

    /// Runs a command line, feeding each output line back as a progress event
    /// with any percentage winget prints.
    fn stream_command(&self, program: &str, args: &[&str], tool: &ToolDefinition) -> bool {
        let output = self.runner.run_with_output_lines(program, args, &mut |line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return;
            }
            let percent = parse_percent(trimmed).unwrap_or(0);
            let _ = self.events.send(InstallEvent::Progress {
                tool: tool.name.to_string(),
                percent,
                message: trimmed.to_string(),
            });
        });
        if !output.success && !output.stderr.is_empty() {
            error!("'{}' failed: {}", program, output.stderr.trim());
        }
        output.success
    }

    fn run_shell(&self, tool: &ToolDefinition, command: &str, requires_admin: bool) -> bool {
        self.progress(tool, 0, "Starting PowerShell script...");
        if requires_admin {
            // an elevated process cannot be captured; fire it off and report
            // the launch itself
            let output = self.runner.run_elevated(
                "powershell",
                &["-NoProfile", "-ExecutionPolicy", "Bypass", "-Command", command],
            );
            return self.completed(
                tool,
                output.success,
                if output.success {
                    format!("Launched elevated PowerShell for {}", tool.name)
                } else {
                    format!("Failed to launch elevated PowerShell: {}", output.stderr.trim())
                },
            );
        }
        let output = self.runner.run_powershell(command);
        self.completed(
            tool,
            output.success,
            if output.success {
                format!("Script completed: {}", tool.name)
            } else {
                format!("Script failed: {}", tool.name)
            },
        )
    }

    fn download(&self, tool: &ToolDefinition, url: &str) -> bool {
        let client = match DownloadClient::new(self.tools_dir.clone(), self.events.clone()) {
            Ok(client) => client,
            Err(e) => return self.completed(tool, false, format!("{:#}", e)),
        };
        match client.download(tool.name, tool.category, url) {
            Ok(path) => self.completed(
                tool,
                true,
                format!("Download completed: {}", path.display()),
            ),
            Err(e) => self.completed(tool, false, format!("{:#}", e)),
        }
    }

    /// GitHub `/releases` links resolve to the latest asset and download it;
    /// any failure (and any non-GitHub link) falls back to the browser.
    fn resolve_link(&self, tool: &ToolDefinition, url: &str) -> bool {
        if is_github_release_url(url) {
            self.progress(tool, 0, "Fetching latest release...");
            match self.download_latest_release(tool, url) {
                Ok(path) => {
                    return self.completed(
                        tool,
                        true,
                        format!("Download completed: {}", path.display()),
                    )
                }
                Err(e) => debug!(
                    "'{}': release resolution failed ({:#}), opening in browser",
                    tool.name, e
                ),
            }
        }
        let opened = self.runner.spawn_detached(url, &[]);
        self.completed(
            tool,
            opened,
            if opened {
                format!("Opened {} in browser", url)
            } else {
                format!("Failed to open {}", url)
            },
        )
    }

    fn download_latest_release(&self, tool: &ToolDefinition, url: &str) -> anyhow::Result<PathBuf> {
        let client = DownloadClient::new(self.tools_dir.clone(), self.events.clone())?;
        let asset = client.latest_release_asset(url)?;
        client.download(tool.name, tool.category, &asset.browser_download_url)
    }
}

/// Scrapes the first `NN%` percentage from a line of installer output,
/// clamped to 0–100.
pub fn parse_percent(line: &str) -> Option<u8> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let mut j = i;
            let mut value: u32 = 0;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                value = value.saturating_mul(10).saturating_add((bytes[j] - b'0') as u32);
                j += 1;
            }
            if j < bytes.len() && bytes[j] == b'%' {
                return Some(value.min(100) as u8);
            }
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_scraped_from_winget_output() {
        assert_eq!(parse_percent("  50%"), Some(50));
        assert_eq!(parse_percent("Downloading 1.2 MB / 3.4 MB  35%"), Some(35));
        assert_eq!(parse_percent("100%"), Some(100));
        assert_eq!(parse_percent("0%"), Some(0));
    }

    #[test]
    fn percent_ignores_numbers_without_a_sign() {
        assert_eq!(parse_percent("Found PowerToys [Microsoft.PowerToys] 0.84.1"), None);
        assert_eq!(parse_percent("no digits here"), None);
        assert_eq!(parse_percent(""), None);
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(parse_percent("250%"), Some(100));
    }
}
