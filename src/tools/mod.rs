// src/tools/mod.rs

pub mod download;
pub mod installer;

use std::path::PathBuf;

use once_cell::sync::Lazy;

/// How a third-party tool is acquired. Exactly one strategy per tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Run a PowerShell command, optionally elevated.
    Shell {
        command: &'static str,
        requires_admin: bool,
    },
    /// Install a single winget package by id.
    Winget { id: &'static str },
    /// Custom winget arguments (e.g. multi-package installs).
    WingetArgs { args: &'static str },
    /// Download one file from a fixed URL.
    Download { url: &'static str },
    /// Product page. GitHub `/releases` pages resolve to the latest release's
    /// best asset; anything else opens in the browser.
    Link { url: &'static str },
}

#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub strategy: InstallStrategy,
    /// Shown to the user after a successful install (e.g. how to launch a
    /// console tool).
    pub post_install: Option<&'static str>,
}

/// Progress and completion messages emitted while acquiring a tool, delivered
/// over a channel so any front-end can render them.
#[derive(Debug, Clone)]
pub enum InstallEvent {
    Progress {
        tool: String,
        percent: u8,
        message: String,
    },
    Completed {
        tool: String,
        success: bool,
        message: String,
        post_install: Option<String>,
    },
}

pub static EXTERNAL_TOOLS: Lazy<Vec<ToolDefinition>> = Lazy::new(|| {
    vec![
        ToolDefinition {
            name: "Autoruns",
            description: "Manage Windows startup programs and services",
            category: "System and Optimization Tools",
            strategy: InstallStrategy::Winget {
                id: "Microsoft.Sysinternals.Autoruns",
            },
            post_install: Some(
                "To use Autoruns, open Command Prompt as Administrator and type: `autoruns`",
            ),
        },
        ToolDefinition {
            name: "RAMMap",
            description: "Advanced memory usage analyzer",
            category: "System and Optimization Tools",
            strategy: InstallStrategy::Winget {
                id: "Microsoft.Sysinternals.RAMMap",
            },
            post_install: None,
        },
        ToolDefinition {
            name: "PowerToys",
            description: "Official Microsoft utilities for power users",
            category: "System and Optimization Tools",
            strategy: InstallStrategy::Winget {
                id: "Microsoft.PowerToys",
            },
            post_install: None,
        },
        ToolDefinition {
            name: "Winaero Tweaker",
            description: "Advanced Windows customization tool",
            category: "System and Optimization Tools",
            strategy: InstallStrategy::Winget { id: "winaero.tweaker" },
            post_install: None,
        },
        ToolDefinition {
            name: "Wintoys",
            description: "Modern Windows optimization and tweaking tool",
            category: "System and Optimization Tools",
            strategy: InstallStrategy::Winget { id: "9P8LTPGCBZXD" },
            post_install: None,
        },
        ToolDefinition {
            name: "Sysinternals Suite",
            description: "The full Sysinternals troubleshooting suite",
            category: "System and Optimization Tools",
            strategy: InstallStrategy::WingetArgs {
                args: "install Microsoft.Sysinternals.Suite --accept-source-agreements --accept-package-agreements",
            },
            post_install: None,
        },
        ToolDefinition {
            name: "Chris Titus Tech Tool",
            description: "Execute Chris Titus Tech PowerShell tool (admin)",
            category: "System and Optimization Tools",
            strategy: InstallStrategy::Shell {
                command: "iwr -useb https://christitus.com/win | iex",
                requires_admin: true,
            },
            post_install: None,
        },
        ToolDefinition {
            name: "NVIDIA Profile Inspector",
            description: "Advanced NVIDIA driver settings editor",
            category: "DLSS and Graphics Tools",
            strategy: InstallStrategy::Link {
                url: "https://github.com/Orbmu2k/nvidiaProfileInspector/releases",
            },
            post_install: None,
        },
        ToolDefinition {
            name: "DLSS Swapper",
            description: "Swap DLSS versions for better performance in games",
            category: "DLSS and Graphics Tools",
            strategy: InstallStrategy::Link {
                url: "https://github.com/beeradmoore/dlss-swapper/releases",
            },
            post_install: None,
        },
        ToolDefinition {
            name: "Driver Store Explorer (RAPR)",
            description: "Manage Windows driver store",
            category: "System and Optimization Tools",
            strategy: InstallStrategy::Link {
                url: "https://github.com/lostindark/DriverStoreExplorer/releases",
            },
            post_install: None,
        },
        ToolDefinition {
            name: "O&O ShutUp10++",
            description: "Free antispy tool for Windows 10 and 11",
            category: "System and Optimization Tools",
            strategy: InstallStrategy::Download {
                url: "https://dl5.oo-software.com/files/ooshutup10/OOSU10.exe",
            },
            post_install: None,
        },
        ToolDefinition {
            name: "TCP Optimizer",
            description: "Network settings optimization tool",
            category: "System and Optimization Tools",
            strategy: InstallStrategy::Link {
                url: "https://www.speedguide.net/downloads.php",
            },
            post_install: None,
        },
        ToolDefinition {
            name: "DNS Jumper",
            description: "Fast DNS changer and tester",
            category: "System and Optimization Tools",
            strategy: InstallStrategy::Link {
                url: "https://dnsjumper.net/",
            },
            post_install: None,
        },
    ]
});

pub fn find_tool(name: &str) -> Option<&'static ToolDefinition> {
    EXTERNAL_TOOLS
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
}

/// Per-user directory downloads land in, one subdirectory per category and
/// tool.
pub fn default_tools_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("TweakHub").join("Tools"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn tool_names_are_unique() {
        let names: HashSet<&str> = EXTERNAL_TOOLS.iter().map(|t| t.name).collect();
        assert_eq!(names.len(), EXTERNAL_TOOLS.len());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(find_tool("powertoys").is_some());
        assert!(find_tool("AUTORUNS").is_some());
        assert!(find_tool("nope").is_none());
    }
}
