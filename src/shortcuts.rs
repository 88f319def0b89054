// src/shortcuts.rs

use once_cell::sync::Lazy;

use crate::utils::shell::CommandRunner;

/// One launchable OS utility: a command name plus optional arguments, started
/// with shell-execute semantics so control-panel applets and `.msc` snap-ins
/// resolve.
#[derive(Debug, Clone)]
pub struct SystemShortcut {
    pub name: &'static str,
    pub description: &'static str,
    pub command: &'static str,
    pub arguments: &'static [&'static str],
    pub category: &'static str,
}

pub static SYSTEM_SHORTCUTS: Lazy<Vec<SystemShortcut>> = Lazy::new(|| {
    vec![
        SystemShortcut {
            name: "Device Manager",
            description: "Manage hardware devices and drivers",
            command: "devmgmt.msc",
            arguments: &[],
            category: "System Management",
        },
        SystemShortcut {
            name: "System Information",
            description: "View detailed system information",
            command: "msinfo32",
            arguments: &[],
            category: "System Information",
        },
        SystemShortcut {
            name: "Registry Editor",
            description: "Edit Windows registry (advanced users only)",
            command: "regedit",
            arguments: &[],
            category: "Advanced Tools",
        },
        SystemShortcut {
            name: "Services",
            description: "Manage Windows services",
            command: "services.msc",
            arguments: &[],
            category: "System Management",
        },
        SystemShortcut {
            name: "Task Manager",
            description: "Monitor system performance and processes",
            command: "taskmgr",
            arguments: &[],
            category: "Performance",
        },
        SystemShortcut {
            name: "Resource Monitor",
            description: "Detailed system resource monitoring",
            command: "resmon",
            arguments: &[],
            category: "Performance",
        },
        SystemShortcut {
            name: "Power Options",
            description: "Configure power and sleep settings",
            command: "powercfg.cpl",
            arguments: &[],
            category: "Power Management",
        },
        SystemShortcut {
            name: "Network Connections",
            description: "Manage network adapters and connections",
            command: "ncpa.cpl",
            arguments: &[],
            category: "Network",
        },
        SystemShortcut {
            name: "Sound Settings",
            description: "Configure audio devices and settings",
            command: "mmsys.cpl",
            arguments: &[],
            category: "Audio",
        },
        SystemShortcut {
            name: "Display Settings",
            description: "Configure display and graphics settings",
            command: "desk.cpl",
            arguments: &[],
            category: "Display",
        },
        SystemShortcut {
            name: "Disk Cleanup",
            description: "Free up disk space",
            command: "cleanmgr",
            arguments: &[],
            category: "Storage",
        },
        SystemShortcut {
            name: "Windows Features",
            description: "Enable or disable Windows features",
            command: "optionalfeatures",
            arguments: &[],
            category: "System Management",
        },
    ]
});

pub fn find_shortcut(name: &str) -> Option<&'static SystemShortcut> {
    SYSTEM_SHORTCUTS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

/// Launches the shortcut detached; returns false if the process could not be
/// started.
pub fn launch(runner: &CommandRunner, shortcut: &SystemShortcut) -> bool {
    runner.spawn_detached(shortcut.command, shortcut.arguments)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert!(find_shortcut("device manager").is_some());
        assert!(find_shortcut("TASK MANAGER").is_some());
        assert!(find_shortcut("No Such Shortcut").is_none());
    }

    #[test]
    fn shortcut_names_are_unique_and_commands_non_empty() {
        let names: HashSet<&str> = SYSTEM_SHORTCUTS.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), SYSTEM_SHORTCUTS.len());
        assert!(SYSTEM_SHORTCUTS.iter().all(|s| !s.command.is_empty()));
    }
}
