// src/tweaks/mod.rs

pub mod definitions;
pub mod engine;

use strum_macros::{Display, EnumIter};

use crate::store::RegistryValue;

pub use definitions::all_tweaks;

/// Catalog groups, one per page section of the original tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TweakCategory {
    #[strum(serialize = "CPU & Processor Optimization")]
    Cpu,
    #[strum(serialize = "Memory Management")]
    Memory,
    #[strum(serialize = "Network Latency Reduction")]
    Network,
    #[strum(serialize = "Gaming Performance")]
    Gaming,
    #[strum(serialize = "System Responsiveness")]
    Responsiveness,
    #[strum(serialize = "Storage & File System")]
    Storage,
    #[strum(serialize = "Visual Effects & Performance")]
    Visual,
    #[strum(serialize = "Background Process Optimization")]
    Background,
}

impl TweakCategory {
    pub fn description(self) -> &'static str {
        match self {
            TweakCategory::Cpu => "Optimize CPU scheduling, priority, and processor performance",
            TweakCategory::Memory => "Optimize memory allocation, paging, and RAM usage",
            TweakCategory::Network => {
                "Optimize network stack for minimal latency and maximum responsiveness"
            }
            TweakCategory::Gaming => {
                "Optimize system for gaming performance and input responsiveness"
            }
            TweakCategory::Responsiveness => {
                "Improve overall system responsiveness and UI performance"
            }
            TweakCategory::Storage => "Optimize disk performance and file system operations",
            TweakCategory::Visual => {
                "Optimize visual effects for better performance and responsiveness"
            }
            TweakCategory::Background => {
                "Optimize background processes and services for better performance"
            }
        }
    }
}

/// A single toggleable system setting backed by one registry value.
///
/// Exactly one of `enabled_value`/`disabled_value` is written on any apply.
/// Definitions are immutable after catalog load except for the runtime
/// `enabled` flag, which tracks the last-known live state.
#[derive(Debug, Clone)]
pub struct Tweak {
    /// Stable string key for the tweak.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: TweakCategory,
    /// Full key path, root-prefixed (e.g. `HKEY_LOCAL_MACHINE\SYSTEM\...`).
    pub key_path: &'static str,
    pub value_name: &'static str,
    /// Value written when enabling the tweak.
    pub enabled_value: RegistryValue,
    /// Value written when disabling the tweak.
    pub disabled_value: RegistryValue,
    /// 1 (safe) to 5 (dangerous).
    pub risk_level: u8,
    pub requires_restart: bool,
    /// Last-known live state; maintained by the engine.
    pub enabled: bool,
}

impl Tweak {
    #[allow(clippy::too_many_arguments)]
    pub fn registry(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        category: TweakCategory,
        key_path: &'static str,
        value_name: &'static str,
        enabled_value: RegistryValue,
        disabled_value: RegistryValue,
        risk_level: u8,
        requires_restart: bool,
    ) -> Self {
        Self {
            id,
            name,
            description,
            category,
            key_path,
            value_name,
            enabled_value,
            disabled_value,
            risk_level,
            requires_restart,
            enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::store::parse_key_path;

    #[test]
    fn catalog_ids_are_unique() {
        let tweaks = all_tweaks();
        let ids: HashSet<&str> = tweaks.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), tweaks.len());
    }

    #[test]
    fn catalog_paths_parse_and_values_are_typed_consistently() {
        for tweak in all_tweaks() {
            parse_key_path(tweak.key_path).unwrap_or_else(|e| {
                panic!("tweak '{}' has a bad key path: {}", tweak.id, e);
            });
            assert!(!tweak.value_name.is_empty(), "tweak '{}'", tweak.id);
            assert!(
                (1..=5).contains(&tweak.risk_level),
                "tweak '{}' risk level out of range",
                tweak.id
            );
            assert_eq!(
                std::mem::discriminant(&tweak.enabled_value),
                std::mem::discriminant(&tweak.disabled_value),
                "tweak '{}' mixes value types",
                tweak.id
            );
            assert_ne!(
                tweak.enabled_value, tweak.disabled_value,
                "tweak '{}' cannot be toggled",
                tweak.id
            );
        }
    }
}
