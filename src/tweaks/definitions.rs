// src/tweaks/definitions.rs
//
// The built-in registry tweak catalog. Entries are static data: one registry
// value per tweak, with the value written when enabling and the stock value
// written when disabling.

use crate::store::RegistryValue;
use crate::tweaks::{Tweak, TweakCategory};

/// Builds the full load-once catalog. Each call returns a fresh copy with
/// every `enabled` flag cleared; callers refresh flags from the live system.
pub fn all_tweaks() -> Vec<Tweak> {
    let mut tweaks = Vec::new();
    tweaks.extend(cpu_tweaks());
    tweaks.extend(memory_tweaks());
    tweaks.extend(network_tweaks());
    tweaks.extend(gaming_tweaks());
    tweaks.extend(responsiveness_tweaks());
    tweaks.extend(storage_tweaks());
    tweaks.extend(visual_tweaks());
    tweaks.extend(background_tweaks());
    tweaks
}

fn cpu_tweaks() -> Vec<Tweak> {
    vec![
        Tweak::registry(
            "cpu_priority_separation",
            "Optimize CPU Priority Separation",
            "Improves foreground application responsiveness by adjusting CPU time allocation",
            TweakCategory::Cpu,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\PriorityControl",
            "Win32PrioritySeparation",
            RegistryValue::Dword(38),
            RegistryValue::Dword(2),
            1,
            false,
        ),
        Tweak::registry(
            "disable_cpu_throttling",
            "Disable CPU Throttling",
            "Prevents CPU from throttling under load for maximum performance",
            TweakCategory::Cpu,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\Power\\PowerSettings\\54533251-82be-4824-96c1-47b60b740d00\\893dee8e-2bef-41e0-89c6-b55d0929964c",
            "ValueMax",
            RegistryValue::Dword(0),
            RegistryValue::Dword(100),
            2,
            true,
        ),
        Tweak::registry(
            "disable_core_parking",
            "Disable CPU Core Parking",
            "Keeps all CPU cores active for better performance and lower latency",
            TweakCategory::Cpu,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\Power\\PowerSettings\\54533251-82be-4824-96c1-47b60b740d00\\0cc5b647-c1df-4637-891a-dec35c318583",
            "ValueMax",
            RegistryValue::Dword(0),
            RegistryValue::Dword(100),
            2,
            true,
        ),
        Tweak::registry(
            "high_performance_power_plan",
            "Force High Performance Power Plan",
            "Sets system to use high performance power plan for maximum CPU performance",
            TweakCategory::Cpu,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\Power\\User\\PowerSchemes",
            "ActivePowerScheme",
            RegistryValue::Text(String::from("8c5e7fda-e8bf-4a96-9a85-a6e23a8c635c")),
            RegistryValue::Text(String::from("381b4222-f694-41f0-9685-ff5bb260df2e")),
            1,
            false,
        ),
    ]
}

fn memory_tweaks() -> Vec<Tweak> {
    vec![
        Tweak::registry(
            "disable_superfetch",
            "Disable Superfetch/SysMain",
            "Prevents aggressive memory caching that can cause stutters and high memory usage",
            TweakCategory::Memory,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Services\\SysMain",
            "Start",
            RegistryValue::Dword(4),
            RegistryValue::Dword(2),
            2,
            true,
        ),
        Tweak::registry(
            "optimize_paging_executive",
            "Keep System in Memory",
            "Prevents system executive from being paged to disk for better responsiveness",
            TweakCategory::Memory,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Memory Management",
            "DisablePagingExecutive",
            RegistryValue::Dword(1),
            RegistryValue::Dword(0),
            1,
            false,
        ),
        Tweak::registry(
            "optimize_large_system_cache",
            "Optimize System Cache",
            "Optimizes system cache for better memory management and file access",
            TweakCategory::Memory,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Memory Management",
            "LargeSystemCache",
            RegistryValue::Dword(1),
            RegistryValue::Dword(0),
            1,
            false,
        ),
        Tweak::registry(
            "clear_pagefile_shutdown",
            "Disable Pagefile Clearing on Shutdown",
            "Speeds up shutdown by not clearing pagefile (safe for most users)",
            TweakCategory::Memory,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Memory Management",
            "ClearPageFileAtShutdown",
            RegistryValue::Dword(0),
            RegistryValue::Dword(1),
            1,
            false,
        ),
        Tweak::registry(
            "disable_prefetch",
            "Disable Prefetch",
            "Disables prefetch to reduce disk I/O and improve SSD performance",
            TweakCategory::Memory,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\Session Manager\\Memory Management\\PrefetchParameters",
            "EnablePrefetcher",
            RegistryValue::Dword(0),
            RegistryValue::Dword(3),
            2,
            false,
        ),
    ]
}

fn network_tweaks() -> Vec<Tweak> {
    vec![
        Tweak::registry(
            "disable_nagle_algorithm",
            "Disable Nagle Algorithm",
            "Reduces network latency by disabling packet coalescing for immediate transmission",
            TweakCategory::Network,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Services\\Tcpip\\Parameters\\Interfaces",
            "TcpAckFrequency",
            RegistryValue::Dword(1),
            RegistryValue::Dword(2),
            2,
            false,
        ),
        Tweak::registry(
            "tcp_no_delay",
            "Enable TCP No Delay",
            "Forces immediate transmission of TCP packets for lower latency",
            TweakCategory::Network,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Services\\Tcpip\\Parameters\\Interfaces",
            "TcpNoDelay",
            RegistryValue::Dword(1),
            RegistryValue::Dword(0),
            2,
            false,
        ),
        Tweak::registry(
            "disable_bandwidth_throttling",
            "Disable Network Bandwidth Throttling",
            "Removes Windows bandwidth limitations for maximum network performance",
            TweakCategory::Network,
            "HKEY_LOCAL_MACHINE\\SOFTWARE\\Policies\\Microsoft\\Windows\\Psched",
            "NonBestEffortLimit",
            RegistryValue::Dword(0),
            RegistryValue::Dword(80),
            1,
            false,
        ),
        Tweak::registry(
            "optimize_network_throttling",
            "Disable Network Throttling Index",
            "Disables Windows network throttling for consistent performance",
            TweakCategory::Network,
            "HKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\Windows NT\\CurrentVersion\\Multimedia\\SystemProfile",
            "NetworkThrottlingIndex",
            RegistryValue::Dword(0xffffffff),
            RegistryValue::Dword(10),
            2,
            false,
        ),
        Tweak::registry(
            "disable_tcp_chimney",
            "Disable TCP Chimney Offload",
            "Prevents TCP processing offload that can introduce latency",
            TweakCategory::Network,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Services\\Tcpip\\Parameters",
            "EnableTCPChimney",
            RegistryValue::Dword(0),
            RegistryValue::Dword(1),
            2,
            false,
        ),
    ]
}

fn gaming_tweaks() -> Vec<Tweak> {
    vec![
        Tweak::registry(
            "disable_mouse_acceleration",
            "Disable Mouse Acceleration",
            "Provides consistent mouse movement for precise gaming control",
            TweakCategory::Gaming,
            "HKEY_CURRENT_USER\\Control Panel\\Mouse",
            "MouseSpeed",
            RegistryValue::Text(String::from("0")),
            RegistryValue::Text(String::from("1")),
            1,
            false,
        ),
        Tweak::registry(
            "gaming_mode_priority",
            "Enable Gaming Mode Priority",
            "Prioritizes gaming applications for better performance",
            TweakCategory::Gaming,
            "HKEY_LOCAL_MACHINE\\SOFTWARE\\Microsoft\\Windows NT\\CurrentVersion\\Multimedia\\SystemProfile\\Tasks\\Games",
            "Priority",
            RegistryValue::Dword(6),
            RegistryValue::Dword(2),
            1,
            false,
        ),
        Tweak::registry(
            "disable_fullscreen_optimizations",
            "Disable Fullscreen Optimizations",
            "Disables Windows fullscreen optimizations for better gaming performance",
            TweakCategory::Gaming,
            "HKEY_CURRENT_USER\\System\\GameConfigStore",
            "GameDVR_FSEBehaviorMode",
            RegistryValue::Dword(2),
            RegistryValue::Dword(0),
            1,
            false,
        ),
        Tweak::registry(
            "disable_game_bar",
            "Disable Xbox Game Bar",
            "Disables Xbox Game Bar to reduce gaming overhead and improve performance",
            TweakCategory::Gaming,
            "HKEY_CURRENT_USER\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\GameDVR",
            "AppCaptureEnabled",
            RegistryValue::Dword(0),
            RegistryValue::Dword(1),
            1,
            false,
        ),
        Tweak::registry(
            "reduce_mouse_threshold",
            "Optimize Mouse Precision",
            "Reduces mouse threshold for improved precision and responsiveness",
            TweakCategory::Gaming,
            "HKEY_CURRENT_USER\\Control Panel\\Mouse",
            "MouseThreshold1",
            RegistryValue::Text(String::from("0")),
            RegistryValue::Text(String::from("6")),
            1,
            false,
        ),
    ]
}

fn responsiveness_tweaks() -> Vec<Tweak> {
    vec![
        Tweak::registry(
            "reduce_menu_delay",
            "Reduce Menu Show Delay",
            "Makes menus appear instantly for better responsiveness",
            TweakCategory::Responsiveness,
            "HKEY_CURRENT_USER\\Control Panel\\Desktop",
            "MenuShowDelay",
            RegistryValue::Text(String::from("0")),
            RegistryValue::Text(String::from("400")),
            1,
            false,
        ),
        Tweak::registry(
            "disable_startup_delay",
            "Disable Startup Application Delay",
            "Removes artificial delay for startup applications",
            TweakCategory::Responsiveness,
            "HKEY_CURRENT_USER\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Explorer\\Serialize",
            "StartupDelayInMSec",
            RegistryValue::Dword(0),
            RegistryValue::Dword(10000),
            1,
            false,
        ),
        Tweak::registry(
            "optimize_foreground_lock_timeout",
            "Optimize Foreground Lock Timeout",
            "Reduces time for applications to steal focus, improving responsiveness",
            TweakCategory::Responsiveness,
            "HKEY_CURRENT_USER\\Control Panel\\Desktop",
            "ForegroundLockTimeout",
            RegistryValue::Dword(0),
            RegistryValue::Dword(200000),
            1,
            false,
        ),
        Tweak::registry(
            "disable_windows_search",
            "Disable Windows Search Indexing",
            "Reduces CPU and disk usage by disabling search indexing service",
            TweakCategory::Responsiveness,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Services\\WSearch",
            "Start",
            RegistryValue::Dword(4),
            RegistryValue::Dword(2),
            3,
            true,
        ),
    ]
}

fn storage_tweaks() -> Vec<Tweak> {
    vec![
        Tweak::registry(
            "disable_ntfs_last_access",
            "Disable NTFS Last Access Time",
            "Improves file system performance by not updating last access timestamps",
            TweakCategory::Storage,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\FileSystem",
            "NtfsDisableLastAccessUpdate",
            RegistryValue::Dword(1),
            RegistryValue::Dword(0),
            1,
            false,
        ),
        Tweak::registry(
            "optimize_ntfs_memory_usage",
            "Optimize NTFS Memory Usage",
            "Increases NTFS memory usage for better file system performance",
            TweakCategory::Storage,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\FileSystem",
            "NtfsMemoryUsage",
            RegistryValue::Dword(2),
            RegistryValue::Dword(1),
            1,
            false,
        ),
        Tweak::registry(
            "disable_8dot3_names",
            "Disable 8.3 Short File Names",
            "Improves file system performance by disabling legacy 8.3 filename generation",
            TweakCategory::Storage,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Control\\FileSystem",
            "NtfsDisable8dot3NameCreation",
            RegistryValue::Dword(1),
            RegistryValue::Dword(0),
            2,
            false,
        ),
        Tweak::registry(
            "optimize_disk_timeout",
            "Optimize Disk Timeout Values",
            "Reduces disk timeout for faster error recovery and better responsiveness",
            TweakCategory::Storage,
            "HKEY_LOCAL_MACHINE\\SYSTEM\\CurrentControlSet\\Services\\Disk",
            "TimeOutValue",
            RegistryValue::Dword(30),
            RegistryValue::Dword(60),
            2,
            false,
        ),
    ]
}

fn visual_tweaks() -> Vec<Tweak> {
    vec![
        Tweak::registry(
            "disable_animations",
            "Disable Window Animations",
            "Disables window animations for faster UI response and lower resource usage",
            TweakCategory::Visual,
            "HKEY_CURRENT_USER\\Control Panel\\Desktop\\WindowMetrics",
            "MinAnimate",
            RegistryValue::Text(String::from("0")),
            RegistryValue::Text(String::from("1")),
            1,
            false,
        ),
        Tweak::registry(
            "disable_transparency",
            "Disable Window Transparency",
            "Disables window transparency effects to improve performance",
            TweakCategory::Visual,
            "HKEY_CURRENT_USER\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize",
            "EnableTransparency",
            RegistryValue::Dword(0),
            RegistryValue::Dword(1),
            1,
            false,
        ),
        Tweak::registry(
            "optimize_visual_effects",
            "Optimize for Performance",
            "Sets visual effects to 'Adjust for best performance' mode",
            TweakCategory::Visual,
            "HKEY_CURRENT_USER\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Explorer\\VisualEffects",
            "VisualFXSetting",
            RegistryValue::Dword(2),
            RegistryValue::Dword(0),
            1,
            false,
        ),
    ]
}

fn background_tweaks() -> Vec<Tweak> {
    vec![
        Tweak::registry(
            "disable_background_apps",
            "Disable Background Apps",
            "Prevents apps from running in background to save resources",
            TweakCategory::Background,
            "HKEY_CURRENT_USER\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\BackgroundAccessApplications",
            "GlobalUserDisabled",
            RegistryValue::Dword(1),
            RegistryValue::Dword(0),
            2,
            false,
        ),
        Tweak::registry(
            "disable_telemetry",
            "Disable Windows Telemetry",
            "Reduces background telemetry data collection for better performance",
            TweakCategory::Background,
            "HKEY_LOCAL_MACHINE\\SOFTWARE\\Policies\\Microsoft\\Windows\\DataCollection",
            "AllowTelemetry",
            RegistryValue::Dword(0),
            RegistryValue::Dword(3),
            2,
            false,
        ),
        Tweak::registry(
            "disable_cortana",
            "Disable Cortana",
            "Disables Cortana to reduce background resource usage",
            TweakCategory::Background,
            "HKEY_LOCAL_MACHINE\\SOFTWARE\\Policies\\Microsoft\\Windows\\Windows Search",
            "AllowCortana",
            RegistryValue::Dword(0),
            RegistryValue::Dword(1),
            2,
            false,
        ),
        Tweak::registry(
            "disable_windows_defender_realtime",
            "Disable Windows Defender Real-time Protection",
            "Disables real-time protection for maximum performance (use with caution)",
            TweakCategory::Background,
            "HKEY_LOCAL_MACHINE\\SOFTWARE\\Policies\\Microsoft\\Windows Defender\\Real-Time Protection",
            "DisableRealtimeMonitoring",
            RegistryValue::Dword(1),
            RegistryValue::Dword(0),
            4,
            true,
        ),
    ]
}
