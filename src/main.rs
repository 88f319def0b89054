// src/main.rs

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use strum::IntoEnumIterator;
use tracing::Level;
use tweakhub::{
    ledger::{default_backup_dir, latest_snapshot},
    orchestrator::{TaskOrchestrator, TweakAction, TweakTask},
    shortcuts,
    store::{MemoryStore, ValueStore},
    tools::{self, installer::ToolInstaller, InstallEvent},
    tweaks::{self, engine::TweakEngine, Tweak, TweakCategory},
    utils::shell::CommandRunner,
};

#[derive(Parser)]
#[command(
    name = "tweakhub",
    version,
    about = "Registry performance tweaks, system shortcuts, and tool installs"
)]
struct Cli {
    /// Log at debug level
    #[arg(long, global = true)]
    verbose: bool,

    /// Route registry writes into an in-memory store instead of the live
    /// registry
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tweak catalog grouped by category
    List,
    /// Read the live enabled/disabled state of every tweak
    Status,
    /// Toggle one or more tweaks by id
    Apply {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Skip writing a backup snapshot after the batch
        #[arg(long)]
        no_snapshot: bool,
    },
    /// Restore every value captured before tweaking
    Restore {
        /// Snapshot file to restore from; defaults to the most recent one
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Capture the current value of every catalog tweak into a snapshot file
    Snapshot,
    /// List or launch bundled system shortcuts
    Shortcuts {
        #[command(subcommand)]
        action: Option<ShortcutsCmd>,
    },
    /// List, install, or uninstall external tools
    Tools {
        #[command(subcommand)]
        action: Option<ToolsCmd>,
    },
}

#[derive(Subcommand)]
enum ShortcutsCmd {
    List,
    Run { name: String },
}

#[derive(Subcommand)]
enum ToolsCmd {
    List,
    Install { name: String },
    Uninstall { name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    match cli.command {
        Commands::List => list_tweaks(),
        Commands::Status => show_status(open_store(cli.dry_run)?),
        Commands::Apply { ids, no_snapshot } => {
            warn_if_not_elevated(cli.dry_run);
            apply_tweaks(open_store(cli.dry_run)?, &ids, no_snapshot)
        }
        Commands::Restore { from } => {
            warn_if_not_elevated(cli.dry_run);
            restore_tweaks(open_store(cli.dry_run)?, from)
        }
        Commands::Snapshot => snapshot(open_store(cli.dry_run)?),
        Commands::Shortcuts { action } => run_shortcuts(action.unwrap_or(ShortcutsCmd::List)),
        Commands::Tools { action } => run_tools(action.unwrap_or(ToolsCmd::List)),
    }
}

fn open_store(dry_run: bool) -> Result<Arc<dyn ValueStore>> {
    if dry_run {
        tracing::info!("Dry run: writes go to an in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    live_store()
}

#[cfg(windows)]
fn live_store() -> Result<Arc<dyn ValueStore>> {
    Ok(Arc::new(tweakhub::utils::registry::RegistryStore::new()))
}

#[cfg(not(windows))]
fn live_store() -> Result<Arc<dyn ValueStore>> {
    bail!("live registry access requires Windows; use --dry-run elsewhere")
}

#[cfg(windows)]
fn warn_if_not_elevated(dry_run: bool) {
    if !dry_run && !tweakhub::utils::windows::is_elevated() {
        tracing::warn!(
            "Not running as administrator; machine-hive tweaks will fail with access denied"
        );
    }
}

#[cfg(not(windows))]
fn warn_if_not_elevated(_dry_run: bool) {}

fn list_tweaks() -> Result<()> {
    let tweaks = tweaks::all_tweaks();
    for category in TweakCategory::iter() {
        println!("{} - {}", category, category.description());
        for tweak in tweaks.iter().filter(|t| t.category == category) {
            println!(
                "  {:<36} risk {}{}  {}",
                tweak.id,
                tweak.risk_level,
                if tweak.requires_restart { "  [restart]" } else { "" },
                tweak.name
            );
        }
        println!();
    }
    Ok(())
}

/// Reads every tweak's live state through the orchestrator and prints it.
fn show_status(store: Arc<dyn ValueStore>) -> Result<()> {
    let engine = Arc::new(TweakEngine::new(store));
    let orchestrator = TaskOrchestrator::new(engine);

    let tweaks: Vec<Arc<Mutex<Tweak>>> = tweaks::all_tweaks()
        .into_iter()
        .map(|t| Arc::new(Mutex::new(t)))
        .collect();
    for tweak in &tweaks {
        orchestrator.submit(TweakTask {
            tweak: Arc::clone(tweak),
            action: TweakAction::ReadState,
        });
    }

    let mut results = Vec::with_capacity(tweaks.len());
    for _ in 0..tweaks.len() {
        match orchestrator.recv_result_timeout(Duration::from_secs(30)) {
            Some(result) => results.push(result),
            None => bail!("timed out waiting for status reads"),
        }
    }
    results.sort_by_key(|r| r.id);
    for result in results {
        let state = match result.enabled_state {
            Some(true) => "enabled",
            Some(false) => "disabled",
            None => "unknown",
        };
        println!("{:<36} {}", result.id, state);
    }
    Ok(())
}

fn apply_tweaks(store: Arc<dyn ValueStore>, ids: &[String], no_snapshot: bool) -> Result<()> {
    let engine = TweakEngine::new(store);
    let mut tweaks = tweaks::all_tweaks();
    // toggle direction depends on the live state, so derive flags first
    engine.refresh_states(&mut tweaks);

    let mut failures = 0usize;
    let mut needs_restart = false;
    for id in ids {
        let Some(tweak) = tweaks.iter_mut().find(|t| t.id == id.as_str()) else {
            bail!("unknown tweak id '{}'; run `tweakhub list`", id);
        };
        let was_enabled = tweak.enabled;
        if engine.apply(tweak) {
            needs_restart |= tweak.requires_restart;
            println!(
                "{}: {} -> {}",
                tweak.id,
                if was_enabled { "enabled" } else { "disabled" },
                if tweak.enabled { "enabled" } else { "disabled" }
            );
        } else {
            failures += 1;
            println!("{}: failed (see log)", tweak.id);
        }
    }

    if engine.has_applied_tweaks() && !no_snapshot {
        let dir = default_backup_dir().context("could not determine the backup directory")?;
        match engine.ledger().persist_snapshot(&dir) {
            Ok(path) => println!("Backup snapshot written to {}", path.display()),
            Err(e) => tracing::error!("Failed to write backup snapshot: {:#}", e),
        }
    }
    if needs_restart {
        println!("One or more tweaks require a restart to take effect.");
    }
    if failures > 0 {
        bail!("{} tweak(s) failed to apply", failures);
    }
    Ok(())
}

fn restore_tweaks(store: Arc<dyn ValueStore>, from: Option<PathBuf>) -> Result<()> {
    let engine = TweakEngine::new(store);
    let mut tweaks = tweaks::all_tweaks();

    // a fresh process has an empty ledger; reload what an earlier run captured
    let snapshot_path = match from {
        Some(path) => Some(path),
        None => default_backup_dir().as_deref().and_then(latest_snapshot),
    };
    match snapshot_path {
        Some(path) => {
            let loaded = engine.ledger().load_snapshot(&path)?;
            println!("Loaded {} entries from {}", loaded, path.display());
        }
        None => bail!("no backup snapshot found; nothing to restore"),
    }

    let summary = engine.restore_all(&mut tweaks);
    println!("Restored {} value(s), {} failed", summary.restored, summary.failed);
    Ok(())
}

fn snapshot(store: Arc<dyn ValueStore>) -> Result<()> {
    let engine = TweakEngine::new(store);
    let tweaks = tweaks::all_tweaks();
    for tweak in &tweaks {
        if let Err(e) =
            engine
                .ledger()
                .capture_if_absent(engine.store(), tweak.key_path, tweak.value_name)
        {
            tracing::error!("Skipping '{}': {:#}", tweak.id, e);
        }
    }
    let dir = default_backup_dir().context("could not determine the backup directory")?;
    let path = engine.ledger().persist_snapshot(&dir)?;
    println!(
        "Captured {} value(s) into {}",
        engine.ledger().len(),
        path.display()
    );
    Ok(())
}

fn run_shortcuts(action: ShortcutsCmd) -> Result<()> {
    match action {
        ShortcutsCmd::List => {
            for shortcut in shortcuts::SYSTEM_SHORTCUTS.iter() {
                println!(
                    "{:<24} {:<20} {}",
                    shortcut.name, shortcut.category, shortcut.description
                );
            }
            Ok(())
        }
        ShortcutsCmd::Run { name } => {
            let shortcut = shortcuts::find_shortcut(&name)
                .with_context(|| format!("unknown shortcut '{}'", name))?;
            if !shortcuts::launch(&CommandRunner::new(), shortcut) {
                bail!("failed to launch '{}'", shortcut.name);
            }
            Ok(())
        }
    }
}

fn run_tools(action: ToolsCmd) -> Result<()> {
    match action {
        ToolsCmd::List => {
            for tool in tools::EXTERNAL_TOOLS.iter() {
                println!("{:<28} {:<34} {}", tool.name, tool.category, tool.description);
            }
            Ok(())
        }
        ToolsCmd::Install { name } => with_installer(&name, |installer, tool| installer.install(tool)),
        ToolsCmd::Uninstall { name } => {
            with_installer(&name, |installer, tool| installer.uninstall(tool))
        }
    }
}

/// Runs one installer operation while a printer thread renders its events.
fn with_installer(
    name: &str,
    op: impl FnOnce(&ToolInstaller, &tools::ToolDefinition) -> bool,
) -> Result<()> {
    let tool = tools::find_tool(name).with_context(|| format!("unknown tool '{}'", name))?;
    let tools_dir = tools::default_tools_dir().context("could not determine the tools directory")?;

    let (sender, receiver) = crossbeam::channel::unbounded::<InstallEvent>();
    let printer = thread::spawn(move || {
        for event in receiver {
            match event {
                InstallEvent::Progress {
                    percent, message, ..
                } => {
                    if percent > 0 {
                        println!("[{:>3}%] {}", percent, message);
                    } else {
                        println!("       {}", message);
                    }
                }
                InstallEvent::Completed {
                    success,
                    message,
                    post_install,
                    ..
                } => {
                    println!("{}", message);
                    if success {
                        if let Some(note) = post_install {
                            println!("{}", note);
                        }
                    }
                }
            }
        }
    });

    let installer = ToolInstaller::new(CommandRunner::new(), tools_dir, sender);
    let success = op(&installer, tool);
    drop(installer);
    let _ = printer.join();

    if !success {
        bail!("operation failed for '{}'", tool.name);
    }
    Ok(())
}
