//! `modctl` subcommands.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use game_content::ContentKinds;
use modding::{LoadError, LoadOrchestrator, ReloadSummary};

#[derive(Subcommand)]
pub enum Command {
    /// Show the resolved load order
    List,

    /// Resolve and import every enabled mod
    Reload,

    /// Enable a mod
    Enable {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Disable a mod (it keeps its place in the load order)
    Disable {
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Move a mod to a new position in the saved order
    Move {
        #[arg(value_name = "ID")]
        id: String,

        /// 0-based target position
        #[arg(value_name = "INDEX")]
        index: usize,
    },

    /// Show imported content of one kind (items, actors, maps)
    Show {
        #[arg(value_name = "KIND")]
        kind: String,

        /// Only show this entry
        #[arg(value_name = "ID")]
        id: Option<String>,
    },
}

impl Command {
    pub async fn execute(self, orchestrator: &LoadOrchestrator) -> Result<()> {
        match self {
            Command::List => {
                reload(orchestrator).await?;
                print_order(orchestrator);
            }
            Command::Reload => {
                let summary = reload(orchestrator).await?;
                println!(
                    "Loaded {} mods ({} imported, {} definitions)",
                    summary.order.len(),
                    summary.imported.len(),
                    summary.definitions
                );
            }
            Command::Enable { id } => toggle(orchestrator, &id, true).await?,
            Command::Disable { id } => toggle(orchestrator, &id, false).await?,
            Command::Move { id, index } => {
                reload(orchestrator).await?;
                if !orchestrator.move_package(&id, index).await.map_err(report)? {
                    bail!(
                        "Cannot move '{}' to {}: unknown mod or index out of range (0..{})",
                        id,
                        index,
                        orchestrator.state_table().len()
                    );
                }
                reload(orchestrator).await?;
                print_order(orchestrator);
            }
            Command::Show { kind, id } => {
                reload(orchestrator).await?;
                show(orchestrator, &kind, id.as_deref())?;
            }
        }

        Ok(())
    }
}

async fn reload(orchestrator: &LoadOrchestrator) -> Result<ReloadSummary> {
    let summary = orchestrator
        .reload()
        .await
        .map_err(report)
        .context("Reload failed")?;

    // Non-fatal errors are already logged as warnings
    if !summary.is_clean() {
        eprintln!("{} problem(s) reported during reload, see warnings above", summary.errors.len());
    }
    Ok(summary)
}

async fn toggle(orchestrator: &LoadOrchestrator, id: &str, enabled: bool) -> Result<()> {
    orchestrator.enable(id, enabled).await.map_err(report)?;
    reload(orchestrator).await?;

    let state = if enabled { "enabled" } else { "disabled" };
    if orchestrator.active_packages().iter().any(|p| p.id() == id) {
        println!("{} {}", id, state);
    } else {
        println!("{} {} (not installed)", id, state);
    }
    Ok(())
}

fn print_order(orchestrator: &LoadOrchestrator) {
    let packages = orchestrator.active_packages();
    if packages.is_empty() {
        println!("No mods installed");
        return;
    }

    for package in packages.iter() {
        let manifest = package.manifest();
        println!(
            "{:>3}  [{}]  {:<24} {}",
            package.order(),
            if package.is_enabled() { "x" } else { " " },
            package.id(),
            manifest.version.as_deref().unwrap_or("-"),
        );
    }
}

fn show(orchestrator: &LoadOrchestrator, kind: &str, id: Option<&str>) -> Result<()> {
    let kinds = ContentKinds::default_kinds();
    let Some(content_kind) = kinds.get(kind) else {
        bail!(
            "Unknown content kind '{}' (expected one of: {})",
            kind,
            kinds.names().collect::<Vec<_>>().join(", ")
        );
    };

    let entries: Vec<_> = content_kind
        .describe(orchestrator.catalogue())
        .into_iter()
        .filter(|entry| id.is_none_or(|id| entry.id.eq_ignore_ascii_case(id)))
        .collect();

    if entries.is_empty() {
        match id {
            Some(id) => bail!("No {} entry named '{}'", content_kind.name(), id),
            None => println!("No {} loaded", content_kind.name()),
        }
    }

    for entry in entries {
        println!(
            "{:<24} {:<40} {}:{}",
            entry.id, entry.detail, entry.package, entry.source_file
        );
    }
    Ok(())
}

fn describe(error: &LoadError) -> String {
    if error.involved_ids.is_empty() {
        error.to_string()
    } else {
        format!("{} [{}]", error, error.involved_ids.join(", "))
    }
}

fn report(error: LoadError) -> anyhow::Error {
    anyhow::anyhow!(describe(&error))
}
