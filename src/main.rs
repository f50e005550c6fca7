//! Campus upkeep planner CLI.
//!
//! Inspect location status, query priority-weighted paths and simulate
//! daily maintenance rounds against the working snapshot.

mod admin;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use upkeep_planner::config::PlannerConfig;
use upkeep_planner::graph::{Edge, PathGraph};
use upkeep_planner::pathfinder::PriorityWeightedPathFinder;
use upkeep_planner::registry::{Location, LocationRegistry};
use upkeep_planner::scheduler::{DayPlan, MaintenanceScheduler};
use upkeep_planner::snapshot::{self, FileSnapshotStore, Snapshot};
use upkeep_planner::traits::{NodeId, SnapshotStore};

use crate::admin::AdminGate;

#[derive(Parser)]
#[command(name = "upkeep")]
#[command(about = "Priority-driven campus maintenance routing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(long, short, env = "UPKEEP_CONFIG", default_value = "upkeep.toml")]
    config: PathBuf,

    /// Override the working snapshot path
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cleanliness, days since cleaning, priority and visits.
    Status {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Find the priority-weighted path between two locations (id or name).
    Path { from: String, to: String },

    /// Simulate daily maintenance rounds and save the result.
    Simulate {
        /// Number of days to simulate
        #[arg(short, long, default_value = "1")]
        days: u32,
        /// Depot location (id or name); defaults to the configured depot
        #[arg(long)]
        depot: Option<String>,
        /// Print JSON day plans
        #[arg(long)]
        json: bool,
        /// Do not write the snapshot afterwards
        #[arg(long)]
        dry_run: bool,
    },

    /// Register a new location.
    Register {
        #[arg(long)]
        id: NodeId,
        #[arg(long)]
        name: String,
        /// Importance, 1-10
        #[arg(long)]
        importance: u8,
        /// Preferred days between cleanings
        #[arg(long)]
        frequency: u32,
        /// Baseline visit priority, 1-10
        #[arg(long)]
        visit_priority: u8,
        /// Current cleanliness in percent
        #[arg(long, default_value = "100")]
        cleanliness: f64,
    },

    /// Add a path between two locations.
    Connect {
        from: String,
        to: String,
        #[arg(long)]
        distance: f64,
        #[arg(long, default_value = "1.0")]
        travel_time: f64,
        #[arg(long, default_value = "1.0")]
        difficulty: f64,
        /// Only add the from -> to direction
        #[arg(long)]
        one_way: bool,
    },

    /// Restore the canonical dataset (password protected).
    Reset {
        #[arg(long, env = "UPKEEP_ADMIN_PASSWORD")]
        password: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let fallback = if cli.verbose {
        "upkeep_planner=debug,upkeep=debug"
    } else {
        "upkeep_planner=info,upkeep=info"
    };
    let filter = EnvFilter::try_from_env("UPKEEP_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = PlannerConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(path) = cli.snapshot {
        config.files.snapshot = path;
    }

    let store = FileSnapshotStore::new(&config.files.snapshot);
    let canonical = FileSnapshotStore::new(&config.files.canonical);
    let (mut registry, mut graph) = load_site(&store, &canonical)?;

    match cli.command {
        Commands::Status { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&registry.status())?);
            } else {
                print_status(&registry);
            }
        }

        Commands::Path { from, to } => {
            let source = resolve(&registry, &from)?;
            let target = resolve(&registry, &to)?;
            let finder = PriorityWeightedPathFinder::new(&graph, &registry, config.search);
            let result = finder.shortest_path(source, target);
            if result.is_reachable() {
                println!("Path: {}", describe_route(&registry, &result.nodes));
                println!("Cost: {:.2}", result.cost);
            } else {
                println!("No path from {} to {}.", from, to);
            }
        }

        Commands::Simulate {
            days,
            depot,
            json,
            dry_run,
        } => {
            let max_days = config.schedule.max_days;
            if days == 0 || days > max_days {
                bail!("days must be between 1 and {}", max_days);
            }
            let depot = match depot {
                Some(name) => resolve(&registry, &name)?,
                None => config.schedule.depot,
            };

            let scheduler =
                MaintenanceScheduler::new(config.schedule.options.clone(), config.search);
            let plans = scheduler.simulate(&mut registry, &graph, depot, days);

            if json {
                println!("{}", serde_json::to_string_pretty(&plans)?);
            } else {
                print_simulation(&registry, &plans);
            }

            if !dry_run {
                save_site(&store, &registry, &graph)?;
            }
        }

        Commands::Register {
            id,
            name,
            importance,
            frequency,
            visit_priority,
            cleanliness,
        } => {
            let location =
                Location::new(id, name, importance, frequency, visit_priority, cleanliness)?;
            registry.register(location)?;
            save_site(&store, &registry, &graph)?;
            println!("Registered location {}.", id);
        }

        Commands::Connect {
            from,
            to,
            distance,
            travel_time,
            difficulty,
            one_way,
        } => {
            let edge = Edge::new(resolve(&registry, &from)?, resolve(&registry, &to)?, distance)
                .with_travel_time(travel_time)
                .with_difficulty(difficulty);
            edge.validate()?;
            if one_way {
                graph.add_edge(edge)?;
            } else {
                graph.add_two_way(edge)?;
            }
            save_site(&store, &registry, &graph)?;
            println!("Connected {} and {}.", from, to);
        }

        Commands::Reset { password } => {
            let gate = AdminGate::new(
                &config.files.admin,
                &config.files.canonical,
                &config.files.snapshot,
            );
            gate.reset(&password)?;
            let (registry, graph) = load_site(&store, &canonical)?;
            println!(
                "Reset complete: {} locations, {} paths.",
                registry.len(),
                graph.edge_count()
            );
        }
    }

    Ok(())
}

fn load_site(
    store: &FileSnapshotStore,
    canonical: &FileSnapshotStore,
) -> Result<(LocationRegistry, PathGraph)> {
    let snapshot = snapshot::load_or_default(store, canonical)?;
    let (registry, graph) = snapshot.into_parts()?;
    info!(
        locations = registry.len(),
        paths = graph.edge_count(),
        snapshot = %store.path().display(),
        "site loaded"
    );
    Ok((registry, graph))
}

fn save_site(store: &FileSnapshotStore, registry: &LocationRegistry, graph: &PathGraph) -> Result<()> {
    store
        .save(&Snapshot::capture(registry, graph))
        .with_context(|| format!("saving {}", store.path().display()))
}

/// Accepts a numeric id of a registered location, or an exact name.
fn resolve(registry: &LocationRegistry, key: &str) -> Result<NodeId> {
    if let Ok(id) = key.parse::<NodeId>() {
        if registry.get(id).is_some() {
            return Ok(id);
        }
    }
    registry
        .find_by_name(key)
        .map(Location::id)
        .ok_or_else(|| anyhow!("unknown location: {}", key))
}

fn describe_route(registry: &LocationRegistry, nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(|&id| match registry.get(id) {
            Some(loc) => loc.name().to_string(),
            None => format!("#{}", id),
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn print_status(registry: &LocationRegistry) {
    println!("\n=== Campus Locations Status ===");
    println!(
        "{:<30}{:>14}{:>16}{:>14}{:>12}",
        "Location", "Cleanliness", "Last Cleaned", "Priority", "Visits"
    );
    println!("{}", "-".repeat(86));
    for row in registry.status() {
        println!(
            "{:<30}{:>12.2} %{:>11} days{:>14.2}{:>12}",
            row.name, row.cleanliness, row.days_since_clean, row.priority, row.visit_count
        );
    }
    println!();
}

fn print_simulation(registry: &LocationRegistry, plans: &[DayPlan]) {
    for plan in plans {
        println!("\n=== Day {} ===", plan.day);
        println!("Route: {}", describe_route(registry, &plan.route));
        println!("Route cost: {:.2}", plan.total_cost);
        if !plan.unreached.is_empty() {
            let names: Vec<&str> = plan
                .unreached
                .iter()
                .filter_map(|&id| registry.get(id).map(Location::name))
                .collect();
            println!("Unreached: {}", names.join(", "));
        }
    }
    print_status(registry);
}
