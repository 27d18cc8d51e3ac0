//! `shuttleport` — drive one agent across a small galaxy of shuttleports.
//!
//! Loads the bundled network, destinations, and travel settings, places the
//! agent in Mos Eisley, and travels to the destination named on the command
//! line.  Every travel event is logged through `tracing`.
//!
//! Run with:
//!   RUST_LOG=info cargo run -p shuttleport -- brawler_trainer_keren
//!   cargo run -p shuttleport -- --list

mod world;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gt_core::{Coordinates, Position, StopKey, TravelConfig};
use gt_registry::{DestinationDecl, DestinationRegistry, KindTag};
use gt_transit::{BfsPlanner, CachedPlanner, NetworkConfig, SharedGraph, build};
use gt_travel::{Collaborators, TracingSink, TravelAgent};

use world::{Character, World};

// ── Bundled data ──────────────────────────────────────────────────────────────

const NETWORK_JSON:      &str = include_str!("../data/network.json");
const DESTINATIONS_JSON: &str = include_str!("../data/destinations.json");
const TRAVEL_JSON:       &str = include_str!("../data/travel.json");

const DEFAULT_DESTINATION: &str = "brawler_trainer_keren";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn load_registry() -> Result<DestinationRegistry> {
    let decls: Vec<DestinationDecl> =
        serde_json::from_str(DESTINATIONS_JSON).context("parsing destinations.json")?;
    let mut registry = DestinationRegistry::new();
    registry.register_all(decls)?;
    Ok(registry)
}

fn list(registry: &DestinationRegistry) {
    for kind in [KindTag::Trainer, KindTag::Quest, KindTag::Unlock] {
        for d in registry.list_by_kind(kind) {
            println!("{:<8} {:<28} via {}", kind.as_str(), d.id, d.network_entry);
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let arg = std::env::args().nth(1);
    let registry = load_registry()?;
    if arg.as_deref() == Some("--list") {
        list(&registry);
        return Ok(());
    }
    let destination = arg.unwrap_or_else(|| DEFAULT_DESTINATION.to_owned());

    let network: NetworkConfig =
        serde_json::from_str(NETWORK_JSON).context("parsing network.json")?;
    let config: TravelConfig = serde_json::from_str(TRAVEL_JSON).context("parsing travel.json")?;
    let graph = build(&network)?;
    println!(
        "Network: {} shuttleports, {} connections",
        graph.stop_count(),
        graph.connection_count()
    );

    // ── Agent ─────────────────────────────────────────────────────────────
    let start = Position::new("tatooine", Coordinates::new(3500.0, -4790.0));
    let world = Arc::new(World::new(&network, start, &[StopKey::new("tatooine", "bestine")]));
    let character = Character {
        completed_quests: vec!["village_phase_1".into()],
        reputation:       HashMap::from([("nightsister".to_owned(), 120)]),
        skills:           vec![],
    };

    let collaborators = Collaborators::new(world.clone(), world.clone(), world)
        .with_events(Arc::new(TracingSink))
        .with_prerequisites(Arc::new(character));

    let agent = TravelAgent::builder(Arc::new(registry), SharedGraph::new(graph), collaborators)
        .planner(CachedPlanner::new(BfsPlanner))
        .config(config)
        .build()?;

    // ── Travel ────────────────────────────────────────────────────────────
    let outcome = agent.travel_to_destination(&destination)?;
    if let Some(route) = &outcome.route {
        println!("Route:   {route}");
    }
    println!(
        "Result:  {} after {:.2}s at hop {}",
        outcome.status,
        outcome.elapsed.as_secs_f64(),
        outcome.hop_index
    );
    if let Some(p) = &outcome.unmet_prerequisite {
        println!("Missing: {p}");
    }

    if !outcome.is_arrived() {
        bail!("travel to {destination} did not arrive ({})", outcome.status);
    }
    Ok(())
}
