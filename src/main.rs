//! skirmish - batch combat simulation driver

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use skirmish::Scenario;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Run a batch simulation of a combat scenario
#[derive(Parser, Debug)]
#[command(name = "skirmish", version, about = "Simulate turns of a tabletop combat scenario")]
struct Args {
    /// Scenario TOML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Batch passes to run (overrides the scenario)
    #[arg(short, long)]
    turns: Option<u32>,

    /// Dice seed (overrides the scenario)
    #[arg(long)]
    seed: Option<u64>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skirmish=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut scenario = Scenario::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        scenario.engine.seed = Some(seed);
    }
    let turns = args.turns.unwrap_or(scenario.turns);

    let mut engine = scenario.build()?;
    let resolved = engine.simulate_batch(turns);
    info!("Resolved {} start-of-turn ticks over {} passes", resolved, turns);

    for event in engine.drain_log() {
        if args.json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            println!("{}", event);
        }
    }

    if !args.json {
        println!();
        for c in engine.roster() {
            let state = if c.dead { "dead" } else { "alive" };
            let effects: Vec<String> = c
                .effects
                .iter()
                .map(|e| format!("{} x{}", e.kind, e.stacks))
                .collect();
            println!(
                "{:<12} {:<5} HP {:>4} shield {:>3} {:<5} {}",
                c.name,
                c.team.to_string(),
                c.hp,
                c.shield,
                state,
                effects.join(", ")
            );
        }
    }

    Ok(())
}
