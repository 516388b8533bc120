//! Command-line driver for the lottery engine: runs a scenario file's draws
//! against a fresh in-process store and prints each response envelope.

mod scenario;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lottery_engine_core::core::clock::Timestamp;
use lottery_engine_core::models::{AccountType, BusinessType};
use lottery_engine_core::{execute_draw, ledger, DrawRequest, EngineConfig, InProcessStore, RngManager, Store};

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "lottery-engine", about = "Runs lottery draw scenarios against the engine library")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute every draw in a scenario file, in order, against one store.
    Run {
        /// Path to a scenario JSON file (see `scaffold` for the shape).
        scenario: PathBuf,
    },
    /// Print a starting-point scenario file to stdout.
    Scaffold,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Scaffold => {
            print!("{}", scenario::SCAFFOLD);
            Ok(())
        }
        Command::Run { scenario } => run(&scenario),
    }
}

fn run(path: &PathBuf) -> anyhow::Result<()> {
    let scenario = Scenario::load(path)?;
    let config = EngineConfig::new(scenario.rng_seed_bytes());
    let mut rng = RngManager::new(config.rng_seed);
    let mut store = InProcessStore::new();

    let campaign_code = scenario.campaign.code.clone();
    store.seed_campaign(scenario.campaign.into_model());
    for prize in scenario.prizes {
        store.seed_prize(prize.into_model());
    }
    for user in &scenario.users {
        let account = store.get_or_create_account(Some(user.user_id), AccountType::User);
        ledger::credit(&mut store, account.id(), "POINTS", user.starting_points, BusinessType::AdminAdjustment, "scenario-seed", None, 0);
    }

    let roles: std::collections::HashMap<u64, String> = scenario.users.iter().map(|u| (u.user_id, u.role.clone())).collect();

    for draw in scenario.draws {
        let request = DrawRequest {
            user_id: draw.user_id,
            campaign_code: campaign_code.clone(),
            draw_count: draw.draw_count,
            user_role: roles.get(&draw.user_id).cloned().unwrap_or_default(),
        };
        let now: Timestamp = draw.at;
        let envelope = execute_draw(&mut store, &config, &mut rng, &request, &draw.idempotency_key, now);
        println!("{}", serde_json::to_string(&envelope)?);
    }

    Ok(())
}
