//! Turn-based hero vs. enemy battle engine.
//!
//! The main entry point for interactive play is [`engine::BattleEngine`]; automatic
//! battles, campaigns and batch simulations are built on top of it.

pub mod battle_logger;
pub mod campaign;
pub mod config;
pub mod engine;
pub mod error;
pub mod roster;
pub mod sim;
pub mod simulate;

use crate::campaign::{run_campaign, CampaignOptions};
use crate::engine::{run_auto_battle, BattleEngine};
use crate::roster::RosterFile;
use crate::simulate::PolicyKind;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::info;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::battle_logger::BattleLogger;
    pub use crate::config::EngineConfig;
    pub use crate::engine::{run_auto_battle, BattleEngine, Step, TargetRequest};
    pub use crate::error::{Rejection, SetupError};
    pub use crate::sim::actions::{ActionKind, Applied};
    pub use crate::sim::ai::{
        Choice, EnemyAi, FirstTargetPolicy, HeroPolicy, RandomPolicy, RandomTargetAi,
    };
    pub use crate::sim::battle::{BattleState, Outcome};
    pub use crate::sim::character::{Attributes, Character, CharacterId, ClassKind, Side};
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub roster_path: PathBuf,
    pub seed: Option<u64>,
    pub policy: PolicyKind,
    pub sims: Option<usize>,
    pub campaign: bool,
    pub log_json: Option<PathBuf>,
}

pub fn load_roster(path: &Path) -> anyhow::Result<RosterFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file at {}", path.display()))?;
    let parsed: RosterFile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    Ok(parsed)
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    let roster = load_roster(&opts.roster_path)?;
    let mut config = roster.config.clone();
    if let Some(seed) = opts.seed {
        config.seed = seed;
    }
    let heroes = roster.build_heroes().context("Invalid hero roster")?;

    if let Some(sims) = opts.sims {
        if sims == 0 {
            anyhow::bail!("--sims must be > 0");
        }
        let enemies = roster.build_enemies().context("Invalid enemy roster")?;
        let summary =
            simulate::win_rate(&heroes, &enemies, &config, sims, config.seed, opts.policy)?;
        println!(
            "{} battles: {} won, {} lost, {} drawn (win rate {:.4})",
            summary.battles,
            summary.hero_wins,
            summary.enemy_wins,
            summary.draws,
            summary.win_rate()
        );
        return Ok(());
    }

    let mut policy = opts.policy.build(config.seed);
    let log = if opts.campaign {
        let waves = roster.build_waves().context("Invalid wave roster")?;
        let options = CampaignOptions {
            bosses: roster.build_bosses().context("Invalid boss roster")?,
            recover_between_phases: true,
            config,
        };
        let report = run_campaign(heroes, waves, &options, policy.as_mut())?;
        for line in &report.log {
            println!("{line}");
        }
        for phase in &report.phases {
            info!(
                phase = ?phase.phase,
                outcome = ?phase.outcome,
                rounds = phase.rounds,
                "phase result"
            );
        }
        println!(
            "Campaign {} after {} phase(s)",
            if report.victory() { "won" } else { "lost" },
            report.phases.len()
        );
        serde_json::json!({ "log": report.log })
    } else {
        let enemies = roster.build_enemies().context("Invalid enemy roster")?;
        let mut engine = BattleEngine::new(heroes, enemies, config)?
            .with_listener(|line| println!("{line}"));
        let outcome = run_auto_battle(&mut engine, policy.as_mut());
        info!(?outcome, rounds = engine.state().round, "battle finished");
        engine.logger().to_json()
    };

    if let Some(path) = &opts.log_json {
        let body = serde_json::to_string_pretty(&log)?;
        std::fs::write(path, body)
            .with_context(|| format!("Failed to write battle log to {}", path.display()))?;
        println!("Wrote battle log to {}", path.display());
    }
    Ok(())
}
