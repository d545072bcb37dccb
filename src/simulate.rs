//! Batch simulation of independent seeded battles on the rayon pool.

use crate::config::EngineConfig;
use crate::engine::{run_auto_battle, BattleEngine};
use crate::error::SetupError;
use crate::sim::ai::{FirstTargetPolicy, HeroPolicy, RandomPolicy};
use crate::sim::battle::Outcome;
use crate::sim::character::Character;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PolicyKind {
    #[default]
    FirstTarget,
    Random,
}

impl PolicyKind {
    pub fn build(self, seed: u64) -> Box<dyn HeroPolicy> {
        match self {
            PolicyKind::FirstTarget => Box::new(FirstTargetPolicy),
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationSummary {
    pub battles: usize,
    pub hero_wins: usize,
    pub enemy_wins: usize,
    pub draws: usize,
}

impl SimulationSummary {
    /// Hero win rate with draws counted as half a win.
    pub fn win_rate(&self) -> f64 {
        if self.battles == 0 {
            return 0.0;
        }
        (self.hero_wins as f64 + 0.5 * self.draws as f64) / self.battles as f64
    }

    fn record(mut self, outcome: Outcome) -> Self {
        self.battles += 1;
        match outcome {
            Outcome::HeroesWin => self.hero_wins += 1,
            Outcome::EnemiesWin => self.enemy_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
        self
    }
}

/// Play one battle with its own seed for both the enemy AI and the hero policy.
pub fn simulate_battle(
    heroes: &[Character],
    enemies: &[Character],
    config: &EngineConfig,
    policy: PolicyKind,
    seed: u64,
) -> Result<Outcome, SetupError> {
    let config = config.clone().with_seed(seed);
    let mut engine = BattleEngine::new(heroes.to_vec(), enemies.to_vec(), config)?;
    let mut policy = policy.build(seed.rotate_left(17));
    Ok(run_auto_battle(&mut engine, policy.as_mut()))
}

/// Run `sims` independent battles in parallel. Results are reproducible for a given seed.
pub fn win_rate(
    heroes: &[Character],
    enemies: &[Character],
    config: &EngineConfig,
    sims: usize,
    seed: u64,
    policy: PolicyKind,
) -> Result<SimulationSummary, SetupError> {
    // Surface roster errors once instead of per battle.
    BattleEngine::new(heroes.to_vec(), enemies.to_vec(), config.clone())?;

    let mut seeder = SmallRng::seed_from_u64(seed);
    let seeds: Vec<u64> = (0..sims).map(|_| seeder.gen()).collect();
    let outcomes: Vec<Outcome> = seeds
        .par_iter()
        .map(|&battle_seed| simulate_battle(heroes, enemies, config, policy, battle_seed))
        .collect::<Result<_, _>>()?;
    Ok(outcomes
        .into_iter()
        .fold(SimulationSummary::default(), SimulationSummary::record))
}
