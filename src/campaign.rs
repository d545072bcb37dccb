//! Multi-phase campaigns: the same hero party fights a sequence of enemy waves, each
//! optionally followed by a boss encounter. Bosses rotate: wave `i` meets
//! `bosses[i % bosses.len()]`. HP and MP carry over between phases.

use crate::config::EngineConfig;
use crate::engine::{run_auto_battle, BattleEngine};
use crate::error::SetupError;
use crate::sim::ai::HeroPolicy;
use crate::sim::battle::Outcome;
use crate::sim::character::Character;
use tracing::info;

/// Share of max HP and MP restored to living heroes after each phase.
pub const RECOVERY_PERCENT: u32 = 20;

#[derive(Clone, Debug, Default)]
pub struct CampaignOptions {
    pub bosses: Vec<Character>,
    pub recover_between_phases: bool,
    pub config: EngineConfig,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Wave(usize),
    Boss(usize),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PhaseResult {
    pub phase: Phase,
    pub outcome: Outcome,
    pub rounds: u32,
}

#[derive(Clone, Debug)]
pub struct CampaignReport {
    pub phases: Vec<PhaseResult>,
    pub heroes: Vec<Character>,
    pub log: Vec<String>,
}

impl CampaignReport {
    /// True when every phase ended with the heroes on top.
    pub fn victory(&self) -> bool {
        !self.phases.is_empty() && self.phases.iter().all(|p| p.outcome == Outcome::HeroesWin)
    }
}

/// Fight `waves` in order, stopping at the first phase the heroes do not win.
pub fn run_campaign(
    heroes: Vec<Character>,
    waves: Vec<Vec<Character>>,
    options: &CampaignOptions,
    policy: &mut dyn HeroPolicy,
) -> Result<CampaignReport, SetupError> {
    let mut report = CampaignReport {
        phases: Vec::new(),
        heroes,
        log: Vec::new(),
    };
    let mut seed = options.config.seed;

    for (index, wave) in waves.into_iter().enumerate() {
        let mut encounters = vec![(Phase::Wave(index), wave)];
        if !options.bosses.is_empty() {
            let boss = options.bosses[index % options.bosses.len()].clone();
            encounters.push((Phase::Boss(index), vec![boss]));
        }
        for (phase, enemies) in encounters {
            let result = fight(&mut report, phase, enemies, options, seed, policy)?;
            seed = seed.wrapping_add(1);
            if result.outcome != Outcome::HeroesWin {
                info!(?phase, outcome = ?result.outcome, "campaign lost");
                report.phases.push(result);
                return Ok(report);
            }
            report.phases.push(result);
        }
        if options.recover_between_phases {
            recover(&mut report.heroes);
        }
    }
    Ok(report)
}

fn fight(
    report: &mut CampaignReport,
    phase: Phase,
    enemies: Vec<Character>,
    options: &CampaignOptions,
    seed: u64,
    policy: &mut dyn HeroPolicy,
) -> Result<PhaseResult, SetupError> {
    // Relations refer to the previous enemy roster; start every phase clean.
    let heroes = report
        .heroes
        .iter()
        .cloned()
        .map(|mut hero| {
            hero.status.clear();
            hero
        })
        .collect();
    let config = options.config.clone().with_seed(seed);
    let mut engine = BattleEngine::new(heroes, enemies, config)?;
    info!(?phase, "campaign phase start");
    let outcome = run_auto_battle(&mut engine, policy);
    let (state, logger) = engine.into_parts();
    report.log.extend(logger.log_lines().iter().cloned());
    report.heroes = state.heroes;
    Ok(PhaseResult {
        phase,
        outcome,
        rounds: state.round,
    })
}

/// Living heroes regain a fifth of their max HP and MP, capped at the maximum.
pub fn recover(heroes: &mut [Character]) {
    for hero in heroes.iter_mut().filter(|h| h.is_alive()) {
        hero.hp = (hero.hp + hero.max_hp * RECOVERY_PERCENT / 100).min(hero.max_hp);
        hero.mp = (hero.mp + hero.max_mp * RECOVERY_PERCENT / 100).min(hero.max_mp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ai::FirstTargetPolicy;
    use crate::sim::character::{Attributes, ClassKind};

    fn make_slime(hp: u32) -> Character {
        Character::enemy("Slime", ClassKind::Slime, Attributes::new(hp, 0, 10, 2, 5))
            .expect("valid slime")
    }

    #[test]
    fn recovery_restores_a_fifth_and_skips_the_fallen() {
        let mut heroes = vec![
            Character::hero("Aldor", ClassKind::Warrior, Attributes::new(200, 50, 100, 25, 20))
                .expect("valid warrior"),
            Character::hero("Lyra", ClassKind::Druid, Attributes::new(120, 140, 80, 25, 22))
                .expect("valid druid"),
        ];
        heroes[0].hp = 100;
        heroes[0].mp = 45;
        heroes[1].hp = 0;
        recover(&mut heroes);
        assert_eq!(heroes[0].hp, 140);
        assert_eq!(heroes[0].mp, 50);
        assert_eq!(heroes[1].hp, 0);
    }

    #[test]
    fn strong_party_clears_every_wave() {
        let heroes = vec![Character::hero(
            "Aldor",
            ClassKind::Warrior,
            Attributes::new(220, 20, 100, 25, 20),
        )
        .expect("valid warrior")];
        let waves = vec![vec![make_slime(30), make_slime(30)], vec![make_slime(50)]];
        let mut policy = FirstTargetPolicy;
        let report = run_campaign(heroes, waves, &CampaignOptions::default(), &mut policy)
            .expect("valid campaign");
        assert!(report.victory());
        assert_eq!(report.phases.len(), 2);
        assert_eq!(report.phases[1].phase, Phase::Wave(1));
        assert!(report.heroes[0].hp < 220);
    }

    #[test]
    fn campaign_stops_at_the_first_defeat() {
        let heroes = vec![Character::hero(
            "Aldor",
            ClassKind::Warrior,
            Attributes::new(40, 0, 15, 20, 1),
        )
        .expect("valid warrior")];
        let titan = Character::boss(
            "Jefe",
            ClassKind::Titan,
            Attributes::new(600, 0, 90, 50, 30),
            Some(1),
        )
        .expect("valid titan");
        let options = CampaignOptions {
            bosses: vec![titan],
            ..CampaignOptions::default()
        };
        let waves = vec![vec![make_slime(1)], vec![make_slime(1)]];
        let mut policy = FirstTargetPolicy;
        let report = run_campaign(heroes, waves, &options, &mut policy).expect("valid campaign");
        assert!(!report.victory());
        assert_eq!(report.phases.len(), 2);
        assert_eq!(report.phases[1].phase, Phase::Boss(0));
        assert_eq!(report.phases[1].outcome, Outcome::EnemiesWin);
    }

    #[test]
    fn bosses_rotate_with_the_wave_index() {
        let heroes = vec![Character::hero(
            "Aldor",
            ClassKind::Warrior,
            Attributes::new(250, 0, 120, 40, 20),
        )
        .expect("valid warrior")];
        let titan = Character::boss(
            "Colossus",
            ClassKind::Titan,
            Attributes::new(300, 0, 50, 25, 10),
            None,
        )
        .expect("valid titan");
        let lich = Character::boss(
            "Vex",
            ClassKind::Lich,
            Attributes::new(250, 100, 40, 15, 10),
            None,
        )
        .expect("valid lich");
        let options = CampaignOptions {
            bosses: vec![titan, lich],
            ..CampaignOptions::default()
        };
        let waves = vec![vec![make_slime(1)], vec![make_slime(1)]];
        let mut policy = FirstTargetPolicy;
        let report = run_campaign(heroes, waves, &options, &mut policy).expect("valid campaign");

        assert!(report.victory());
        let phases: Vec<Phase> = report.phases.iter().map(|p| p.phase).collect();
        assert_eq!(
            phases,
            vec![Phase::Wave(0), Phase::Boss(0), Phase::Wave(1), Phase::Boss(1)]
        );
        let fallen_bosses: Vec<&str> = report
            .log
            .iter()
            .filter(|line| line.starts_with("Colossus has") || line.starts_with("Vex has"))
            .map(String::as_str)
            .collect();
        assert_eq!(fallen_bosses, ["Colossus has fallen!", "Vex has fallen!"]);
    }
}
