//! Action catalogue and the resolver that applies one action to the battle state.
//!
//! Every submission is validated in the same order: class eligibility, then the target,
//! then mana. A rejected action leaves the state exactly as it was.

use crate::battle_logger::BattleLogger;
use crate::error::Rejection;
use crate::sim::battle::BattleState;
use crate::sim::character::{CharacterId, ClassKind, Role};
use crate::sim::{stats, status};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const DEFEND_COST: u32 = 10;
pub const TAUNT_COST: u32 = 5;
pub const TAUNT_ALL_COST_PER_ENEMY: u32 = 3;
pub const INCREASE_DEFENSE_COST: u32 = 10;
pub const INCREASE_DEFENSE_AMOUNT: u32 = 10;
pub const HEAL_COST: u32 = 15;
pub const HEAL_AMOUNT: u32 = 30;
pub const RESTORE_MANA_COST: u32 = 10;
pub const RESTORE_MANA_AMOUNT: u32 = 25;
pub const REVIVE_COST: u32 = 25;
pub const SLEEP_COST: u32 = 20;
pub const REINFORCE_COST: u32 = 20;
pub const REINFORCE_AMOUNT: u32 = 60;
pub const PARALYZE_COST: u32 = 25;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ActionKind {
    Attack,
    Defend,
    Taunt,
    TauntAll,
    IncreaseDefense,
    Heal,
    RestoreMana,
    RemoveNegativeEffect,
    Revive,
    SleepSpell,
    ReinforceSpell,
    ParalyzeSpell,
    Pass,
}

static ACTION_IDS: phf::Map<&'static str, ActionKind> = phf::phf_map! {
    "attack" => ActionKind::Attack,
    "defend" => ActionKind::Defend,
    "taunt" => ActionKind::Taunt,
    "taunt_all" => ActionKind::TauntAll,
    "increase_defense" => ActionKind::IncreaseDefense,
    "heal" => ActionKind::Heal,
    "restore_mana" => ActionKind::RestoreMana,
    "remove_negative_effect" => ActionKind::RemoveNegativeEffect,
    "revive" => ActionKind::Revive,
    "sleep" => ActionKind::SleepSpell,
    "reinforce" => ActionKind::ReinforceSpell,
    "paralyze" => ActionKind::ParalyzeSpell,
    "pass" => ActionKind::Pass,
};

/// What an action needs to be pointed at.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TargetKind {
    None,
    SelfOnly,
    LiveOpponent,
    LiveAlly,
    OtherLiveAlly,
    FallenAlly,
}

impl ActionKind {
    pub fn id(self) -> &'static str {
        match self {
            ActionKind::Attack => "attack",
            ActionKind::Defend => "defend",
            ActionKind::Taunt => "taunt",
            ActionKind::TauntAll => "taunt_all",
            ActionKind::IncreaseDefense => "increase_defense",
            ActionKind::Heal => "heal",
            ActionKind::RestoreMana => "restore_mana",
            ActionKind::RemoveNegativeEffect => "remove_negative_effect",
            ActionKind::Revive => "revive",
            ActionKind::SleepSpell => "sleep",
            ActionKind::ReinforceSpell => "reinforce",
            ActionKind::ParalyzeSpell => "paralyze",
            ActionKind::Pass => "pass",
        }
    }

    /// Flat MP cost. Taunt-all scales with the number of live opponents, see [`mana_cost`].
    pub fn cost(self) -> u32 {
        match self {
            ActionKind::Attack
            | ActionKind::RemoveNegativeEffect
            | ActionKind::Pass
            | ActionKind::TauntAll => 0,
            ActionKind::Defend => DEFEND_COST,
            ActionKind::Taunt => TAUNT_COST,
            ActionKind::IncreaseDefense => INCREASE_DEFENSE_COST,
            ActionKind::Heal => HEAL_COST,
            ActionKind::RestoreMana => RESTORE_MANA_COST,
            ActionKind::Revive => REVIVE_COST,
            ActionKind::SleepSpell => SLEEP_COST,
            ActionKind::ReinforceSpell => REINFORCE_COST,
            ActionKind::ParalyzeSpell => PARALYZE_COST,
        }
    }

    pub fn target_kind(self) -> TargetKind {
        match self {
            ActionKind::Attack
            | ActionKind::Taunt
            | ActionKind::SleepSpell
            | ActionKind::ParalyzeSpell => TargetKind::LiveOpponent,
            ActionKind::Defend => TargetKind::OtherLiveAlly,
            ActionKind::Heal
            | ActionKind::RestoreMana
            | ActionKind::RemoveNegativeEffect
            | ActionKind::ReinforceSpell => TargetKind::LiveAlly,
            ActionKind::Revive => TargetKind::FallenAlly,
            ActionKind::IncreaseDefense => TargetKind::SelfOnly,
            ActionKind::TauntAll | ActionKind::Pass => TargetKind::None,
        }
    }

    pub fn needs_target(self) -> bool {
        !matches!(self.target_kind(), TargetKind::None | TargetKind::SelfOnly)
    }

    fn label(self) -> &'static str {
        match self {
            ActionKind::Attack => "Attack",
            ActionKind::Defend => "Defend",
            ActionKind::Taunt => "Taunt",
            ActionKind::TauntAll => "Taunt All",
            ActionKind::IncreaseDefense => "Increase Defense",
            ActionKind::Heal => "Heal",
            ActionKind::RestoreMana => "Restore Mana",
            ActionKind::RemoveNegativeEffect => "Remove Negative Effect",
            ActionKind::Revive => "Revive",
            ActionKind::SleepSpell => "Sleep",
            ActionKind::ReinforceSpell => "Reinforce",
            ActionKind::ParalyzeSpell => "Paralyze",
            ActionKind::Pass => "Pass",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACTION_IDS
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| s.to_string())
    }
}

/// Actions a class may use, in menu order.
pub fn capabilities(class: ClassKind) -> &'static [ActionKind] {
    use ActionKind::*;
    match class {
        ClassKind::Warrior => &[Attack, Defend, Taunt, TauntAll, IncreaseDefense, Pass],
        ClassKind::Mage => &[Attack, SleepSpell, ReinforceSpell, ParalyzeSpell, Pass],
        ClassKind::Paladin => &[
            Attack,
            Defend,
            Taunt,
            TauntAll,
            IncreaseDefense,
            Heal,
            RemoveNegativeEffect,
            Revive,
            Pass,
        ],
        ClassKind::Druid => &[
            Attack,
            Heal,
            RestoreMana,
            RemoveNegativeEffect,
            SleepSpell,
            ReinforceSpell,
            ParalyzeSpell,
            Pass,
        ],
        _ => &[Attack, Pass],
    }
}

pub fn can_use(class: ClassKind, action: ActionKind) -> bool {
    capabilities(class).contains(&action)
}

/// Summary of a resolved action.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Applied {
    pub actor: CharacterId,
    pub action: ActionKind,
    pub target: Option<CharacterId>,
    pub mana_spent: u32,
    pub damage: Option<u32>,
    pub fallen: Vec<CharacterId>,
}

impl Applied {
    fn new(
        actor: CharacterId,
        action: ActionKind,
        target: Option<CharacterId>,
        mana_spent: u32,
    ) -> Self {
        Self {
            actor,
            action,
            target,
            mana_spent,
            damage: None,
            fallen: Vec::new(),
        }
    }
}

/// MP the actor would pay for `action` right now.
pub fn mana_cost(state: &BattleState, actor: CharacterId, action: ActionKind) -> u32 {
    match action {
        ActionKind::TauntAll => {
            let live = state.living(actor.side.opponent()).len() as u32;
            TAUNT_ALL_COST_PER_ENEMY * live
        }
        other => other.cost(),
    }
}

/// Checks eligibility, target and mana without touching the state. Returns the resolved
/// target and the MP to charge.
pub fn validate(
    state: &BattleState,
    actor: CharacterId,
    action: ActionKind,
    target: Option<CharacterId>,
) -> Result<(Option<CharacterId>, u32), Rejection> {
    let character = state
        .get(actor)
        .ok_or_else(|| Rejection::EngineMisuse(format!("no character at {actor:?}")))?;
    if !character.is_alive() {
        return Err(Rejection::EngineMisuse(format!(
            "{} is down and cannot act",
            character.name
        )));
    }
    if !can_use(character.class, action) {
        return Err(Rejection::IneligibleClass {
            actor: character.name.clone(),
            class: character.class,
            action,
        });
    }
    let target = check_target(state, actor, action, target)?;
    let required = mana_cost(state, actor, action);
    if character.mp < required {
        return Err(Rejection::InsufficientMana {
            actor: character.name.clone(),
            action,
            required,
            available: character.mp,
        });
    }
    Ok((target, required))
}

fn check_target(
    state: &BattleState,
    actor: CharacterId,
    action: ActionKind,
    target: Option<CharacterId>,
) -> Result<Option<CharacterId>, Rejection> {
    let kind = action.target_kind();
    match kind {
        TargetKind::None => return Ok(None),
        TargetKind::SelfOnly => return Ok(Some(actor)),
        _ => {}
    }
    let Some(id) = target else {
        return Err(Rejection::InvalidTarget(format!("{action} needs a target")));
    };
    let Some(character) = state.get(id) else {
        return Err(Rejection::InvalidTarget(format!(
            "no {} at slot {}",
            id.side, id.index
        )));
    };
    let wrong_side = match kind {
        TargetKind::LiveOpponent => id.side != actor.side.opponent(),
        _ => id.side != actor.side,
    };
    if wrong_side {
        return Err(Rejection::InvalidTarget(format!(
            "{} is on the wrong side for {action}",
            character.name
        )));
    }
    match kind {
        TargetKind::FallenAlly if character.is_alive() => Err(Rejection::InvalidTarget(format!(
            "{} is still standing",
            character.name
        ))),
        TargetKind::FallenAlly => Ok(Some(id)),
        _ if !character.is_alive() => Err(Rejection::InvalidTarget(format!(
            "{} has already fallen",
            character.name
        ))),
        TargetKind::OtherLiveAlly if id == actor => Err(Rejection::InvalidTarget(format!(
            "{} cannot defend themselves",
            character.name
        ))),
        _ => Ok(Some(id)),
    }
}

/// Validates and applies one action. On rejection nothing has changed.
pub fn resolve(
    state: &mut BattleState,
    logger: &mut BattleLogger,
    actor: CharacterId,
    action: ActionKind,
    target: Option<CharacterId>,
) -> Result<Applied, Rejection> {
    let (target, cost) = validate(state, actor, action, target)?;
    debug!(?actor, %action, ?target, cost, "resolving action");

    let actor_name = state.name_of(actor).to_string();
    if cost > 0 {
        if let Some(character) = state.get_mut(actor) {
            stats::spend_mana(character, cost);
            logger.log_mana(&actor_name, cost, character.mp, character.max_mp);
        }
    }

    let mut applied = Applied::new(actor, action, target, cost);
    let target_name = target
        .map(|id| state.name_of(id).to_string())
        .unwrap_or_default();

    match (action, target) {
        (ActionKind::Attack, Some(id)) => {
            let raw = state.get(actor).map_or(0, |c| c.attack);
            let hit = stats::apply_damage(state, id, raw);
            let (hp, max_hp) = hp_of(state, id);
            logger.log_attack(&actor_name, &target_name, hit.dealt, hp, max_hp);
            applied.damage = Some(hit.dealt);
            if hit.lethal {
                settle_death(state, logger, id, &mut applied);
            }
        }
        (ActionKind::Defend, Some(id)) => {
            status::apply_defense(state, actor, id);
            logger.log(format!("{actor_name} is now defending {target_name}."));
        }
        (ActionKind::Taunt, Some(id)) => {
            status::apply_taunt(state, actor, id);
            logger.log(format!("{actor_name} taunts {target_name}."));
        }
        (ActionKind::TauntAll, _) => {
            for id in state.living(actor.side.opponent()) {
                status::apply_taunt(state, actor, id);
            }
            logger.log(format!("{actor_name} taunts every opponent."));
        }
        (ActionKind::IncreaseDefense, _) => {
            if let Some(character) = state.get_mut(actor) {
                character.defense = character.defense.saturating_add(INCREASE_DEFENSE_AMOUNT);
                logger.log(format!(
                    "{actor_name}'s defense rises to {}.",
                    character.defense
                ));
            }
        }
        (ActionKind::Heal, Some(id)) => {
            if let Some(character) = state.get_mut(id) {
                let healed = stats::heal(character, HEAL_AMOUNT);
                logger.log_heal(&actor_name, &target_name, healed, character.hp, character.max_hp);
            }
        }
        (ActionKind::RestoreMana, Some(id)) => {
            if let Some(character) = state.get_mut(id) {
                let restored = stats::restore_mana(character, RESTORE_MANA_AMOUNT);
                logger.log(format!(
                    "{actor_name} restores {restored} MP to {target_name} ({}/{}).",
                    character.mp, character.max_mp
                ));
            }
        }
        (ActionKind::RemoveNegativeEffect, Some(id)) => {
            if let Some(character) = state.get_mut(id) {
                status::clear_negative(character);
                logger.log(format!("{actor_name} cleanses {target_name}."));
            }
        }
        (ActionKind::Revive, Some(id)) => {
            if let Some(character) = state.get_mut(id) {
                stats::revive(character);
                logger.log(format!(
                    "{actor_name} revives {target_name} with {} HP.",
                    character.hp
                ));
            }
        }
        (ActionKind::SleepSpell, Some(id)) => {
            if let Some(character) = state.get_mut(id) {
                status::apply_sleep(character, status::SLEEP_TURNS);
                logger.log(format!(
                    "{target_name} falls asleep for {} turns.",
                    status::SLEEP_TURNS
                ));
            }
        }
        (ActionKind::ReinforceSpell, Some(id)) => {
            if let Some(character) = state.get_mut(id) {
                character.attack = character.attack.saturating_add(REINFORCE_AMOUNT);
                logger.log(format!(
                    "{actor_name} reinforces {target_name}: attack is now {}.",
                    character.attack
                ));
            }
        }
        (ActionKind::ParalyzeSpell, Some(id)) => {
            if let Some(character) = state.get_mut(id) {
                status::apply_paralysis(character, status::PARALYSIS_TURNS);
                logger.log(format!(
                    "{target_name} is paralyzed for {} turn.",
                    status::PARALYSIS_TURNS
                ));
            }
        }
        (ActionKind::Pass, _) => {
            logger.log(format!("{actor_name} passes."));
        }
        // validate() always resolves a target for the remaining kinds.
        (_, None) => {}
    }
    Ok(applied)
}

/// Boss special: `max(1, attack * 3 - target.defense)`, ignoring any defender.
pub fn boss_special(
    state: &mut BattleState,
    logger: &mut BattleLogger,
    actor: CharacterId,
    target: CharacterId,
) -> Result<Applied, Rejection> {
    let boss = state
        .get(actor)
        .filter(|c| c.is_alive() && c.role() == Role::Boss)
        .ok_or_else(|| Rejection::EngineMisuse(format!("{actor:?} is not a live boss")))?;
    let victim = state
        .get(target)
        .filter(|c| c.is_alive() && target.side == actor.side.opponent())
        .ok_or_else(|| Rejection::InvalidTarget(format!("{target:?} cannot be hit")))?;

    let damage = boss
        .attack
        .saturating_mul(3)
        .saturating_sub(victim.defense)
        .max(1);
    let actor_name = boss.name.clone();
    let target_name = victim.name.clone();
    debug!(?actor, ?target, damage, "boss special");

    let hit = stats::deal_unmitigated(state, target, damage);
    let (hp, max_hp) = hp_of(state, target);
    logger.log(format!(
        "{actor_name} unleashes a special attack on {target_name} for {} damage ({hp}/{max_hp}).",
        hit.dealt
    ));
    let mut applied = Applied::new(actor, ActionKind::Attack, Some(target), 0);
    applied.damage = Some(hit.dealt);
    if hit.lethal {
        settle_death(state, logger, target, &mut applied);
    }
    Ok(applied)
}

fn hp_of(state: &BattleState, id: CharacterId) -> (u32, u32) {
    state.get(id).map_or((0, 0), |c| (c.hp, c.max_hp))
}

fn settle_death(
    state: &mut BattleState,
    logger: &mut BattleLogger,
    dead: CharacterId,
    applied: &mut Applied,
) {
    status::release_relations_to(state, dead);
    logger.log_death(state.name_of(dead));
    applied.fallen.push(dead);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::character::{Attributes, Character};

    fn make_state() -> BattleState {
        let warrior = Character::hero(
            "Aldor",
            ClassKind::Warrior,
            Attributes::new(220, 20, 100, 25, 20),
        )
        .expect("valid warrior");
        let mage = Character::hero("Merina", ClassKind::Mage, Attributes::new(90, 200, 60, 20, 18))
            .expect("valid mage");
        let paladin = Character::hero(
            "Tharok",
            ClassKind::Paladin,
            Attributes::new(160, 80, 120, 30, 16),
        )
        .expect("valid paladin");
        let druid = Character::hero("Lyra", ClassKind::Druid, Attributes::new(120, 140, 80, 25, 22))
            .expect("valid druid");
        let golem = Character::enemy("Golem", ClassKind::Golem, Attributes::new(150, 0, 40, 20, 8))
            .expect("valid golem");
        let slime = Character::enemy("Slime", ClassKind::Slime, Attributes::new(10, 0, 10, 2, 5))
            .expect("valid slime");
        BattleState::new(vec![warrior, mage, paladin, druid], vec![golem, slime])
    }

    #[test]
    fn action_ids_round_trip_through_the_map() {
        assert_eq!("taunt_all".parse::<ActionKind>(), Ok(ActionKind::TauntAll));
        assert_eq!("SLEEP".parse::<ActionKind>(), Ok(ActionKind::SleepSpell));
        assert!("fireball".parse::<ActionKind>().is_err());
    }

    #[test]
    fn class_capabilities_follow_the_table() {
        assert!(can_use(ClassKind::Paladin, ActionKind::Revive));
        assert!(!can_use(ClassKind::Druid, ActionKind::Revive));
        assert!(can_use(ClassKind::Druid, ActionKind::RestoreMana));
        assert!(!can_use(ClassKind::Mage, ActionKind::Heal));
        assert_eq!(capabilities(ClassKind::Titan), &[ActionKind::Attack, ActionKind::Pass]);
    }

    #[test]
    fn attack_mitigates_and_logs() {
        let mut state = make_state();
        let mut logger = BattleLogger::new();
        let applied = resolve(
            &mut state,
            &mut logger,
            CharacterId::hero(0),
            ActionKind::Attack,
            Some(CharacterId::enemy(0)),
        )
        .expect("attack resolves");
        assert_eq!(applied.damage, Some(80));
        assert_eq!(state.enemies[0].hp, 70);
        assert_eq!(logger.log_lines().len(), 1);
    }

    #[test]
    fn kill_releases_relations_and_logs_death_last() {
        let mut state = make_state();
        let mut logger = BattleLogger::new();
        state.heroes[1].status.taunted_by = Some(CharacterId::enemy(1));
        let applied = resolve(
            &mut state,
            &mut logger,
            CharacterId::hero(0),
            ActionKind::Attack,
            Some(CharacterId::enemy(1)),
        )
        .expect("attack resolves");
        assert_eq!(applied.fallen, vec![CharacterId::enemy(1)]);
        assert_eq!(state.heroes[1].status.taunted_by, None);
        assert_eq!(logger.log_lines().last().map(String::as_str), Some("Slime has fallen!"));
    }

    #[test]
    fn validation_checks_class_before_target_and_mana() {
        let mut state = make_state();
        state.heroes[1].mp = 0;
        let err = validate(&state, CharacterId::hero(1), ActionKind::Heal, None)
            .expect_err("mage cannot heal");
        assert!(matches!(err, Rejection::IneligibleClass { .. }));

        let err = validate(
            &state,
            CharacterId::hero(1),
            ActionKind::SleepSpell,
            Some(CharacterId::hero(0)),
        )
        .expect_err("sleep needs an opponent");
        assert!(matches!(err, Rejection::InvalidTarget(_)));

        let err = validate(
            &state,
            CharacterId::hero(1),
            ActionKind::SleepSpell,
            Some(CharacterId::enemy(0)),
        )
        .expect_err("no mana");
        assert_eq!(
            err,
            Rejection::InsufficientMana {
                actor: "Merina".to_string(),
                action: ActionKind::SleepSpell,
                required: SLEEP_COST,
                available: 0,
            }
        );
    }

    #[test]
    fn rejected_action_leaves_state_untouched() {
        let mut state = make_state();
        let mut logger = BattleLogger::new();
        state.heroes[0].mp = 5;
        let before = state.clone();
        let err = resolve(
            &mut state,
            &mut logger,
            CharacterId::hero(0),
            ActionKind::Defend,
            Some(CharacterId::hero(1)),
        )
        .expect_err("defend costs 10");
        assert!(matches!(err, Rejection::InsufficientMana { .. }));
        assert_eq!(state.heroes, before.heroes);
        assert_eq!(state.enemies, before.enemies);
        assert!(logger.log_lines().is_empty());
    }

    #[test]
    fn defend_refuses_self() {
        let state = make_state();
        let err = validate(
            &state,
            CharacterId::hero(2),
            ActionKind::Defend,
            Some(CharacterId::hero(2)),
        )
        .expect_err("self defense is refused");
        assert!(matches!(err, Rejection::InvalidTarget(_)));
    }

    #[test]
    fn revive_requires_a_fallen_ally() {
        let mut state = make_state();
        let mut logger = BattleLogger::new();
        let err = resolve(
            &mut state,
            &mut logger,
            CharacterId::hero(2),
            ActionKind::Revive,
            Some(CharacterId::hero(1)),
        )
        .expect_err("mage is alive");
        assert!(matches!(err, Rejection::InvalidTarget(_)));

        state.heroes[1].hp = 0;
        let applied = resolve(
            &mut state,
            &mut logger,
            CharacterId::hero(2),
            ActionKind::Revive,
            Some(CharacterId::hero(1)),
        )
        .expect("revive resolves");
        assert_eq!(applied.mana_spent, REVIVE_COST);
        assert_eq!(state.heroes[1].hp, stats::REVIVE_HP);
        assert_eq!(state.heroes[2].mp, 80 - REVIVE_COST);
    }

    #[test]
    fn taunt_all_charges_per_live_opponent() {
        let mut state = make_state();
        let mut logger = BattleLogger::new();
        state.enemies[1].hp = 0;
        let applied = resolve(
            &mut state,
            &mut logger,
            CharacterId::hero(0),
            ActionKind::TauntAll,
            None,
        )
        .expect("taunt all resolves");
        assert_eq!(applied.mana_spent, TAUNT_ALL_COST_PER_ENEMY);
        assert_eq!(state.enemies[0].status.taunted_by, Some(CharacterId::hero(0)));
        assert_eq!(state.enemies[1].status.taunted_by, None);
    }

    #[test]
    fn druid_spells_apply_their_effects() {
        let mut state = make_state();
        let mut logger = BattleLogger::new();
        let druid = CharacterId::hero(3);
        resolve(&mut state, &mut logger, druid, ActionKind::SleepSpell, Some(CharacterId::enemy(0)))
            .expect("sleep");
        assert_eq!(state.enemies[0].status.sleep_turns, status::SLEEP_TURNS);
        resolve(
            &mut state,
            &mut logger,
            druid,
            ActionKind::ReinforceSpell,
            Some(CharacterId::hero(0)),
        )
        .expect("reinforce");
        assert_eq!(state.heroes[0].attack, 160);
        state.heroes[1].mp = 100;
        resolve(&mut state, &mut logger, druid, ActionKind::RestoreMana, Some(CharacterId::hero(1)))
            .expect("restore");
        assert_eq!(state.heroes[1].mp, 125);
        assert_eq!(state.heroes[3].mp, 140 - SLEEP_COST - REINFORCE_COST - RESTORE_MANA_COST);
    }

    #[test]
    fn boss_special_ignores_the_defender() {
        let titan = Character::boss(
            "Jefe",
            ClassKind::Titan,
            Attributes::new(400, 0, 70, 30, 12),
            None,
        )
        .expect("valid titan");
        let mut state = make_state();
        state.enemies = vec![titan];
        state.heroes[1].status.defended_by = Some(CharacterId::hero(0));
        let mut logger = BattleLogger::new();
        let applied = boss_special(
            &mut state,
            &mut logger,
            CharacterId::enemy(0),
            CharacterId::hero(1),
        )
        .expect("special resolves");
        assert_eq!(applied.damage, Some(190));
        assert_eq!(state.heroes[1].hp, 0);
        assert_eq!(applied.fallen, vec![CharacterId::hero(1)]);
    }
}
