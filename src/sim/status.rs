use crate::sim::battle::BattleState;
use crate::sim::character::{Character, CharacterId};

pub const SLEEP_TURNS: u32 = 3;
pub const PARALYSIS_TURNS: u32 = 1;

pub fn apply_sleep(target: &mut Character, turns: u32) {
    target.status.sleep_turns = turns;
}

pub fn apply_paralysis(target: &mut Character, turns: u32) {
    target.status.paralysis_turns = turns;
}

/// `source` becomes the only character `target` may attack.
pub fn apply_taunt(state: &mut BattleState, source: CharacterId, target: CharacterId) {
    if let Some(character) = state.get_mut(target) {
        character.status.taunted_by = Some(source);
    }
}

/// `source` lends its defense to `target`.
pub fn apply_defense(state: &mut BattleState, source: CharacterId, target: CharacterId) {
    if let Some(character) = state.get_mut(target) {
        character.status.defended_by = Some(source);
    }
}

/// Checks whether the character may act this turn and ticks both counters down.
/// One call per own turn.
pub fn can_act(character: &mut Character) -> bool {
    let status = &mut character.status;
    let blocked = status.sleep_turns > 0 || status.paralysis_turns > 0;
    status.sleep_turns = status.sleep_turns.saturating_sub(1);
    status.paralysis_turns = status.paralysis_turns.saturating_sub(1);
    !blocked
}

/// The live taunter if there is one, otherwise the first live candidate.
pub fn select_target(
    state: &BattleState,
    actor: CharacterId,
    candidates: &[CharacterId],
) -> Option<CharacterId> {
    let taunter = state
        .get(actor)
        .and_then(|c| c.status.taunted_by)
        .filter(|id| state.is_alive(*id));
    taunter.or_else(|| candidates.iter().copied().find(|id| state.is_alive(*id)))
}

pub fn clear_negative(target: &mut Character) {
    target.status.sleep_turns = 0;
    target.status.paralysis_turns = 0;
}

/// Drops every taunt and defense relation that points at `dead`.
pub fn release_relations_to(state: &mut BattleState, dead: CharacterId) {
    for character in state.heroes.iter_mut().chain(state.enemies.iter_mut()) {
        if character.status.taunted_by == Some(dead) {
            character.status.taunted_by = None;
        }
        if character.status.defended_by == Some(dead) {
            character.status.defended_by = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::character::{Attributes, ClassKind};

    fn make_state() -> BattleState {
        let warrior = Character::hero(
            "Aldor",
            ClassKind::Warrior,
            Attributes::new(200, 20, 100, 30, 20),
        )
        .expect("valid warrior");
        let paladin = Character::hero(
            "Tharok",
            ClassKind::Paladin,
            Attributes::new(160, 80, 120, 30, 16),
        )
        .expect("valid paladin");
        let golem = Character::enemy("Golem", ClassKind::Golem, Attributes::new(150, 0, 40, 20, 8))
            .expect("valid golem");
        let undead = Character::enemy(
            "Ghoul",
            ClassKind::Undead,
            Attributes::new(80, 0, 30, 10, 12),
        )
        .expect("valid undead");
        BattleState::new(vec![warrior, paladin], vec![golem, undead])
    }

    #[test]
    fn sleep_skips_exactly_its_turn_count() {
        let mut state = make_state();
        let golem = &mut state.enemies[0];
        apply_sleep(golem, 2);
        assert!(!can_act(golem));
        assert!(!can_act(golem));
        assert!(can_act(golem));
    }

    #[test]
    fn paralysis_and_sleep_tick_together() {
        let mut state = make_state();
        let golem = &mut state.enemies[0];
        apply_sleep(golem, 2);
        apply_paralysis(golem, PARALYSIS_TURNS);
        assert!(!can_act(golem));
        assert_eq!(golem.status.paralysis_turns, 0);
        assert_eq!(golem.status.sleep_turns, 1);
    }

    #[test]
    fn taunt_overwrites_the_previous_taunter() {
        let mut state = make_state();
        apply_taunt(&mut state, CharacterId::hero(0), CharacterId::enemy(0));
        apply_taunt(&mut state, CharacterId::hero(1), CharacterId::enemy(0));
        assert_eq!(state.enemies[0].status.taunted_by, Some(CharacterId::hero(1)));
    }

    #[test]
    fn taunted_actor_targets_the_taunter_first() {
        let mut state = make_state();
        let candidates = state.living(crate::sim::character::Side::Heroes);
        assert_eq!(
            select_target(&state, CharacterId::enemy(0), &candidates),
            Some(CharacterId::hero(0))
        );
        apply_taunt(&mut state, CharacterId::hero(1), CharacterId::enemy(0));
        assert_eq!(
            select_target(&state, CharacterId::enemy(0), &candidates),
            Some(CharacterId::hero(1))
        );
        state.heroes[1].hp = 0;
        assert_eq!(
            select_target(&state, CharacterId::enemy(0), &candidates),
            Some(CharacterId::hero(0))
        );
    }

    #[test]
    fn death_releases_relations_pointing_at_the_dead() {
        let mut state = make_state();
        apply_taunt(&mut state, CharacterId::hero(0), CharacterId::enemy(0));
        apply_taunt(&mut state, CharacterId::hero(0), CharacterId::enemy(1));
        apply_defense(&mut state, CharacterId::hero(0), CharacterId::hero(1));
        release_relations_to(&mut state, CharacterId::hero(0));
        assert_eq!(state.enemies[0].status.taunted_by, None);
        assert_eq!(state.enemies[1].status.taunted_by, None);
        assert_eq!(state.heroes[1].status.defended_by, None);
    }
}
