use crate::sim::battle::BattleState;
use crate::sim::character::{CharacterId, Side};
use std::cmp::Reverse;

/// Living characters by speed, fastest first. Ties keep heroes ahead of enemies and
/// roster order within a side.
pub fn compute_turn_order(state: &BattleState) -> Vec<CharacterId> {
    let mut order: Vec<CharacterId> = state
        .living(Side::Heroes)
        .into_iter()
        .chain(state.living(Side::Enemies))
        .collect();
    // sort_by_key is stable
    order.sort_by_key(|id| Reverse(state.get(*id).map_or(0, |c| c.speed)));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::character::{Attributes, Character, ClassKind};

    fn make_hero(name: &str, speed: u32) -> Character {
        Character::hero(name, ClassKind::Warrior, Attributes::new(100, 10, 50, 25, speed))
            .expect("valid warrior")
    }

    fn make_enemy(name: &str, speed: u32) -> Character {
        Character::enemy(name, ClassKind::Golem, Attributes::new(100, 0, 30, 10, speed))
            .expect("valid golem")
    }

    #[test]
    fn orders_by_speed_across_sides() {
        let state = BattleState::new(
            vec![make_hero("h20", 20), make_hero("h10", 10)],
            vec![make_enemy("e15", 15), make_enemy("e5", 5)],
        );
        assert_eq!(
            compute_turn_order(&state),
            vec![
                CharacterId::hero(0),
                CharacterId::enemy(0),
                CharacterId::hero(1),
                CharacterId::enemy(1),
            ]
        );
    }

    #[test]
    fn ties_favor_heroes_then_roster_order() {
        let mut state = BattleState::new(
            vec![make_hero("a", 10), make_hero("b", 10), make_hero("c", 12)],
            vec![make_enemy("x", 10), make_enemy("y", 12)],
        );
        state.heroes[1].hp = 0;
        assert_eq!(
            compute_turn_order(&state),
            vec![
                CharacterId::hero(2),
                CharacterId::enemy(1),
                CharacterId::hero(0),
                CharacterId::enemy(0),
            ]
        );
    }
}
