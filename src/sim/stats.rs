use crate::sim::battle::BattleState;
use crate::sim::character::{Character, CharacterId};

/// HP a revived character comes back with, capped by its max HP.
pub const REVIVE_HP: u32 = 50;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DamageOutcome {
    pub dealt: u32,
    pub lethal: bool,
}

/// Target defense plus the defense of a live defender, if one is assigned.
pub fn effective_defense(state: &BattleState, target: CharacterId) -> u32 {
    let Some(character) = state.get(target) else {
        return 0;
    };
    let bonus = character
        .status
        .defended_by
        .and_then(|id| state.get(id))
        .filter(|defender| defender.is_alive())
        .map_or(0, |defender| defender.defense);
    character.defense.saturating_add(bonus)
}

/// Mitigated damage: `max(1, raw - effective_defense)`.
pub fn apply_damage(state: &mut BattleState, target: CharacterId, raw: u32) -> DamageOutcome {
    let dealt = raw.saturating_sub(effective_defense(state, target)).max(1);
    deal_unmitigated(state, target, dealt)
}

/// Subtracts `amount` as-is. Used for boss specials, which compute their own mitigation.
pub fn deal_unmitigated(
    state: &mut BattleState,
    target: CharacterId,
    amount: u32,
) -> DamageOutcome {
    let Some(character) = state.get_mut(target) else {
        return DamageOutcome {
            dealt: 0,
            lethal: false,
        };
    };
    if !character.is_alive() {
        return DamageOutcome {
            dealt: 0,
            lethal: false,
        };
    }
    let dealt = amount.min(character.hp);
    character.hp -= dealt;
    let lethal = character.hp == 0;
    if lethal {
        character.status.taunted_by = None;
        character.status.defended_by = None;
    }
    DamageOutcome {
        dealt: amount,
        lethal,
    }
}

/// Returns the HP actually restored.
pub fn heal(character: &mut Character, amount: u32) -> u32 {
    let before = character.hp;
    character.hp = character.hp.saturating_add(amount).min(character.max_hp);
    character.hp - before
}

pub fn restore_mana(character: &mut Character, amount: u32) -> u32 {
    let before = character.mp;
    character.mp = character.mp.saturating_add(amount).min(character.max_mp);
    character.mp - before
}

pub fn spend_mana(character: &mut Character, amount: u32) {
    character.mp = character.mp.saturating_sub(amount);
}

/// Brings a fallen character back. Living characters are left untouched; callers reject
/// them before getting here.
pub fn revive(character: &mut Character) -> bool {
    if character.is_alive() {
        return false;
    }
    character.hp = REVIVE_HP.min(character.max_hp);
    character.status.clear();
    true
}
