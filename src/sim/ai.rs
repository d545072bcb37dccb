use crate::battle_logger::BattleLogger;
use crate::error::Rejection;
use crate::sim::actions::{self, ActionKind, Applied, TargetKind};
use crate::sim::battle::BattleState;
use crate::sim::character::CharacterId;
use crate::sim::status;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// What an enemy does with its turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnemyMove {
    Attack(CharacterId),
    Special(CharacterId),
    Pass,
}

pub trait EnemyAi {
    fn choose(&mut self, state: &BattleState, actor: CharacterId) -> EnemyMove;
}

/// Attacks a random live opponent unless taunted; bosses fire their special whenever the
/// cooldown has run out.
pub struct RandomTargetAi {
    rng: SmallRng,
}

impl RandomTargetAi {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl EnemyAi for RandomTargetAi {
    fn choose(&mut self, state: &BattleState, actor: CharacterId) -> EnemyMove {
        let candidates = state.living(actor.side.opponent());
        let Some(&pick) = candidates.choose(&mut self.rng) else {
            return EnemyMove::Pass;
        };
        let special_ready = state
            .get(actor)
            .and_then(|c| c.boss.as_ref())
            .is_some_and(|boss| boss.turns_until_special == 0);
        if special_ready {
            return EnemyMove::Special(pick);
        }
        match status::select_target(state, actor, &[pick]) {
            Some(target) => EnemyMove::Attack(target),
            None => EnemyMove::Pass,
        }
    }
}

/// Runs one enemy turn: asks the AI, applies the move and moves the boss cooldown.
pub fn run_enemy_turn(
    ai: &mut dyn EnemyAi,
    state: &mut BattleState,
    logger: &mut BattleLogger,
    actor: CharacterId,
) -> Result<Applied, Rejection> {
    let chosen = ai.choose(state, actor);
    debug!(?actor, ?chosen, "enemy decision");
    let applied = match chosen {
        EnemyMove::Special(target) => {
            let applied = actions::boss_special(state, logger, actor, target)?;
            if let Some(boss) = state.get_mut(actor).and_then(|c| c.boss.as_mut()) {
                boss.turns_until_special = boss.special_cooldown;
            }
            return Ok(applied);
        }
        EnemyMove::Attack(target) => {
            actions::resolve(state, logger, actor, ActionKind::Attack, Some(target))?
        }
        EnemyMove::Pass => actions::resolve(state, logger, actor, ActionKind::Pass, None)?,
    };
    if let Some(boss) = state.get_mut(actor).and_then(|c| c.boss.as_mut()) {
        boss.turns_until_special = boss.turns_until_special.saturating_sub(1);
    }
    Ok(applied)
}

/// An action and the target it is aimed at, if any.
pub type Choice = (ActionKind, Option<CharacterId>);

/// Chooses actions for heroes when nobody is at the controls.
pub trait HeroPolicy {
    fn choose(&mut self, state: &BattleState, hero: CharacterId) -> Choice;
}

/// Every hero attacks the first live opponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstTargetPolicy;

impl HeroPolicy for FirstTargetPolicy {
    fn choose(&mut self, state: &BattleState, hero: CharacterId) -> Choice {
        match state.living(hero.side.opponent()).first() {
            Some(&target) => (ActionKind::Attack, Some(target)),
            None => (ActionKind::Pass, None),
        }
    }
}

/// Picks uniformly among every action and target the hero could legally submit.
pub struct RandomPolicy {
    rng: SmallRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl HeroPolicy for RandomPolicy {
    fn choose(&mut self, state: &BattleState, hero: CharacterId) -> Choice {
        let options = legal_moves(state, hero);
        options
            .choose(&mut self.rng)
            .copied()
            .unwrap_or((ActionKind::Pass, None))
    }
}

/// Every (action, target) pair that would pass validation right now.
pub fn legal_moves(state: &BattleState, actor: CharacterId) -> Vec<Choice> {
    let Some(character) = state.get(actor) else {
        return Vec::new();
    };
    let mut moves = Vec::new();
    for &action in actions::capabilities(character.class) {
        let targets: Vec<Option<CharacterId>> = match action.target_kind() {
            TargetKind::None | TargetKind::SelfOnly => vec![None],
            _ => state.ids().into_iter().map(Some).collect(),
        };
        for target in targets {
            if actions::validate(state, actor, action, target).is_ok() {
                moves.push((action, target));
            }
        }
    }
    moves
}
