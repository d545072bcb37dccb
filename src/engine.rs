//! Turn-by-turn battle engine.
//!
//! The engine is a suspendable state machine. [`BattleEngine::step`] advances until
//! something observable happens: an enemy acted, a character lost its turn, a hero is
//! waiting for orders, or the battle is over. Hero turns stay pending until the caller
//! submits an action that the resolver accepts.

use crate::battle_logger::BattleLogger;
use crate::config::EngineConfig;
use crate::error::{Rejection, SetupError};
use crate::sim::actions::{self, ActionKind, Applied, TargetKind};
use crate::sim::ai::{self, EnemyAi, HeroPolicy, RandomTargetAi};
use crate::sim::battle::{BattleState, Outcome};
use crate::sim::character::{Character, CharacterId, Role, Side};
use crate::sim::{status, turn_order};
use std::time::Duration;
use tracing::{info, warn};

/// Observable result of [`BattleEngine::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// A hero is waiting for an action.
    HeroTurn { hero: CharacterId },
    /// An enemy turn was applied. `delay` is a presentation hint only.
    EnemyActed {
        actor: CharacterId,
        applied: Applied,
        delay: Duration,
    },
    /// The actor was asleep or paralyzed.
    TurnLost { actor: CharacterId },
    Finished(Outcome),
}

/// Targets offered after [`BattleEngine::begin_action`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetRequest {
    pub hero: CharacterId,
    pub action: ActionKind,
    pub kind: TargetKind,
    pub candidates: Vec<(usize, String)>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    RoundStart,
    ActorTurn,
    AwaitingAction { hero: CharacterId },
    AwaitingTarget { hero: CharacterId, action: ActionKind },
    Over,
}

pub struct BattleEngine {
    state: BattleState,
    logger: BattleLogger,
    ai: Box<dyn EnemyAi + Send>,
    config: EngineConfig,
    phase: Phase,
}

impl BattleEngine {
    /// Create an engine from two rosters. Heroes go first on speed ties.
    pub fn new(
        heroes: Vec<Character>,
        enemies: Vec<Character>,
        config: EngineConfig,
    ) -> Result<Self, SetupError> {
        check_roster(&heroes, Side::Heroes, config.max_heroes)?;
        check_roster(&enemies, Side::Enemies, config.max_enemies)?;
        let ai = Box::new(RandomTargetAi::new(config.seed));
        Ok(Self {
            state: BattleState::new(heroes, enemies),
            logger: BattleLogger::new(),
            ai,
            config,
            phase: Phase::RoundStart,
        })
    }

    /// Forward every narration line to `listener` as it is produced.
    pub fn with_listener(mut self, listener: impl FnMut(&str) + Send + 'static) -> Self {
        self.logger.set_listener(listener);
        self
    }

    /// Replace the default random-target enemy AI.
    pub fn with_ai(mut self, ai: impl EnemyAi + Send + 'static) -> Self {
        self.ai = Box::new(ai);
        self
    }

    /// Advance to the next observable event.
    pub fn step(&mut self) -> Step {
        loop {
            match self.phase {
                Phase::Over => {
                    return Step::Finished(self.state.outcome.unwrap_or(Outcome::Draw));
                }
                Phase::AwaitingAction { hero } | Phase::AwaitingTarget { hero, .. } => {
                    return Step::HeroTurn { hero };
                }
                Phase::RoundStart => self.start_round(),
                Phase::ActorTurn => {
                    if let Some(step) = self.actor_turn() {
                        return step;
                    }
                }
            }
        }
    }

    /// Step until a hero needs orders or the battle ends.
    pub fn run_until_input(&mut self) -> Step {
        loop {
            match self.step() {
                step @ (Step::HeroTurn { .. } | Step::Finished(_)) => return step,
                _ => {}
            }
        }
    }

    fn start_round(&mut self) {
        self.state.round += 1;
        if self.state.round > self.config.max_rounds {
            self.state.outcome = Some(Outcome::Draw);
            self.logger.log_draw(self.config.max_rounds);
            info!(rounds = self.config.max_rounds, "round limit reached, draw");
            self.phase = Phase::Over;
            return;
        }
        self.state.turn_order = turn_order::compute_turn_order(&self.state);
        self.state.current_index = 0;
        self.logger.log_round(self.state.round);
        info!(round = self.state.round, actors = self.state.turn_order.len(), "round start");
        self.phase = Phase::ActorTurn;
    }

    fn actor_turn(&mut self) -> Option<Step> {
        let Some(actor) = self.state.current_actor() else {
            self.phase = Phase::RoundStart;
            return None;
        };
        if !self.state.is_alive(actor) {
            self.advance();
            return None;
        }
        let may_act = self
            .state
            .get_mut(actor)
            .map(status::can_act)
            .unwrap_or(false);
        if !may_act {
            let name = self.state.name_of(actor).to_string();
            self.logger.log_skip(&name);
            self.end_turn();
            return Some(Step::TurnLost { actor });
        }
        if actor.side == Side::Heroes {
            self.phase = Phase::AwaitingAction { hero: actor };
            return Some(Step::HeroTurn { hero: actor });
        }
        match ai::run_enemy_turn(self.ai.as_mut(), &mut self.state, &mut self.logger, actor) {
            Ok(applied) => {
                self.end_turn();
                Some(Step::EnemyActed {
                    actor,
                    applied,
                    delay: Duration::from_millis(self.config.enemy_delay_ms),
                })
            }
            Err(rejection) => {
                // An injected AI asked for something illegal; the enemy forfeits the turn.
                warn!(?actor, %rejection, "enemy action rejected");
                self.logger.log_skip(self.state.name_of(actor));
                self.end_turn();
                Some(Step::TurnLost { actor })
            }
        }
    }

    fn end_turn(&mut self) {
        if let Some(outcome) = self.state.check_victory() {
            match outcome.winner() {
                Some(Side::Heroes) => self.logger.log_win("Heroes"),
                Some(Side::Enemies) => self.logger.log_win("Enemies"),
                None => self.logger.log_draw(self.state.round),
            }
            info!(?outcome, round = self.state.round, "battle over");
            self.phase = Phase::Over;
            return;
        }
        self.advance();
    }

    fn advance(&mut self) {
        self.state.current_index += 1;
        self.phase = if self.state.current_index >= self.state.turn_order.len() {
            Phase::RoundStart
        } else {
            Phase::ActorTurn
        };
    }

    fn pending_hero(&self) -> Result<CharacterId, Rejection> {
        match self.phase {
            Phase::AwaitingAction { hero } | Phase::AwaitingTarget { hero, .. } => Ok(hero),
            _ => Err(Rejection::EngineMisuse("no hero is waiting for an action".into())),
        }
    }

    /// Start a two-phase action: checks the class may use it and lists the targets.
    pub fn begin_action(&mut self, action: ActionKind) -> Result<TargetRequest, Rejection> {
        let hero = self.pending_hero()?;
        let character = self
            .state
            .get(hero)
            .ok_or_else(|| Rejection::EngineMisuse(format!("no hero at {}", hero.index)))?;
        if !actions::can_use(character.class, action) {
            return Err(Rejection::IneligibleClass {
                actor: character.name.clone(),
                class: character.class,
                action,
            });
        }
        let kind = action.target_kind();
        let candidates = match kind {
            TargetKind::None | TargetKind::SelfOnly => Vec::new(),
            TargetKind::LiveOpponent => self.list_live_targets(Side::Enemies),
            TargetKind::LiveAlly => self.list_live_targets(Side::Heroes),
            TargetKind::OtherLiveAlly => self
                .list_live_targets(Side::Heroes)
                .into_iter()
                .filter(|(index, _)| *index != hero.index)
                .collect(),
            TargetKind::FallenAlly => self.list_fallen_allies(),
        };
        self.phase = Phase::AwaitingTarget { hero, action };
        Ok(TargetRequest {
            hero,
            action,
            kind,
            candidates,
        })
    }

    /// Abandon the action started with [`begin_action`](Self::begin_action). The same hero
    /// keeps the turn.
    pub fn cancel_action(&mut self) -> Result<(), Rejection> {
        match self.phase {
            Phase::AwaitingTarget { hero, .. } => {
                self.phase = Phase::AwaitingAction { hero };
                Ok(())
            }
            _ => Err(Rejection::EngineMisuse("no action to cancel".into())),
        }
    }

    /// Finish the pending two-phase action.
    pub fn choose_target(&mut self, target_index: Option<usize>) -> Result<Applied, Rejection> {
        let Phase::AwaitingTarget { hero, action } = self.phase else {
            return Err(Rejection::EngineMisuse("no action is waiting for a target".into()));
        };
        self.apply_hero_action(hero, action, target_index)
    }

    /// One-shot submission for the hero whose turn is pending.
    pub fn submit_action(
        &mut self,
        action: ActionKind,
        actor: usize,
        target_index: Option<usize>,
    ) -> Result<Applied, Rejection> {
        let hero = self.pending_hero()?;
        if hero.index != actor {
            let name = self.state.name_of(CharacterId::hero(actor)).to_string();
            return Err(Rejection::EngineMisuse(format!(
                "it is not {name}'s turn"
            )));
        }
        self.apply_hero_action(hero, action, target_index)
    }

    /// [`submit_action`](Self::submit_action) with a string action id such as `"heal"`.
    pub fn submit_action_id(
        &mut self,
        action_id: &str,
        actor: usize,
        target_index: Option<usize>,
    ) -> Result<Applied, Rejection> {
        let action = action_id
            .parse::<ActionKind>()
            .map_err(|id| Rejection::EngineMisuse(format!("unknown action '{id}'")))?;
        self.submit_action(action, actor, target_index)
    }

    fn apply_hero_action(
        &mut self,
        hero: CharacterId,
        action: ActionKind,
        target_index: Option<usize>,
    ) -> Result<Applied, Rejection> {
        let target = target_index.filter(|_| action.needs_target()).map(|index| {
            let side = match action.target_kind() {
                TargetKind::LiveOpponent => hero.side.opponent(),
                _ => hero.side,
            };
            CharacterId { side, index }
        });
        match actions::resolve(&mut self.state, &mut self.logger, hero, action, target) {
            Ok(applied) => {
                self.end_turn();
                Ok(applied)
            }
            Err(rejection) => {
                warn!(?hero, %action, %rejection, "hero action rejected");
                Err(rejection)
            }
        }
    }

    /// Names and speeds in acting order for the current round, or the order the next
    /// round would use before the battle starts.
    pub fn turn_order_preview(&self) -> Vec<(String, u32)> {
        let order = if self.state.turn_order.is_empty() {
            turn_order::compute_turn_order(&self.state)
        } else {
            self.state.turn_order.clone()
        };
        order
            .into_iter()
            .filter_map(|id| self.state.get(id))
            .filter(|c| c.is_alive())
            .map(|c| (c.name.clone(), c.speed))
            .collect()
    }

    pub fn available_actions(&self, hero: usize) -> Vec<ActionKind> {
        self.state
            .get(CharacterId::hero(hero))
            .map(|c| actions::capabilities(c.class).to_vec())
            .unwrap_or_default()
    }

    pub fn list_live_targets(&self, side: Side) -> Vec<(usize, String)> {
        self.named(self.state.living(side))
    }

    pub fn list_fallen_allies(&self) -> Vec<(usize, String)> {
        self.named(self.state.fallen(Side::Heroes))
    }

    fn named(&self, ids: Vec<CharacterId>) -> Vec<(usize, String)> {
        ids.into_iter()
            .map(|id| (id.index, self.state.name_of(id).to_string()))
            .collect()
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn logger(&self) -> &BattleLogger {
        &self.logger
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Over
    }

    /// Consume the engine and keep the final rosters.
    pub fn into_parts(self) -> (BattleState, BattleLogger) {
        (self.state, self.logger)
    }
}

fn check_roster(roster: &[Character], side: Side, capacity: usize) -> Result<(), SetupError> {
    if roster.is_empty() {
        return Err(SetupError::EmptyRoster(side));
    }
    if roster.len() > capacity {
        return Err(SetupError::RosterFull {
            side,
            capacity,
            len: roster.len(),
        });
    }
    for character in roster {
        let on_side = match side {
            Side::Heroes => character.role() == Role::Hero,
            Side::Enemies => character.role() != Role::Hero,
        };
        if !on_side {
            return Err(SetupError::MisplacedCharacter {
                name: character.name.clone(),
            });
        }
    }
    Ok(())
}

/// Drive a battle to the end, letting `policy` choose every hero action.
pub fn run_auto_battle(engine: &mut BattleEngine, policy: &mut dyn HeroPolicy) -> Outcome {
    loop {
        match engine.run_until_input() {
            Step::Finished(outcome) => return outcome,
            Step::HeroTurn { hero } => {
                let (action, target) = policy.choose(engine.state(), hero);
                let target_index = target.map(|id| id.index);
                if engine.submit_action(action, hero.index, target_index).is_err() {
                    if let Err(rejection) = engine.submit_action(ActionKind::Pass, hero.index, None)
                    {
                        warn!(?hero, %rejection, "pass rejected, abandoning the battle");
                        return Outcome::Draw;
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::character::{Attributes, ClassKind};

    fn make_hero(hp: u32, speed: u32) -> Character {
        Character::hero("Aldor", ClassKind::Warrior, Attributes::new(hp, 20, 100, 25, speed))
            .expect("valid warrior")
    }

    fn make_slime(hp: u32, speed: u32) -> Character {
        Character::enemy("Slime", ClassKind::Slime, Attributes::new(hp, 0, 10, 2, speed))
            .expect("valid slime")
    }

    #[test]
    fn empty_and_oversized_rosters_are_refused() {
        let err = BattleEngine::new(Vec::new(), vec![make_slime(10, 5)], EngineConfig::default())
            .err()
            .expect("no heroes");
        assert_eq!(err, SetupError::EmptyRoster(Side::Heroes));

        let enemies = vec![make_slime(10, 5); 4];
        let err = BattleEngine::new(vec![make_hero(100, 10)], enemies, EngineConfig::default())
            .err()
            .expect("too many enemies");
        assert!(matches!(err, SetupError::RosterFull { len: 4, .. }));
    }

    #[test]
    fn heroes_cannot_stand_with_the_enemies() {
        let err = BattleEngine::new(
            vec![make_hero(100, 10)],
            vec![make_hero(100, 10)],
            EngineConfig::default(),
        )
        .err()
        .expect("misplaced hero");
        assert!(matches!(err, SetupError::MisplacedCharacter { .. }));
    }

    #[test]
    fn engine_suspends_on_hero_turn_until_an_action_lands() {
        let mut engine = BattleEngine::new(
            vec![make_hero(100, 20)],
            vec![make_slime(50, 5)],
            EngineConfig::default(),
        )
        .expect("valid engine");
        let hero = CharacterId::hero(0);
        assert_eq!(engine.step(), Step::HeroTurn { hero });
        assert_eq!(engine.step(), Step::HeroTurn { hero });

        let request = engine.begin_action(ActionKind::Attack).expect("warrior attacks");
        assert_eq!(request.candidates, vec![(0, "Slime".to_string())]);
        engine.cancel_action().expect("cancel");
        assert_eq!(engine.step(), Step::HeroTurn { hero });

        engine.begin_action(ActionKind::Attack).expect("warrior attacks");
        engine.choose_target(Some(0)).expect("attack lands");
        assert_eq!(engine.step(), Step::Finished(Outcome::HeroesWin));
    }

    #[test]
    fn round_limit_ends_in_a_draw() {
        let config = EngineConfig {
            max_rounds: 2,
            ..EngineConfig::default()
        };
        let mut engine = BattleEngine::new(
            vec![make_hero(100, 20)],
            vec![make_slime(50, 5)],
            config,
        )
        .expect("valid engine");
        for _ in 0..2 {
            assert!(matches!(engine.run_until_input(), Step::HeroTurn { .. }));
            engine.submit_action(ActionKind::Pass, 0, None).expect("pass");
        }
        assert_eq!(engine.run_until_input(), Step::Finished(Outcome::Draw));
        assert_eq!(engine.state().round, 3);
    }
}
