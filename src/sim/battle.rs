use crate::sim::character::{Character, CharacterId, Side};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    HeroesWin,
    EnemiesWin,
    Draw,
}

impl Outcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::HeroesWin => Some(Side::Heroes),
            Outcome::EnemiesWin => Some(Side::Enemies),
            Outcome::Draw => None,
        }
    }
}

/// Both rosters plus the scheduler's bookkeeping.
#[derive(Clone, Debug)]
pub struct BattleState {
    pub heroes: Vec<Character>,
    pub enemies: Vec<Character>,
    pub turn_order: Vec<CharacterId>,
    pub current_index: usize,
    pub round: u32,
    pub outcome: Option<Outcome>,
}

impl BattleState {
    pub fn new(heroes: Vec<Character>, enemies: Vec<Character>) -> Self {
        Self {
            heroes,
            enemies,
            turn_order: Vec::new(),
            current_index: 0,
            round: 0,
            outcome: None,
        }
    }

    pub fn roster(&self, side: Side) -> &[Character] {
        match side {
            Side::Heroes => &self.heroes,
            Side::Enemies => &self.enemies,
        }
    }

    pub fn roster_mut(&mut self, side: Side) -> &mut Vec<Character> {
        match side {
            Side::Heroes => &mut self.heroes,
            Side::Enemies => &mut self.enemies,
        }
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.roster(id.side).get(id.index)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.roster_mut(id.side).get_mut(id.index)
    }

    pub fn name_of(&self, id: CharacterId) -> &str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or("?")
    }

    pub fn is_alive(&self, id: CharacterId) -> bool {
        self.get(id).is_some_and(Character::is_alive)
    }

    /// Every slot of both rosters, heroes first, in roster order.
    pub fn ids(&self) -> Vec<CharacterId> {
        let heroes = (0..self.heroes.len()).map(CharacterId::hero);
        let enemies = (0..self.enemies.len()).map(CharacterId::enemy);
        heroes.chain(enemies).collect()
    }

    pub fn living(&self, side: Side) -> Vec<CharacterId> {
        self.slots(side, true)
    }

    pub fn fallen(&self, side: Side) -> Vec<CharacterId> {
        self.slots(side, false)
    }

    fn slots(&self, side: Side, alive: bool) -> Vec<CharacterId> {
        self.roster(side)
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive() == alive)
            .map(|(index, _)| CharacterId { side, index })
            .collect()
    }

    pub fn any_alive(&self, side: Side) -> bool {
        self.roster(side).iter().any(Character::is_alive)
    }

    /// Marks the battle finished when one side has no living member. Returns the outcome
    /// once the battle is over.
    pub fn check_victory(&mut self) -> Option<Outcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        if !self.any_alive(Side::Heroes) {
            self.outcome = Some(Outcome::EnemiesWin);
        } else if !self.any_alive(Side::Enemies) {
            self.outcome = Some(Outcome::HeroesWin);
        }
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn winner(&self) -> Option<Side> {
        self.outcome.and_then(Outcome::winner)
    }

    pub fn current_actor(&self) -> Option<CharacterId> {
        self.turn_order.get(self.current_index).copied()
    }
}
