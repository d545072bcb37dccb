use serde_json::json;
use std::fmt;

type Listener = Box<dyn FnMut(&str) + Send>;

/// Narration for one battle. Every line is stored and forwarded once to the listener.
#[derive(Default)]
pub struct BattleLogger {
    log: Vec<String>,
    listener: Option<Listener>,
}

impl BattleLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listener(listener: impl FnMut(&str) + Send + 'static) -> Self {
        Self {
            log: Vec::new(),
            listener: Some(Box::new(listener)),
        }
    }

    pub fn set_listener(&mut self, listener: impl FnMut(&str) + Send + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        if let Some(listener) = self.listener.as_mut() {
            listener(&line);
        }
        self.log.push(line);
    }

    pub fn log_round(&mut self, round: u32) {
        self.log(format!("--- Round {round} ---"));
    }

    pub fn log_mana(&mut self, actor: &str, spent: u32, mp: u32, max_mp: u32) {
        self.log(format!("{actor} spends {spent} MP ({mp}/{max_mp})."));
    }

    pub fn log_attack(&mut self, actor: &str, target: &str, damage: u32, hp: u32, max_hp: u32) {
        self.log(format!(
            "{actor} attacks {target} for {damage} damage ({hp}/{max_hp})."
        ));
    }

    pub fn log_heal(&mut self, actor: &str, target: &str, healed: u32, hp: u32, max_hp: u32) {
        self.log(format!(
            "{actor} heals {target} for {healed} HP ({hp}/{max_hp})."
        ));
    }

    pub fn log_death(&mut self, name: &str) {
        self.log(format!("{name} has fallen!"));
    }

    pub fn log_skip(&mut self, name: &str) {
        self.log(format!("{name} cannot act this turn."));
    }

    pub fn log_win(&mut self, winner: &str) {
        self.log(format!("{winner} win the battle!"));
    }

    pub fn log_draw(&mut self, rounds: u32) {
        self.log(format!("The battle ends in a draw after {rounds} rounds."));
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "log": self.log,
        })
    }
}

impl fmt::Debug for BattleLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleLogger")
            .field("log", &self.log)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}
