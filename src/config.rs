use serde::Deserialize;

/// Engine tunables. Missing keys in a roster file fall back to the defaults below.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub max_rounds: u32,
    pub max_heroes: usize,
    pub max_enemies: usize,
    /// Pause hint, in milliseconds, handed back after each enemy turn.
    pub enemy_delay_ms: u64,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: 50,
            max_heroes: 4,
            max_enemies: 3,
            enemy_delay_ms: 700,
            seed: 0,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
