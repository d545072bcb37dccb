use crate::config::EngineConfig;
use crate::error::RosterError;
use crate::sim::character::{Attributes, Character, ClassKind};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterSpec {
    pub name: String,
    pub class: String,
    pub hp: u32,
    pub mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    #[serde(default)]
    pub special_cooldown: Option<u32>,
}

impl CharacterSpec {
    pub fn build(&self) -> Result<Character, RosterError> {
        let class: ClassKind = self
            .class
            .parse()
            .map_err(RosterError::UnknownClass)?;
        let attrs = Attributes::new(self.hp, self.mp, self.attack, self.defense, self.speed);
        Character::from_class(self.name.clone(), class, attrs, self.special_cooldown).map_err(
            |source| RosterError::Character {
                name: self.name.clone(),
                source,
            },
        )
    }
}

/// A battle described as JSON: both rosters plus optional engine settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterFile {
    pub heroes: Vec<CharacterSpec>,
    pub enemies: Vec<CharacterSpec>,
    #[serde(default)]
    pub config: EngineConfig,
    /// Extra enemy rosters fought after `enemies` in campaign mode.
    #[serde(default)]
    pub waves: Vec<Vec<CharacterSpec>>,
    /// Campaign bosses, one per wave in rotation.
    #[serde(default)]
    pub bosses: Vec<CharacterSpec>,
}

impl RosterFile {
    pub fn build_heroes(&self) -> Result<Vec<Character>, RosterError> {
        build_all(&self.heroes)
    }

    pub fn build_enemies(&self) -> Result<Vec<Character>, RosterError> {
        build_all(&self.enemies)
    }

    /// `enemies` followed by every extra wave.
    pub fn build_waves(&self) -> Result<Vec<Vec<Character>>, RosterError> {
        std::iter::once(&self.enemies)
            .chain(self.waves.iter())
            .map(|wave| build_all(wave))
            .collect()
    }

    pub fn build_bosses(&self) -> Result<Vec<Character>, RosterError> {
        build_all(&self.bosses)
    }
}

fn build_all(specs: &[CharacterSpec]) -> Result<Vec<Character>, RosterError> {
    specs.iter().map(CharacterSpec::build).collect()
}
