use crate::error::SetupError;
use std::fmt;
use std::str::FromStr;

/// Which roster a character belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Side {
    Heroes,
    Enemies,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Heroes => Side::Enemies,
            Side::Enemies => Side::Heroes,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Heroes => f.write_str("hero"),
            Side::Enemies => f.write_str("enemy"),
        }
    }
}

/// Stable identity of a character: its roster and slot. Relations between characters
/// (taunt, defense) are stored as ids, never as owned values.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct CharacterId {
    pub side: Side,
    pub index: usize,
}

impl CharacterId {
    pub const fn hero(index: usize) -> Self {
        Self {
            side: Side::Heroes,
            index,
        }
    }

    pub const fn enemy(index: usize) -> Self {
        Self {
            side: Side::Enemies,
            index,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    Hero,
    Enemy,
    Boss,
}

impl Role {
    fn label(self) -> &'static str {
        match self {
            Role::Hero => "hero",
            Role::Enemy => "enemy",
            Role::Boss => "boss",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ClassKind {
    Warrior,
    Mage,
    Paladin,
    Druid,
    Slime,
    Golem,
    Undead,
    Dragon,
    Titan,
    Lich,
}

static CLASS_IDS: phf::Map<&'static str, ClassKind> = phf::phf_map! {
    "warrior" => ClassKind::Warrior,
    "mage" => ClassKind::Mage,
    "paladin" => ClassKind::Paladin,
    "druid" => ClassKind::Druid,
    "slime" => ClassKind::Slime,
    "golem" => ClassKind::Golem,
    "undead" => ClassKind::Undead,
    "dragon" => ClassKind::Dragon,
    "titan" => ClassKind::Titan,
    "lich" => ClassKind::Lich,
};

/// Inclusive creation bounds for one class.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClassBounds {
    pub hp: (u32, u32),
    pub mp: (u32, u32),
    pub attack: (u32, u32),
    pub defense: (u32, u32),
}

impl ClassKind {
    pub const ALL: [ClassKind; 10] = [
        ClassKind::Warrior,
        ClassKind::Mage,
        ClassKind::Paladin,
        ClassKind::Druid,
        ClassKind::Slime,
        ClassKind::Golem,
        ClassKind::Undead,
        ClassKind::Dragon,
        ClassKind::Titan,
        ClassKind::Lich,
    ];

    pub fn role(self) -> Role {
        match self {
            ClassKind::Warrior | ClassKind::Mage | ClassKind::Paladin | ClassKind::Druid => {
                Role::Hero
            }
            ClassKind::Slime | ClassKind::Golem | ClassKind::Undead | ClassKind::Dragon => {
                Role::Enemy
            }
            ClassKind::Titan | ClassKind::Lich => Role::Boss,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            ClassKind::Warrior => "warrior",
            ClassKind::Mage => "mage",
            ClassKind::Paladin => "paladin",
            ClassKind::Druid => "druid",
            ClassKind::Slime => "slime",
            ClassKind::Golem => "golem",
            ClassKind::Undead => "undead",
            ClassKind::Dragon => "dragon",
            ClassKind::Titan => "titan",
            ClassKind::Lich => "lich",
        }
    }

    pub fn bounds(self) -> ClassBounds {
        let (hp, mp, attack, defense) = match self {
            ClassKind::Warrior => ((40, 250), (0, 60), (15, 120), (20, 40)),
            ClassKind::Mage => ((60, 120), (100, 250), (30, 80), (10, 25)),
            ClassKind::Paladin => ((100, 200), (40, 120), (60, 130), (20, 35)),
            ClassKind::Druid => ((80, 150), (80, 180), (40, 100), (15, 30)),
            ClassKind::Slime => ((1, 60), (0, 10), (8, 25), (0, 8)),
            ClassKind::Golem => ((25, 200), (0, 20), (10, 60), (5, 40)),
            ClassKind::Undead => ((20, 150), (0, 40), (10, 50), (5, 25)),
            ClassKind::Dragon => ((150, 400), (20, 100), (40, 110), (20, 45)),
            ClassKind::Titan => ((300, 600), (0, 50), (50, 90), (25, 50)),
            ClassKind::Lich => ((250, 450), (100, 300), (40, 80), (15, 35)),
        };
        ClassBounds {
            hp,
            mp,
            attack,
            defense,
        }
    }

    /// Turns between boss specials. Zero for non-boss kinds.
    pub fn default_special_cooldown(self) -> u32 {
        match self {
            ClassKind::Titan => 3,
            ClassKind::Lich => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClassKind::Warrior => "Warrior",
            ClassKind::Mage => "Mage",
            ClassKind::Paladin => "Paladin",
            ClassKind::Druid => "Druid",
            ClassKind::Slime => "Slime",
            ClassKind::Golem => "Golem",
            ClassKind::Undead => "Undead",
            ClassKind::Dragon => "Dragon",
            ClassKind::Titan => "Titan",
            ClassKind::Lich => "Lich",
        };
        f.write_str(name)
    }
}

impl FromStr for ClassKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CLASS_IDS
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| s.to_string())
    }
}

/// Raw attributes handed over by a character factory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Attributes {
    pub hp: u32,
    pub mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl Attributes {
    pub const fn new(hp: u32, mp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        Self {
            hp,
            mp,
            attack,
            defense,
            speed,
        }
    }
}

/// Transient per-character state owned by the status-effect rules.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StatusState {
    pub taunted_by: Option<CharacterId>,
    pub defended_by: Option<CharacterId>,
    pub sleep_turns: u32,
    pub paralysis_turns: u32,
}

impl StatusState {
    pub fn clear(&mut self) {
        *self = StatusState::default();
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BossData {
    pub special_cooldown: u32,
    pub turns_until_special: u32,
}

impl BossData {
    pub fn new(special_cooldown: u32) -> Self {
        let special_cooldown = special_cooldown.max(1);
        Self {
            special_cooldown,
            turns_until_special: special_cooldown,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Character {
    pub name: String,
    pub class: ClassKind,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub status: StatusState,
    pub boss: Option<BossData>,
}

impl Character {
    pub fn hero(
        name: impl Into<String>,
        class: ClassKind,
        attrs: Attributes,
    ) -> Result<Self, SetupError> {
        Self::build(name.into(), class, Role::Hero, attrs, None)
    }

    pub fn enemy(
        name: impl Into<String>,
        class: ClassKind,
        attrs: Attributes,
    ) -> Result<Self, SetupError> {
        Self::build(name.into(), class, Role::Enemy, attrs, None)
    }

    /// Build a boss. `special_cooldown` falls back to the kind's default and is never
    /// below one turn.
    pub fn boss(
        name: impl Into<String>,
        class: ClassKind,
        attrs: Attributes,
        special_cooldown: Option<u32>,
    ) -> Result<Self, SetupError> {
        let cooldown = special_cooldown.unwrap_or_else(|| class.default_special_cooldown());
        Self::build(
            name.into(),
            class,
            Role::Boss,
            attrs,
            Some(BossData::new(cooldown)),
        )
    }

    /// Build from a class id, picking the constructor that matches the class role.
    pub fn from_class(
        name: impl Into<String>,
        class: ClassKind,
        attrs: Attributes,
        special_cooldown: Option<u32>,
    ) -> Result<Self, SetupError> {
        match class.role() {
            Role::Hero => Self::hero(name, class, attrs),
            Role::Enemy => Self::enemy(name, class, attrs),
            Role::Boss => Self::boss(name, class, attrs, special_cooldown),
        }
    }

    fn build(
        name: String,
        class: ClassKind,
        role: Role,
        attrs: Attributes,
        boss: Option<BossData>,
    ) -> Result<Self, SetupError> {
        if class.role() != role {
            return Err(SetupError::WrongRole {
                class,
                role: role.label(),
            });
        }
        let bounds = class.bounds();
        check_range(class, "hp", attrs.hp, bounds.hp)?;
        check_range(class, "mp", attrs.mp, bounds.mp)?;
        check_range(class, "attack", attrs.attack, bounds.attack)?;
        check_range(class, "defense", attrs.defense, bounds.defense)?;
        Ok(Self {
            name,
            class,
            hp: attrs.hp,
            max_hp: attrs.hp,
            mp: attrs.mp,
            max_mp: attrs.mp,
            attack: attrs.attack,
            defense: attrs.defense,
            speed: attrs.speed,
            status: StatusState::default(),
            boss,
        })
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn role(&self) -> Role {
        self.class.role()
    }
}

fn check_range(
    class: ClassKind,
    field: &'static str,
    value: u32,
    (min, max): (u32, u32),
) -> Result<(), SetupError> {
    if value < min || value > max {
        return Err(SetupError::InvalidAttributes {
            class,
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] HP: {}/{} | MP: {}/{} | ATK: {} | DEF: {} | SPD: {}",
            self.name,
            self.class,
            self.hp,
            self.max_hp,
            self.mp,
            self.max_mp,
            self.attack,
            self.defense,
            self.speed
        )
    }
}
