//! Error types for battle setup and action submission.

use crate::sim::actions::ActionKind;
use crate::sim::character::{ClassKind, Side};

/// Failures while building characters or an engine. Fatal to the thing being built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("{field} {value} outside the {class} range {min}-{max}")]
    InvalidAttributes {
        class: ClassKind,
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("{class} cannot be created as a {role}")]
    WrongRole { class: ClassKind, role: &'static str },

    #[error("the {0} roster is empty")]
    EmptyRoster(Side),

    #[error("the {side} roster holds at most {capacity} characters, got {len}")]
    RosterFull {
        side: Side,
        capacity: usize,
        len: usize,
    },

    #[error("{name} is on the wrong side of the battle")]
    MisplacedCharacter { name: String },
}

/// Reasons an action submission is refused. State is left untouched and the turn is not
/// consumed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("{actor} ({class}) cannot use {action}")]
    IneligibleClass {
        actor: String,
        class: ClassKind,
        action: ActionKind,
    },

    #[error("{actor} needs {required} MP for {action} but has {available}")]
    InsufficientMana {
        actor: String,
        action: ActionKind,
        required: u32,
        available: u32,
    },

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("engine misuse: {0}")]
    EngineMisuse(String),
}

/// Errors raised while turning a roster description into characters.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("unknown class '{0}'")]
    UnknownClass(String),

    #[error("{name}: {source}")]
    Character {
        name: String,
        #[source]
        source: SetupError,
    },
}
