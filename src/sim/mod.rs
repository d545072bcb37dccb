pub mod actions;
pub mod ai;
pub mod battle;
pub mod character;
pub mod stats;
pub mod status;
pub mod turn_order;

pub use character::{Attributes, Character, CharacterId, ClassKind, Side};
