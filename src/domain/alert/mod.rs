//! Alert domain - conditions and the cooldown gate

mod condition;
mod cooldown;

pub use condition::{Condition, ConditionSet, Direction};
pub use cooldown::CooldownGate;
