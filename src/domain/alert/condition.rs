//! Threshold conditions and the ordered set being watched

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Above => f.write_str("above"),
            Direction::Below => f.write_str("below"),
        }
    }
}

/// A price threshold with a direction. `price == target_price` meets both directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub target_price: f64,
    pub direction: Direction,
}

impl Condition {
    pub fn above(target_price: f64) -> Self {
        Self {
            target_price,
            direction: Direction::Above,
        }
    }

    pub fn below(target_price: f64) -> Self {
        Self {
            target_price,
            direction: Direction::Below,
        }
    }

    pub fn is_met(&self, price: f64) -> bool {
        match self.direction {
            Direction::Above => price >= self.target_price,
            Direction::Below => price <= self.target_price,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price {} ${}", self.direction, self.target_price)
    }
}

/// Parses `above:80` or `below:0.000001`.
impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (direction, target) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid condition '{}' (expected above:PRICE or below:PRICE)", s))?;

        let target_price: f64 = target
            .trim()
            .parse()
            .map_err(|e| format!("invalid target price '{}': {}", target.trim(), e))?;
        if !target_price.is_finite() {
            return Err(format!("target price must be finite, got {}", target_price));
        }

        match direction.trim().to_ascii_lowercase().as_str() {
            "above" => Ok(Condition::above(target_price)),
            "below" => Ok(Condition::below(target_price)),
            other => Err(format!("condition direction must be 'above' or 'below', got '{}'", other)),
        }
    }
}

/// Ordered conditions. Each is evaluated independently; order is the configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionSet {
    conditions: Vec<Condition>,
}

impl ConditionSet {
    pub fn new(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Conditions met at `price`, in configuration order.
    pub fn evaluate(&self, price: f64) -> Vec<Condition> {
        self.conditions
            .iter()
            .filter(|c| c.is_met(price))
            .copied()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl From<Condition> for ConditionSet {
    fn from(condition: Condition) -> Self {
        Self::new([condition])
    }
}

impl From<Vec<Condition>> for ConditionSet {
    fn from(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }
}
