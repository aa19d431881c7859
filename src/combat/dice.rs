//! Damage and roll expressions: flat constants ("3", "-1") or dice notation ("2d6", "1d8+2", "d4-1").
//!
//! Expressions are parsed once when the configuration is loaded; rolling a parsed
//! [DiceExpr] never fails.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::combat::rng::DieRoller;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("empty dice expression")]
    Empty,
    #[error("malformed dice expression '{0}'")]
    Malformed(String),
    #[error("dice expression '{0}' rolls zero dice")]
    ZeroCount(String),
    #[error("dice expression '{0}' uses a zero-sided die")]
    ZeroSides(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiceExpr {
    Constant(i32),
    Dice { count: u32, sides: u32, modifier: i32 },
}

impl DiceExpr {
    pub const ZERO: DiceExpr = DiceExpr::Constant(0);

    pub const fn dice(count: u32, sides: u32) -> Self {
        DiceExpr::Dice {
            count,
            sides,
            modifier: 0,
        }
    }

    pub fn roll<R: DieRoller + ?Sized>(&self, rng: &mut R) -> i32 {
        match *self {
            DiceExpr::Constant(value) => value,
            DiceExpr::Dice {
                count,
                sides,
                modifier,
            } => {
                let sum: i64 = (0..count).map(|_| i64::from(rng.roll_die(sides))).sum();
                (sum + i64::from(modifier)).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
            }
        }
    }

    /// Smallest and largest value this expression can produce.
    pub fn bounds(&self) -> (i64, i64) {
        match *self {
            DiceExpr::Constant(value) => (i64::from(value), i64::from(value)),
            DiceExpr::Dice {
                count,
                sides,
                modifier,
            } => {
                let modifier = i64::from(modifier);
                (
                    i64::from(count) + modifier,
                    i64::from(count) * i64::from(sides) + modifier,
                )
            }
        }
    }
}

impl Default for DiceExpr {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for DiceExpr {
    type Err = DiceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DiceError::Empty);
        }
        if let Ok(value) = trimmed.parse::<i32>() {
            return Ok(DiceExpr::Constant(value));
        }

        let malformed = || DiceError::Malformed(trimmed.to_string());
        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        let (count_part, rest) = compact
            .split_once(['d', 'D'])
            .ok_or_else(malformed)?;

        let (sides_part, modifier) = match rest.find(['+', '-']) {
            Some(at) => {
                let (sides, signed) = rest.split_at(at);
                let digits = &signed[1..];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed());
                }
                let value: i32 = signed.parse().map_err(|_| malformed())?;
                (sides, value)
            }
            None => (rest, 0),
        };

        let count = if count_part.is_empty() {
            1
        } else {
            parse_unsigned(count_part).ok_or_else(malformed)?
        };
        let sides = parse_unsigned(sides_part).ok_or_else(malformed)?;

        if count == 0 {
            return Err(DiceError::ZeroCount(trimmed.to_string()));
        }
        if sides == 0 {
            return Err(DiceError::ZeroSides(trimmed.to_string()));
        }
        Ok(DiceExpr::Dice {
            count,
            sides,
            modifier,
        })
    }
}

fn parse_unsigned(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DiceExpr::Constant(value) => write!(f, "{value}"),
            DiceExpr::Dice {
                count,
                sides,
                modifier,
            } => {
                write!(f, "{count}d{sides}")?;
                match modifier {
                    0 => Ok(()),
                    m if m > 0 => write!(f, "+{m}"),
                    m => write!(f, "{m}"),
                }
            }
        }
    }
}

/// Parse and roll `expr` in one step.
pub fn evaluate<R: DieRoller + ?Sized>(expr: &str, rng: &mut R) -> Result<i32, DiceError> {
    let parsed: DiceExpr = expr.parse()?;
    Ok(parsed.roll(rng))
}

impl Serialize for DiceExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            DiceExpr::Constant(value) => serializer.serialize_i32(value),
            DiceExpr::Dice { .. } => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for DiceExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DiceExprVisitor;

        impl<'de> Visitor<'de> for DiceExprVisitor {
            type Value = DiceExpr;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer or a dice expression such as \"2d6+1\"")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<DiceExpr, E> {
                i32::try_from(value)
                    .map(DiceExpr::Constant)
                    .map_err(|_| E::custom(format!("constant {value} is out of range")))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<DiceExpr, E> {
                i32::try_from(value)
                    .map(DiceExpr::Constant)
                    .map_err(|_| E::custom(format!("constant {value} is out of range")))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<DiceExpr, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DiceExprVisitor)
    }
}
