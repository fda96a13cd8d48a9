//! The workload classification scale and its display attributes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

// ─── ActivityWeight ──────────────────────────────────────────────────────────

/// Five-level workload classification, ordered from no activity upwards.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Default,
  Serialize,
  Deserialize,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityWeight {
  #[default]
  Empty,
  Light,
  Medium,
  Heavy,
  Significant,
}

impl ActivityWeight {
  pub const COUNT: usize = 5;

  /// Every weight, lightest first.
  pub const ALL: [ActivityWeight; Self::COUNT] = [
    Self::Empty,
    Self::Light,
    Self::Medium,
    Self::Heavy,
    Self::Significant,
  ];

  pub fn as_str(self) -> &'static str { self.into() }

  pub fn label(self) -> &'static str {
    match self {
      Self::Empty => "Clear",
      Self::Light => "Light",
      Self::Medium => "Medium",
      Self::Heavy => "Heavy",
      Self::Significant => "Significant",
    }
  }

  /// Reference breakpoint restored by a threshold reset.
  pub fn default_value(self) -> u32 {
    match self {
      Self::Empty => 0,
      Self::Light => 1,
      Self::Medium => 5,
      Self::Heavy => 10,
      Self::Significant => 14,
    }
  }

  pub fn default_colour(self) -> Colour {
    let hex = match self {
      Self::Empty => "#8E8E93",
      Self::Light => "#34C759",
      Self::Medium => "#FFCC00",
      Self::Heavy => "#FF9500",
      Self::Significant => "#FF3B30",
    };
    Colour(hex.to_owned())
  }

  /// Whether a user may change this weight's breakpoint.
  pub fn is_editable(self) -> bool { self != Self::Empty }
}

impl fmt::Display for ActivityWeight {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Case-insensitive parse that reports a domain error.
pub fn parse_weight(s: &str) -> Result<ActivityWeight> {
  ActivityWeight::from_str(&s.to_ascii_lowercase())
    .map_err(|_| Error::UnknownWeight(s.to_owned()))
}

// ─── Colour ──────────────────────────────────────────────────────────────────

/// A display colour in `#RRGGBB` form, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour(String);

impl Colour {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl FromStr for Colour {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let digits = s
      .strip_prefix('#')
      .ok_or_else(|| Error::InvalidColour(s.to_owned()))?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(Error::InvalidColour(s.to_owned()));
    }
    Ok(Self(format!("#{}", digits.to_ascii_uppercase())))
  }
}

impl TryFrom<String> for Colour {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { value.parse() }
}

impl From<Colour> for String {
  fn from(c: Colour) -> Self { c.0 }
}

impl fmt::Display for Colour {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── ScoreBands ──────────────────────────────────────────────────────────────

/// Lower bounds of the upper three bands. A score of zero is always
/// [`ActivityWeight::Empty`]; anything between zero and `medium` is
/// [`ActivityWeight::Light`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBands {
  pub medium:      u64,
  pub heavy:       u64,
  pub significant: u64,
}

impl Default for ScoreBands {
  fn default() -> Self { Self { medium: 5, heavy: 10, significant: 14 } }
}

impl ScoreBands {
  pub fn validate(&self) -> Result<()> {
    if 0 < self.medium && self.medium < self.heavy && self.heavy < self.significant {
      Ok(())
    } else {
      Err(Error::InvalidBands)
    }
  }

  /// Map a score onto the scale. Pure; same score, same weight.
  pub fn classify(&self, score: u64) -> ActivityWeight {
    match score {
      0 => ActivityWeight::Empty,
      s if s < self.medium => ActivityWeight::Light,
      s if s < self.heavy => ActivityWeight::Medium,
      s if s < self.significant => ActivityWeight::Heavy,
      _ => ActivityWeight::Significant,
    }
  }
}
