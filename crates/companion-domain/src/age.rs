//! Age classification from a self-reported date of birth.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Youngest age allowed to use the product at all.
pub const MIN_PRODUCT_AGE: u32 = 16;

/// Age at which a user is treated as an adult.
pub const ADULT_AGE: u32 = 18;

/// Age tier derived from a user's age in whole years.
///
/// Wire format: `"minor"` (< 16), `"teen"` (16-17), `"adult"` (18+).
/// Variants are declared in ascending age order so `Ord` follows age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeTier {
    Minor,
    Teen,
    Adult,
}

impl AgeTier {
    pub fn from_age(age: u32) -> Self {
        if age >= ADULT_AGE {
            Self::Adult
        } else if age >= MIN_PRODUCT_AGE {
            Self::Teen
        } else {
            Self::Minor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Teen => "teen",
            Self::Adult => "adult",
        }
    }

    pub fn is_minor(self) -> bool {
        self == Self::Minor
    }

    pub fn is_teen(self) -> bool {
        self == Self::Teen
    }

    pub fn is_adult(self) -> bool {
        self == Self::Adult
    }
}

impl fmt::Display for AgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown tier string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown age tier: {0}")]
pub struct UnknownAgeTier(pub String);

impl FromStr for AgeTier {
    type Err = UnknownAgeTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minor" => Ok(Self::Minor),
            "teen" => Ok(Self::Teen),
            "adult" => Ok(Self::Adult),
            other => Err(UnknownAgeTier(other.to_owned())),
        }
    }
}

/// Age in whole years together with its tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeProfile {
    pub age: u32,
    pub tier: AgeTier,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgeError {
    #[error("date of birth {date_of_birth} is after {today}")]
    InvalidInput {
        date_of_birth: NaiveDate,
        today: NaiveDate,
    },
}

/// Classify a date of birth as of `today`.
///
/// Age counts whole years: one is subtracted while this year's birthday is
/// still ahead. A 29 February birthday therefore rolls over on 1 March in
/// non-leap years.
pub fn classify(date_of_birth: NaiveDate, today: NaiveDate) -> Result<AgeProfile, AgeError> {
    if date_of_birth > today {
        return Err(AgeError::InvalidInput {
            date_of_birth,
            today,
        });
    }
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    // dob <= today keeps `years` non-negative.
    let age = years.max(0) as u32;
    Ok(AgeProfile {
        age,
        tier: AgeTier::from_age(age),
    })
}
