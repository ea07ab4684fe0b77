//! User domain types.

use serde::{Deserialize, Serialize};

/// Caller permission level as injected by the gateway.
///
/// Wire format: `u8` (0 = Member, 1 = Support, 2 = Admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Member = 0,
    Support = 1,
    Admin = 2,
}

impl UserRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Member),
            1 => Some(Self::Support),
            2 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this role meets `required`. Unknown wire values never do.
    pub fn allows(raw: u8, required: Self) -> bool {
        Self::from_u8(raw).is_some_and(|role| role >= required)
    }
}
