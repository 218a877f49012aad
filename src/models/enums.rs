//! Status and classification vocabularies shared with the remote gym API

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use utoipa::ToSchema;

/// A status name that does not belong to the expected vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {vocabulary} value '{value}'")]
pub struct UnknownVariant {
    pub vocabulary: &'static str,
    pub value: String,
}

/// Wire names are the upper-case names used by the remote API. Parsing
/// ignores case and surrounding whitespace.
macro_rules! wire_enum {
    ($name:ident, $vocabulary:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(UnknownVariant {
                        vocabulary: $vocabulary,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Operational status of a piece of equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    Available,
    Unavailable,
    UnderMaintenance,
    OutOfOrder,
}

wire_enum!(EquipmentStatus, "equipment status", {
    Available => "AVAILABLE",
    Unavailable => "UNAVAILABLE",
    UnderMaintenance => "UNDER_MAINTENANCE",
    OutOfOrder => "OUT_OF_ORDER",
});

// ---------------------------------------------------------------------------
// MaintenanceStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a maintenance schedule
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaintenanceStatus {
    #[default]
    Scheduled,
    /// Serialized as `INPROGRESS` (no underscore), as the backend does
    InProgress,
    Completed,
    Canceled,
}

wire_enum!(MaintenanceStatus, "maintenance status", {
    Scheduled => "SCHEDULED",
    InProgress => "INPROGRESS",
    Completed => "COMPLETED",
    Canceled => "CANCELED",
});

// ---------------------------------------------------------------------------
// TicketStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a support ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

wire_enum!(TicketStatus, "ticket status", {
    Open => "OPEN",
    InProgress => "IN_PROGRESS",
    Resolved => "RESOLVED",
    Closed => "CLOSED",
});

// ---------------------------------------------------------------------------
// TicketPriority
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
}

wire_enum!(TicketPriority, "ticket priority", {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
});

// ---------------------------------------------------------------------------
// RaisedByType
// ---------------------------------------------------------------------------

/// Who opened a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RaisedByType {
    Staff,
    Member,
}

wire_enum!(RaisedByType, "raiser type", {
    Staff => "STAFF",
    Member => "MEMBER",
});
