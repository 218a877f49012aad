//! Status workflows for maintenance schedules and tickets.
//!
//! Maintenance: `SCHEDULED -> INPROGRESS -> COMPLETED`, with `CANCELED`
//! reachable from either open state. Tickets: `OPEN -> IN_PROGRESS ->
//! RESOLVED -> CLOSED`, where any later status may be picked directly.
//! Neither workflow moves backward, and terminal states admit nothing.
//!
//! Validation is pure; the caller performs the remote mutation and any
//! follow-up effect.

use chrono::NaiveDate;
use serde::Serialize;
use std::{fmt, str::FromStr};
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::{MaintenanceSchedule, MaintenanceStatus, TicketStatus};

/// Status-bearing entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Maintenance,
    Ticket,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Maintenance => f.write_str("maintenance schedule"),
            EntityKind::Ticket => f.write_str("ticket"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTransition {
    #[error("{kind} in terminal status {current} cannot change status")]
    Terminal { kind: EntityKind, current: String },

    #[error("'{proposed}' is not a valid {kind} status")]
    UnknownStatus { kind: EntityKind, proposed: String },

    #[error("{kind} cannot move back from {current} to {proposed}")]
    Backward {
        kind: EntityKind,
        current: String,
        proposed: String,
    },
}

/// A status vocabulary with a forward-only workflow
pub trait Workflow: Copy + Eq + fmt::Display + FromStr {
    const KIND: EntityKind;

    /// Position along the forward path; side exits share the rank of the
    /// furthest state they can be reached from.
    fn rank(self) -> u8;

    fn is_terminal(self) -> bool;
}

impl Workflow for MaintenanceStatus {
    const KIND: EntityKind = EntityKind::Maintenance;

    fn rank(self) -> u8 {
        match self {
            MaintenanceStatus::Scheduled => 0,
            MaintenanceStatus::InProgress => 1,
            MaintenanceStatus::Completed | MaintenanceStatus::Canceled => 2,
        }
    }

    fn is_terminal(self) -> bool {
        matches!(self, MaintenanceStatus::Completed | MaintenanceStatus::Canceled)
    }
}

impl Workflow for TicketStatus {
    const KIND: EntityKind = EntityKind::Ticket;

    fn rank(self) -> u8 {
        match self {
            TicketStatus::Open => 0,
            TicketStatus::InProgress => 1,
            TicketStatus::Resolved => 2,
            TicketStatus::Closed => 3,
        }
    }

    fn is_terminal(self) -> bool {
        self == TicketStatus::Closed
    }
}

/// Check a typed transition. Re-selecting the current status of an open
/// entity is accepted as a no-op.
pub fn check<S: Workflow>(current: S, proposed: S) -> Result<(), InvalidTransition> {
    if current.is_terminal() {
        return Err(InvalidTransition::Terminal {
            kind: S::KIND,
            current: current.to_string(),
        });
    }
    if proposed.rank() < current.rank() {
        return Err(InvalidTransition::Backward {
            kind: S::KIND,
            current: current.to_string(),
            proposed: proposed.to_string(),
        });
    }
    Ok(())
}

/// Parse `proposed` in `S`'s vocabulary and check the move from `current`
pub fn parse_and_check<S: Workflow>(current: S, proposed: &str) -> Result<S, InvalidTransition> {
    if current.is_terminal() {
        return Err(InvalidTransition::Terminal {
            kind: S::KIND,
            current: current.to_string(),
        });
    }
    let next = proposed
        .parse::<S>()
        .map_err(|_| InvalidTransition::UnknownStatus {
            kind: S::KIND,
            proposed: proposed.to_string(),
        })?;
    check(current, next)?;
    Ok(next)
}

/// Validate a transition given as status names.
///
/// `current` is the stored status and is trusted to belong to the
/// vocabulary; an unparseable `current` is reported as unknown.
pub fn validate_transition(kind: EntityKind, current: &str, proposed: &str) -> Result<(), InvalidTransition> {
    fn run<S: Workflow>(current: &str, proposed: &str) -> Result<(), InvalidTransition> {
        let current = current
            .parse::<S>()
            .map_err(|_| InvalidTransition::UnknownStatus {
                kind: S::KIND,
                proposed: current.to_string(),
            })?;
        parse_and_check(current, proposed).map(|_| ())
    }

    match kind {
        EntityKind::Maintenance => run::<MaintenanceStatus>(current, proposed),
        EntityKind::Ticket => run::<TicketStatus>(current, proposed),
    }
}

/// Follow-up write requested by completing a maintenance schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentMaintenanceDateSync {
    pub equipment_id: i64,
    #[schema(value_type = String, format = Date)]
    pub maintenance_date: NaiveDate,
}

/// An accepted maintenance transition and the effects the caller must attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: MaintenanceStatus,
    pub to: MaintenanceStatus,
    /// Best-effort secondary write; its failure never undoes the transition
    pub sync: Option<EquipmentMaintenanceDateSync>,
}

/// Validate a status change on `schedule` and derive its effects.
///
/// Completing a schedule that references no equipment produces no sync.
pub fn maintenance_transition(
    schedule: &MaintenanceSchedule,
    proposed: MaintenanceStatus,
) -> Result<Transition, InvalidTransition> {
    check(schedule.status, proposed)?;
    let sync = match (proposed, schedule.equipment_id) {
        (MaintenanceStatus::Completed, Some(equipment_id)) => Some(EquipmentMaintenanceDateSync {
            equipment_id,
            maintenance_date: schedule.maintenance_date,
        }),
        _ => None,
    };
    Ok(Transition {
        from: schedule.status,
        to: proposed,
        sync,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(status: MaintenanceStatus) -> MaintenanceSchedule {
        MaintenanceSchedule {
            schedule_id: 1,
            equipment_id: Some(42),
            maintenance_type: "Preventive".to_string(),
            maintenance_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            status,
            maintenance_cost: None,
            technician: Some("Maria Garcia".to_string()),
            maintenance_description: None,
        }
    }

    #[test]
    fn test_terminal_maintenance_rejects_everything() {
        for current in [MaintenanceStatus::Completed, MaintenanceStatus::Canceled] {
            for proposed in MaintenanceStatus::ALL {
                assert!(matches!(
                    check(current, *proposed),
                    Err(InvalidTransition::Terminal { .. })
                ));
            }
            assert!(validate_transition(EntityKind::Maintenance, current.as_str(), "BOGUS").is_err());
        }
    }

    #[test]
    fn test_maintenance_forward_moves() {
        use MaintenanceStatus::*;
        assert!(check(Scheduled, InProgress).is_ok());
        assert!(check(Scheduled, Canceled).is_ok());
        assert!(check(Scheduled, Completed).is_ok());
        assert!(check(InProgress, Completed).is_ok());
        assert!(check(InProgress, Canceled).is_ok());
        assert!(check(InProgress, InProgress).is_ok());
    }

    #[test]
    fn test_maintenance_backward_rejected() {
        let err = check(MaintenanceStatus::InProgress, MaintenanceStatus::Scheduled).unwrap_err();
        assert_eq!(
            err.to_string(),
            "maintenance schedule cannot move back from INPROGRESS to SCHEDULED"
        );
    }

    #[test]
    fn test_ticket_skips_allowed_closed_is_terminal() {
        assert!(validate_transition(EntityKind::Ticket, "OPEN", "CLOSED").is_ok());
        assert!(validate_transition(EntityKind::Ticket, "OPEN", "RESOLVED").is_ok());
        for proposed in TicketStatus::ALL {
            assert!(validate_transition(EntityKind::Ticket, "CLOSED", proposed.as_str()).is_err());
        }
        assert!(validate_transition(EntityKind::Ticket, "RESOLVED", "OPEN").is_err());
    }

    #[test]
    fn test_unknown_proposed_status() {
        let err = validate_transition(EntityKind::Ticket, "OPEN", "REOPENED").unwrap_err();
        assert_eq!(
            err,
            InvalidTransition::UnknownStatus {
                kind: EntityKind::Ticket,
                proposed: "REOPENED".to_string()
            }
        );
        // maintenance spells it without underscore
        assert!(validate_transition(EntityKind::Maintenance, "SCHEDULED", "IN_PROGRESS").is_err());
        assert!(validate_transition(EntityKind::Maintenance, "SCHEDULED", "INPROGRESS").is_ok());
    }

    #[test]
    fn test_completion_emits_sync_with_schedule_date() {
        let transition =
            maintenance_transition(&schedule(MaintenanceStatus::InProgress), MaintenanceStatus::Completed)
                .unwrap();
        assert_eq!(
            transition.sync,
            Some(EquipmentMaintenanceDateSync {
                equipment_id: 42,
                maintenance_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            })
        );
    }

    #[test]
    fn test_other_transitions_emit_nothing() {
        let transition =
            maintenance_transition(&schedule(MaintenanceStatus::Scheduled), MaintenanceStatus::Canceled)
                .unwrap();
        assert_eq!(transition.sync, None);

        let mut orphan = schedule(MaintenanceStatus::Scheduled);
        orphan.equipment_id = None;
        let transition = maintenance_transition(&orphan, MaintenanceStatus::Completed).unwrap();
        assert_eq!(transition.sync, None);
    }
}
