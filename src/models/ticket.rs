//! Support ticket models

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{RaisedByType, TicketPriority, TicketStatus};

/// Ticket record with its assignment details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    #[serde(rename = "type")]
    pub ticket_type: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    #[serde(default)]
    pub raised_by_type: Option<RaisedByType>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub raised_by_id: Option<String>,
    /// Staff identifier of the assignee
    #[serde(default)]
    pub assigned_to_id: Option<String>,
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Ticket {
    /// Assignee label shown in ticket listings
    pub fn assignee_label(&self) -> String {
        format!(
            "{} (Staff ID: {})",
            self.assigned_to_name.as_deref().unwrap_or("Unknown"),
            self.assigned_to_id.as_deref().unwrap_or("N/A")
        )
    }
}

/// Member ids are numbers, staff ids are NIC strings; keep both as text.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(text) => text,
        Id::Number(n) => n.to_string(),
    }))
}

/// Member or staff reference carried by the backend's ticket link rows
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedPerson {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, alias = "NIC")]
    pub nic: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl LinkedPerson {
    /// Staff are keyed by NIC, members by numeric id
    fn key(&self) -> Option<String> {
        self.nic.clone().or_else(|| self.id.clone())
    }

    fn display_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        (!full.is_empty()).then_some(full)
    }
}

/// Row of the raised-by and assigned-to listings: the ticket wrapped with
/// the people linked to it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketLink {
    pub ticket_id: i64,
    pub ticket: Ticket,
    #[serde(default)]
    pub member: Option<LinkedPerson>,
    #[serde(default)]
    pub staff: Option<LinkedPerson>,
}

impl TicketLink {
    /// Ticket with its raiser taken from the link
    pub fn into_raised(self) -> Ticket {
        let (raised_by_type, person) = match (self.member, self.staff) {
            (Some(member), _) => (Some(RaisedByType::Member), Some(member)),
            (None, Some(staff)) => (Some(RaisedByType::Staff), Some(staff)),
            (None, None) => (None, None),
        };
        Ticket {
            id: self.ticket_id,
            raised_by_type: raised_by_type.or(self.ticket.raised_by_type),
            raised_by_id: person.and_then(|p| p.key()).or(self.ticket.raised_by_id),
            ..self.ticket
        }
    }

    /// Ticket with its assignee taken from the link; `staff` is the assignee here
    pub fn into_assigned(self) -> Ticket {
        let staff = self.staff.unwrap_or_default();
        Ticket {
            id: self.ticket_id,
            assigned_to_id: staff.key().or(self.ticket.assigned_to_id),
            assigned_to_name: staff.display_name().or(self.ticket.assigned_to_name),
            ..self.ticket
        }
    }
}

/// Create ticket request. Exactly one of `member_id` / `staff_id` is set.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicket {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Ticket type is required"))]
    pub ticket_type: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub priority: Option<TicketPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
}

/// Ticket assignment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTicket {
    #[validate(length(min = 1, message = "Staff id is required"))]
    pub staff_id: String,
}

/// Query parameters for filtered ticket listings
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct TicketFilterQuery {
    /// Status name or ALL
    pub status: Option<String>,
    /// Priority name or ALL
    pub priority: Option<String>,
}

/// Query parameters for ticket counts
#[derive(Debug, Deserialize, IntoParams)]
pub struct TicketCountQuery {
    pub status: TicketStatus,
}

/// Per-value counts used by the ticket filter buttons
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TicketCounts {
    /// Count keyed by status name, plus `ALL`
    #[schema(value_type = Object)]
    pub by_status: indexmap::IndexMap<String, usize>,
    /// Count keyed by priority name, plus `ALL`
    #[schema(value_type = Object)]
    pub by_priority: indexmap::IndexMap<String, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_ticket_response() {
        let json = r#"{
            "id": 7,
            "type": "Equipment",
            "description": "Rowing machine squeaks",
            "status": "IN_PROGRESS",
            "priority": "HIGH",
            "createdAt": "2024-05-01T09:30:00",
            "updatedAt": "2024-05-02T10:00:00",
            "assignedToId": "991234567V",
            "assignedToName": "Ahmed Ali"
        }"#;
        let ticket: Ticket = serde_json::from_str(json).unwrap();
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.ticket_type, "Equipment");
        assert_eq!(ticket.assignee_label(), "Ahmed Ali (Staff ID: 991234567V)");
    }

    #[test]
    fn test_unassigned_label() {
        let ticket: Ticket = serde_json::from_str(
            r#"{"id": 1, "type": "Other", "status": "OPEN", "priority": "LOW"}"#,
        )
        .unwrap();
        assert_eq!(ticket.assignee_label(), "Unknown (Staff ID: N/A)");
    }

    #[test]
    fn test_raised_by_id_accepts_numbers() {
        let ticket: Ticket = serde_json::from_str(
            r#"{"id": 3, "type": "Other", "status": "OPEN", "priority": "LOW",
                "raisedById": 31, "raisedByType": "MEMBER"}"#,
        )
        .unwrap();
        assert_eq!(ticket.raised_by_id.as_deref(), Some("31"));
    }

    #[test]
    fn test_link_rows_unwrap_to_tickets() {
        let raised: TicketLink = serde_json::from_str(
            r#"{
                "ticketId": 12,
                "ticket": {"id": 12, "type": "Equipment", "description": "Cable frayed",
                           "status": "OPEN", "priority": "HIGH"},
                "member": {"id": 31, "firstName": "Nimal", "lastName": "Perera"},
                "staff": null
            }"#,
        )
        .unwrap();
        let ticket = raised.into_raised();
        assert_eq!(ticket.id, 12);
        assert_eq!(ticket.raised_by_type, Some(RaisedByType::Member));
        assert_eq!(ticket.raised_by_id.as_deref(), Some("31"));

        let assigned: TicketLink = serde_json::from_str(
            r#"{
                "ticketId": 12,
                "ticket": {"id": 12, "type": "Equipment", "status": "IN_PROGRESS", "priority": "HIGH"},
                "staff": {"nic": "991234567V", "name": "Ahmed Ali"}
            }"#,
        )
        .unwrap();
        let ticket = assigned.into_assigned();
        assert_eq!(ticket.assignee_label(), "Ahmed Ali (Staff ID: 991234567V)");
    }
}
