//! Support ticket calls

use async_trait::async_trait;
use reqwest::Method;

use super::RemoteClient;
use crate::{
    error::RemoteError,
    models::{
        ticket::{CreateTicket, TicketLink},
        RaisedByType, Ticket, TicketStatus,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Ticket>, RemoteError>;
    async fn get(&self, id: i64) -> Result<Ticket, RemoteError>;
    /// The backend stores the ticket and answers with an empty body
    async fn create(&self, data: &CreateTicket) -> Result<(), RemoteError>;
    async fn update_status(&self, id: i64, status: TicketStatus) -> Result<(), RemoteError>;
    /// Assign to a staff member; the backend moves the ticket to IN_PROGRESS
    async fn assign(&self, id: i64, staff_id: &str) -> Result<(), RemoteError>;
    async fn filter_by_status(&self, status: &str) -> Result<Vec<Ticket>, RemoteError>;
    async fn filter_by_priority(&self, priority: &str) -> Result<Vec<Ticket>, RemoteError>;
    async fn count_by_status(&self, status: TicketStatus) -> Result<u64, RemoteError>;
    async fn assigned_to(&self, staff_id: &str) -> Result<Vec<Ticket>, RemoteError>;
    async fn raised_by(&self, raiser: RaisedByType, raiser_id: &str) -> Result<Vec<Ticket>, RemoteError>;
}

#[async_trait]
impl TicketApi for RemoteClient {
    async fn list(&self) -> Result<Vec<Ticket>, RemoteError> {
        self.get_json("/tickets", &[]).await
    }

    async fn get(&self, id: i64) -> Result<Ticket, RemoteError> {
        self.get_json(&format!("/tickets/{}", id), &[]).await
    }

    async fn create(&self, data: &CreateTicket) -> Result<(), RemoteError> {
        self.post_body("/tickets", data).await
    }

    async fn update_status(&self, id: i64, status: TicketStatus) -> Result<(), RemoteError> {
        self.call(
            Method::PUT,
            &format!("/tickets/{}/status", id),
            &[("status", status.to_string())],
        )
        .await
    }

    async fn assign(&self, id: i64, staff_id: &str) -> Result<(), RemoteError> {
        self.call(
            Method::PUT,
            &format!("/tickets/{}/assign", id),
            &[("staffId", staff_id.to_string())],
        )
        .await
    }

    async fn filter_by_status(&self, status: &str) -> Result<Vec<Ticket>, RemoteError> {
        self.get_json("/tickets/filter-by-status", &[("status", status.to_string())])
            .await
    }

    async fn filter_by_priority(&self, priority: &str) -> Result<Vec<Ticket>, RemoteError> {
        self.get_json("/tickets/filter-by-priority", &[("priority", priority.to_string())])
            .await
    }

    async fn count_by_status(&self, status: TicketStatus) -> Result<u64, RemoteError> {
        self.get_json("/tickets/count-by-status", &[("status", status.to_string())])
            .await
    }

    async fn assigned_to(&self, staff_id: &str) -> Result<Vec<Ticket>, RemoteError> {
        let rows: Vec<TicketLink> = self
            .get_json(&format!("/tickets/assigned-to/staff/{}", staff_id), &[])
            .await?;
        Ok(rows.into_iter().map(TicketLink::into_assigned).collect())
    }

    async fn raised_by(&self, raiser: RaisedByType, raiser_id: &str) -> Result<Vec<Ticket>, RemoteError> {
        let segment = match raiser {
            RaisedByType::Staff => "staff",
            RaisedByType::Member => "member",
        };
        let rows: Vec<TicketLink> = self
            .get_json(&format!("/tickets/raised-by/{}/{}", segment, raiser_id), &[])
            .await?;
        Ok(rows.into_iter().map(TicketLink::into_raised).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::tests::client_for;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_count_by_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tickets/count-by-status"))
            .and(query_param("status", "OPEN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(7)))
            .mount(&server)
            .await;

        let count = client_for(&server).count_by_status(TicketStatus::Open).await.unwrap();
        assert_eq!(count, 7);
    }

    #[tokio::test]
    async fn test_create_sends_only_the_raiser_present() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/tickets"))
            .and(body_json(json!({
                "type": "Equipment",
                "description": "Bench cracked",
                "priority": "HIGH",
                "memberId": 31
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .create(&CreateTicket {
                ticket_type: "Equipment".to_string(),
                description: "Bench cracked".to_string(),
                priority: Some(crate::models::TicketPriority::High),
                member_id: Some(31),
                staff_id: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_raised_by_member_unwraps_link_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tickets/raised-by/member/31"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "ticketId": 44,
                "ticket": {
                    "id": 44,
                    "type": "Facility",
                    "description": "Locker door stuck",
                    "status": "OPEN",
                    "priority": "LOW",
                    "createdAt": "2024-05-01T09:30:00"
                },
                "member": { "id": 31, "firstName": "Nimal", "lastName": "Perera" },
                "staff": null,
                "version": 0
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let rows = client_for(&server)
            .raised_by(RaisedByType::Member, "31")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 44);
        assert_eq!(rows[0].raised_by_type, Some(RaisedByType::Member));
        assert_eq!(rows[0].raised_by_id.as_deref(), Some("31"));
    }

    #[tokio::test]
    async fn test_assigned_to_fills_assignee() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tickets/assigned-to/staff/991234567V"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "ticketId": 45,
                "ticket": {
                    "id": 45,
                    "type": "Equipment",
                    "status": "IN_PROGRESS",
                    "priority": "HIGH"
                },
                "staff": { "nic": "991234567V", "name": "Ahmed Ali", "role": "TRAINER" }
            }])))
            .mount(&server)
            .await;

        let rows = client_for(&server).assigned_to("991234567V").await.unwrap();
        assert_eq!(rows[0].status, TicketStatus::InProgress);
        assert_eq!(rows[0].assigned_to_id.as_deref(), Some("991234567V"));
        assert_eq!(rows[0].assigned_to_name.as_deref(), Some("Ahmed Ali"));
    }
}
