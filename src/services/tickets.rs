//! Support ticket service

use indexmap::IndexMap;
use std::{sync::Arc, time::Duration};
use tokio::{sync::RwLock, task::JoinHandle};
use validator::Validate;

use super::{fetcher, found};
use crate::{
    error::{AppError, AppResult},
    lifecycle::{
        apply_filters,
        filters::{LatestRequest, RemoteFetchers, PRIORITY, STATUS},
        workflow::{self, EntityKind, InvalidTransition, Workflow},
    },
    models::{
        filter::ALL,
        ticket::{CreateTicket, TicketCounts, TicketFilterQuery},
        FilterCriteria, FilterValue, RaisedByType, Ticket, TicketPriority, TicketStatus,
    },
    remote::TicketApi,
};

#[derive(Clone)]
pub struct TicketService {
    api: Arc<dyn TicketApi>,
    filter_timeout: Duration,
    open_count: OpenTicketCounter,
}

impl TicketService {
    pub fn new(api: Arc<dyn TicketApi>, filter_timeout: Duration) -> Self {
        Self {
            open_count: OpenTicketCounter::new(api.clone()),
            api,
            filter_timeout,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Ticket>> {
        Ok(self.api.list().await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<Ticket> {
        found(self.api.get(id).await, || not_found(id))
    }

    /// Open a ticket on behalf of exactly one member or staff member.
    /// The backend does not echo the stored ticket back.
    pub async fn create(&self, data: &CreateTicket) -> AppResult<()> {
        data.validate()?;
        let staff_id = data.staff_id.as_deref().map(str::trim).filter(|s| !s.is_empty());
        match (data.member_id, staff_id) {
            (Some(_), Some(_)) => {
                return Err(AppError::Validation(
                    "A ticket is raised by either a member or a staff member, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(AppError::Validation(
                    "Either memberId or staffId is required".to_string(),
                ))
            }
            _ => {}
        }

        let request = CreateTicket {
            priority: Some(data.priority.unwrap_or_default()),
            staff_id: staff_id.map(str::to_string),
            ..data.clone()
        };
        self.api.create(&request).await?;
        tracing::info!(
            ticket_type = %request.ticket_type,
            priority = ?request.priority,
            "Ticket created"
        );
        self.open_count.invalidate().await;
        Ok(())
    }

    pub async fn change_status(&self, id: i64, proposed: &str) -> AppResult<Ticket> {
        let mut ticket = self.get(id).await?;
        let next = workflow::parse_and_check(ticket.status, proposed)?;

        found(self.api.update_status(id, next).await, || not_found(id))?;
        tracing::info!(id, from = %ticket.status, to = %next, "Ticket status changed");
        ticket.status = next;
        self.open_count.invalidate().await;
        Ok(ticket)
    }

    /// Hand a ticket to a staff member; the backend moves it to IN_PROGRESS
    pub async fn assign(&self, id: i64, staff_id: &str) -> AppResult<Ticket> {
        let staff_id = staff_id.trim();
        if staff_id.is_empty() {
            return Err(AppError::Validation("Staff id is required".to_string()));
        }
        let ticket = self.get(id).await?;
        if ticket.status.is_terminal() {
            return Err(InvalidTransition::Terminal {
                kind: EntityKind::Ticket,
                current: ticket.status.to_string(),
            }
            .into());
        }

        found(self.api.assign(id, staff_id).await, || not_found(id))?;
        tracing::info!(id, staff_id, "Ticket assigned");
        self.open_count.invalidate().await;
        self.get(id).await
    }

    pub async fn filter(&self, query: &TicketFilterQuery) -> AppResult<Vec<Ticket>> {
        let criteria = FilterCriteria::new()
            .with(STATUS, FilterValue::parse(query.status.as_deref()))
            .with(PRIORITY, FilterValue::parse(query.priority.as_deref()));
        let baseline = if criteria.is_unconstrained() {
            self.api.list().await?
        } else {
            Vec::new()
        };

        let limit = self.filter_timeout;
        let fetchers = RemoteFetchers::new()
            .with(
                STATUS,
                fetcher(self.api.clone(), limit, |api, value| async move {
                    api.filter_by_status(&value).await
                }),
            )
            .with(
                PRIORITY,
                fetcher(self.api.clone(), limit, |api, value| async move {
                    api.filter_by_priority(&value).await
                }),
            );

        Ok(apply_filters(&baseline, &criteria, &fetchers)
            .await?
            .into_owned())
    }

    /// Counts behind the status and priority filter buttons
    pub async fn counts(&self) -> AppResult<TicketCounts> {
        let tickets = self.api.list().await?;
        Ok(tally(&tickets))
    }

    pub async fn count_by_status(&self, status: TicketStatus) -> AppResult<u64> {
        Ok(self.api.count_by_status(status).await?)
    }

    pub async fn assigned_to(&self, staff_id: &str) -> AppResult<Vec<Ticket>> {
        Ok(self.api.assigned_to(staff_id).await?)
    }

    pub async fn raised_by(&self, raiser: RaisedByType, raiser_id: &str) -> AppResult<Vec<Ticket>> {
        Ok(self.api.raised_by(raiser, raiser_id).await?)
    }

    pub fn open_count(&self) -> &OpenTicketCounter {
        &self.open_count
    }
}

fn not_found(id: i64) -> String {
    format!("Ticket {} not found", id)
}

fn tally(tickets: &[Ticket]) -> TicketCounts {
    let mut by_status: IndexMap<String, usize> = IndexMap::new();
    by_status.insert(ALL.to_string(), tickets.len());
    for status in TicketStatus::ALL {
        let n = tickets.iter().filter(|t| t.status == *status).count();
        by_status.insert(status.to_string(), n);
    }

    let mut by_priority: IndexMap<String, usize> = IndexMap::new();
    by_priority.insert(ALL.to_string(), tickets.len());
    for priority in TicketPriority::ALL {
        let n = tickets.iter().filter(|t| t.priority == *priority).count();
        by_priority.insert(priority.to_string(), n);
    }

    TicketCounts {
        by_status,
        by_priority,
    }
}

// ---------------------------------------------------------------------------
// Open ticket counter
// ---------------------------------------------------------------------------

/// Cached number of OPEN tickets, refreshed by a background task
#[derive(Clone)]
pub struct OpenTicketCounter {
    api: Arc<dyn TicketApi>,
    value: Arc<RwLock<Option<u64>>>,
    latest: Arc<LatestRequest>,
}

impl OpenTicketCounter {
    pub fn new(api: Arc<dyn TicketApi>) -> Self {
        Self {
            api,
            value: Arc::new(RwLock::new(None)),
            latest: Arc::new(LatestRequest::new()),
        }
    }

    /// Last known count, if any refresh has succeeded since the last change
    pub async fn cached(&self) -> Option<u64> {
        *self.value.read().await
    }

    /// Cached count, fetching it when nothing is cached
    pub async fn get(&self) -> AppResult<u64> {
        match self.cached().await {
            Some(count) => Ok(count),
            None => self.refresh().await,
        }
    }

    /// Fetch the count. A refresh overtaken by a newer one does not
    /// overwrite the cache.
    pub async fn refresh(&self) -> AppResult<u64> {
        let ticket = self.latest.begin();
        let count = self.api.count_by_status(TicketStatus::Open).await?;
        if let Some(count) = self.latest.settle(ticket, count) {
            *self.value.write().await = Some(count);
        }
        Ok(count)
    }

    /// Drop the cached count after a local mutation
    pub async fn invalidate(&self) {
        self.latest.begin();
        *self.value.write().await = None;
    }

    /// Refresh every `period` until the returned handle is aborted
    pub fn spawn_poller(&self, period: Duration) -> JoinHandle<()> {
        let counter = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                match counter.refresh().await {
                    Ok(count) => tracing::debug!(count, "Open ticket count refreshed"),
                    Err(e) => tracing::warn!(error = %e, "Open ticket count refresh failed"),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::RemoteError, remote::tickets::MockTicketApi};
    use mockall::predicate::eq;

    fn ticket(id: i64, status: TicketStatus, priority: TicketPriority) -> Ticket {
        Ticket {
            id,
            ticket_type: "Equipment".to_string(),
            description: Some("Treadmill belt slipping".to_string()),
            priority,
            status,
            raised_by_type: Some(RaisedByType::Member),
            raised_by_id: Some("31".to_string()),
            assigned_to_id: None,
            assigned_to_name: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn service(api: MockTicketApi) -> TicketService {
        TicketService::new(Arc::new(api), Duration::from_secs(1))
    }

    fn create_request(member_id: Option<i64>, staff_id: Option<&str>) -> CreateTicket {
        CreateTicket {
            ticket_type: "Equipment".to_string(),
            description: "Bench cracked".to_string(),
            priority: None,
            member_id,
            staff_id: staff_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_priority_to_medium() {
        let mut api = MockTicketApi::new();
        api.expect_create()
            .withf(|data| data.priority == Some(TicketPriority::Medium) && data.member_id == Some(31))
            .times(1)
            .returning(|_| Ok(()));

        service(api).create(&create_request(Some(31), None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_drops_cached_open_count() {
        let mut api = MockTicketApi::new();
        api.expect_count_by_status().times(2).returning(|_| Ok(3));
        api.expect_create().times(1).returning(|_| Ok(()));
        let svc = service(api);

        assert_eq!(svc.open_count().get().await.unwrap(), 3);
        svc.create(&create_request(None, Some("S-01"))).await.unwrap();
        assert_eq!(svc.open_count().cached().await, None);
        assert_eq!(svc.open_count().get().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_create_requires_exactly_one_raiser() {
        let mut api = MockTicketApi::new();
        api.expect_create().never();
        let svc = service(api);

        assert!(matches!(
            svc.create(&create_request(None, None)).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            svc.create(&create_request(Some(31), Some("S-01"))).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_ticket_cannot_move_or_be_assigned() {
        let mut api = MockTicketApi::new();
        api.expect_get()
            .with(eq(5))
            .returning(|_| Ok(ticket(5, TicketStatus::Closed, TicketPriority::Low)));
        api.expect_update_status().never();
        api.expect_assign().never();
        let svc = service(api);

        assert!(matches!(
            svc.change_status(5, "OPEN").await,
            Err(AppError::InvalidTransition(InvalidTransition::Terminal { .. }))
        ));
        assert!(matches!(
            svc.assign(5, "S-01").await,
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[tokio::test]
    async fn test_open_ticket_may_close_directly() {
        let mut api = MockTicketApi::new();
        api.expect_get()
            .returning(|_| Ok(ticket(5, TicketStatus::Open, TicketPriority::Low)));
        api.expect_update_status()
            .with(eq(5), eq(TicketStatus::Closed))
            .times(1)
            .returning(|_, _| Ok(()));

        let updated = service(api).change_status(5, "CLOSED").await.unwrap();
        assert_eq!(updated.status, TicketStatus::Closed);
    }

    #[tokio::test]
    async fn test_filter_priority_in_memory_after_status_fetch() {
        let mut api = MockTicketApi::new();
        api.expect_filter_by_priority().never();
        api.expect_filter_by_status()
            .withf(|status| status == "OPEN")
            .times(1)
            .returning(|_| {
                Ok(vec![
                    ticket(1, TicketStatus::Open, TicketPriority::High),
                    ticket(2, TicketStatus::Open, TicketPriority::Low),
                    ticket(3, TicketStatus::Open, TicketPriority::High),
                ])
            });

        let query = TicketFilterQuery {
            status: Some("OPEN".to_string()),
            priority: Some("HIGH".to_string()),
        };
        let rows = service(api).filter(&query).await.unwrap();
        assert_eq!(rows.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_filter_priority_alone_is_fetched() {
        let mut api = MockTicketApi::new();
        api.expect_list().never();
        api.expect_filter_by_priority()
            .withf(|priority| priority == "LOW")
            .times(1)
            .returning(|_| Ok(vec![ticket(2, TicketStatus::Resolved, TicketPriority::Low)]));

        let query = TicketFilterQuery {
            status: Some("ALL".to_string()),
            priority: Some("LOW".to_string()),
        };
        assert_eq!(service(api).filter(&query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_counts() {
        let mut api = MockTicketApi::new();
        api.expect_list().returning(|| {
            Ok(vec![
                ticket(1, TicketStatus::Open, TicketPriority::High),
                ticket(2, TicketStatus::Open, TicketPriority::Low),
                ticket(3, TicketStatus::Closed, TicketPriority::High),
            ])
        });

        let counts = service(api).counts().await.unwrap();
        assert_eq!(counts.by_status["ALL"], 3);
        assert_eq!(counts.by_status["OPEN"], 2);
        assert_eq!(counts.by_status["IN_PROGRESS"], 0);
        assert_eq!(counts.by_priority["HIGH"], 2);
        assert_eq!(counts.by_status.keys().next().map(String::as_str), Some("ALL"));
    }

    #[tokio::test]
    async fn test_open_counter_caches_until_invalidated() {
        let mut api = MockTicketApi::new();
        api.expect_count_by_status()
            .with(eq(TicketStatus::Open))
            .times(2)
            .returning(|_| Ok(4));
        let counter = OpenTicketCounter::new(Arc::new(api));

        assert_eq!(counter.cached().await, None);
        assert_eq!(counter.get().await.unwrap(), 4);
        assert_eq!(counter.get().await.unwrap(), 4);
        counter.invalidate().await;
        assert_eq!(counter.cached().await, None);
        assert_eq!(counter.get().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_open_counter_failure_keeps_previous_value() {
        let mut api = MockTicketApi::new();
        let mut calls = 0;
        api.expect_count_by_status().returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(2)
            } else {
                Err(RemoteError::Cancelled)
            }
        });
        let counter = OpenTicketCounter::new(Arc::new(api));

        counter.refresh().await.unwrap();
        assert!(counter.refresh().await.is_err());
        assert_eq!(counter.cached().await, Some(2));
    }

    #[tokio::test]
    async fn test_poller_fills_cache() {
        let mut api = MockTicketApi::new();
        api.expect_count_by_status().returning(|_| Ok(6));
        let counter = OpenTicketCounter::new(Arc::new(api));

        let handle = counter.spawn_poller(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();
        assert_eq!(counter.cached().await, Some(6));
    }
}
