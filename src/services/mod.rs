//! Business logic services

pub mod costs;
pub mod equipment;
pub mod maintenance;
pub mod tickets;

use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    config::DashboardConfig,
    error::{AppError, AppResult, RemoteError},
    lifecycle::filters::FilterFetcher,
    remote::RemoteClient,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub equipment: equipment::EquipmentService,
    pub maintenance: maintenance::MaintenanceService,
    pub tickets: tickets::TicketService,
    pub costs: costs::CostService,
}

impl Services {
    /// Create all services on top of one backend client
    pub fn new(client: RemoteClient, dashboard: &DashboardConfig) -> Self {
        let client = Arc::new(client);
        let filter_timeout = Duration::from_secs(dashboard.filter_timeout_seconds);

        Self {
            equipment: equipment::EquipmentService::new(client.clone(), filter_timeout),
            maintenance: maintenance::MaintenanceService::new(
                client.clone(),
                client.clone(),
                client.clone(),
                filter_timeout,
            ),
            tickets: tickets::TicketService::new(client.clone(), filter_timeout),
            costs: costs::CostService::new(client),
        }
    }
}

/// Map a backend 404 to `NotFound`, any other failure to `Remote`
pub(crate) fn found<T>(result: Result<T, RemoteError>, what: impl FnOnce() -> String) -> AppResult<T> {
    match result {
        Err(RemoteError::Status { status: 404, .. }) => Err(AppError::NotFound(what())),
        other => Ok(other?),
    }
}

/// Unwrap a lookup; the backend answers an unknown id with an empty body
pub(crate) fn present<T>(
    result: Result<Option<T>, RemoteError>,
    what: impl FnOnce() -> String,
) -> AppResult<T> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) | Err(RemoteError::Status { status: 404, .. }) => Err(AppError::NotFound(what())),
        Err(e) => Err(e.into()),
    }
}

/// Bound a remote call; an elapsed limit reads as cancellation
pub(crate) async fn with_timeout<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, RemoteError>>,
) -> Result<T, RemoteError> {
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or(Err(RemoteError::Cancelled))
}

/// Build a pipeline fetcher from an API handle and one of its filter calls
pub(crate) fn fetcher<A, T, F, Fut>(api: Arc<A>, limit: Duration, call: F) -> impl FilterFetcher<T>
where
    A: ?Sized + Send + Sync + 'static,
    T: Send + 'static,
    F: Fn(Arc<A>, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, RemoteError>> + Send + 'static,
{
    move |value: String| {
        let pending = call(api.clone(), value);
        async move { with_timeout(limit, pending).await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_found_maps_404_only() {
        let missing: Result<(), _> = Err(RemoteError::Status {
            status: 404,
            url: "http://backend/api/tickets/9".to_string(),
        });
        assert!(matches!(
            found(missing, || "Ticket 9 not found".to_string()),
            Err(AppError::NotFound(_))
        ));

        let broken: Result<(), _> = Err(RemoteError::Status {
            status: 500,
            url: String::new(),
        });
        assert!(matches!(found(broken, String::new), Err(AppError::Remote(_))));
    }

    #[test]
    fn test_present_maps_empty_answer_to_not_found() {
        assert_eq!(present(Ok(Some(3)), String::new).unwrap(), 3);
        assert!(matches!(
            present::<i32>(Ok(None), || "Schedule 99 not found".to_string()),
            Err(AppError::NotFound(msg)) if msg == "Schedule 99 not found"
        ));
        assert!(matches!(
            present::<i32>(Err(RemoteError::Transport("refused".to_string())), String::new),
            Err(AppError::Remote(_))
        ));
    }

    #[tokio::test]
    async fn test_with_timeout_reports_cancelled() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, RemoteError>(1)
        };
        assert_eq!(
            with_timeout(Duration::from_millis(10), slow).await,
            Err(RemoteError::Cancelled)
        );
    }
}
