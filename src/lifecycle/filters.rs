//! Cache-first filter pipeline.
//!
//! Dimensions are visited in the entity's fixed order. The first
//! constrained dimension is resolved by the remote API; every later
//! constrained dimension narrows the held set in memory. When nothing is
//! constrained the baseline is handed back as-is and no request is made.

use async_trait::async_trait;
use std::{
    borrow::Cow,
    collections::HashMap,
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
};
use thiserror::Error;

use crate::{
    error::RemoteError,
    models::{Equipment, FilterCriteria, MaintenanceSchedule, Ticket},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("no remote fetcher registered for dimension '{0}'")]
    MissingFetcher(String),

    #[error("remote filter on '{dimension}' failed: {cause}")]
    RemoteFilterFailed { dimension: String, cause: RemoteError },
}

/// A filterable dimension: its name and in-memory predicate
pub struct Dimension<T> {
    pub name: &'static str,
    pub matches: fn(&T, &str) -> bool,
}

/// Records that can be run through the pipeline
pub trait Filterable: Clone + Send + Sync + 'static {
    /// Dimensions in evaluation order
    fn dimensions() -> &'static [Dimension<Self>];
}

/// Remote query for one dimension, given the dimension's value
#[async_trait]
pub trait FilterFetcher<T>: Send + Sync {
    async fn fetch(&self, value: &str) -> Result<Vec<T>, RemoteError>;
}

#[async_trait]
impl<T, F, Fut> FilterFetcher<T> for F
where
    T: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, RemoteError>> + Send + 'static,
{
    async fn fetch(&self, value: &str) -> Result<Vec<T>, RemoteError> {
        (self)(value.to_string()).await
    }
}

/// Fetchers keyed by dimension name
pub struct RemoteFetchers<'a, T> {
    by_dimension: HashMap<&'static str, Box<dyn FilterFetcher<T> + 'a>>,
}

impl<'a, T> Default for RemoteFetchers<'a, T> {
    fn default() -> Self {
        Self {
            by_dimension: HashMap::new(),
        }
    }
}

impl<'a, T> RemoteFetchers<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dimension: &'static str, fetcher: impl FilterFetcher<T> + 'a) -> Self {
        self.by_dimension.insert(dimension, Box::new(fetcher));
        self
    }

    fn get(&self, dimension: &str) -> Option<&(dyn FilterFetcher<T> + 'a)> {
        self.by_dimension.get(dimension).map(|f| f.as_ref())
    }
}

/// Resolve `criteria` against `baseline`.
///
/// Returns `Cow::Borrowed(baseline)` when every dimension is `ALL`.
/// In-memory steps keep the relative order of the set they narrow; a
/// fetched set keeps the order the remote returned. Failures never fall
/// back to the unfiltered baseline.
pub async fn apply_filters<'b, T: Filterable>(
    baseline: &'b [T],
    criteria: &FilterCriteria,
    fetchers: &RemoteFetchers<'_, T>,
) -> Result<Cow<'b, [T]>, FilterError> {
    let mut held: Option<Vec<T>> = None;

    for dimension in T::dimensions() {
        let Some(value) = criteria.get(dimension.name).value() else {
            continue;
        };

        match held.as_mut() {
            Some(records) => {
                records.retain(|record| (dimension.matches)(record, value));
                tracing::debug!(
                    dimension = dimension.name,
                    value,
                    remaining = records.len(),
                    "Applied in-memory filter"
                );
            }
            None => {
                let fetcher = fetchers
                    .get(dimension.name)
                    .ok_or_else(|| FilterError::MissingFetcher(dimension.name.to_string()))?;
                let fetched = fetcher
                    .fetch(value)
                    .await
                    .map_err(|cause| FilterError::RemoteFilterFailed {
                        dimension: dimension.name.to_string(),
                        cause,
                    })?;
                tracing::debug!(
                    dimension = dimension.name,
                    value,
                    fetched = fetched.len(),
                    "Fetched remote filter"
                );
                held = Some(fetched);
            }
        }
    }

    Ok(match held {
        Some(records) => Cow::Owned(records),
        None => Cow::Borrowed(baseline),
    })
}

/// "Latest wins" guard for overlapping filter requests on one view.
///
/// Each request takes a ticket with [`LatestRequest::begin`]; once its
/// result is ready, the result is only applied if [`LatestRequest::is_current`]
/// still holds.
#[derive(Debug, Default)]
pub struct LatestRequest {
    generation: AtomicU64,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier one
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Keep `result` only if no newer request started meanwhile
    pub fn settle<R>(&self, ticket: u64, result: R) -> Option<R> {
        self.is_current(ticket).then_some(result)
    }
}

// ---------------------------------------------------------------------------
// Dimensions per entity
// ---------------------------------------------------------------------------

pub const STATUS: &str = "status";
pub const TYPE: &str = "type";
pub const EQUIPMENT_ID: &str = "equipmentId";
pub const PRIORITY: &str = "priority";

static MAINTENANCE_DIMENSIONS: [Dimension<MaintenanceSchedule>; 3] = [
    Dimension {
        name: STATUS,
        matches: |s, v| s.status.as_str().eq_ignore_ascii_case(v),
    },
    Dimension {
        name: TYPE,
        matches: |s, v| s.maintenance_type == v,
    },
    Dimension {
        name: EQUIPMENT_ID,
        matches: |s, v| s.equipment_id.map(|id| id.to_string()).as_deref() == Some(v.trim()),
    },
];

impl Filterable for MaintenanceSchedule {
    fn dimensions() -> &'static [Dimension<Self>] {
        &MAINTENANCE_DIMENSIONS
    }
}

static TICKET_DIMENSIONS: [Dimension<Ticket>; 2] = [
    Dimension {
        name: STATUS,
        matches: |t, v| t.status.as_str().eq_ignore_ascii_case(v),
    },
    Dimension {
        name: PRIORITY,
        matches: |t, v| t.priority.as_str().eq_ignore_ascii_case(v),
    },
];

impl Filterable for Ticket {
    fn dimensions() -> &'static [Dimension<Self>] {
        &TICKET_DIMENSIONS
    }
}

static EQUIPMENT_DIMENSIONS: [Dimension<Equipment>; 1] = [Dimension {
    name: STATUS,
    matches: |e, v| e.status.as_str().eq_ignore_ascii_case(v),
}];

impl Filterable for Equipment {
    fn dimensions() -> &'static [Dimension<Self>] {
        &EQUIPMENT_DIMENSIONS
    }
}
