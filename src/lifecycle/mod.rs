//! Maintenance and ticket lifecycle engine: status workflows, the filter
//! pipeline, the calendar index and cost aggregation.

pub mod calendar;
pub mod costs;
pub mod filters;
pub mod workflow;

pub use filters::{apply_filters, FilterError, Filterable, LatestRequest, RemoteFetchers};
pub use workflow::{EntityKind, InvalidTransition};
