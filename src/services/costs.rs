//! Monthly maintenance cost service

use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    lifecycle::costs::{year_summaries, CostQuery, YearSummary},
    models::MonthlyCost,
    remote::CostApi,
};

/// Cost report: per-year statistics plus the month listing they came from
#[derive(Debug, Serialize, ToSchema)]
pub struct CostReport {
    /// Most recent year first
    pub years: Vec<YearSummary>,
    /// Most recent month first
    pub months: Vec<MonthlyCost>,
}

#[derive(Clone)]
pub struct CostService {
    api: Arc<dyn CostApi>,
}

impl CostService {
    pub fn new(api: Arc<dyn CostApi>) -> Self {
        Self { api }
    }

    /// Ask the backend to rebuild the monthly aggregates
    pub async fn recompute(&self) -> AppResult<()> {
        self.api.recompute().await?;
        tracing::info!("Monthly costs recomputed");
        Ok(())
    }

    /// Every month, most recent first
    pub async fn list(&self) -> AppResult<Vec<MonthlyCost>> {
        let mut rows = self.api.list().await?;
        sort_by_month_desc(&mut rows);
        Ok(rows)
    }

    pub async fn by_month(&self, month: &str) -> AppResult<Vec<MonthlyCost>> {
        Ok(self.api.by_month(month).await?)
    }

    pub async fn by_year(&self, year: &str) -> AppResult<Vec<MonthlyCost>> {
        let mut rows = self.api.by_year(year).await?;
        sort_by_month_desc(&mut rows);
        Ok(rows)
    }

    /// Listing restricted by a `YYYY` / `YYYY-MM` filter text
    pub async fn query(&self, filter: Option<&str>) -> AppResult<Vec<MonthlyCost>> {
        match CostQuery::parse(filter)? {
            CostQuery::All => self.list().await,
            CostQuery::Year(year) => self.by_year(&year).await,
            CostQuery::Month(month) => self.by_month(&month).await,
        }
    }

    pub async fn report(&self, filter: Option<&str>) -> AppResult<CostReport> {
        let months = self.query(filter).await?;
        Ok(CostReport {
            years: year_summaries(&months),
            months,
        })
    }
}

fn sort_by_month_desc(rows: &mut [MonthlyCost]) {
    rows.sort_by(|a, b| b.month.cmp(&a.month));
}
