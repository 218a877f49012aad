//! Monthly cost calls

use async_trait::async_trait;
use reqwest::Method;

use super::RemoteClient;
use crate::{error::RemoteError, models::MonthlyCost};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CostApi: Send + Sync {
    /// Ask the backend to rebuild its monthly aggregates
    async fn recompute(&self) -> Result<(), RemoteError>;
    async fn list(&self) -> Result<Vec<MonthlyCost>, RemoteError>;
    /// `month` is `YYYY-MM`; the backend holds at most one row per month
    async fn by_month(&self, month: &str) -> Result<Vec<MonthlyCost>, RemoteError>;
    async fn by_year(&self, year: &str) -> Result<Vec<MonthlyCost>, RemoteError>;
}

#[async_trait]
impl CostApi for RemoteClient {
    async fn recompute(&self) -> Result<(), RemoteError> {
        self.call(Method::POST, "/update-monthly-costs", &[]).await
    }

    async fn list(&self) -> Result<Vec<MonthlyCost>, RemoteError> {
        self.get_json("/monthly-costs", &[]).await
    }

    async fn by_month(&self, month: &str) -> Result<Vec<MonthlyCost>, RemoteError> {
        let row: Option<MonthlyCost> = self
            .get_optional("/filter-monthly-cost", &[("month", month.to_string())])
            .await?;
        Ok(row.into_iter().collect())
    }

    async fn by_year(&self, year: &str) -> Result<Vec<MonthlyCost>, RemoteError> {
        self.get_json("/filter-yearly-cost", &[("year", year.to_string())])
            .await
    }
}
