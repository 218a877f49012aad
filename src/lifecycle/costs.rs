//! Year-grouped statistics over monthly maintenance costs.
//!
//! None of these functions fail on empty input: totals and averages are
//! zero and extrema fall back to the `{ "-", 0 }` placeholder.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppError, models::MonthlyCost};

/// Month shown when there is no row to report
pub const NO_MONTH: &str = "-";

pub const INVALID_QUERY: &str = "Invalid format. Use YYYY for year or YYYY-MM for month";

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("valid year pattern"));
static MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("valid month pattern"));

/// Partition rows by year; rows within a year are sorted by month
pub fn group_by_year(rows: &[MonthlyCost]) -> IndexMap<String, Vec<MonthlyCost>> {
    let mut groups: IndexMap<String, Vec<MonthlyCost>> = IndexMap::new();
    for row in rows {
        groups.entry(row.year().to_string()).or_default().push(row.clone());
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.month.cmp(&b.month));
    }
    groups
}

/// Sum of the rows; 0 when the sum leaves the `Decimal` range
pub fn yearly_total(rows: &[MonthlyCost]) -> Decimal {
    rows.iter()
        .try_fold(Decimal::ZERO, |sum, r| sum.checked_add(r.total_cost))
        .unwrap_or(Decimal::ZERO)
}

pub fn monthly_average(rows: &[MonthlyCost]) -> Decimal {
    yearly_total(rows)
        .checked_div(Decimal::from(rows.len()))
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extremum {
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CostPoint {
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub cost: Decimal,
}

impl CostPoint {
    fn placeholder() -> Self {
        Self {
            month: NO_MONTH.to_string(),
            cost: Decimal::ZERO,
        }
    }
}

/// Cheapest or most expensive month. On ties the earliest row in `rows` wins.
pub fn extremum(rows: &[MonthlyCost], which: Extremum) -> CostPoint {
    let better = |candidate: &MonthlyCost, held: &MonthlyCost| match which {
        Extremum::Min => candidate.total_cost < held.total_cost,
        Extremum::Max => candidate.total_cost > held.total_cost,
    };
    rows.iter()
        .reduce(|held, candidate| if better(candidate, held) { candidate } else { held })
        .map(|row| CostPoint {
            month: row.month.clone(),
            cost: row.total_cost,
        })
        .unwrap_or_else(CostPoint::placeholder)
}

/// Share of the year's total spent in `row`, in percent
pub fn percent_of_year(row: &MonthlyCost, year_rows: &[MonthlyCost]) -> Decimal {
    let total = yearly_total(year_rows);
    row.total_cost
        .checked_div(total)
        .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

/// Deviation of `row` from the year's monthly average, in percent
pub fn compared_to_average(row: &MonthlyCost, year_rows: &[MonthlyCost]) -> Decimal {
    let average = monthly_average(year_rows);
    row.total_cost
        .checked_sub(average)
        .and_then(|delta| delta.checked_div(average))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Yearly report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthShare {
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub cost: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub percent_of_year: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub compared_to_average: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub monthly_average: Decimal,
    pub highest: CostPoint,
    pub lowest: CostPoint,
    /// Ascending by month
    pub months: Vec<MonthShare>,
}

/// One summary per year, most recent year first
pub fn year_summaries(rows: &[MonthlyCost]) -> Vec<YearSummary> {
    let mut summaries: Vec<YearSummary> = group_by_year(rows)
        .into_iter()
        .map(|(year, year_rows)| {
            let months = year_rows
                .iter()
                .map(|row| MonthShare {
                    month: row.month.clone(),
                    cost: row.total_cost,
                    percent_of_year: percent_of_year(row, &year_rows).round_dp(2),
                    compared_to_average: compared_to_average(row, &year_rows).round_dp(2),
                })
                .collect();
            YearSummary {
                total: yearly_total(&year_rows),
                monthly_average: monthly_average(&year_rows).round_dp(2),
                highest: extremum(&year_rows, Extremum::Max),
                lowest: extremum(&year_rows, Extremum::Min),
                months,
                year,
            }
        })
        .collect();
    summaries.sort_by(|a, b| b.year.cmp(&a.year));
    summaries
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// What a cost listing is restricted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CostQuery {
    All,
    Year(String),
    Month(String),
}

impl CostQuery {
    /// `YYYY`, `YYYY-MM`, or blank for every month
    pub fn parse(text: Option<&str>) -> Result<Self, AppError> {
        let text = text.map(str::trim).unwrap_or_default();
        if text.is_empty() {
            Ok(CostQuery::All)
        } else if YEAR_RE.is_match(text) {
            Ok(CostQuery::Year(text.to_string()))
        } else if MONTH_RE.is_match(text) {
            Ok(CostQuery::Month(text.to_string()))
        } else {
            Err(AppError::Validation(INVALID_QUERY.to_string()))
        }
    }
}
