//! Day-keyed calendar index over dated records and the sliding
//! three-month window it is displayed through.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};
use utoipa::ToSchema;

use crate::models::{MaintenanceSchedule, MaintenanceStatus};

/// Label used when a schedule carries no maintenance type
pub const DEFAULT_LABEL: &str = "General Maintenance";

/// Counts above this are displayed as `9+`
pub const BADGE_CAP: usize = 9;

// ---------------------------------------------------------------------------
// Months and windows
// ---------------------------------------------------------------------------

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// `None` unless `month` is 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn pred(self) -> Self {
        match self.month {
            1 => Self {
                year: self.year - 1,
                month: 12,
            },
            m => Self {
                year: self.year,
                month: m - 1,
            },
        }
    }

    pub fn succ(self) -> Self {
        match self.month {
            12 => Self {
                year: self.year + 1,
                month: 1,
            },
            m => Self {
                year: self.year,
                month: m + 1,
            },
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn days(self) -> u32 {
        match (self.first_day(), self.succ().first_day()) {
            (Some(first), Some(next)) => (next - first).num_days() as u32,
            _ => 0,
        }
    }

    /// Weekday of the 1st, Sunday = 0
    pub fn leading_blanks(self) -> u32 {
        self.first_day()
            .map(|d| d.weekday().num_days_from_sunday())
            .unwrap_or(0)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid month '{0}', expected YYYY-MM")]
pub struct InvalidYearMonth(pub String);

impl FromStr for YearMonth {
    type Err = InvalidYearMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidYearMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Previous, current and next month
pub type Window = [YearMonth; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Previous,
    Next,
}

pub fn window(center: YearMonth) -> Window {
    [center.pred(), center, center.succ()]
}

pub fn shift(current: Window, direction: Shift) -> Window {
    match direction {
        Shift::Previous => [current[0].pred(), current[0], current[1]],
        Shift::Next => [current[1], current[2], current[2].succ()],
    }
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// What the calendar shows for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayEvent {
    pub id: i64,
    pub equipment_id: Option<i64>,
    pub label: String,
    pub status: MaintenanceStatus,
}

/// Records that can be placed on the calendar
pub trait CalendarEntry {
    fn day_event(&self) -> DayEvent;
}

impl CalendarEntry for MaintenanceSchedule {
    fn day_event(&self) -> DayEvent {
        let label = match self.maintenance_type.trim() {
            "" => DEFAULT_LABEL.to_string(),
            t => t.to_string(),
        };
        DayEvent {
            id: self.schedule_id,
            equipment_id: self.equipment_id,
            label,
            status: self.status,
        }
    }
}

/// Events per day, each day's list in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayIndex {
    days: BTreeMap<NaiveDate, Vec<DayEvent>>,
}

impl DayIndex {
    /// Index every record; records without a date are skipped
    pub fn build<T, F>(records: &[T], date_selector: F) -> Self
    where
        T: CalendarEntry,
        F: Fn(&T) -> Option<NaiveDate>,
    {
        let mut index = Self::default();
        index.insert_where(records, &date_selector, |_| true);
        index
    }

    /// Index only records dated inside `window`
    pub fn build_window<T, F>(records: &[T], window: &Window, date_selector: F) -> Self
    where
        T: CalendarEntry,
        F: Fn(&T) -> Option<NaiveDate>,
    {
        let mut index = Self::default();
        index.insert_where(records, &date_selector, |d| {
            window.iter().any(|m| m.contains(d))
        });
        index
    }

    /// Move a windowed index one month along. The month leaving the
    /// window is dropped and only the newly exposed month is indexed.
    pub fn slide<T, F>(
        &mut self,
        records: &[T],
        current: Window,
        direction: Shift,
        date_selector: F,
    ) -> Window
    where
        T: CalendarEntry,
        F: Fn(&T) -> Option<NaiveDate>,
    {
        let next = shift(current, direction);
        let (leaving, exposed) = match direction {
            Shift::Previous => (current[2], next[0]),
            Shift::Next => (current[0], next[2]),
        };
        self.days.retain(|day, _| !leaving.contains(*day));
        self.insert_where(records, &date_selector, |d| exposed.contains(d));
        next
    }

    fn insert_where<T, F, P>(&mut self, records: &[T], date_selector: &F, keep: P)
    where
        T: CalendarEntry,
        F: Fn(&T) -> Option<NaiveDate>,
        P: Fn(NaiveDate) -> bool,
    {
        for record in records {
            if let Some(day) = date_selector(record).filter(|d| keep(*d)) {
                self.days.entry(day).or_default().push(record.day_event());
            }
        }
    }

    pub fn events_on(&self, day: NaiveDate) -> &[DayEvent] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count_on(&self, day: NaiveDate) -> usize {
        self.events_on(day).len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<DayEvent>)> {
        self.days.iter()
    }
}

// ---------------------------------------------------------------------------
// Day display
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DayClass {
    InProgress,
    Scheduled,
    Completed,
    Canceled,
    Empty,
}

/// Most significant status on the day: in-progress, then scheduled,
/// completed and canceled
pub fn classify(events: &[DayEvent]) -> DayClass {
    let has = |status| events.iter().any(|e| e.status == status);
    if has(MaintenanceStatus::InProgress) {
        DayClass::InProgress
    } else if has(MaintenanceStatus::Scheduled) {
        DayClass::Scheduled
    } else if has(MaintenanceStatus::Completed) {
        DayClass::Completed
    } else if has(MaintenanceStatus::Canceled) {
        DayClass::Canceled
    } else {
        DayClass::Empty
    }
}

pub fn badge(count: usize) -> String {
    if count > BADGE_CAP {
        format!("{BADGE_CAP}+")
    } else {
        count.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CalendarDay {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub class: DayClass,
    pub count: usize,
    pub badge: String,
    pub events: Vec<DayEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    #[schema(value_type = String, example = "2024-05")]
    pub month: YearMonth,
    /// Empty cells before the 1st, Sunday-first week
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

pub fn month_grid(month: YearMonth, index: &DayIndex) -> MonthGrid {
    let days = (1..=month.days())
        .filter_map(|d| NaiveDate::from_ymd_opt(month.year(), month.month(), d))
        .map(|date| {
            let events = index.events_on(date);
            CalendarDay {
                date,
                class: classify(events),
                count: events.len(),
                badge: badge(events.len()),
                events: events.to_vec(),
            }
        })
        .collect();

    MonthGrid {
        month,
        leading_blanks: month.leading_blanks(),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn schedule(id: i64, date: &str, status: MaintenanceStatus) -> MaintenanceSchedule {
        MaintenanceSchedule {
            schedule_id: id,
            equipment_id: Some(id * 10),
            maintenance_type: "Routine".to_string(),
            maintenance_date: day(date),
            status,
            maintenance_cost: None,
            technician: None,
            maintenance_description: None,
        }
    }

    fn by_date(s: &MaintenanceSchedule) -> Option<NaiveDate> {
        Some(s.maintenance_date)
    }

    #[test]
    fn test_window_and_shift() {
        assert_eq!(window(ym(2024, 5)), [ym(2024, 4), ym(2024, 5), ym(2024, 6)]);
        assert_eq!(shift(window(ym(2024, 5)), Shift::Next), window(ym(2024, 6)));
        assert_eq!(shift(window(ym(2024, 1)), Shift::Previous), window(ym(2023, 12)));
        assert_eq!(window(ym(2024, 12))[2], ym(2025, 1));
    }

    #[test]
    fn test_year_month_parse() {
        assert_eq!("2024-05".parse::<YearMonth>(), Ok(ym(2024, 5)));
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("2024-5".parse::<YearMonth>().is_err());
        assert_eq!(ym(2024, 2).days(), 29);
        assert_eq!(ym(2023, 2).days(), 28);
        // 2024-05-01 was a Wednesday
        assert_eq!(ym(2024, 5).leading_blanks(), 3);
    }

    #[test]
    fn test_mixed_day_is_in_progress() {
        let records = vec![
            schedule(1, "2024-05-10", MaintenanceStatus::InProgress),
            schedule(2, "2024-05-10", MaintenanceStatus::Scheduled),
        ];
        let index = DayIndex::build(&records, by_date);
        let events = index.events_on(day("2024-05-10"));

        assert_eq!(classify(events), DayClass::InProgress);
        assert_eq!(index.count_on(day("2024-05-10")), 2);
        assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_classification_precedence() {
        let event = |status| DayEvent {
            id: 1,
            equipment_id: None,
            label: DEFAULT_LABEL.to_string(),
            status,
        };
        assert_eq!(
            classify(&[event(MaintenanceStatus::Canceled), event(MaintenanceStatus::Completed)]),
            DayClass::Completed
        );
        assert_eq!(
            classify(&[event(MaintenanceStatus::Completed), event(MaintenanceStatus::Scheduled)]),
            DayClass::Scheduled
        );
        assert_eq!(classify(&[event(MaintenanceStatus::Canceled)]), DayClass::Canceled);
        assert_eq!(classify(&[]), DayClass::Empty);
    }

    #[test]
    fn test_badge() {
        assert_eq!(badge(0), "0");
        assert_eq!(badge(9), "9");
        assert_eq!(badge(10), "9+");
    }

    #[test]
    fn test_missing_type_gets_default_label() {
        let mut record = schedule(1, "2024-05-10", MaintenanceStatus::Scheduled);
        record.maintenance_type = String::new();
        assert_eq!(record.day_event().label, DEFAULT_LABEL);
    }

    #[test]
    fn test_slide_matches_rebuild() {
        let records = vec![
            schedule(1, "2024-03-31", MaintenanceStatus::Completed),
            schedule(2, "2024-04-02", MaintenanceStatus::Scheduled),
            schedule(3, "2024-06-15", MaintenanceStatus::Scheduled),
            schedule(4, "2024-07-01", MaintenanceStatus::Scheduled),
        ];
        let start = window(ym(2024, 5));
        let mut index = DayIndex::build_window(&records, &start, by_date);
        assert_eq!(index.count_on(day("2024-07-01")), 0);

        let next = index.slide(&records, start, Shift::Next, by_date);
        assert_eq!(next, window(ym(2024, 6)));
        assert_eq!(index, DayIndex::build_window(&records, &next, by_date));

        let back = index.slide(&records, next, Shift::Previous, by_date);
        assert_eq!(index, DayIndex::build_window(&records, &back, by_date));
        assert_eq!(index.count_on(day("2024-03-31")), 0);
    }

    #[test]
    fn test_month_grid() {
        let records = vec![schedule(1, "2024-02-29", MaintenanceStatus::Scheduled)];
        let index = DayIndex::build(&records, by_date);
        let grid = month_grid(ym(2024, 2), &index);

        assert_eq!(grid.days.len(), 29);
        // 2024-02-01 was a Thursday
        assert_eq!(grid.leading_blanks, 4);
        let last = grid.days.last().unwrap();
        assert_eq!(last.class, DayClass::Scheduled);
        assert_eq!(last.badge, "1");
        assert_eq!(grid.days[0].class, DayClass::Empty);
    }
}
