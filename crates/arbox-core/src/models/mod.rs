//! Data models for Arbox entities.
//!
//! This module contains the request and response shapes used by the client:
//!
//! - Leads: `Lead`, `LeadDetails`, `ConvertedLead`, `NewLead`
//! - Members: `ActiveMember`, `MemberCustomer`, `EndedMembership`, `Birthday`, ...
//! - Schedule: `ScheduleLesson`, `LessonMember`, `LeadSchedule`
//! - Tasks: `Task`, `TaskPage`, `NewTask`
//! - Reports: `Transaction`, `MemberProperties`, `SuspendedUser`, `BoxStats`
//!
//! The API is undocumented and loosely typed, so most fields are optional and
//! unknown fields are kept in `extra` maps rather than dropped.

pub mod leads;
pub mod members;
pub mod reports;
pub mod schedule;
pub mod tasks;

use chrono::{Datelike, Local, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub use leads::{ConvertedLead, Lead, LeadDetails, NewLead};
pub use members::{ActiveMember, Birthday, CustomerExtraData, EndedMembership, MemberCustomer, SearchResult};
pub use reports::{BoxStats, MemberProperties, SuspendedUser, Transaction};
pub use schedule::{LeadSchedule, LessonMember, ScheduleLesson};
pub use tasks::{NewTask, Task, TaskPage, TaskTarget};

/// Date format the API uses in bodies, paths and query strings
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Inclusive date range for report-style endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Single-day range for today
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        Self::new(today, today)
    }

    /// Sunday through Saturday of the current week
    pub fn this_week() -> Self {
        Self::week_of(Local::now().date_naive())
    }

    /// From today to the last day of the current month
    pub fn rest_of_month() -> Self {
        Self::rest_of_month_from(Local::now().date_naive())
    }

    /// The `months` months leading up to today
    pub fn last_months(months: u32) -> Self {
        Self::months_before(Local::now().date_naive(), months)
    }

    pub fn week_of(date: NaiveDate) -> Self {
        let week = date.week(Weekday::Sun);
        Self::new(week.first_day(), week.last_day())
    }

    pub fn rest_of_month_from(date: NaiveDate) -> Self {
        let next_month_start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .and_then(|first| first.checked_add_months(Months::new(1)));
        let month_end = next_month_start
            .and_then(|d| d.pred_opt())
            .unwrap_or(date);
        Self::new(date, month_end)
    }

    pub fn months_before(date: NaiveDate, months: u32) -> Self {
        let from = date
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        Self::new(from, date)
    }

    pub fn from_param(&self) -> String {
        format_date(self.from)
    }

    pub fn to_param(&self) -> String {
        format_date(self.to)
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::today()
    }
}
