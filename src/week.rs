// 📅 Week bucketing - Monday-aligned calendar weeks

use chrono::{Datelike, Duration, NaiveDate};

/// The Monday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}
