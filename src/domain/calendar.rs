// ==========================================
// 服装生产排产系统 - 假日日历
// ==========================================
// 假日对所有产线统一生效 (当前范围内无产线级覆盖)
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// HolidayCalendar - 假日日历
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    pub fn add(&mut self, date: NaiveDate) {
        self.dates.insert(date);
    }

    pub fn remove(&mut self, date: &NaiveDate) {
        self.dates.remove(date);
    }

    /// 当日是否停产
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
