//! Daily upstream call budget shared by every request in the process.

use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use tokio::sync::Mutex;

/// Default daily ceiling of upstream calls.
pub const DEFAULT_DAILY_LIMIT: u32 = 500;

/// The counter and the UTC calendar day it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaState {
    pub count: u32,
    pub day: NaiveDate,
}

impl QuotaState {
    /// Resets the counter when `today` differs from the tracked day.
    ///
    /// The reset is lazy: it happens on the first observation of a new day, so
    /// a tracker idle for several days still starts from zero.
    fn roll_over(&mut self, today: NaiveDate) {
        if self.day != today {
            info!(
                "Daily upstream counter reset ({} calls on {}, now {})",
                self.count, self.day, today
            );
            self.count = 0;
            self.day = today;
        }
    }
}

/// A point-in-time view of the quota, after applying the daily reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaSnapshot {
    pub used: u32,
    pub limit: u32,
    pub day: NaiveDate,
}

impl QuotaSnapshot {
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }
}

/// Counts upstream calls per UTC day against a fixed limit.
///
/// Running out does not error; callers are expected to route to the synthetic
/// path for the rest of the day.
#[derive(Debug)]
pub struct QuotaTracker {
    limit: u32,
    state: Mutex<QuotaState>,
}

impl QuotaTracker {
    pub fn new(limit: u32, today: NaiveDate) -> Self {
        Self {
            limit,
            state: Mutex::new(QuotaState {
                count: 0,
                day: today,
            }),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Whether another upstream call is permitted today.
    pub async fn has_remaining(&self, today: NaiveDate) -> bool {
        let mut state = self.state.lock().await;
        state.roll_over(today);
        state.count < self.limit
    }

    /// Counts one call against today's budget and returns the new count.
    pub async fn record_call(&self, today: NaiveDate) -> u32 {
        let mut state = self.state.lock().await;
        state.roll_over(today);
        state.count = state.count.saturating_add(1);
        state.count
    }

    /// Checks and counts in one step: returns the new count if a call is
    /// permitted, `None` once the limit is reached.
    ///
    /// The unit is consumed up front and not refunded if the call then fails.
    pub async fn try_reserve(&self, today: NaiveDate) -> Option<u32> {
        let mut state = self.state.lock().await;
        state.roll_over(today);
        if state.count >= self.limit {
            return None;
        }
        state.count += 1;
        Some(state.count)
    }

    pub async fn snapshot(&self, today: NaiveDate) -> QuotaSnapshot {
        let mut state = self.state.lock().await;
        state.roll_over(today);
        QuotaSnapshot {
            used: state.count,
            limit: self.limit,
            day: state.day,
        }
    }
}
