use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyActiveUsers {
    pub date: NaiveDate,
    pub active_users: i64,
    /// Earliest login of the day, in unix seconds.
    pub first_login_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemChangeCount {
    pub item_id: i64,
    pub total_changes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeBucket {
    pub total_changes: i64,
    pub item_count: i64,
}

/// Relative change of the after-release mean against the before-release mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "percent", rename_all = "snake_case")]
pub enum PercentChange {
    Computed(f64),
    /// The before-release mean is zero, so there is nothing to compare against.
    NoBaseline,
}

#[derive(Debug, Clone, Serialize)]
pub struct DauSummary {
    pub before_days: usize,
    pub after_days: usize,
    pub before_mean: f64,
    pub after_mean: f64,
    pub change: PercentChange,
    pub before_span: Option<(NaiveDate, NaiveDate)>,
    pub after_span: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChangeSummary {
    pub items_with_changes: usize,
    pub total_changes: i64,
    pub most_active: Option<ItemChangeCount>,
    pub mean_changes_per_item: Option<f64>,
}
