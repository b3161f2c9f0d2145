use crate::models::{
    DailyActiveUsers, DauSummary, ItemChangeCount, PercentChange, StatusChangeSummary,
};

/// DAU rows split at the release cutoff. Every input row lands in exactly one side.
#[derive(Debug, Default)]
pub struct DauPartition<'a> {
    pub before: Vec<&'a DailyActiveUsers>,
    pub after: Vec<&'a DailyActiveUsers>,
}

pub fn partition_by_cutoff(days: &[DailyActiveUsers], cutoff: i64) -> DauPartition<'_> {
    let (before, after): (Vec<_>, Vec<_>) =
        days.iter().partition(|day| day.first_login_at < cutoff);
    DauPartition { before, after }
}

pub fn mean(values: impl IntoIterator<Item = i64>) -> Option<f64> {
    let (count, total) = values
        .into_iter()
        .fold((0usize, 0i64), |(count, total), value| (count + 1, total + value));

    if count == 0 {
        None
    } else {
        Some(total as f64 / count as f64)
    }
}

pub fn percent_change(before: f64, after: f64) -> PercentChange {
    if before == 0.0 {
        PercentChange::NoBaseline
    } else {
        PercentChange::Computed((after - before) / before * 100.0)
    }
}

pub fn summarize_dau(partition: &DauPartition<'_>) -> DauSummary {
    let before_mean = mean_active_users(&partition.before);
    let after_mean = mean_active_users(&partition.after);

    DauSummary {
        before_days: partition.before.len(),
        after_days: partition.after.len(),
        before_mean,
        after_mean,
        change: percent_change(before_mean, after_mean),
        before_span: span(&partition.before),
        after_span: span(&partition.after),
    }
}

pub fn summarize_status_changes(totals: &[ItemChangeCount]) -> StatusChangeSummary {
    let most_active = totals
        .iter()
        .fold(None::<&ItemChangeCount>, |best, item| match best {
            Some(current) if current.total_changes >= item.total_changes => Some(current),
            _ => Some(item),
        })
        .cloned();

    StatusChangeSummary {
        items_with_changes: totals.len(),
        total_changes: totals.iter().map(|item| item.total_changes).sum(),
        most_active,
        mean_changes_per_item: mean(totals.iter().map(|item| item.total_changes)),
    }
}

/// Zero for an empty side, so the comparison chart still has two bars.
fn mean_active_users(days: &[&DailyActiveUsers]) -> f64 {
    mean(days.iter().map(|day| day.active_users)).unwrap_or(0.0)
}

fn span(days: &[&DailyActiveUsers]) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
    let first = days.iter().map(|day| day.date).min()?;
    let last = days.iter().map(|day| day.date).max()?;
    Some((first, last))
}
