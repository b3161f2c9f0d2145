use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::ValueEnum;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://shiptivity.db";
pub const DEFAULT_RELEASE_DATE: &str = "2018-06-02";
pub const DEFAULT_FEATURE_NAME: &str = "Kanban";
pub const DEFAULT_TOP_ITEMS: u16 = 20;

const DAU_CHART_STEM: &str = "daily_active_users_graph";
const STATUS_CHART_STEM: &str = "status_changes_by_card_graph";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub output_dir: PathBuf,
    pub release_date: NaiveDate,
    pub feature_name: String,
    pub top_items: usize,
    pub format: ImageFormat,
}

impl AnalysisConfig {
    /// Unix timestamp of midnight UTC on the release date. Rows at or after it
    /// count as "after".
    pub fn cutoff_timestamp(&self) -> i64 {
        self.release_date.and_time(NaiveTime::MIN).and_utc().timestamp()
    }

    pub fn dau_chart_path(&self) -> PathBuf {
        self.chart_path(DAU_CHART_STEM)
    }

    pub fn status_chart_path(&self) -> PathBuf {
        self.chart_path(STATUS_CHART_STEM)
    }

    fn chart_path(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{stem}.{}", self.format.extension()))
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            release_date: NaiveDate::from_ymd_opt(2018, 6, 2).unwrap_or(NaiveDate::MIN),
            feature_name: DEFAULT_FEATURE_NAME.to_string(),
            top_items: usize::from(DEFAULT_TOP_ITEMS),
            format: ImageFormat::Png,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_is_midnight_utc_of_release_day() {
        let config = AnalysisConfig::default();
        assert_eq!(config.cutoff_timestamp(), 1_527_897_600);
    }

    #[test]
    fn default_release_date_matches_constant() {
        let parsed: NaiveDate = DEFAULT_RELEASE_DATE.parse().unwrap();
        assert_eq!(AnalysisConfig::default().release_date, parsed);
    }

    #[test]
    fn chart_paths_land_in_output_dir() {
        let config = AnalysisConfig {
            output_dir: PathBuf::from("/tmp/charts"),
            ..AnalysisConfig::default()
        };
        assert_eq!(
            config.dau_chart_path(),
            PathBuf::from("/tmp/charts/daily_active_users_graph.png")
        );
        assert_eq!(
            config.status_chart_path(),
            PathBuf::from("/tmp/charts/status_changes_by_card_graph.png")
        );
    }

    #[test]
    fn svg_format_switches_extension() {
        let config = AnalysisConfig {
            output_dir: PathBuf::from("charts"),
            format: ImageFormat::Svg,
            ..AnalysisConfig::default()
        };
        assert_eq!(
            config.dau_chart_path(),
            PathBuf::from("charts/daily_active_users_graph.svg")
        );
    }
}
