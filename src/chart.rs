use std::path::Path;
use std::sync::OnceLock;

use anyhow::Context;
use chrono::{Duration, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::config::{AnalysisConfig, ImageFormat};
use crate::models::{
    ChangeBucket, DailyActiveUsers, DauSummary, ItemChangeCount, PercentChange,
};
use crate::stats::DauPartition;

const DAU_CHART_SIZE: (u32, u32) = (2100, 1500);
const STATUS_CHART_SIZE: (u32, u32) = (2100, 900);
const FONT: &str = "sans-serif";
const REGULAR_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
const BOLD_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

const BEFORE_COLOR: RGBColor = RGBColor(0x34, 0x98, 0xdb);
const AFTER_COLOR: RGBColor = RGBColor(0x2e, 0xcc, 0x71);
const DECREASE_COLOR: RGBColor = RGBColor(0xc0, 0x39, 0x2b);
const BLUES: (RGBColor, RGBColor) = (RGBColor(0xc6, 0xdb, 0xef), RGBColor(0x08, 0x45, 0x94));
const ORANGES: (RGBColor, RGBColor) = (RGBColor(0xfd, 0xd0, 0xa2), RGBColor(0xa6, 0x36, 0x03));

/// Inputs for the before/after DAU chart.
pub struct DauChart<'a> {
    pub days: &'a [DailyActiveUsers],
    pub partition: &'a DauPartition<'a>,
    pub summary: &'a DauSummary,
}

/// Inputs for the status-change chart. `totals` is sorted by change count, descending.
pub struct StatusChart<'a> {
    pub totals: &'a [ItemChangeCount],
    pub distribution: &'a [ChangeBucket],
}

/// Registers the embedded DejaVu faces as plotters' `sans-serif` family, once per process.
fn ensure_fonts() -> anyhow::Result<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();

    let registered = REGISTERED.get_or_init(|| {
        register_font(FONT, FontStyle::Normal, REGULAR_FONT).is_ok()
            && register_font(FONT, FontStyle::Bold, BOLD_FONT).is_ok()
    });
    if !*registered {
        anyhow::bail!("embedded chart font could not be loaded");
    }
    Ok(())
}

pub fn render_dau_chart(
    path: &Path,
    config: &AnalysisConfig,
    chart: &DauChart<'_>,
) -> anyhow::Result<()> {
    ensure_fonts()?;
    match config.format {
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, DAU_CHART_SIZE).into_drawing_area();
            draw_dau(&root, config, chart)?;
            root.present()?;
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, DAU_CHART_SIZE).into_drawing_area();
            draw_dau(&root, config, chart)?;
            root.present()?;
        }
    }
    debug!(path = %path.display(), "rendered daily active users chart");
    Ok(())
}

pub fn render_status_chart(
    path: &Path,
    config: &AnalysisConfig,
    chart: &StatusChart<'_>,
) -> anyhow::Result<()> {
    ensure_fonts()?;
    match config.format {
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, STATUS_CHART_SIZE).into_drawing_area();
            draw_status(&root, config, chart)?;
            root.present()?;
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, STATUS_CHART_SIZE).into_drawing_area();
            draw_status(&root, config, chart)?;
            root.present()?;
        }
    }
    debug!(path = %path.display(), "rendered status changes chart");
    Ok(())
}

fn draw_dau<DB>(
    root: &DrawingArea<DB, Shift>,
    config: &AnalysisConfig,
    chart: &DauChart<'_>,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (upper, lower) = root.split_vertically(DAU_CHART_SIZE.1 / 2);
    draw_dau_series(&upper, config, chart)
        .context("failed to draw daily active users series")?;
    draw_dau_comparison(&lower, config, chart.summary)
        .context("failed to draw average comparison")?;
    Ok(())
}

fn draw_dau_series<DB>(
    area: &DrawingArea<DB, Shift>,
    config: &AnalysisConfig,
    chart: &DauChart<'_>,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let feature = &config.feature_name;
    let origin = chart
        .days
        .first()
        .map(|day| day.date)
        .unwrap_or(config.release_date);
    let last = chart.days.last().map(|day| day.date).unwrap_or(origin);
    let x_max = (last - origin).num_days().max(1);
    let y_max = chart
        .days
        .iter()
        .map(|day| day.active_users)
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.1;
    let offset = |date: NaiveDate| (date - origin).num_days();

    let mut ctx = ChartBuilder::on(area)
        .caption(
            format!("Daily Active Users Before and After {feature} Feature Release"),
            (FONT, 30).into_font().style(FontStyle::Bold),
        )
        .margin(24)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0i64..x_max, 0f64..y_max)?;

    ctx.configure_mesh()
        .x_desc("Date")
        .y_desc("Daily Active Users")
        .x_label_formatter(&|days| {
            (origin + Duration::days(*days))
                .format("%Y-%m")
                .to_string()
        })
        .y_label_formatter(&|users| format!("{users:.0}"))
        .label_style((FONT, 18))
        .axis_desc_style((FONT, 20))
        .draw()?;

    if chart.days.is_empty() {
        draw_notice(
            &ctx.plotting_area().strip_coord_spec(),
            "No login events recorded",
        )?;
        return Ok(());
    }

    ctx.draw_series(LineSeries::new(
        chart
            .partition
            .before
            .iter()
            .map(|day| (offset(day.date), day.active_users as f64)),
        BEFORE_COLOR.stroke_width(2),
    ))?
    .label(format!("Before {feature}"))
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], BEFORE_COLOR.stroke_width(2)));

    ctx.draw_series(LineSeries::new(
        chart
            .partition
            .after
            .iter()
            .map(|day| (offset(day.date), day.active_users as f64)),
        AFTER_COLOR.stroke_width(2),
    ))?
    .label(format!("After {feature}"))
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], AFTER_COLOR.stroke_width(2)));

    let release = offset(config.release_date);
    if (0..=x_max).contains(&release) {
        ctx.draw_series(LineSeries::new(
            vec![(release, 0.0), (release, y_max)],
            RED.stroke_width(3),
        ))?
        .label(format!(
            "{feature} Release ({})",
            config.release_date.format("%b %-d, %Y")
        ))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], RED.stroke_width(3)));
    }

    let summary = chart.summary;
    for (label, mean, color) in [
        ("Before", summary.before_mean, BEFORE_COLOR),
        ("After", summary.after_mean, AFTER_COLOR),
    ] {
        ctx.draw_series(LineSeries::new(
            vec![(0, mean), (x_max, mean)],
            color.mix(0.6).stroke_width(1),
        ))?
        .label(format!("Avg {label}: {mean:.1}"))
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 24, y)], color.mix(0.6).stroke_width(1))
        });
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .label_font((FONT, 18))
        .draw()?;

    Ok(())
}

fn draw_dau_comparison<DB>(
    area: &DrawingArea<DB, Shift>,
    config: &AnalysisConfig,
    summary: &DauSummary,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let feature = &config.feature_name;
    let means = [summary.before_mean, summary.after_mean];
    let y_max = means.iter().cloned().fold(0.0, f64::max).max(1.0) * 1.3;
    let categories = [
        period_label("Before", feature, summary.before_span),
        period_label("After", feature, summary.after_span),
    ];

    // Integer segments include both ends, so 0..1 yields exactly two bars.
    let mut ctx = ChartBuilder::on(area)
        .caption(
            format!("Average DAU Comparison: Before vs After {feature} Feature"),
            (FONT, 30).into_font().style(FontStyle::Bold),
        )
        .margin(24)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d((0u32..1u32).into_segmented(), 0f64..y_max)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .y_desc("Average Daily Active Users")
        .x_labels(2)
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(index) => categories
                .get(*index as usize)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|users| format!("{users:.0}"))
        .label_style((FONT, 18))
        .axis_desc_style((FONT, 20))
        .draw()?;

    let colors = [BEFORE_COLOR, AFTER_COLOR];
    ctx.draw_series(
        means
            .iter()
            .zip(colors)
            .enumerate()
            .flat_map(|(index, (mean, color))| {
                let index = index as u32;
                let corners = [
                    (SegmentValue::Exact(index), 0.0),
                    (SegmentValue::Exact(index + 1), *mean),
                ];
                let mut fill = Rectangle::new(corners.clone(), color.filled());
                let mut outline = Rectangle::new(corners, BLACK.stroke_width(1));
                fill.set_margin(0, 0, 90, 90);
                outline.set_margin(0, 0, 90, 90);
                [fill, outline]
            }),
    )?;

    let value_style = TextStyle::from((FONT, 26).into_font().style(FontStyle::Bold))
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    ctx.draw_series(means.iter().enumerate().map(|(index, mean)| {
        Text::new(
            format!("{mean:.2}"),
            (SegmentValue::CenterOf(index as u32), *mean),
            value_style.clone(),
        )
    }))?;

    let (annotation, color) = change_annotation(summary.change);
    let annotation_style = TextStyle::from((FONT, 24).into_font().style(FontStyle::Bold))
        .color(&color)
        .pos(Pos::new(HPos::Right, VPos::Top));
    ctx.draw_series(std::iter::once(Text::new(
        annotation,
        (SegmentValue::Exact(2), y_max * 0.97),
        annotation_style,
    )))?;

    Ok(())
}

fn draw_status<DB>(
    root: &DrawingArea<DB, Shift>,
    config: &AnalysisConfig,
    chart: &StatusChart<'_>,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(STATUS_CHART_SIZE.0 / 2);
    draw_distribution(&left, chart.distribution)
        .context("failed to draw status change distribution")?;
    draw_ranking(&right, config.top_items, chart.totals)
        .context("failed to draw status change ranking")?;
    Ok(())
}

fn draw_distribution<DB>(
    area: &DrawingArea<DB, Shift>,
    distribution: &[ChangeBucket],
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    // Integer segments are inclusive of both ends and need a nonzero span.
    let first = distribution
        .first()
        .map(|bucket| bucket.total_changes)
        .unwrap_or(0);
    let last = distribution
        .last()
        .map(|bucket| bucket.total_changes)
        .unwrap_or(first)
        .max(first + 1);
    let y_max = distribution
        .iter()
        .map(|bucket| bucket.item_count)
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.15;

    let mut ctx = ChartBuilder::on(area)
        .caption(
            "Distribution: Status Changes per Card",
            (FONT, 28).into_font().style(FontStyle::Bold),
        )
        .margin(24)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d((first..last).into_segmented(), 0f64..y_max)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc("Number of Status Changes")
        .y_desc("Number of Cards")
        .x_labels((last - first + 1).clamp(1, 30) as usize)
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(changes) => changes.to_string(),
            _ => String::new(),
        })
        .y_label_formatter(&|cards| format!("{cards:.0}"))
        .label_style((FONT, 16))
        .axis_desc_style((FONT, 20))
        .draw()?;

    if distribution.is_empty() {
        draw_notice(
            &ctx.plotting_area().strip_coord_spec(),
            "No status changes recorded",
        )?;
        return Ok(());
    }

    let len = distribution.len();
    ctx.draw_series(
        distribution
            .iter()
            .enumerate()
            .flat_map(|(index, bucket)| {
                let corners = [
                    (SegmentValue::Exact(bucket.total_changes), 0.0),
                    (
                        SegmentValue::Exact(bucket.total_changes + 1),
                        bucket.item_count as f64,
                    ),
                ];
                let mut fill = Rectangle::new(corners.clone(), shade(BLUES, index, len).filled());
                let mut outline = Rectangle::new(corners, BLACK.stroke_width(1));
                fill.set_margin(0, 0, 4, 4);
                outline.set_margin(0, 0, 4, 4);
                [fill, outline]
            }),
    )?;

    let count_style =
        TextStyle::from((FONT, 15).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
    ctx.draw_series(
        distribution
            .iter()
            .filter(|bucket| bucket.item_count > 0)
            .map(|bucket| {
                Text::new(
                    bucket.item_count.to_string(),
                    (
                        SegmentValue::CenterOf(bucket.total_changes),
                        bucket.item_count as f64,
                    ),
                    count_style.clone(),
                )
            }),
    )?;

    Ok(())
}

fn draw_ranking<DB>(
    area: &DrawingArea<DB, Shift>,
    top_items: usize,
    totals: &[ItemChangeCount],
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let top_items = top_items.max(1);
    let ranked = &totals[..totals.len().min(top_items)];
    let rows = ranked.len().max(2) as u32;
    let x_max = ranked
        .iter()
        .map(|item| item.total_changes)
        .max()
        .unwrap_or(0)
        .max(1) as f64
        * 1.1;
    // Row 0 is drawn at the bottom, so the most active item takes the last row.
    let row_of = |rank: usize| rows - 1 - rank as u32;

    let mut ctx = ChartBuilder::on(area)
        .caption(
            format!("Top {} Cards by Status Changes", top_items),
            (FONT, 28).into_font().style(FontStyle::Bold),
        )
        .margin(24)
        .x_label_area_size(60)
        .y_label_area_size(110)
        .build_cartesian_2d(0f64..x_max, (0u32..rows - 1).into_segmented())?;

    ctx.configure_mesh()
        .disable_y_mesh()
        .x_desc("Number of Status Changes")
        .y_desc("Card ID")
        .y_labels(rows as usize)
        .y_label_formatter(&|value| match value {
            SegmentValue::CenterOf(row) => ranked
                .get((rows - 1 - *row) as usize)
                .map(|item| format!("Card {}", item.item_id))
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_label_formatter(&|changes| format!("{changes:.0}"))
        .label_style((FONT, 15))
        .axis_desc_style((FONT, 20))
        .draw()?;

    if ranked.is_empty() {
        draw_notice(
            &ctx.plotting_area().strip_coord_spec(),
            "No status changes recorded",
        )?;
        return Ok(());
    }

    let len = ranked.len();
    ctx.draw_series(ranked.iter().enumerate().flat_map(|(rank, item)| {
        let row = row_of(rank);
        let corners = [
            (0.0, SegmentValue::Exact(row)),
            (item.total_changes as f64, SegmentValue::Exact(row + 1)),
        ];
        let mut fill = Rectangle::new(
            corners.clone(),
            shade(ORANGES, len - 1 - rank, len).filled(),
        );
        let mut outline = Rectangle::new(corners, BLACK.stroke_width(1));
        fill.set_margin(3, 3, 0, 0);
        outline.set_margin(3, 3, 0, 0);
        [fill, outline]
    }))?;

    Ok(())
}

fn draw_notice<DB>(area: &DrawingArea<DB, Shift>, message: &str) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (width, height) = area.dim_in_pixel();
    let style =
        TextStyle::from((FONT, 24).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new(
        message.to_string(),
        ((width / 2) as i32, (height / 2) as i32),
        style,
    ))?;
    Ok(())
}

/// Text and color of the percent-change note on the comparison panel.
fn change_annotation(change: PercentChange) -> (String, RGBColor) {
    match change {
        PercentChange::Computed(percent) if percent.abs() < 0.05 => {
            ("no change (0.0%)".to_string(), BLACK)
        }
        PercentChange::Computed(percent) if percent > 0.0 => {
            (format!("+{percent:.1}% increase"), AFTER_COLOR)
        }
        PercentChange::Computed(percent) => (format!("{percent:.1}% decrease"), DECREASE_COLOR),
        PercentChange::NoBaseline => ("N/A (no baseline data)".to_string(), BLACK),
    }
}

fn period_label(side: &str, feature: &str, span: Option<(NaiveDate, NaiveDate)>) -> String {
    match span {
        Some((first, last)) => format!(
            "{side} {feature} ({} - {})",
            first.format("%b %Y"),
            last.format("%b %Y")
        ),
        None => format!("{side} {feature} (no data)"),
    }
}

/// Linear blend from the light to the dark end of `range`, starting at 30%.
fn shade(range: (RGBColor, RGBColor), index: usize, len: usize) -> RGBColor {
    let t = if len <= 1 {
        0.6
    } else {
        0.3 + 0.6 * index as f64 / (len - 1) as f64
    };
    let blend =
        |light: u8, dark: u8| (light as f64 + (dark as f64 - light as f64) * t).round() as u8;
    let (light, dark) = range;
    RGBColor(
        blend(light.0, dark.0),
        blend(light.1, dark.1),
        blend(light.2, dark.2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn svg_config(dir: &Path) -> AnalysisConfig {
        AnalysisConfig {
            output_dir: dir.to_path_buf(),
            format: ImageFormat::Svg,
            ..AnalysisConfig::default()
        }
    }

    fn sample_days() -> Vec<DailyActiveUsers> {
        (0..60)
            .map(|offset| {
                let date = NaiveDate::from_ymd_opt(2018, 5, 3).unwrap() + Duration::days(offset);
                DailyActiveUsers {
                    date,
                    active_users: 8 + offset % 5 + if offset >= 30 { 6 } else { 0 },
                    first_login_at: date
                        .and_time(chrono::NaiveTime::MIN)
                        .and_utc()
                        .timestamp()
                        + 60,
                }
            })
            .collect()
    }

    fn sample_totals() -> Vec<ItemChangeCount> {
        vec![
            ItemChangeCount {
                item_id: 42,
                total_changes: 5,
            },
            ItemChangeCount {
                item_id: 7,
                total_changes: 3,
            },
            ItemChangeCount {
                item_id: 9,
                total_changes: 3,
            },
        ]
    }

    fn sample_distribution() -> Vec<ChangeBucket> {
        vec![
            ChangeBucket {
                total_changes: 3,
                item_count: 2,
            },
            ChangeBucket {
                total_changes: 5,
                item_count: 1,
            },
        ]
    }

    #[test]
    fn renders_png_charts_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            output_dir: dir.path().to_path_buf(),
            ..AnalysisConfig::default()
        };
        assert_eq!(config.format, ImageFormat::Png);

        let days = sample_days();
        let partition = stats::partition_by_cutoff(&days, config.cutoff_timestamp());
        let summary = stats::summarize_dau(&partition);
        let dau_path = config.dau_chart_path();
        render_dau_chart(
            &dau_path,
            &config,
            &DauChart {
                days: &days,
                partition: &partition,
                summary: &summary,
            },
        )
        .unwrap();

        let totals = sample_totals();
        let distribution = sample_distribution();
        let status_path = config.status_chart_path();
        render_status_chart(
            &status_path,
            &config,
            &StatusChart {
                totals: &totals,
                distribution: &distribution,
            },
        )
        .unwrap();

        for path in [dau_path, status_path] {
            let bytes = std::fs::read(&path).unwrap();
            assert!(bytes.starts_with(PNG_MAGIC), "{} is not a PNG", path.display());
        }
    }

    #[test]
    fn renders_dau_chart_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = svg_config(dir.path());
        let days = sample_days();
        let partition = stats::partition_by_cutoff(&days, config.cutoff_timestamp());
        let summary = stats::summarize_dau(&partition);

        let path = config.dau_chart_path();
        render_dau_chart(
            &path,
            &config,
            &DauChart {
                days: &days,
                partition: &partition,
                summary: &summary,
            },
        )
        .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Kanban"));
    }

    #[test]
    fn renders_dau_chart_without_rows() {
        let dir = tempfile::tempdir().unwrap();
        let config = svg_config(dir.path());
        let partition = stats::partition_by_cutoff(&[], config.cutoff_timestamp());
        let summary = stats::summarize_dau(&partition);

        let path = config.dau_chart_path();
        render_dau_chart(
            &path,
            &config,
            &DauChart {
                days: &[],
                partition: &partition,
                summary: &summary,
            },
        )
        .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("N/A (no baseline data)"));
    }

    #[test]
    fn renders_status_chart_with_top_items_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            top_items: 2,
            ..svg_config(dir.path())
        };
        let totals = sample_totals();
        let distribution = sample_distribution();

        let path = config.status_chart_path();
        render_status_chart(
            &path,
            &config,
            &StatusChart {
                totals: &totals,
                distribution: &distribution,
            },
        )
        .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Top 2 Cards"));
        assert!(svg.contains("Card 42"));
        assert!(svg.contains("Card 7"));
        assert!(!svg.contains("Card 9"));
    }

    #[test]
    fn zero_top_items_still_ranks_the_leader() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            top_items: 0,
            ..svg_config(dir.path())
        };
        let totals = sample_totals();
        let distribution = sample_distribution();

        let path = config.status_chart_path();
        render_status_chart(
            &path,
            &config,
            &StatusChart {
                totals: &totals,
                distribution: &distribution,
            },
        )
        .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Top 1 Cards"));
        assert!(svg.contains("Card 42"));
        assert!(!svg.contains("No status changes recorded"));
    }

    #[test]
    fn renders_status_chart_without_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = svg_config(dir.path());
        let path = config.status_chart_path();
        render_status_chart(
            &path,
            &config,
            &StatusChart {
                totals: &[],
                distribution: &[],
            },
        )
        .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("No status changes recorded"));
    }

    #[test]
    fn unwritable_destination_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        for format in [ImageFormat::Png, ImageFormat::Svg] {
            let config = AnalysisConfig {
                format,
                ..svg_config(&dir.path().join("missing"))
            };
            let result = render_status_chart(
                &config.status_chart_path(),
                &config,
                &StatusChart {
                    totals: &[],
                    distribution: &[],
                },
            );
            assert!(result.is_err());
        }
    }

    #[test]
    fn change_annotation_keeps_one_decimal() {
        assert_eq!(
            change_annotation(PercentChange::Computed(100.0)).0,
            "+100.0% increase"
        );
        assert_eq!(
            change_annotation(PercentChange::Computed(-0.3)).0,
            "-0.3% decrease"
        );
        assert_eq!(
            change_annotation(PercentChange::Computed(-0.01)).0,
            "no change (0.0%)"
        );
        assert_eq!(
            change_annotation(PercentChange::NoBaseline).0,
            "N/A (no baseline data)"
        );
    }

    #[test]
    fn shades_run_light_to_dark() {
        let light = shade(BLUES, 0, 3);
        let dark = shade(BLUES, 2, 3);
        assert!(light.2 > dark.2);
        assert_eq!(shade(BLUES, 0, 1), shade(BLUES, 5, 1));
    }

    #[test]
    fn period_labels_name_month_span() {
        let first = NaiveDate::from_ymd_opt(2018, 2, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2018, 5, 31).unwrap();
        assert_eq!(
            period_label("Before", "Kanban", Some((first, last))),
            "Before Kanban (Feb 2018 - May 2018)"
        );
        assert_eq!(
            period_label("After", "Kanban", None),
            "After Kanban (no data)"
        );
    }
}
