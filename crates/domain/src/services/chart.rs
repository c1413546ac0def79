//! Progress chart computation and SVG rendering.
//!
//! Turns a player's sessions into a plotted series for one metric with
//! min/avg/max reference lines. Everything here is a pure function of its
//! inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::models::TrainingSession;

/// Metric plotted on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMetric {
    #[default]
    HsRate,
    Accuracy,
    Kills,
    Deaths,
    DurationMinutes,
    Kd,
}

impl ChartMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartMetric::HsRate => "hs_rate",
            ChartMetric::Accuracy => "accuracy",
            ChartMetric::Kills => "kills",
            ChartMetric::Deaths => "deaths",
            ChartMetric::DurationMinutes => "duration_minutes",
            ChartMetric::Kd => "kd",
        }
    }

    /// Value of this metric for one session. Missing optional stats count as 0.
    pub fn value_of(&self, session: &TrainingSession) -> f64 {
        match self {
            ChartMetric::HsRate => session.hs_rate,
            ChartMetric::Accuracy => session.accuracy.unwrap_or(0.0),
            ChartMetric::Kills => f64::from(session.kills),
            ChartMetric::Deaths => f64::from(session.deaths),
            ChartMetric::DurationMinutes => f64::from(session.duration_minutes.unwrap_or(0)),
            ChartMetric::Kd => kill_death_ratio(session.kills, session.deaths),
        }
    }
}

impl FromStr for ChartMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hs_rate" => Ok(ChartMetric::HsRate),
            "accuracy" => Ok(ChartMetric::Accuracy),
            "kills" => Ok(ChartMetric::Kills),
            "deaths" => Ok(ChartMetric::Deaths),
            "duration_minutes" => Ok(ChartMetric::DurationMinutes),
            "kd" => Ok(ChartMetric::Kd),
            _ => Err(format!("Invalid chart metric: {}", s)),
        }
    }
}

impl fmt::Display for ChartMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// K/D ratio; with zero deaths the raw kill count is used.
pub fn kill_death_ratio(kills: i32, deaths: i32) -> f64 {
    if deaths == 0 {
        f64::from(kills)
    } else {
        f64::from(kills) / f64::from(deaths)
    }
}

/// How an exercise filter compares against a session's exercise type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseMatch {
    #[default]
    Exact,
    Contains,
}

/// Case-insensitive filter on `exercise_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseFilter {
    needle: String,
    mode: ExerciseMatch,
}

impl ExerciseFilter {
    /// Returns `None` for a blank filter, which means "all sessions".
    pub fn new(exercise_type: &str, mode: ExerciseMatch) -> Option<Self> {
        let needle = exercise_type.trim().to_lowercase();
        if needle.is_empty() {
            None
        } else {
            Some(Self { needle, mode })
        }
    }

    pub fn matches(&self, exercise_type: Option<&str>) -> bool {
        let candidate = exercise_type.unwrap_or_default().trim().to_lowercase();
        match self.mode {
            ExerciseMatch::Exact => candidate == self.needle,
            ExerciseMatch::Contains => candidate.contains(&self.needle),
        }
    }
}

/// Fixed pixel geometry of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 220.0,
            padding: 30.0,
        }
    }
}

impl ChartGeometry {
    fn inner_width(&self) -> f64 {
        self.width - self.padding * 2.0
    }

    fn inner_height(&self) -> f64 {
        self.height - self.padding * 2.0
    }
}

/// Which reference lines to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceToggles {
    pub show_min: bool,
    pub show_avg: bool,
    pub show_max: bool,
}

impl Default for ReferenceToggles {
    fn default() -> Self {
        Self {
            show_min: true,
            show_avg: true,
            show_max: true,
        }
    }
}

/// Series statistics. `max` is the plotting max, never equal to `min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Computes min/avg/max, nudging a flat series to `[v, v + 1]`.
pub fn series_stats(values: &[f64]) -> Option<SeriesStats> {
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let raw_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max = if raw_max == min { min + 1.0 } else { raw_max };
    let avg = values.iter().sum::<f64>() / values.len() as f64;

    Some(SeriesStats { min, max, avg })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Min,
    Avg,
    Max,
}

impl ReferenceKind {
    fn color(&self) -> &'static str {
        match self {
            ReferenceKind::Min => "#ef4444",
            ReferenceKind::Avg => "#eab308",
            ReferenceKind::Max => "#22c55e",
        }
    }
}

/// A dashed horizontal line at a statistic's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub kind: ReferenceKind,
    pub value: f64,
    pub y: f64,
    pub path: String,
}

/// One plotted session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub session_date: DateTime<Utc>,
}

/// A fully computed chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub metric: ChartMetric,
    pub geometry: ChartGeometry,
    pub points: Vec<ChartPoint>,
    pub stats: Option<SeriesStats>,
    pub path: Option<String>,
    pub reference_lines: Vec<ReferenceLine>,
}

/// Filters, sorts and maps sessions onto the chart area.
pub fn build_chart(
    sessions: &[TrainingSession],
    metric: ChartMetric,
    filter: Option<&ExerciseFilter>,
    geometry: ChartGeometry,
    toggles: ReferenceToggles,
) -> Chart {
    let mut selected: Vec<&TrainingSession> = sessions
        .iter()
        .filter(|s| filter.map_or(true, |f| f.matches(s.exercise_type.as_deref())))
        .collect();
    selected.sort_by_key(|s| s.session_date);

    let values: Vec<f64> = selected.iter().map(|s| metric.value_of(s)).collect();
    let Some(stats) = series_stats(&values) else {
        return Chart {
            metric,
            geometry,
            points: Vec::new(),
            stats: None,
            path: None,
            reference_lines: Vec::new(),
        };
    };

    let last_index = selected.len().saturating_sub(1).max(1) as f64;
    let points: Vec<ChartPoint> = selected
        .iter()
        .zip(values.iter())
        .enumerate()
        .map(|(i, (session, &value))| ChartPoint {
            x: geometry.padding + (i as f64 / last_index) * geometry.inner_width(),
            y: value_to_y(value, &stats, &geometry),
            value,
            session_date: session.session_date,
        })
        .collect();

    let path = format!(
        "M {}",
        points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" L ")
    );

    let reference_lines = [
        (ReferenceKind::Min, stats.min, toggles.show_min),
        (ReferenceKind::Avg, stats.avg, toggles.show_avg),
        (ReferenceKind::Max, stats.max, toggles.show_max),
    ]
    .into_iter()
    .filter(|(_, _, shown)| *shown)
    .map(|(kind, value, _)| {
        let y = value_to_y(value, &stats, &geometry);
        ReferenceLine {
            kind,
            value,
            y,
            path: format!(
                "M {} {} L {} {}",
                geometry.padding,
                y,
                geometry.width - geometry.padding,
                y
            ),
        }
    })
    .collect();

    Chart {
        metric,
        geometry,
        points,
        stats: Some(stats),
        path: Some(path),
        reference_lines,
    }
}

fn value_to_y(value: f64, stats: &SeriesStats, geometry: &ChartGeometry) -> f64 {
    let ratio = (value - stats.min) / (stats.max - stats.min);
    geometry.padding + geometry.inner_height() - ratio * geometry.inner_height()
}

impl Chart {
    /// Renders the chart as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let g = &self.geometry;
        let mut svg = String::new();

        // write! into a String cannot fail
        let _ = write!(
            svg,
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"##,
            w = g.width,
            h = g.height
        );
        let _ = write!(
            svg,
            r##"<line x1="{p}" y1="{p}" x2="{p}" y2="{b}" stroke="#3f3f46" stroke-width="1"/><line x1="{p}" y1="{b}" x2="{r}" y2="{b}" stroke="#3f3f46" stroke-width="1"/>"##,
            p = g.padding,
            b = g.height - g.padding,
            r = g.width - g.padding
        );

        let Some(path) = &self.path else {
            svg.push_str("</svg>");
            return svg;
        };

        for line in &self.reference_lines {
            let _ = write!(
                svg,
                r##"<path d="{}" fill="none" stroke="{}" stroke-width="1" stroke-dasharray="5,5"/>"##,
                line.path,
                line.kind.color()
            );
        }

        svg.push_str(
            r##"<defs><linearGradient id="progressGradient" x1="0%" y1="0%" x2="100%" y2="0%"><stop offset="0%" stop-color="#f97316"/><stop offset="100%" stop-color="#22c55e"/></linearGradient></defs>"##,
        );
        let _ = write!(
            svg,
            r##"<path d="{}" fill="none" stroke="url(#progressGradient)" stroke-width="2"/>"##,
            path
        );

        let n = self.points.len();
        let label_every = n.div_ceil(6).max(1);
        let last = n.saturating_sub(1).max(1) as f64;
        for (i, point) in self.points.iter().enumerate() {
            let (r, gr, b) = gradient_color(i as f64 / last);
            let _ = write!(
                svg,
                r##"<circle cx="{}" cy="{}" r="3" fill="rgb({}, {}, {})"><title>{:.2}</title></circle>"##,
                point.x, point.y, r, gr, b, point.value
            );
            if i % label_every == 0 {
                let _ = write!(
                    svg,
                    r##"<text x="{}" y="{}" font-size="10" text-anchor="middle" fill="#a1a1aa">{}</text>"##,
                    point.x,
                    g.height - g.padding + 14.0,
                    point.session_date.format("%-m/%-d")
                );
            }
        }

        svg.push_str("</svg>");
        svg
    }
}

/// Orange-to-green interpolation for point markers.
fn gradient_color(t: f64) -> (u8, u8, u8) {
    let lerp = |from: f64, to: f64| (from * (1.0 - t) + to * t).round() as u8;
    (lerp(249.0, 34.0), lerp(115.0, 197.0), lerp(22.0, 94.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn session(day: i64, kills: i32, deaths: i32, hs_rate: f64, exercise: Option<&str>) -> TrainingSession {
        let base = Utc.with_ymd_and_hms(2025, 4, 1, 18, 0, 0).unwrap();
        TrainingSession {
            id: Uuid::new_v4(),
            player_id: Uuid::new_v4(),
            session_date: base + Duration::days(day),
            hs_rate,
            kills,
            deaths,
            accuracy: None,
            map_name: "Mirage".to_string(),
            duration_minutes: None,
            notes: None,
            exercise_type: exercise.map(str::to_string),
            created_at: base,
        }
    }

    #[test]
    fn test_kd_with_zero_deaths_is_kills() {
        assert_eq!(ChartMetric::Kd.value_of(&session(0, 17, 0, 0.0, None)), 17.0);
    }

    #[test]
    fn test_kd_divides_kills_by_deaths() {
        assert_eq!(ChartMetric::Kd.value_of(&session(0, 30, 12, 0.0, None)), 2.5);
        assert_eq!(kill_death_ratio(0, 4), 0.0);
    }

    #[test]
    fn test_missing_optional_metrics_count_as_zero() {
        let s = session(0, 1, 1, 10.0, None);
        assert_eq!(ChartMetric::Accuracy.value_of(&s), 0.0);
        assert_eq!(ChartMetric::DurationMinutes.value_of(&s), 0.0);
    }

    #[test]
    fn test_series_stats_flat_series_is_nudged() {
        let stats = series_stats(&[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(stats.min, 4.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.avg, 4.0);
    }

    #[test]
    fn test_series_stats_regular_series() {
        let stats = series_stats(&[1.0, 3.0, 8.0]).unwrap();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 8.0);
        assert_eq!(stats.avg, 4.0);
        assert!(series_stats(&[]).is_none());
    }

    #[test]
    fn test_build_chart_sorts_by_date_and_maps_coordinates() {
        let sessions = vec![
            session(2, 0, 0, 60.0, None),
            session(0, 0, 0, 20.0, None),
            session(1, 0, 0, 40.0, None),
        ];
        let chart = build_chart(
            &sessions,
            ChartMetric::HsRate,
            None,
            ChartGeometry::default(),
            ReferenceToggles::default(),
        );

        let values: Vec<f64> = chart.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![20.0, 40.0, 60.0]);

        // x spans [padding, width - padding]
        assert_eq!(chart.points[0].x, 30.0);
        assert_eq!(chart.points[1].x, 320.0);
        assert_eq!(chart.points[2].x, 610.0);

        // min sits on the bottom edge, max on the top edge
        assert_eq!(chart.points[0].y, 190.0);
        assert_eq!(chart.points[1].y, 110.0);
        assert_eq!(chart.points[2].y, 30.0);

        assert_eq!(
            chart.path.as_deref(),
            Some("M 30,190 L 320,110 L 610,30")
        );
    }

    #[test]
    fn test_build_chart_single_point() {
        let sessions = vec![session(0, 9, 3, 50.0, None)];
        let chart = build_chart(
            &sessions,
            ChartMetric::Kd,
            None,
            ChartGeometry::default(),
            ReferenceToggles::default(),
        );

        let stats = chart.stats.unwrap();
        assert_eq!(stats.min, 3.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(chart.points.len(), 1);
        assert_eq!(chart.points[0].x, 30.0);
        assert_eq!(chart.points[0].y, 190.0);
    }

    #[test]
    fn test_reference_lines_follow_toggles() {
        let sessions = vec![session(0, 0, 0, 10.0, None), session(1, 0, 0, 30.0, None)];
        let toggles = ReferenceToggles {
            show_min: false,
            show_avg: true,
            show_max: true,
        };
        let chart = build_chart(
            &sessions,
            ChartMetric::HsRate,
            None,
            ChartGeometry::default(),
            toggles,
        );

        let kinds: Vec<ReferenceKind> = chart.reference_lines.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![ReferenceKind::Avg, ReferenceKind::Max]);

        let avg = &chart.reference_lines[0];
        assert_eq!(avg.value, 20.0);
        assert_eq!(avg.y, 110.0);
        assert_eq!(avg.path, "M 30 110 L 610 110");
    }

    #[test]
    fn test_exercise_filter_exact_and_contains() {
        let exact = ExerciseFilter::new("Deathmatch", ExerciseMatch::Exact).unwrap();
        assert!(exact.matches(Some("deathmatch")));
        assert!(!exact.matches(Some("FFA Deathmatch")));
        assert!(!exact.matches(None));

        let contains = ExerciseFilter::new("death", ExerciseMatch::Contains).unwrap();
        assert!(contains.matches(Some("FFA Deathmatch")));
        assert!(!contains.matches(Some("Aim Botz")));

        assert!(ExerciseFilter::new("  ", ExerciseMatch::Exact).is_none());
    }

    #[test]
    fn test_build_chart_applies_filter() {
        let sessions = vec![
            session(0, 10, 5, 30.0, Some("Aim")),
            session(1, 20, 5, 35.0, Some("Retake")),
            session(2, 30, 5, 40.0, Some("aim")),
        ];
        let filter = ExerciseFilter::new("AIM", ExerciseMatch::Exact).unwrap();
        let chart = build_chart(
            &sessions,
            ChartMetric::Kills,
            Some(&filter),
            ChartGeometry::default(),
            ReferenceToggles::default(),
        );

        let values: Vec<f64> = chart.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![10.0, 30.0]);
    }

    #[test]
    fn test_build_chart_empty_after_filter() {
        let sessions = vec![session(0, 10, 5, 30.0, Some("Aim"))];
        let filter = ExerciseFilter::new("Retake", ExerciseMatch::Exact).unwrap();
        let chart = build_chart(
            &sessions,
            ChartMetric::Kills,
            Some(&filter),
            ChartGeometry::default(),
            ReferenceToggles::default(),
        );

        assert!(chart.points.is_empty());
        assert!(chart.stats.is_none());
        assert!(chart.path.is_none());
        assert!(chart.reference_lines.is_empty());
        assert!(chart.to_svg().ends_with("</svg>"));
    }

    #[test]
    fn test_to_svg_contains_series_and_reference_lines() {
        let sessions = vec![session(0, 0, 0, 10.0, None), session(1, 0, 0, 30.0, None)];
        let chart = build_chart(
            &sessions,
            ChartMetric::HsRate,
            None,
            ChartGeometry::default(),
            ReferenceToggles::default(),
        );
        let svg = chart.to_svg();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("M 30,190 L 610,30"));
        assert_eq!(svg.matches("stroke-dasharray=\"5,5\"").count(), 3);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(">4/1<"));
        assert!(svg.contains("rgb(249, 115, 22)"));
        assert!(svg.contains("rgb(34, 197, 94)"));
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("kd".parse::<ChartMetric>().unwrap(), ChartMetric::Kd);
        assert_eq!(
            "duration_minutes".parse::<ChartMetric>().unwrap(),
            ChartMetric::DurationMinutes
        );
        assert!("rating".parse::<ChartMetric>().is_err());
    }
}
