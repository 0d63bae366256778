//! Chart geometry: samples the projection over the remaining years and maps
//! each sample into pixel space.

use serde::Serialize;

use crate::core::{MAX_PLOTTED_AGE, project, years_until};

/// Target number of sampling intervals across the horizon.
pub const MAX_SAMPLE_INTERVALS: u32 = 20;
pub const MIN_PADDING_PX: f64 = 40.0;
pub const MAX_PADDING_PX: f64 = 60.0;
const PADDING_WIDTH_FRACTION: f64 = 0.05;

/// Size of the drawing surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// False until layout has given the surface a real size.
    pub fn is_sized(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Years from now.
    pub year: u32,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartGeometry {
    pub viewport: Viewport,
    pub padding: f64,
    pub plot_width: f64,
    pub plot_height: f64,
    pub min_value: f64,
    pub max_value: f64,
    pub value_range: f64,
    pub current_age: u32,
    pub horizon: u32,
}

impl ChartGeometry {
    /// Pixel y for a projected value; larger values sit higher.
    pub fn value_to_y(&self, value: f64) -> f64 {
        self.padding + self.plot_height
            - ((value - self.min_value) / self.value_range) * self.plot_height
    }

    /// Pixel x for a number of years from now, on the continuous age axis.
    pub fn years_to_x(&self, years: u32) -> f64 {
        self.padding + (self.plot_width / f64::from(self.horizon)) * f64::from(years)
    }

    pub fn plot_bottom(&self) -> f64 {
        self.viewport.height - self.padding
    }

    pub fn plot_right(&self) -> f64 {
        self.viewport.width - self.padding
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltChart {
    pub points: Vec<ChartPoint>,
    pub geometry: ChartGeometry,
}

pub fn padding_for_width(width: f64) -> f64 {
    (width * PADDING_WIDTH_FRACTION).clamp(MIN_PADDING_PX, MAX_PADDING_PX)
}

pub fn sampling_step(horizon: u32) -> u32 {
    (horizon / MAX_SAMPLE_INTERVALS).max(1)
}

/// Years at which the series is sampled. Always ends exactly on `horizon`.
pub fn sample_years(horizon: u32) -> Vec<u32> {
    let step = sampling_step(horizon) as usize;
    let mut years = (0..=horizon).step_by(step).collect::<Vec<_>>();
    if years.last() != Some(&horizon) {
        years.push(horizon);
    }
    years
}

/// Builds the projection series from `current_age` to the maximum plotted age.
///
/// Returns `None` when there is nothing to plot: the horizon is zero, or the
/// surface is unsized or too small to leave any drawable area after padding.
pub fn build_chart(
    total_principal: f64,
    monthly_contribution: f64,
    annual_rate_percent: f64,
    current_age: u32,
    viewport: Viewport,
) -> Option<BuiltChart> {
    let horizon = years_until(current_age, MAX_PLOTTED_AGE);
    if horizon == 0 || !viewport.is_sized() {
        return None;
    }

    let padding = padding_for_width(viewport.width);
    let plot_width = viewport.width - 2.0 * padding;
    let plot_height = viewport.height - 2.0 * padding;
    if plot_width <= 0.0 || plot_height <= 0.0 {
        return None;
    }

    let samples = sample_years(horizon)
        .into_iter()
        .map(|year| {
            let value = project(total_principal, monthly_contribution, annual_rate_percent, year);
            (year, value)
        })
        .collect::<Vec<_>>();

    let max_value = samples
        .iter()
        .map(|&(_, v)| v)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_value = samples
        .iter()
        .map(|&(_, v)| v)
        .fold(total_principal, f64::min);
    let raw_range = max_value - min_value;
    let value_range = if raw_range == 0.0 { 1.0 } else { raw_range };

    let geometry = ChartGeometry {
        viewport,
        padding,
        plot_width,
        plot_height,
        min_value,
        max_value,
        value_range,
        current_age,
        horizon,
    };

    let x_step = plot_width / (samples.len() - 1) as f64;
    let points = samples
        .into_iter()
        .enumerate()
        .map(|(i, (year, value))| ChartPoint {
            year,
            value,
            x: padding + x_step * i as f64,
            y: geometry.value_to_y(value),
            age: current_age + year,
        })
        .collect();

    Some(BuiltChart { points, geometry })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-9;

    fn desktop() -> Viewport {
        Viewport::new(800.0, 400.0)
    }

    #[test]
    fn padding_is_clamped() {
        assert_eq!(padding_for_width(320.0), MIN_PADDING_PX);
        assert_eq!(padding_for_width(1000.0), 50.0);
        assert_eq!(padding_for_width(4000.0), MAX_PADDING_PX);
    }

    #[test]
    fn sampling_appends_uneven_endpoint() {
        // 54 years -> step 2 -> 0..=54 lands exactly.
        let even = sample_years(54);
        assert_eq!(even.len(), 28);
        assert_eq!(*even.last().expect("non-empty"), 54);

        // 41 years -> step 2 -> last regular sample is 40.
        let uneven = sample_years(41);
        assert_eq!(&uneven[uneven.len() - 2..], &[40, 41]);

        assert_eq!(sample_years(7), (0..=7).collect::<Vec<_>>());
    }

    #[test]
    fn build_chart_maps_endpoints_to_plot_corners() {
        let chart = build_chart(1523.0, 0.0, 7.0, 11, desktop()).expect("chart");
        let g = chart.geometry;
        assert_eq!(g.horizon, 54);
        assert_eq!(g.padding, MIN_PADDING_PX);

        let first = chart.points.first().expect("first");
        let last = chart.points.last().expect("last");
        assert_eq!(first.age, 11);
        assert_eq!(last.age, 65);
        assert!((first.x - g.padding).abs() < EPS);
        assert!((last.x - g.plot_right()).abs() < EPS);
        // The starting balance is the series minimum and the endpoint the maximum.
        assert!((first.y - g.plot_bottom()).abs() < EPS);
        assert!((last.y - g.padding).abs() < EPS);
    }

    #[test]
    fn build_chart_points_are_ordered() {
        let chart = build_chart(100.0, 25.0, 7.0, 13, desktop()).expect("chart");
        for pair in chart.points.windows(2) {
            assert!(pair[0].year < pair[1].year);
            assert!(pair[0].x < pair[1].x);
            assert!(pair[0].y >= pair[1].y);
        }
    }

    #[test]
    fn flat_series_uses_unit_range() {
        let chart = build_chart(0.0, 0.0, 7.0, 11, desktop()).expect("chart");
        assert_eq!(chart.geometry.value_range, 1.0);
        for p in &chart.points {
            assert!((p.y - chart.geometry.plot_bottom()).abs() < EPS);
        }
    }

    #[test]
    fn no_chart_without_horizon_or_surface() {
        assert!(build_chart(1523.0, 0.0, 7.0, 65, desktop()).is_none());
        assert!(build_chart(1523.0, 0.0, 7.0, 70, desktop()).is_none());
        assert!(build_chart(1523.0, 0.0, 7.0, 11, Viewport::new(0.0, 400.0)).is_none());
        assert!(build_chart(1523.0, 0.0, 7.0, 11, Viewport::new(800.0, 60.0)).is_none());
    }

    #[test]
    fn key_age_positions_follow_continuous_axis() {
        let chart = build_chart(1523.0, 0.0, 7.0, 11, desktop()).expect("chart");
        let g = chart.geometry;
        assert!((g.years_to_x(0) - g.padding).abs() < EPS);
        assert!((g.years_to_x(54) - g.plot_right()).abs() < EPS);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_series_always_ends_on_horizon(current_age in 0u32..65, monthly in 0u32..1_000) {
            let chart = build_chart(1523.0, f64::from(monthly), 7.0, current_age, desktop())
                .expect("chart for positive horizon");
            let horizon = 65 - current_age;
            let last = chart.points.last().expect("non-empty");
            prop_assert_eq!(last.year, horizon);
            prop_assert_eq!(chart.points[0].year, 0);
            prop_assert!(chart.points.len() >= 2);
            prop_assert!(chart.points.len() <= horizon as usize + 1);
        }
    }
}
