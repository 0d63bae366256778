//! Turns a built chart into an ordered list of drawing primitives.
//!
//! The list is backend-neutral; `svg::to_svg` is the only consumer in this crate.

use serde::Serialize;

use super::builder::BuiltChart;
use crate::core::{MAX_PLOTTED_AGE, TARGET_AGES, Theme, format_currency, years_until};

/// Below this surface width labels are thinned out.
pub const NARROW_WIDTH_PX: f64 = 480.0;
pub const GRID_DIVISIONS: u32 = 5;

pub const GRID_COLOR: &str = "#303030";
pub const LABEL_COLOR: &str = "#AAAAAA";
pub const TITLE_COLOR: &str = "#FFFFFF";
pub const KEY_AGE_COLOR: &str = "#34a853";
pub const FONT_FAMILY: &str = "Montserrat, sans-serif";

const KEY_AGE_DASH: [f64; 2] = [5.0, 5.0];

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrawCommand {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: &'static str,
        width: f64,
        dash: Option<[f64; 2]>,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        color: &'static str,
        width: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        color: &'static str,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: &'static str,
        size: f64,
        align: TextAlign,
        weight: FontWeight,
    },
}

/// Size-dependent stroke and font metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub font_size: f64,
    pub title_font_size: f64,
    pub line_width: f64,
    pub point_radius: f64,
    pub key_age_line_width: f64,
}

impl Metrics {
    pub fn for_width(width: f64) -> Self {
        let line_width = (width * 0.006).clamp(2.0, 3.0);
        Self {
            font_size: (width * 0.03).clamp(10.0, 12.0),
            title_font_size: (width * 0.035).clamp(10.0, 14.0),
            line_width,
            point_radius: (width * 0.012).clamp(3.0, 5.0),
            key_age_line_width: (line_width * 0.67).max(1.0),
        }
    }
}

/// Every `n`-th x-axis label is drawn; narrow surfaces keep about four.
pub fn x_label_interval(width: f64, point_count: usize) -> usize {
    if width < NARROW_WIDTH_PX {
        point_count.div_ceil(4).max(1)
    } else {
        1
    }
}

fn key_age_label_visible(width: f64, age: u32) -> bool {
    width >= NARROW_WIDTH_PX || age == 18 || age == MAX_PLOTTED_AGE
}

pub fn render(chart: &BuiltChart, theme: Theme) -> Vec<DrawCommand> {
    let g = &chart.geometry;
    let width = g.viewport.width;
    let metrics = Metrics::for_width(width);
    let series_color = theme.primary_color();
    let mut commands = Vec::with_capacity(chart.points.len() * 2 + 24);

    for i in 0..=GRID_DIVISIONS {
        let y = g.padding + (g.plot_height / f64::from(GRID_DIVISIONS)) * f64::from(i);
        commands.push(DrawCommand::Line {
            x1: g.padding,
            y1: y,
            x2: g.plot_right(),
            y2: y,
            color: GRID_COLOR,
            width: 1.0,
            dash: None,
        });
        let value = g.max_value - (g.value_range / f64::from(GRID_DIVISIONS)) * f64::from(i);
        commands.push(DrawCommand::Text {
            x: g.padding - 12.0,
            y: y + 4.0,
            text: format_currency(value),
            color: LABEL_COLOR,
            size: metrics.font_size,
            align: TextAlign::Right,
            weight: FontWeight::Normal,
        });
    }

    let interval = x_label_interval(width, chart.points.len());
    for point in chart.points.iter().step_by(interval) {
        commands.push(DrawCommand::Text {
            x: point.x,
            y: g.plot_bottom() + 18.0,
            text: point.age.to_string(),
            color: LABEL_COLOR,
            size: metrics.font_size,
            align: TextAlign::Center,
            weight: FontWeight::Normal,
        });
    }

    commands.push(DrawCommand::Polyline {
        points: chart.points.iter().map(|p| (p.x, p.y)).collect(),
        color: series_color,
        width: metrics.line_width,
    });

    for point in &chart.points {
        commands.push(DrawCommand::Circle {
            cx: point.x,
            cy: point.y,
            r: metrics.point_radius,
            color: series_color,
        });
    }

    commands.push(DrawCommand::Text {
        x: width / 2.0,
        y: g.viewport.height - 8.0,
        text: "Age".to_string(),
        color: TITLE_COLOR,
        size: metrics.title_font_size,
        align: TextAlign::Center,
        weight: FontWeight::Medium,
    });

    for age in TARGET_AGES {
        if age <= g.current_age || age > MAX_PLOTTED_AGE {
            continue;
        }
        let x = g.years_to_x(years_until(g.current_age, age));
        commands.push(DrawCommand::Line {
            x1: x,
            y1: g.padding,
            x2: x,
            y2: g.plot_bottom(),
            color: KEY_AGE_COLOR,
            width: metrics.key_age_line_width,
            dash: Some(KEY_AGE_DASH),
        });
        if key_age_label_visible(width, age) {
            commands.push(DrawCommand::Text {
                x,
                y: g.padding - 8.0,
                text: format!("Age {age}"),
                color: KEY_AGE_COLOR,
                size: metrics.font_size,
                align: TextAlign::Center,
                weight: FontWeight::Medium,
            });
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::builder::{Viewport, build_chart};

    fn texts(commands: &[DrawCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn dashed_lines(commands: &[DrawCommand]) -> usize {
        commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { dash: Some(_), .. }))
            .count()
    }

    #[test]
    fn metrics_are_clamped() {
        let small = Metrics::for_width(200.0);
        assert_eq!(small.font_size, 10.0);
        assert_eq!(small.line_width, 2.0);
        assert_eq!(small.point_radius, 3.0);
        assert_eq!(small.key_age_line_width, 2.0 * 0.67);

        let large = Metrics::for_width(2000.0);
        assert_eq!(large.font_size, 12.0);
        assert_eq!(large.title_font_size, 14.0);
        assert_eq!(large.line_width, 3.0);
        assert_eq!(large.point_radius, 5.0);
    }

    #[test]
    fn label_interval_thins_on_narrow_surfaces() {
        assert_eq!(x_label_interval(800.0, 28), 1);
        assert_eq!(x_label_interval(400.0, 28), 7);
        assert_eq!(x_label_interval(400.0, 27), 7);
        assert_eq!(x_label_interval(400.0, 0), 1);
    }

    #[test]
    fn wide_chart_draws_every_element_in_order() {
        let chart = build_chart(1523.0, 0.0, 7.0, 11, Viewport::new(800.0, 400.0)).expect("chart");
        let commands = render(&chart, Theme::Purple);

        let first_polyline = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Polyline { .. }))
            .expect("series line");
        let first_circle = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Circle { .. }))
            .expect("point markers");
        assert!(first_polyline < first_circle);

        let circles = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { color, .. } if *color == "#bb86fc"))
            .count();
        assert_eq!(circles, chart.points.len());

        let labels = texts(&commands);
        assert!(labels.contains(&"Age 18"));
        assert!(labels.contains(&"Age 22"));
        assert!(labels.contains(&"Age 65"));
        assert!(labels.contains(&"Age"));
        assert!(labels.contains(&"$1,523"));
        assert_eq!(dashed_lines(&commands), 3);
    }

    #[test]
    fn narrow_chart_hides_middle_key_age_label() {
        let chart = build_chart(1523.0, 0.0, 7.0, 11, Viewport::new(400.0, 300.0)).expect("chart");
        let commands = render(&chart, Theme::Blue);
        let labels = texts(&commands);
        assert!(labels.contains(&"Age 18"));
        assert!(!labels.contains(&"Age 22"));
        assert!(labels.contains(&"Age 65"));
        assert_eq!(dashed_lines(&commands), 3);

        // 28 points every 7th label -> ages 11, 25, 39, 53.
        assert!(labels.contains(&"11"));
        assert!(labels.contains(&"25"));
        assert!(!labels.contains(&"13"));
    }

    #[test]
    fn key_ages_already_passed_are_skipped() {
        let chart = build_chart(1523.0, 0.0, 7.0, 20, Viewport::new(800.0, 400.0)).expect("chart");
        let commands = render(&chart, Theme::Blue);
        let labels = texts(&commands);
        assert!(!labels.contains(&"Age 18"));
        assert!(labels.contains(&"Age 22"));
        assert_eq!(dashed_lines(&commands), 2);
    }

    #[test]
    fn gridlines_span_plot_with_value_labels() {
        let chart = build_chart(1523.0, 0.0, 7.0, 13, Viewport::new(800.0, 400.0)).expect("chart");
        let commands = render(&chart, Theme::Blue);
        let grid = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { color, dash: None, .. } if *color == GRID_COLOR))
            .count();
        assert_eq!(grid, GRID_DIVISIONS as usize + 1);
        assert!(texts(&commands).contains(&format_currency(chart.geometry.max_value).as_str()));
    }
}
