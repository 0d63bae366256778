//! Pointer hit-testing against plotted points and tooltip placement.

use serde::Serialize;

use super::builder::ChartPoint;

/// Maximum pointer-to-point distance, in pixels, that still counts as a hit.
pub const HOVER_RADIUS: f64 = 20.0;
/// Gap between the point and the tooltip when drawn above it.
pub const TOOLTIP_GAP_ABOVE: f64 = 10.0;
/// Gap between the point and the tooltip when flipped below it.
pub const TOOLTIP_GAP_BELOW: f64 = 15.0;
/// Margin kept from the bottom edge when the box is pulled back up.
pub const TOOLTIP_BOTTOM_MARGIN: f64 = 10.0;

/// Returns the nearest point strictly within `HOVER_RADIUS`, scanning in stored
/// order so the earliest point wins an exact tie.
pub fn locate(x: f64, y: f64, points: &[ChartPoint]) -> Option<&ChartPoint> {
    let mut best: Option<(&ChartPoint, f64)> = None;
    for point in points {
        let distance = (x - point.x).hypot(y - point.y);
        if distance < HOVER_RADIUS && best.is_none_or(|(_, d)| distance < d) {
            best = Some((point, distance));
        }
    }
    best.map(|(point, _)| point)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Which edge of the tooltip box lines up with its anchor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipAnchor {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipPlacement {
    /// Left edge of the box in container coordinates.
    pub left: f64,
    /// Top edge of the box in container coordinates.
    pub top: f64,
    pub anchor: TooltipAnchor,
}

/// Centres the box over the point, pinning it to the container's left or right
/// edge when centring would overflow. Vertically it sits above the point, flips
/// below when there is no room at the top, and is pulled up when it would run
/// off the bottom.
pub fn place_tooltip(point: &ChartPoint, tooltip: Size, container: Size) -> TooltipPlacement {
    let half_width = tooltip.width / 2.0;
    let (left, anchor) = if point.x - half_width < 0.0 {
        (0.0, TooltipAnchor::Left)
    } else if point.x + half_width > container.width {
        ((container.width - tooltip.width).max(0.0), TooltipAnchor::Right)
    } else {
        (point.x - half_width, TooltipAnchor::Center)
    };

    let mut top = point.y - tooltip.height - TOOLTIP_GAP_ABOVE;
    if top < 0.0 {
        top = point.y + TOOLTIP_GAP_BELOW;
    }
    if top + tooltip.height > container.height {
        top = container.height - tooltip.height - TOOLTIP_BOTTOM_MARGIN;
    }

    TooltipPlacement { left, top, anchor }
}
