mod builder;
mod hover;
mod render;
mod svg;
mod view;

pub use builder::{
    BuiltChart, ChartGeometry, ChartPoint, Viewport, build_chart, padding_for_width, sample_years,
    sampling_step,
};
pub use hover::{HOVER_RADIUS, Size, TooltipAnchor, TooltipPlacement, locate, place_tooltip};
pub use render::{DrawCommand, FontWeight, Metrics, NARROW_WIDTH_PX, TextAlign, render};
pub use svg::to_svg;
pub use view::{ChartView, RenderedChart, Tooltip};
