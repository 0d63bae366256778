use serde::Serialize;

use super::builder::{BuiltChart, ChartGeometry, ChartPoint, Viewport, build_chart};
use super::hover::{Size, TooltipPlacement, locate, place_tooltip};
use super::render::{DrawCommand, render};
use super::svg::to_svg;
use crate::core::{ScenarioInput, Theme, format_currency};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedChart {
    /// Cache generation this render belongs to; hover requests echo it back.
    pub generation: u64,
    pub geometry: ChartGeometry,
    pub points: Vec<ChartPoint>,
    pub commands: Vec<DrawCommand>,
    pub svg: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub age: u32,
    pub value: f64,
    pub age_label: String,
    pub amount_label: String,
    pub placement: TooltipPlacement,
}

/// Owns the point geometry of the last render so pointer events can be
/// answered without rebuilding the chart.
///
/// Every rebuild bumps `generation`, including rebuilds that draw nothing,
/// so a hover tagged with an older generation is never matched against
/// newer points.
#[derive(Debug, Default)]
pub struct ChartView {
    cache: Option<BuiltChart>,
    generation: u64,
}

impl ChartView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the chart for `input`, replacing whatever was cached.
    ///
    /// Nothing is drawn (and the cache is emptied) when the surface is unsized
    /// or the profile has no years left to plot.
    pub fn rebuild(
        &mut self,
        input: &ScenarioInput,
        theme: Theme,
        viewport: Viewport,
    ) -> Option<RenderedChart> {
        self.generation = self.generation.wrapping_add(1);
        self.cache = build_chart(
            input.total_principal(),
            input.monthly_contribution,
            input.annual_rate_percent,
            input.current_age,
            viewport,
        );
        let chart = self.cache.as_ref()?;
        let commands = render(chart, theme);
        let svg = to_svg(&commands, viewport);
        Some(RenderedChart {
            generation: self.generation,
            geometry: chart.geometry,
            points: chart.points.clone(),
            commands,
            svg,
        })
    }

    pub fn points(&self) -> &[ChartPoint] {
        self.cache
            .as_ref()
            .map(|c| c.points.as_slice())
            .unwrap_or(&[])
    }

    pub fn geometry(&self) -> Option<&ChartGeometry> {
        self.cache.as_ref().map(|c| &c.geometry)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Tooltip for the point under the pointer, if any.
    ///
    /// When `generation` is given it must name the current cache; a pointer
    /// over a chart that has since been replaced gets no tooltip.
    pub fn hover(
        &self,
        generation: Option<u64>,
        x: f64,
        y: f64,
        tooltip_size: Size,
    ) -> Option<Tooltip> {
        if generation.is_some_and(|g| g != self.generation) {
            return None;
        }
        let chart = self.cache.as_ref()?;
        let point = locate(x, y, &chart.points)?;
        let viewport = chart.geometry.viewport;
        let container = Size::new(viewport.width, viewport.height);
        Some(Tooltip {
            age: point.age,
            value: point.value,
            age_label: format!("Age {}", point.age),
            amount_label: format_currency(point.value),
            placement: place_tooltip(point, tooltip_size, container),
        })
    }
}
