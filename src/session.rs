//! Application context and event dispatch.
//!
//! A `Session` holds everything that survives between events: the active
//! profile, the last form values, the surface size and the chart cache. Each
//! event is handled to completion and fully recomputes whatever it affects.

use serde::Serialize;
use tracing::debug;

use crate::chart::{ChartView, RenderedChart, Size, Tooltip, Viewport};
use crate::core::{
    Profile, RawInput, ScenarioInput, ScenarioResult, compute_scenario, format_number_with_commas,
};

/// Surface size assumed before the page reports its own.
pub const DEFAULT_VIEWPORT: Viewport = Viewport::new(800.0, 400.0);

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelectProfile(Profile),
    Recalculate {
        input: RawInput,
        viewport: Option<Viewport>,
    },
    Resize(Viewport),
    /// `generation` is the chart the pointer is over, as last rendered to
    /// the caller; `None` means "whatever is current".
    PointerMove {
        generation: Option<u64>,
        x: f64,
        y: f64,
        tooltip: Size,
    },
    PointerLeave,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    pub profile: Profile,
    pub greeting: String,
    pub formatted_balance: String,
    pub principal: f64,
    pub gift_amount: f64,
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub results: ScenarioResult,
    pub chart: Option<RenderedChart>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Calculated(Box<Calculation>),
    Redrawn(Option<RenderedChart>),
    Tooltip(Option<Tooltip>),
}

#[derive(Debug)]
pub struct Session {
    profile: Profile,
    input: RawInput,
    viewport: Viewport,
    chart: ChartView,
}

impl Session {
    pub fn new(profile: Profile, viewport: Viewport) -> Self {
        Self {
            profile,
            input: RawInput::default(),
            viewport,
            chart: ChartView::new(),
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn chart(&self) -> &ChartView {
        &self.chart
    }

    /// Scenario input for the current form values and profile.
    pub fn scenario_input(&self) -> ScenarioInput {
        self.input.resolve(self.profile.age)
    }

    pub fn handle(&mut self, event: Event) -> Update {
        match event {
            Event::SelectProfile(profile) => {
                debug!(profile = profile.id, age = profile.age, "profile selected");
                self.profile = profile;
                Update::Calculated(Box::new(self.recalculate()))
            }
            Event::Recalculate { input, viewport } => {
                Update::Calculated(Box::new(self.calculate(input, viewport)))
            }
            Event::Resize(viewport) => {
                debug!(width = viewport.width, height = viewport.height, "surface resized");
                self.viewport = viewport;
                let input = self.scenario_input();
                Update::Redrawn(self.chart.rebuild(&input, self.profile.theme, viewport))
            }
            Event::PointerMove {
                generation,
                x,
                y,
                tooltip,
            } => {
                if generation.is_some_and(|g| g != self.chart.generation()) {
                    debug!(
                        stale = ?generation,
                        current = self.chart.generation(),
                        "hover against replaced chart"
                    );
                }
                Update::Tooltip(self.chart.hover(generation, x, y, tooltip))
            }
            Event::PointerLeave => Update::Tooltip(None),
        }
    }

    /// Stores new form values (and surface size, when given) and recomputes.
    pub fn calculate(&mut self, input: RawInput, viewport: Option<Viewport>) -> Calculation {
        self.input = input;
        if let Some(viewport) = viewport {
            self.viewport = viewport;
        }
        self.recalculate()
    }

    fn recalculate(&mut self) -> Calculation {
        let input = self.scenario_input();
        let results = compute_scenario(&input);
        let chart = self
            .chart
            .rebuild(&input, self.profile.theme, self.viewport);
        debug!(
            age = input.current_age,
            principal = input.principal,
            monthly = input.monthly_contribution,
            gift = input.gift_amount,
            plotted = chart.is_some(),
            "scenario recalculated"
        );

        Calculation {
            profile: self.profile,
            greeting: self.profile.greeting(),
            formatted_balance: format_number_with_commas(&self.input.current_balance),
            principal: input.principal,
            gift_amount: input.gift_amount,
            monthly_contribution: input.monthly_contribution,
            annual_rate_percent: input.annual_rate_percent,
            results,
            chart,
        }
    }
}

/// One calculation outside any long-lived session.
pub fn calculate_once(profile: Profile, input: RawInput, viewport: Viewport) -> Calculation {
    Session::new(profile, viewport).calculate(input, None)
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Profile::default(), DEFAULT_VIEWPORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FALLBACK_PRINCIPAL, GIFT_AMOUNT, Theme, project};

    const TOOLTIP: Size = Size::new(120.0, 48.0);

    fn raw(balance: &str, gift: bool, monthly: &str) -> RawInput {
        RawInput {
            current_balance: balance.to_string(),
            gift_enabled: gift,
            monthly_contribution: monthly.to_string(),
        }
    }

    fn calculated(update: Update) -> Calculation {
        match update {
            Update::Calculated(calc) => *calc,
            other => panic!("expected calculation, got {other:?}"),
        }
    }

    #[test]
    fn recalculate_uses_active_profile_age() {
        let mut session = Session::default();
        let calc = calculated(session.handle(Event::Recalculate {
            input: raw("", false, ""),
            viewport: None,
        }));
        assert_eq!(calc.profile.age, 11);
        assert_eq!(calc.principal, FALLBACK_PRINCIPAL);
        assert_eq!(
            calc.results.at_age(65).expect("age 65").total,
            project(1523.0, 0.0, 7.0, 54)
        );

        let landon = Profile::lookup("landon").expect("profile");
        let calc = calculated(session.handle(Event::SelectProfile(landon)));
        assert_eq!(calc.profile.theme, Theme::Blue);
        assert_eq!(calc.greeting, "Merry Christmas Landon!");
        assert_eq!(
            calc.results.at_age(65).expect("age 65").total,
            project(1523.0, 0.0, 7.0, 52)
        );
        let chart = calc.chart.expect("chart");
        assert_eq!(chart.points[0].age, 13);
        assert!(chart.svg.contains("#4285F4"));
    }

    #[test]
    fn recalculate_echoes_formatted_balance_and_gift() {
        let mut session = Session::default();
        let calc = calculated(session.handle(Event::Recalculate {
            input: raw("2500", true, "25"),
            viewport: None,
        }));
        assert_eq!(calc.formatted_balance, "2,500");
        assert_eq!(calc.gift_amount, GIFT_AMOUNT);
        assert!(calc.results.gift_delta.is_some());
    }

    #[test]
    fn pointer_never_reads_stale_geometry() {
        let mut session = Session::default();
        session.handle(Event::Recalculate {
            input: raw("1523", false, "0"),
            viewport: None,
        });
        let old_last = *session.chart().points().last().expect("points");

        session.handle(Event::Recalculate {
            input: raw("1523", false, "500"),
            viewport: None,
        });
        let new_last = *session.chart().points().last().expect("points");
        assert!(new_last.value > old_last.value);

        let update = session.handle(Event::PointerMove {
            generation: None,
            x: new_last.x,
            y: new_last.y,
            tooltip: TOOLTIP,
        });
        match update {
            Update::Tooltip(Some(tip)) => assert_eq!(tip.value, new_last.value),
            other => panic!("expected tooltip, got {other:?}"),
        }
    }

    #[test]
    fn pointer_tagged_with_old_chart_is_refused() {
        let mut session = Session::default();
        let old = calculated(session.handle(Event::Recalculate {
            input: raw("1523", false, "0"),
            viewport: None,
        }))
        .chart
        .expect("chart");
        let old_last = *old.points.last().expect("points");

        let new = calculated(session.handle(Event::Recalculate {
            input: raw("90000", false, "0"),
            viewport: None,
        }))
        .chart
        .expect("chart");
        assert!(new.generation > old.generation);

        let stale = session.handle(Event::PointerMove {
            generation: Some(old.generation),
            x: old_last.x,
            y: old_last.y,
            tooltip: TOOLTIP,
        });
        assert_eq!(stale, Update::Tooltip(None));

        let new_last = *new.points.last().expect("points");
        match session.handle(Event::PointerMove {
            generation: Some(new.generation),
            x: new_last.x,
            y: new_last.y,
            tooltip: TOOLTIP,
        }) {
            Update::Tooltip(Some(tip)) => assert_eq!(tip.value, new_last.value),
            other => panic!("expected tooltip, got {other:?}"),
        }
    }

    #[test]
    fn resize_redraws_from_last_input() {
        let mut session = Session::default();
        session.handle(Event::Recalculate {
            input: raw("4000", false, "10"),
            viewport: None,
        });
        let update = session.handle(Event::Resize(Viewport::new(400.0, 300.0)));
        let chart = match update {
            Update::Redrawn(Some(chart)) => chart,
            other => panic!("expected redraw, got {other:?}"),
        };
        assert_eq!(chart.geometry.viewport, Viewport::new(400.0, 300.0));
        assert_eq!(chart.points[0].value, 4000.0);
        assert_eq!(session.chart().points(), chart.points.as_slice());
    }

    #[test]
    fn unsized_surface_skips_chart_but_keeps_results() {
        let mut session = Session::default();
        let calc = calculated(session.handle(Event::Recalculate {
            input: raw("1523", false, "0"),
            viewport: Some(Viewport::new(0.0, 0.0)),
        }));
        assert!(calc.chart.is_none());
        assert_eq!(calc.results.per_age.len(), 3);
        assert_eq!(
            session.handle(Event::PointerMove {
                generation: None,
                x: 40.0,
                y: 360.0,
                tooltip: TOOLTIP
            }),
            Update::Tooltip(None)
        );
    }

    #[test]
    fn pointer_leave_hides_tooltip() {
        let mut session = Session::default();
        assert_eq!(session.handle(Event::PointerLeave), Update::Tooltip(None));
    }
}
