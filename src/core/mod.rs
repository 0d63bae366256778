mod engine;
mod input;
mod types;

pub use engine::{compute_scenario, project, years_until};
pub use input::{RawInput, format_currency, format_number_with_commas, parse_number_from_formatted};
pub use types::{
    ANNUAL_RATE_PERCENT, AgeProjection, COMPARISON_INVEST_NOW, COMPARISON_SPEND_NOW, Comparison,
    ComparisonPoint, FALLBACK_PRINCIPAL, GIFT_AMOUNT, GiftDelta, MAX_PLOTTED_AGE, PROFILES,
    Profile, ScenarioInput, ScenarioResult, TARGET_AGES, Theme,
};
