use super::types::{
    AgeProjection, COMPARISON_INVEST_NOW, COMPARISON_SPEND_NOW, Comparison, ComparisonPoint,
    GiftDelta, MAX_PLOTTED_AGE, ScenarioInput, ScenarioResult, TARGET_AGES,
};

/// Future value of `principal` plus a monthly annuity of `monthly_contribution`
/// after `years` of monthly compounding at `annual_rate_percent`.
///
/// Contributions are paid at the end of each month.
pub fn project(principal: f64, monthly_contribution: f64, annual_rate_percent: f64, years: u32) -> f64 {
    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let months = f64::from(years) * 12.0;
    let growth_factor = (1.0 + monthly_rate).powf(months);

    let principal_term = principal * growth_factor;
    let contribution_term = if monthly_contribution > 0.0 && monthly_rate > 0.0 {
        monthly_contribution * ((growth_factor - 1.0) / monthly_rate)
    } else if monthly_contribution > 0.0 {
        monthly_contribution * months
    } else {
        0.0
    };

    principal_term + contribution_term
}

/// Whole years from `current_age` to `target_age`; zero when the target is not ahead.
pub fn years_until(current_age: u32, target_age: u32) -> u32 {
    target_age.saturating_sub(current_age)
}

pub fn compute_scenario(input: &ScenarioInput) -> ScenarioResult {
    let total_principal = input.total_principal();
    let rate = input.annual_rate_percent;
    let monthly = input.monthly_contribution;

    let per_age = TARGET_AGES
        .iter()
        .map(|&age| {
            let years = years_until(input.current_age, age);
            if years == 0 {
                return AgeProjection {
                    age,
                    total: total_principal,
                    growth: 0.0,
                };
            }
            let total = project(total_principal, monthly, rate, years);
            let contributed = monthly * 12.0 * f64::from(years);
            AgeProjection {
                age,
                total,
                growth: total - total_principal - contributed,
            }
        })
        .collect();

    let gift_delta = (input.gift_amount > 0.0).then(|| gift_deltas(input));

    ScenarioResult {
        per_age,
        gift_delta,
        comparison: comparison(input.current_age, rate),
    }
}

fn gift_deltas(input: &ScenarioInput) -> Vec<GiftDelta> {
    let rate = input.annual_rate_percent;
    let monthly = input.monthly_contribution;
    TARGET_AGES
        .iter()
        .map(|&age| {
            let years = years_until(input.current_age, age);
            // Ages already reached keep the gift at face value.
            let amount = if years == 0 {
                input.gift_amount
            } else {
                project(input.total_principal(), monthly, rate, years)
                    - project(input.principal, monthly, rate, years)
            };
            GiftDelta { age, amount }
        })
        .collect()
}

fn comparison(current_age: u32, rate: f64) -> Comparison {
    let points = TARGET_AGES
        .iter()
        .map(|&age| {
            let years = years_until(current_age, age);
            let value = if years == 0 {
                COMPARISON_INVEST_NOW
            } else {
                project(COMPARISON_INVEST_NOW, 0.0, rate, years)
            };
            ComparisonPoint { age, value }
        })
        .collect::<Vec<_>>();

    let at_max_age = points
        .iter()
        .find(|p| p.age == MAX_PLOTTED_AGE)
        .map(|p| p.value)
        .unwrap_or(COMPARISON_INVEST_NOW);

    Comparison {
        spend_now: COMPARISON_SPEND_NOW,
        invest_now: COMPARISON_INVEST_NOW,
        points,
        difference_at_max_age: at_max_age - COMPARISON_SPEND_NOW,
    }
}
