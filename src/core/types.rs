use serde::Serialize;

/// Annual growth rate applied to every projection, in percent.
pub const ANNUAL_RATE_PERCENT: f64 = 7.0;
/// Ages the calculator reports on.
pub const TARGET_AGES: [u32; 3] = [18, 22, 65];
/// Upper age bound of the growth chart.
pub const MAX_PLOTTED_AGE: u32 = 65;
/// One-time gift added to the principal when the gift toggle is on.
pub const GIFT_AMOUNT: f64 = 200.0;
/// Balance used when the balance field holds nothing usable.
pub const FALLBACK_PRINCIPAL: f64 = 1523.0;
/// "Spend now" side of the opportunity-cost comparison.
pub const COMPARISON_SPEND_NOW: f64 = 50.0;
/// "Invest now" side of the opportunity-cost comparison.
pub const COMPARISON_INVEST_NOW: f64 = 1723.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Purple,
    Blue,
}

impl Theme {
    pub fn primary_color(self) -> &'static str {
        match self {
            Theme::Purple => "#bb86fc",
            Theme::Blue => "#4285F4",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: &'static str,
    pub name: &'static str,
    pub age: u32,
    pub theme: Theme,
}

pub const PROFILES: [Profile; 2] = [
    Profile {
        id: "grayson",
        name: "Grayson",
        age: 11,
        theme: Theme::Purple,
    },
    Profile {
        id: "landon",
        name: "Landon",
        age: 13,
        theme: Theme::Blue,
    },
];

impl Profile {
    pub fn lookup(id: &str) -> Result<Profile, String> {
        let id = id.trim();
        PROFILES
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(id))
            .copied()
            .ok_or_else(|| {
                let known = PROFILES.iter().map(|p| p.id).collect::<Vec<_>>();
                format!("unknown profile '{id}' (expected one of: {})", known.join(", "))
            })
    }

    pub fn greeting(&self) -> String {
        format!("Merry Christmas {}!", self.name)
    }
}

impl Default for Profile {
    fn default() -> Self {
        PROFILES[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioInput {
    pub principal: f64,
    pub gift_amount: f64,
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub current_age: u32,
}

impl ScenarioInput {
    /// Principal including the one-time gift.
    pub fn total_principal(&self) -> f64 {
        self.principal + self.gift_amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeProjection {
    pub age: u32,
    pub total: f64,
    pub growth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftDelta {
    pub age: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPoint {
    pub age: u32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub spend_now: f64,
    pub invest_now: f64,
    pub points: Vec<ComparisonPoint>,
    pub difference_at_max_age: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub per_age: Vec<AgeProjection>,
    pub gift_delta: Option<Vec<GiftDelta>>,
    pub comparison: Comparison,
}

impl ScenarioResult {
    pub fn at_age(&self, age: u32) -> Option<&AgeProjection> {
        self.per_age.iter().find(|r| r.age == age)
    }

    pub fn gift_delta_at(&self, age: u32) -> Option<f64> {
        self.gift_delta
            .as_ref()
            .and_then(|deltas| deltas.iter().find(|d| d.age == age))
            .map(|d| d.amount)
    }
}
