use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum DurationUnit {
    Years,
    Months,
}

impl DurationUnit {
    /// Days per unit. 30-day months and 365-day years, never calendar-accurate.
    pub fn days(self) -> i64 {
        match self {
            DurationUnit::Years => 365,
            DurationUnit::Months => 30,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ContributionFrequency {
    Daily,
    Monthly,
    Annually,
}

impl ContributionFrequency {
    pub fn lands_on(self, day: i64) -> bool {
        match self {
            ContributionFrequency::Daily => true,
            ContributionFrequency::Monthly => day % 30 == 0,
            ContributionFrequency::Annually => day % 365 == 0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ReportGranularity {
    Daily,
    Monthly,
    Annually,
}

impl ReportGranularity {
    pub fn bucket_days(self) -> i64 {
        match self {
            ReportGranularity::Daily => 1,
            ReportGranularity::Monthly => 30,
            ReportGranularity::Annually => 365,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReportGranularity::Daily => "Daily",
            ReportGranularity::Monthly => "Monthly",
            ReportGranularity::Annually => "Annually",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    pub initial_deposit: f64,
    /// Fraction per day, i.e. percent / 100.
    pub daily_rate: f64,
    pub duration: i64,
    pub duration_unit: DurationUnit,
    pub contribution_amount: f64,
    pub contribution_frequency: ContributionFrequency,
    pub report_granularity: ReportGranularity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRow {
    pub period_index: u64,
    pub capital_at_period_start: f64,
    pub interest_accrued_this_period: f64,
    pub balance_at_period_end: f64,
}

/// Cumulative stacked-bar series, one entry per `PeriodRow`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub principal: Vec<f64>,
    pub contributions: Vec<f64>,
    pub interest: Vec<f64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.principal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.principal.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub total_contributed: f64,
    pub total_invested: f64,
    pub final_balance: f64,
    pub total_gain: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub term_days: i64,
    pub summary: SimulationSummary,
    pub rows: Vec<PeriodRow>,
    pub chart: ChartSeries,
    /// True when the leftover days were merged into the last reported period.
    pub tail_folded: bool,
}
