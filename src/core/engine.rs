use super::error::{SimulationError, SimulationOutcome};
use super::types::{
    ChartSeries, DurationUnit, PeriodRow, ReportGranularity, SimulationInput, SimulationResult,
    SimulationSummary,
};

const MAX_PREALLOCATED_PERIODS: usize = 1 << 16;

#[derive(Debug, Clone, Copy)]
struct PeriodClose {
    period_index: u64,
    capital_at_start: f64,
    interest: f64,
    balance: f64,
    contributed_to_date: f64,
}

pub fn term_days(duration: i64, unit: DurationUnit) -> i64 {
    duration.saturating_mul(unit.days())
}

pub fn bucket_size(granularity: ReportGranularity) -> i64 {
    granularity.bucket_days()
}

/// Runs the day-by-day simulation and returns every reported period.
///
/// Contributions land before that day's interest. A partial trailing period
/// is reported as its own row, except for a yearly term broken down monthly:
/// 365 days do not divide into 30-day months, so the leftover days are merged
/// into the last month instead.
pub fn run_simulation(input: &SimulationInput) -> SimulationResult {
    let total_days = term_days(input.duration, input.duration_unit);
    let bucket = bucket_size(input.report_granularity);

    let mut balance = input.initial_deposit;
    let mut total_contributed = 0.0;
    let mut capital_at_period_start = input.initial_deposit;
    let mut interest_this_period = 0.0;
    let mut last_closed_day = 0_i64;

    let expected_periods = usize::try_from((total_days / bucket).saturating_add(1))
        .unwrap_or(0)
        .min(MAX_PREALLOCATED_PERIODS);
    let mut rows = Vec::with_capacity(expected_periods);
    let mut chart = ChartSeries {
        principal: Vec::with_capacity(expected_periods),
        contributions: Vec::with_capacity(expected_periods),
        interest: Vec::with_capacity(expected_periods),
    };

    for day in 1..=total_days {
        if input.contribution_frequency.lands_on(day) {
            balance += input.contribution_amount;
            total_contributed += input.contribution_amount;
        }

        let interest_today = balance * input.daily_rate;
        balance += interest_today;
        interest_this_period += interest_today;

        if day % bucket == 0 {
            push_period(
                &mut rows,
                &mut chart,
                input.initial_deposit,
                PeriodClose {
                    period_index: period_number(day, bucket),
                    capital_at_start: capital_at_period_start,
                    interest: interest_this_period,
                    balance,
                    contributed_to_date: total_contributed,
                },
            );
            capital_at_period_start = balance;
            interest_this_period = 0.0;
            last_closed_day = day;
        }
    }

    let mut tail_folded = false;
    if total_days > last_closed_day {
        match rows.last_mut() {
            Some(last) if folds_tail_into_last_period(input) => {
                last.interest_accrued_this_period += interest_this_period;
                last.balance_at_period_end = balance;
                let idx = chart.len() - 1;
                chart.contributions[idx] = total_contributed;
                chart.interest[idx] = balance - input.initial_deposit - total_contributed;
                tail_folded = true;
            }
            _ => push_period(
                &mut rows,
                &mut chart,
                input.initial_deposit,
                PeriodClose {
                    period_index: period_number(last_closed_day, bucket) + 1,
                    capital_at_start: capital_at_period_start,
                    interest: interest_this_period,
                    balance,
                    contributed_to_date: total_contributed,
                },
            ),
        }
    }

    let total_invested = input.initial_deposit + total_contributed;
    SimulationResult {
        term_days: total_days,
        summary: SimulationSummary {
            total_contributed,
            total_invested,
            final_balance: balance,
            total_gain: balance - total_invested,
        },
        rows,
        chart,
        tail_folded,
    }
}

/// Same as [`run_simulation`], but refuses to hand back a run whose balance
/// left the finite range.
pub fn simulate(input: &SimulationInput) -> SimulationOutcome<SimulationResult> {
    let result = run_simulation(input);
    let summary = &result.summary;
    if !summary.final_balance.is_finite() || !summary.total_contributed.is_finite() {
        return Err(SimulationError::UnexpectedComputation(format!(
            "balance is no longer a finite number after {} days",
            result.term_days
        )));
    }

    log::debug!(
        "simulated {} days into {} {} periods (tail folded: {})",
        result.term_days,
        result.rows.len(),
        input.report_granularity.name(),
        result.tail_folded
    );
    Ok(result)
}

/// 1-based index of the period closed on `day`. `day` is never negative
/// inside the simulation loop, so the conversion cannot fail there.
fn period_number(day: i64, bucket: i64) -> u64 {
    u64::try_from(day / bucket).unwrap_or(0)
}

fn folds_tail_into_last_period(input: &SimulationInput) -> bool {
    input.duration_unit == DurationUnit::Years
        && input.report_granularity == ReportGranularity::Monthly
}

fn push_period(
    rows: &mut Vec<PeriodRow>,
    chart: &mut ChartSeries,
    initial_deposit: f64,
    close: PeriodClose,
) {
    rows.push(PeriodRow {
        period_index: close.period_index,
        capital_at_period_start: close.capital_at_start,
        interest_accrued_this_period: close.interest,
        balance_at_period_end: close.balance,
    });
    chart.principal.push(initial_deposit);
    chart.contributions.push(close.contributed_to_date);
    chart
        .interest
        .push(close.balance - initial_deposit - close.contributed_to_date);
}
