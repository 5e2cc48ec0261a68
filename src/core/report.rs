use serde::Serialize;

use super::format::{axis_label, format_amount, format_currency, format_gain};
use super::types::{ReportGranularity, SimulationResult};

const MAX_X_TICKS: usize = 15;
const ROTATE_LABELS_ABOVE: usize = 20;
const Y_TICK_COUNT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDisplay {
    pub total_gain: String,
    pub final_capital: String,
    pub total_investment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub period: u64,
    pub capital: String,
    pub interest: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDisplay {
    pub columns: [String; 4],
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDisplay {
    pub name: &'static str,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTick {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDisplay {
    pub title: &'static str,
    pub x_label: String,
    pub y_label: &'static str,
    pub labels: Vec<String>,
    /// Stacked bottom to top.
    pub series: [SeriesDisplay; 3],
    pub x_tick_indices: Vec<usize>,
    pub rotate_x_labels: bool,
    pub y_ticks: Vec<AxisTick>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: SummaryDisplay,
    pub table: TableDisplay,
    pub chart: ChartDisplay,
}

pub fn build_report(result: &SimulationResult, granularity: ReportGranularity) -> Report {
    let summary = SummaryDisplay {
        total_gain: format_currency(result.summary.total_gain),
        final_capital: format_currency(result.summary.final_balance),
        total_investment: format_currency(result.summary.total_invested),
    };

    let table = TableDisplay {
        columns: [
            granularity.name().to_string(),
            "Capital ($)".to_string(),
            "Interest ($)".to_string(),
            "Total ($)".to_string(),
        ],
        rows: result
            .rows
            .iter()
            .map(|row| TableRow {
                period: row.period_index,
                capital: format_amount(row.capital_at_period_start),
                interest: format_gain(row.interest_accrued_this_period),
                total: format_amount(row.balance_at_period_end),
            })
            .collect(),
    };

    let labels = result
        .rows
        .iter()
        .map(|row| row.period_index.to_string())
        .collect::<Vec<_>>();
    let peak = result
        .rows
        .iter()
        .map(|row| row.balance_at_period_end)
        .fold(0.0_f64, f64::max);

    let chart = ChartDisplay {
        title: "Investment Growth Over Time",
        x_label: format!("Time ({})", granularity.name()),
        y_label: "Amount ($)",
        x_tick_indices: x_tick_indices(labels.len()),
        rotate_x_labels: labels.len() > ROTATE_LABELS_ABOVE,
        labels,
        series: [
            SeriesDisplay {
                name: "Initial Deposit",
                values: result.chart.principal.clone(),
            },
            SeriesDisplay {
                name: "Additional Contributions",
                values: result.chart.contributions.clone(),
            },
            SeriesDisplay {
                name: "Accumulated Interest",
                values: result.chart.interest.clone(),
            },
        ],
        y_ticks: y_ticks(peak),
    };

    Report {
        summary,
        table,
        chart,
    }
}

/// Evenly spread tick positions, at most `MAX_X_TICKS`, always including
/// the first and last period.
pub fn x_tick_indices(label_count: usize) -> Vec<usize> {
    if label_count <= 1 {
        return (0..label_count).collect();
    }
    let ticks = label_count.min(MAX_X_TICKS);
    (0..ticks)
        .map(|i| i * (label_count - 1) / (ticks - 1))
        .collect()
}

fn y_ticks(peak: f64) -> Vec<AxisTick> {
    if !peak.is_finite() || peak <= 0.0 {
        return vec![AxisTick {
            value: 0.0,
            label: axis_label(0.0),
        }];
    }
    (0..Y_TICK_COUNT)
        .map(|i| {
            let value = peak * i as f64 / (Y_TICK_COUNT - 1) as f64;
            AxisTick {
                value,
                label: axis_label(value),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::run_simulation;
    use crate::core::types::{ContributionFrequency, DurationUnit, SimulationInput};

    fn flat_input() -> SimulationInput {
        SimulationInput {
            initial_deposit: 1_000.0,
            daily_rate: 0.0,
            duration: 3,
            duration_unit: DurationUnit::Months,
            contribution_amount: 100.0,
            contribution_frequency: ContributionFrequency::Monthly,
            report_granularity: ReportGranularity::Monthly,
        }
    }

    #[test]
    fn report_formats_summary_and_rows() {
        let input = flat_input();
        let result = run_simulation(&input);
        let report = build_report(&result, input.report_granularity);

        assert_eq!(report.summary.total_gain, "$0.00");
        assert_eq!(report.summary.final_capital, "$1,300.00");
        assert_eq!(report.summary.total_investment, "$1,300.00");

        assert_eq!(report.table.columns[0], "Monthly");
        assert_eq!(report.table.columns[3], "Total ($)");
        assert_eq!(
            report.table.rows,
            vec![
                TableRow {
                    period: 1,
                    capital: "1,000.00".to_string(),
                    interest: "+0.00".to_string(),
                    total: "1,100.00".to_string(),
                },
                TableRow {
                    period: 2,
                    capital: "1,100.00".to_string(),
                    interest: "+0.00".to_string(),
                    total: "1,200.00".to_string(),
                },
                TableRow {
                    period: 3,
                    capital: "1,200.00".to_string(),
                    interest: "+0.00".to_string(),
                    total: "1,300.00".to_string(),
                },
            ]
        );
    }

    #[test]
    fn report_chart_carries_labels_series_and_axes() {
        let input = flat_input();
        let result = run_simulation(&input);
        let report = build_report(&result, input.report_granularity);
        let chart = &report.chart;

        assert_eq!(chart.x_label, "Time (Monthly)");
        assert_eq!(chart.labels, vec!["1", "2", "3"]);
        assert_eq!(chart.series[0].name, "Initial Deposit");
        assert_eq!(chart.series[0].values, vec![1_000.0; 3]);
        assert_eq!(chart.series[1].values, vec![100.0, 200.0, 300.0]);
        assert_eq!(chart.series[2].values, vec![0.0; 3]);
        assert_eq!(chart.x_tick_indices, vec![0, 1, 2]);
        assert!(!chart.rotate_x_labels);

        let labels = chart
            .y_ticks
            .iter()
            .map(|t| t.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["$0", "$325", "$650", "$975", "$1.30K"]);
    }

    #[test]
    fn report_for_empty_run_has_single_zero_tick() {
        let mut input = flat_input();
        input.duration = 0;
        let result = run_simulation(&input);
        let report = build_report(&result, input.report_granularity);

        assert!(report.table.rows.is_empty());
        assert!(report.chart.labels.is_empty());
        assert!(report.chart.x_tick_indices.is_empty());
        assert_eq!(report.chart.y_ticks.len(), 1);
        assert_eq!(report.summary.final_capital, "$1,000.00");
    }

    #[test]
    fn long_daily_runs_thin_and_rotate_ticks() {
        let mut input = flat_input();
        input.duration = 1;
        input.duration_unit = DurationUnit::Years;
        input.report_granularity = ReportGranularity::Daily;
        let result = run_simulation(&input);
        let report = build_report(&result, input.report_granularity);

        assert_eq!(report.chart.labels.len(), 365);
        assert_eq!(report.chart.x_tick_indices.len(), 15);
        assert_eq!(report.chart.x_tick_indices.first(), Some(&0));
        assert_eq!(report.chart.x_tick_indices.last(), Some(&364));
        assert!(report.chart.rotate_x_labels);
    }

    #[test]
    fn x_tick_indices_cover_small_counts_fully() {
        assert!(x_tick_indices(0).is_empty());
        assert_eq!(x_tick_indices(1), vec![0]);
        assert_eq!(x_tick_indices(12), (0..12).collect::<Vec<_>>());
        assert_eq!(x_tick_indices(15), (0..15).collect::<Vec<_>>());
    }

    #[test]
    fn x_tick_indices_floor_evenly_spaced_positions() {
        assert_eq!(
            x_tick_indices(29),
            vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28]
        );
        let ticks = x_tick_indices(100);
        assert_eq!(ticks[1], 7);
        assert_eq!(ticks[14], 99);
    }
}
