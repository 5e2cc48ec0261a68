mod engine;
mod error;
mod format;
mod report;
mod types;

pub use engine::{bucket_size, run_simulation, simulate, term_days};
pub use error::{SimulationError, SimulationOutcome};
pub use format::{axis_label, format_amount, format_currency, format_gain};
pub use report::{
    AxisTick, ChartDisplay, Report, SeriesDisplay, SummaryDisplay, TableDisplay, TableRow,
    build_report, x_tick_indices,
};
pub use types::{
    ChartSeries, ContributionFrequency, DurationUnit, PeriodRow, ReportGranularity,
    SimulationInput, SimulationResult, SimulationSummary,
};
