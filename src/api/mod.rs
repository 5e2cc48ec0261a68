use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt::Write as _;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    ContributionFrequency, DurationUnit, Report, ReportGranularity, SimulationError,
    SimulationInput, SimulationResult, build_report, simulate, term_days,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliDurationUnit {
    Years,
    Months,
}

impl From<CliDurationUnit> for DurationUnit {
    fn from(value: CliDurationUnit) -> Self {
        match value {
            CliDurationUnit::Years => DurationUnit::Years,
            CliDurationUnit::Months => DurationUnit::Months,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFrequency {
    Daily,
    Monthly,
    Annually,
}

impl From<CliFrequency> for ContributionFrequency {
    fn from(value: CliFrequency) -> Self {
        match value {
            CliFrequency::Daily => ContributionFrequency::Daily,
            CliFrequency::Monthly => ContributionFrequency::Monthly,
            CliFrequency::Annually => ContributionFrequency::Annually,
        }
    }
}

impl From<CliFrequency> for ReportGranularity {
    fn from(value: CliFrequency) -> Self {
        match value {
            CliFrequency::Daily => ReportGranularity::Daily,
            CliFrequency::Monthly => ReportGranularity::Monthly,
            CliFrequency::Annually => ReportGranularity::Annually,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiDurationUnit {
    #[serde(alias = "Years", alias = "year")]
    Years,
    #[serde(alias = "Months", alias = "month")]
    Months,
}

impl From<ApiDurationUnit> for CliDurationUnit {
    fn from(value: ApiDurationUnit) -> Self {
        match value {
            ApiDurationUnit::Years => CliDurationUnit::Years,
            ApiDurationUnit::Months => CliDurationUnit::Months,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiFrequency {
    #[serde(alias = "Daily", alias = "day")]
    Daily,
    #[serde(alias = "Monthly", alias = "month")]
    Monthly,
    #[serde(alias = "Annually", alias = "yearly", alias = "year")]
    Annually,
}

impl From<ApiFrequency> for CliFrequency {
    fn from(value: ApiFrequency) -> Self {
        match value {
            ApiFrequency::Daily => CliFrequency::Daily,
            ApiFrequency::Monthly => CliFrequency::Monthly,
            ApiFrequency::Annually => CliFrequency::Annually,
        }
    }
}

/// Request fields. The term limit is server configuration and is never
/// read from a request.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    initial_deposit: Option<f64>,
    daily_rate_percent: Option<f64>,
    duration: Option<i64>,
    duration_unit: Option<ApiDurationUnit>,
    contribution_amount: Option<f64>,
    contribution_frequency: Option<ApiFrequency>,
    #[serde(alias = "reportGranularity")]
    breakdown_period: Option<ApiFrequency>,
}

#[derive(Parser, Debug)]
#[command(
    name = "compound",
    about = "Daily compound interest simulator with periodic contributions",
    after_help = "Run `compound serve [port]` to start the HTTP API instead."
)]
struct Cli {
    #[arg(long, help = "Initial deposit in dollars")]
    initial_deposit: f64,
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Daily interest rate in percent, e.g. 0.01"
    )]
    daily_rate: f64,
    #[arg(long, allow_hyphen_values = true, help = "Investment term length")]
    duration: i64,
    #[arg(long, value_enum, default_value_t = CliDurationUnit::Years)]
    duration_unit: CliDurationUnit,
    #[arg(long, default_value_t = 0.0, help = "Amount added on every contribution day")]
    contribution_amount: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliFrequency::Monthly,
        help = "Contribution schedule: daily, every 30th day, or every 365th day"
    )]
    contribution_frequency: CliFrequency,
    #[arg(
        long,
        value_enum,
        default_value_t = CliFrequency::Monthly,
        help = "Breakdown detail: 1-day, 30-day or 365-day periods"
    )]
    breakdown: CliFrequency,
    #[arg(
        long,
        default_value_t = 365_000,
        help = "Longest term accepted, in simulated days"
    )]
    max_term_days: i64,
    #[arg(long, help = "Print the full JSON response instead of a table")]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    input: SimulationInput,
    #[serde(flatten)]
    result: SimulationResult,
    report: Report,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<SimulationInput, SimulationError> {
    let invalid = |msg: &str| Err(SimulationError::InputValidation(msg.to_string()));

    if !cli.initial_deposit.is_finite() || cli.initial_deposit < 0.0 {
        return invalid("--initial-deposit must be a number >= 0");
    }

    if !cli.daily_rate.is_finite() {
        return invalid("--daily-rate must be a finite number");
    }

    if !cli.contribution_amount.is_finite() || cli.contribution_amount < 0.0 {
        return invalid("--contribution-amount must be a number >= 0");
    }

    if cli.max_term_days <= 0 {
        return invalid("--max-term-days must be > 0");
    }

    let duration_unit: DurationUnit = cli.duration_unit.into();
    let days = term_days(cli.duration, duration_unit);
    if days > cli.max_term_days {
        return Err(SimulationError::InputValidation(format!(
            "--duration covers {days} days, more than --max-term-days ({})",
            cli.max_term_days
        )));
    }

    Ok(SimulationInput {
        initial_deposit: cli.initial_deposit,
        daily_rate: cli.daily_rate / 100.0,
        duration: cli.duration,
        duration_unit,
        contribution_amount: cli.contribution_amount,
        contribution_frequency: cli.contribution_frequency.into(),
        report_granularity: cli.breakdown.into(),
    })
}

fn build_simulate_response(input: SimulationInput, result: SimulationResult) -> SimulateResponse {
    let report = build_report(&result, input.report_granularity);
    SimulateResponse {
        input,
        result,
        report,
    }
}

/// One-shot terminal run. Returns the process exit code.
pub fn run_cli<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return e.exit_code();
        }
    };

    let input = match build_inputs(&cli) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("{e}");
            return exit_code_for(&e);
        }
    };

    let result = match simulate(&input) {
        Ok(result) => result,
        Err(e) => {
            log::error!("simulation failed: {e}");
            eprintln!("{e}");
            return exit_code_for(&e);
        }
    };

    let response = build_simulate_response(input, result);
    if cli.json {
        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to encode response: {e}");
                return 1;
            }
        }
    } else {
        print!("{}", render_text(&response.report));
    }
    0
}

fn exit_code_for(err: &SimulationError) -> i32 {
    match err {
        SimulationError::InputValidation(_) => 2,
        SimulationError::UnexpectedComputation(_) => 1,
    }
}

fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let summary = &report.summary;
    let _ = writeln!(out, "Total Gain:       {}", summary.total_gain);
    let _ = writeln!(out, "Final Capital:    {}", summary.final_capital);
    let _ = writeln!(out, "Total Investment: {}", summary.total_investment);
    let _ = writeln!(out);

    let [period, capital, interest, total] = &report.table.columns;
    let _ = writeln!(out, "{period:>8}  {capital:>20}  {interest:>20}  {total:>20}");
    for row in &report.table.rows {
        let _ = writeln!(
            out,
            "{:>8}  {:>20}  {:>20}  {:>20}",
            row.period, row.capital, row.interest, row.total
        );
    }
    out
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/healthz", get(health_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    log::info!("compound HTTP API listening on http://{addr}");
    log::info!("local access: http://127.0.0.1:{port}/api/simulate");

    axum::serve(listener, app).await
}

async fn health_handler() -> impl IntoResponse {
    with_cache_control("ok")
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(query: Result<Query<SimulatePayload>, QueryRejection>) -> Response {
    match query {
        Ok(Query(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => rejected_payload(rejection.body_text()),
    }
}

async fn simulate_post_handler(json: Result<Json<SimulatePayload>, JsonRejection>) -> Response {
    match json {
        Ok(Json(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => rejected_payload(rejection.body_text()),
    }
}

fn rejected_payload(detail: String) -> Response {
    let err = SimulationError::InputValidation(format!("invalid request fields: {detail}"));
    log::warn!("rejected simulate request: {err}");
    simulation_error_response(&err)
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let input = match input_from_payload(payload) {
        Ok(input) => input,
        Err(e) => {
            log::warn!("rejected simulate request: {e}");
            return simulation_error_response(&e);
        }
    };

    match simulate(&input) {
        Ok(result) => json_response(StatusCode::OK, build_simulate_response(input, result)),
        Err(e) => {
            log::error!("simulation failed: {e}");
            simulation_error_response(&e)
        }
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn simulation_error_response(err: &SimulationError) -> Response {
    let status = match err {
        SimulationError::InputValidation(_) => StatusCode::BAD_REQUEST,
        SimulationError::UnexpectedComputation(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, &err.to_string())
}

#[cfg(test)]
fn input_from_json(json: &str) -> Result<SimulationInput, SimulationError> {
    let payload = serde_json::from_str::<SimulatePayload>(json).map_err(|e| {
        SimulationError::InputValidation(format!("Invalid API JSON payload: {e}"))
    })?;
    input_from_payload(payload)
}

fn input_from_payload(payload: SimulatePayload) -> Result<SimulationInput, SimulationError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.initial_deposit {
        cli.initial_deposit = v;
    }
    if let Some(v) = payload.daily_rate_percent {
        cli.daily_rate = v;
    }
    if let Some(v) = payload.duration {
        cli.duration = v;
    }
    if let Some(v) = payload.duration_unit {
        cli.duration_unit = v.into();
    }
    if let Some(v) = payload.contribution_amount {
        cli.contribution_amount = v;
    }
    if let Some(v) = payload.contribution_frequency {
        cli.contribution_frequency = v.into();
    }
    if let Some(v) = payload.breakdown_period {
        cli.breakdown = v.into();
    }

    build_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        initial_deposit: 1_000.0,
        daily_rate: 0.01,
        duration: 1,
        duration_unit: CliDurationUnit::Years,
        contribution_amount: 0.0,
        contribution_frequency: CliFrequency::Monthly,
        breakdown: CliFrequency::Monthly,
        max_term_days: 365_000,
        json: false,
    }
}
