use chrono::{Local, NaiveDate};
use clap::Args;
use serde_json::json;

use rcm_kpi_core::periods::resolve_elapsed_days;
use rcm_kpi_core::render::RenderedTable;

use super::report::load_config;
use crate::output::CommandOutput;

/// Arguments for printing the effective period configuration
#[derive(Args)]
pub struct PeriodsArgs {
    /// Period configuration file (JSON, or YAML by extension)
    #[arg(long)]
    pub config: Option<String>,

    /// Date standing in for today (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Days elapsed in the current year
    #[arg(long)]
    pub days_elapsed: Option<String>,
}

pub fn run_periods(args: PeriodsArgs) -> Result<CommandOutput, Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref(), None, None)?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let elapsed = match config.elapsed_year() {
        Some(y) => Some(resolve_elapsed_days(args.days_elapsed.as_deref(), y.year, as_of)?),
        None => None,
    };

    let mut quarters = RenderedTable {
        name: "Quarters".into(),
        title: "Quarterly periods".into(),
        columns: vec!["Quarter".into(), "First Day".into(), "Last Day".into(), "Days".into()],
        rows: Vec::new(),
    };
    for q in &config.quarters {
        let (first, last) = q.bounds()?;
        quarters.rows.push(vec![
            q.label(),
            first.to_string(),
            last.to_string(),
            q.days()?.to_string(),
        ]);
    }

    let mut years = RenderedTable {
        name: "Years".into(),
        title: "Yearly periods".into(),
        columns: vec!["Year".into(), "First Day".into(), "Last Day".into(), "Days".into()],
        rows: Vec::new(),
    };
    for y in &config.years {
        let (start, end) = y.bounds(as_of)?;
        let last = end.pred_opt().map(|d| d.to_string()).unwrap_or_default();
        let days = y.days_in_period(elapsed.as_ref().map_or(0, |e| e.days));
        years
            .rows
            .push(vec![y.label(), start.to_string(), last, days.to_string()]);
    }

    let value = json!({
        "result": config,
        "as_of": as_of,
        "elapsed_days": elapsed,
    });

    Ok(CommandOutput {
        value,
        tables: vec![quarters, years],
    })
}
