use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use std::path::Path;

use rcm_kpi_core::kpi::{self, KpiReportInput, ManualInputs};
use rcm_kpi_core::periods::PeriodConfig;
use rcm_kpi_core::records::normalize_rows;
use rcm_kpi_core::render::{self, RenderedTable};

use crate::input;
use crate::output::export::export_tables;
use crate::output::CommandOutput;

/// Which tables a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    All,
    Snapshot,
    Quarterly,
    Yearly,
}

/// Arguments shared by the report subcommands
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ReportArgs {
    /// Path to the AR analysis export (CSV). Read from stdin when omitted
    #[arg(long)]
    pub records: Option<String>,

    /// Period configuration file (JSON, or YAML by extension)
    #[arg(long)]
    pub config: Option<String>,

    /// Date standing in for today (YYYY-MM-DD); closes the elapsed year
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Visit count from the billing dashboard, shown verbatim
    #[arg(long)]
    pub visits: Option<String>,

    /// AR aged 31–60 days, shown verbatim
    #[arg(long = "ar-31-60")]
    pub ar_31_60: Option<String>,

    /// AR aged 61–90 days, shown verbatim
    #[arg(long = "ar-61-90")]
    pub ar_61_90: Option<String>,

    /// Days elapsed in the current year; invalid text falls back to the as-of date
    #[arg(long)]
    pub days_elapsed: Option<String>,

    /// Denial-vs-resolution percentage (e.g. 85 for 85%), overrides the config
    #[arg(long)]
    pub denial_vs_resolution: Option<Decimal>,

    /// Snapshot day count, overrides the config
    #[arg(long)]
    pub snapshot_days: Option<u32>,

    /// Also write each table as CSV into this directory
    #[arg(long)]
    pub out_dir: Option<String>,
}

pub fn run_report(
    args: ReportArgs,
    scope: ReportScope,
) -> Result<CommandOutput, Box<dyn std::error::Error>> {
    let export = if let Some(ref path) = args.records {
        input::file::read_visit_csv(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--records <export.csv> or CSV on stdin required for KPI report".into());
    };

    let config = load_config(args.config.as_deref(), args.denial_vs_resolution, args.snapshot_days)?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let normalized = normalize_rows(export.rows);

    let report_input = KpiReportInput {
        records: normalized.records,
        manual: ManualInputs {
            visits: args.visits,
            ar_31_60: args.ar_31_60,
            ar_61_90: args.ar_61_90,
            days_elapsed: args.days_elapsed,
        },
        config,
        as_of,
        coercion: normalized.report,
    };

    let mut result = kpi::build_report(&report_input)?;
    for column in &export.missing_columns {
        result
            .warnings
            .push(format!("Column '{}' is missing from the export; read as blank.", column));
    }

    let tables: Vec<RenderedTable> = match scope {
        ReportScope::All => render::render_report(&result.result),
        ReportScope::Snapshot => vec![render::render_snapshot(&result.result.snapshot)],
        ReportScope::Quarterly => vec![render::render_quarterly(&result.result.quarterly)],
        ReportScope::Yearly => vec![render::render_yearly(&result.result.yearly)],
    };

    let mut value = serde_json::to_value(&result)?;
    if let Some(dir) = args.out_dir {
        let written = export_tables(Path::new(&dir), &tables, Local::now().naive_local())?;
        if let Some(map) = value.as_object_mut() {
            map.insert("exported_files".to_string(), serde_json::to_value(&written)?);
        }
        for path in &written {
            eprintln!("wrote {}", path.display());
        }
    }

    Ok(CommandOutput { value, tables })
}

/// Config file (or defaults) with flag overrides applied, validated.
pub fn load_config(
    path: Option<&str>,
    denial_vs_resolution: Option<Decimal>,
    snapshot_days: Option<u32>,
) -> Result<PeriodConfig, Box<dyn std::error::Error>> {
    let mut config: PeriodConfig = match path {
        Some(p) => input::file::read_config(p)?,
        None => PeriodConfig::default(),
    };
    if let Some(d) = denial_vs_resolution {
        config.denial_vs_resolution = d;
    }
    if let Some(days) = snapshot_days {
        config.snapshot_days = days;
    }
    config.validate()?;
    Ok(config)
}
