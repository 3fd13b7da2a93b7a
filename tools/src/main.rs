//! kpi-runner: headless driver for the call-center KPI core.
//!
//! Usage:
//!   kpi-runner --seed 12345 --from 2024-03-01 --to 2024-03-31 --granularity week
//!   kpi-runner --seed 12345 --csv march.csv --from 2024-03-01 --to 2024-03-31
//!   kpi-runner --config dashboard.json --ipc-mode

use anyhow::Result;
use chrono::NaiveDate;
use kpi_core::{
    aggregate::{Granularity, KpiSummary, PeriodSummary},
    auth::{Authenticator, PasswordDirectory, Role},
    config::DashboardConfig,
    context::DashboardContext,
    requests::RequestHandler,
    KpiError,
};
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config = match flag_value(&args, "--config") {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };
    let from = parse_flag(&args, "--from")?.unwrap_or(config.generator.period_start);
    let to = parse_flag(&args, "--to")?.unwrap_or(config.generator.period_end);
    let granularity = parse_flag(&args, "--granularity")?.unwrap_or(Granularity::Month);
    let csv_path = flag_value(&args, "--csv");

    if !ipc_mode {
        println!("Call-center KPIs: kpi-runner");
        println!("  seed:        {seed}");
        println!("  period:      {from} - {to}");
        println!("  granularity: {}", granularity.name());
        println!();
    }

    let ctx = DashboardContext::new(config, seed)?;

    if ipc_mode {
        let directory = build_directory(ctx.config())?;
        run_ipc_loop(&ctx, &directory)?;
    } else {
        print_report(&ctx, from, to, granularity)?;
        if let Some(path) = csv_path {
            let file = BufWriter::new(File::create(path)?);
            let rows = ctx.export_csv(from, to, file)?;
            println!();
            println!("Wrote {rows} row(s) to {path}");
        }
    }

    Ok(())
}

/// Accounts come from the config; KPI_DIRECTOR_PASSWORD adds a
/// `director` account for local use.
fn build_directory(config: &DashboardConfig) -> Result<PasswordDirectory> {
    let mut directory = PasswordDirectory::from_config(&config.users)?;
    if let Ok(password) = env::var("KPI_DIRECTOR_PASSWORD") {
        directory.add_user("director", &password, Role::Director)?;
    }
    if directory.is_empty() {
        log::warn!("No user accounts configured; every login will be rejected");
    }
    Ok(directory)
}

fn run_ipc_loop(ctx: &DashboardContext, auth: &dyn Authenticator) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut handler = RequestHandler::new(ctx, auth);

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        let Some(reply) = handler.handle_line(&buffer) else {
            break;
        };
        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_report(ctx: &DashboardContext, from: NaiveDate, to: NaiveDate, granularity: Granularity) -> Result<()> {
    let summary = match ctx.summary(from, to) {
        Ok(s) => s,
        Err(KpiError::EmptyRange) => {
            println!("  No data for selected period");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    print_summary(&summary);

    println!();
    println!("=== BY {} ===", granularity.name().to_uppercase());
    for period in ctx.rollup(from, to, granularity)? {
        print_period(&period);
    }
    Ok(())
}

fn print_summary(s: &KpiSummary) {
    println!("=== KPI SUMMARY ===");
    println!("  days:             {}", s.days);
    println!(
        "  service level:    {:.1}% ({:+.1} vs target)",
        s.service_level_mean, s.service_level_delta
    );
    println!("  total calls:      {}", s.calls_total);
    println!("  handled calls:    {}", s.calls_handled);
    println!("  avg handle time:  {:.1} min", s.avg_handle_time_mean);
    println!("  avg wait time:    {:.1} min", s.avg_wait_time_mean);
    println!("  TMO + TMA:        {:.1} min", s.total_handle_time_mean);
    println!("  policies / quotes: {} / {}", s.policies_sold, s.quotes_issued);
    println!("  conversion rate:  {:.1}%", s.conversion_rate_mean);
}

fn print_period(p: &PeriodSummary) {
    let s = &p.summary;
    println!(
        "  {} | days: {:>2} | NS: {:.1}% | calls: {:>6} | TMO: {:.1} | conv: {:.1}%",
        p.period_start, s.days, s.service_level_mean, s.calls_total, s.avg_handle_time_mean, s.conversion_rate_mean
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

/// Value of `flag` if present. A present but unparsable value is an
/// error, never silently replaced by the default.
fn parse_flag<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    flag_value(args, flag)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| anyhow::anyhow!("Invalid value for {flag}: '{raw}' ({e})"))
        })
        .transpose()
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
