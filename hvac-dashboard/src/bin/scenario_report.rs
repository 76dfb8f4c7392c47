use anyhow::{bail, Result};
use hvac_dashboard::{config::AppConfig, load, observability, report::ScenarioReport, scenarios};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing(observability::REPORT_DIRECTIVE);

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: scenario_report <csv_path>");
    }
    let csv_path = &args[1];

    // Tariff and shutoff window come from the config file if there is one.
    let cfg = AppConfig::load_or_default()?;

    let dataset = load::load_csv_file(csv_path).await?;
    if dataset.is_empty() {
        bail!("{csv_path} contains no readings");
    }

    let set = scenarios::compute_scenarios(&dataset, &cfg.scenario_settings())?;
    let report = ScenarioReport::new(&set, &cfg.tariff());

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
