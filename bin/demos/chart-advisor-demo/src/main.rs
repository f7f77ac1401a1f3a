// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use anyhow::{bail, Context, Result};
use chart_advisor::{
    AdvisorConfig, ChartAdvisor, Datum, ErrorReporter, FieldHint, MeasurementLevel,
    RecommendationRequest,
};
use clap::Parser;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "chart-advisor-demo",
    version,
    about = "Recommend chart specifications for a JSON or CSV table"
)]
struct Args {
    #[arg(help = "Path to a JSON array of row objects, or a CSV file with a header row")]
    data: PathBuf,
    #[arg(long = "config", help = "YAML advisor configuration")]
    config: Option<PathBuf>,
    #[arg(long = "hint", help = "Preferred chart type; repeat to give an ordered list")]
    hints: Vec<String>,
    #[arg(
        long = "field-hint",
        help = "Known measurement level of a column as name=level, e.g. day=time"
    )]
    field_hints: Vec<String>,
    #[arg(long = "select", help = "Chart type to keep selected if it is still a candidate")]
    select: Option<String>,
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match &args.config {
        Some(path) => AdvisorConfig::from_yaml_file(path),
        None => Ok(AdvisorConfig::default()),
    };
    let advisor = match config.and_then(|c| ChartAdvisor::with_config(c, Vec::new())) {
        Ok(advisor) => advisor,
        Err(e) => {
            eprint!("{}", ErrorReporter::new().report(&e));
            std::process::exit(1);
        }
    };
    info!(archetypes = ?advisor.catalog().ids(), "catalog ready");

    let data = load_rows(&args.data)?;
    info!(rows = data.len(), path = %args.data.display(), "loaded dataset");
    let mut request = RecommendationRequest::new(data)
        .with_field_hints(parse_field_hints(&args.field_hints)?)
        .with_external_hint(args.hints.clone());
    if let Some(selection) = &args.select {
        request = request.with_previous_selection(selection.clone());
    }

    for field in advisor.classify(&request.data, &request.field_hints) {
        info!(field = %field.name, levels = ?field.levels, "classified");
    }
    let result = advisor.recommend(&request);
    if result.is_empty() {
        println!("No visualization available for this dataset.");
        return Ok(());
    }
    info!(
        candidates = ?result.chart_types(),
        selected = ?result.selected_chart_type(),
        "recommendation ready"
    );
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn parse_field_hints(raw: &[String]) -> Result<Vec<FieldHint>> {
    raw.iter()
        .map(|entry| {
            let Some((name, level)) = entry.split_once('=') else {
                bail!("field hint '{entry}' must look like name=level");
            };
            let level: MeasurementLevel = level
                .parse()
                .map_err(|l| anyhow::anyhow!("unknown measurement level '{l}'"))?;
            Ok(FieldHint::new(name.trim(), level))
        })
        .collect()
}

fn load_rows(path: &Path) -> Result<Vec<Datum>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        return load_csv(path);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;
    serde_json::from_str(&content).context("Data file must be a JSON array of objects")
}

fn load_csv(path: &Path) -> Result<Vec<Datum>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Datum = headers
            .iter()
            .zip(record.iter())
            .map(|(name, raw)| (name.to_string(), csv_value(raw)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn csv_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::from(n),
        _ => Value::String(trimmed.to_string()),
    }
}
