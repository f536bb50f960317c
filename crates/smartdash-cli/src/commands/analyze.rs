//! Analysis command implementations (extract, predict, insights, correlate, simulate)

use std::path::Path;

use anyhow::{bail, Context, Result};

use smartdash_core::import::{parse_categories, parse_points};
use smartdash_core::{
    AnalyticsEngine, CategoryPoints, Forecast, InputFormat, Series, TrendClass,
};

use super::{print_json, read_input, truncate, Output};

/// Widest label shown in text tables
const LABEL_WIDTH: usize = 30;

/// Load a single series from any supported file
pub fn load_series(path: &Path, category: Option<&str>) -> Result<Series> {
    let (data, format) = read_input(path)?;
    let (name, points) = parse_points(&data, format, category)
        .with_context(|| format!("Failed to load series from {}", path.display()))?;
    Ok(Series::from_points(name, &points)?)
}

/// Load categorized points from any supported file
pub fn load_categories(path: &Path) -> Result<CategoryPoints> {
    let (data, format) = read_input(path)?;
    parse_categories(&data, format)
        .with_context(|| format!("Failed to load categories from {}", path.display()))
}

pub fn cmd_extract(engine: &AnalyticsEngine, file: &Path, output: Output) -> Result<()> {
    let (data, format) = read_input(file)?;
    let InputFormat::Document(kind) = format else {
        bail!("extract reads .txt or .pdf documents, got {}", file.display());
    };

    let series = engine.extract(&data, kind)?;

    if output == Output::Json {
        return print_json(&series);
    }

    println!();
    println!("📄 Extracted {} values from {}", series.len(), file.display());
    println!("   ─────────────────────────────────────────────");
    for obs in &series.observations {
        println!(
            "   {:>4}  {:<width$}  {:>12}",
            obs.position + 1,
            truncate(&obs.label, LABEL_WIDTH),
            obs.value,
            width = LABEL_WIDTH
        );
    }
    println!();
    Ok(())
}

pub fn cmd_predict(
    engine: &AnalyticsEngine,
    file: &Path,
    category: Option<&str>,
    output: Output,
) -> Result<()> {
    let series = load_series(file, category)?;
    let report = engine.predict(&series)?;

    if output == Output::Json {
        return print_json(&report);
    }

    println!();
    println!("🔮 Forecast for {} ({} points)", series.category, series.len());
    println!("   ─────────────────────────────────────────────");
    print_forecast(&report.predictions);
    println!();
    println!(
        "   Model: {}  slope {}  intercept {}  accuracy {}%",
        report.model.model_type, report.model.slope, report.model.intercept, report.model.accuracy
    );
    println!();
    Ok(())
}

pub fn cmd_insights(engine: &AnalyticsEngine, file: &Path, output: Output) -> Result<()> {
    let categories = load_categories(file)?;
    let report = engine.summarize_all(&categories)?;

    if output == Output::Json {
        return print_json(&report);
    }

    println!();
    println!("💡 Insights ({} categories)", report.insights.len());
    println!("   ─────────────────────────────────────────────");
    for insight in &report.insights {
        let icon = match insight.trend_class {
            TrendClass::Up => "▲",
            TrendClass::Down => "▼",
            TrendClass::Stable => "■",
            TrendClass::Neutral => "·",
        };
        println!("   {} {}", icon, insight.message);
    }
    println!();
    println!("   {}", report.global_summary);
    println!();
    Ok(())
}

pub fn cmd_correlate(engine: &AnalyticsEngine, file: &Path, output: Output) -> Result<()> {
    let categories = load_categories(file)?;
    let report = engine.correlate(&categories)?;

    if output == Output::Json {
        return print_json(&report);
    }

    println!();
    println!("🔗 Correlations");
    println!("   ─────────────────────────────────────────────");
    if let Some(message) = &report.message {
        println!("   {}", message);
    } else if report.correlations.is_empty() {
        println!("   No significant correlations found.");
    }
    for edge in &report.correlations {
        println!(
            "   {:>6}  {:<8}  {}",
            edge.correlation,
            edge.strength.as_str(),
            edge.message
        );
    }
    println!();
    Ok(())
}

pub fn cmd_simulate(
    engine: &AnalyticsEngine,
    file: &Path,
    multiplier: f64,
    category: Option<&str>,
    output: Output,
) -> Result<()> {
    if !multiplier.is_finite() {
        bail!("multiplier must be a finite number");
    }
    let series = load_series(file, category)?;
    let report = engine.simulate(&series, multiplier)?;

    if output == Output::Json {
        return print_json(&report);
    }

    println!();
    println!(
        "🧪 What-if for {}: forecast x{}",
        series.category, report.multiplier
    );
    println!("   ─────────────────────────────────────────────");
    println!("   {:<16}  {:>12}  {:>12}", "", "baseline", "projected");
    for (base, proj) in report
        .baseline
        .points()
        .iter()
        .zip(report.projected.points())
    {
        println!("   {:<16}  {:>12}  {:>12}", base.label, base.value, proj.value);
    }
    println!();
    Ok(())
}

fn print_forecast(forecast: &Forecast) {
    for point in forecast.points() {
        println!("   {:<16}  {:>12}", point.label, point.value);
    }
}
