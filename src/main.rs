//! Household Income Predictor - Main Entry Point
//!
//! Loads the configured model once, then reads one JSON object of field
//! values per stdin line and writes one prediction (or error) per line.

use anyhow::{Context, Result};
use clap::Parser;
use household_income_predictor::{
    config::{AppConfig, OutputFormat},
    logging, CurrencyFormatter, FeatureRecord, FormState, InferenceAdapter, ModelLoader,
    ModelVariant, Prediction, PredictionReport, PredictorError,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "income-predictor")]
#[command(about = "Predict household income from survey fields")]
struct Cli {
    /// Configuration file (default: config/config.toml, if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model variant: gradient_boosting or linear_regression
    #[arg(long)]
    variant: Option<ModelVariant>,

    /// Model artifact path
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Result output: text or json
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Print the input form layout and exit
    #[arg(long)]
    print_schema: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    if let Some(variant) = cli.variant {
        config.model.variant = variant;
    }
    if let Some(path) = cli.model {
        config.model.path = Some(path);
    }
    if let Some(format) = cli.format {
        config.presentation.output = format;
    }

    logging::init(&config.logging);

    let variant = config.model.variant;
    let schema = variant.schema();
    info!(variant = variant.as_str(), features = schema.len(), "{}", variant.title());

    if cli.print_schema {
        let layout = FormState::new(schema).describe();
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    let path = config.model.resolved_path();
    let loader = ModelLoader::new()
        .with_format(config.model.format)
        .with_threads(config.model.onnx_threads);
    let model = loader.load(&path).unwrap_or_else(|e| abort(&e));
    let adapter = InferenceAdapter::new(model.as_ref(), schema).unwrap_or_else(|e| abort(&e));
    let formatter = CurrencyFormatter::new(config.presentation.currency_symbol.clone());
    info!(model = %adapter.model_name(), "Ready for submissions on stdin");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut handled = 0u64;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read submission")?;
        if line.trim().is_empty() {
            continue;
        }
        handled += 1;

        let outcome = submit(&adapter, &line);
        let rendered = match (&outcome, config.presentation.output) {
            (Ok(prediction), OutputFormat::Text) => {
                formatter.render(variant.target_label(), *prediction)
            }
            (Ok(prediction), OutputFormat::Json) => {
                let report = PredictionReport::new(
                    variant.as_str(),
                    variant.target_label(),
                    *prediction,
                    formatter.format(prediction.value()),
                );
                serde_json::to_string(&report)?
            }
            (Err(e), OutputFormat::Text) => format!("Error: {:#}", e),
            (Err(e), OutputFormat::Json) => {
                serde_json::json!({ "error": format!("{:#}", e) }).to_string()
            }
        };

        writeln!(out, "{}", rendered)?;
        out.flush()?;

        match &outcome {
            Ok(_) => debug!(submission = handled, "Submission handled"),
            Err(e) if is_recoverable(e) => {
                warn!(submission = handled, error = %format!("{:#}", e), "Submission rejected");
            }
            Err(e) => {
                error!(submission = handled, error = %format!("{:#}", e), "Unrecoverable error");
                std::process::exit(1);
            }
        }
    }

    info!(submissions = handled, "Input closed, shutting down");
    Ok(())
}

/// Startup failures end the process with exit status 1.
fn abort(e: &PredictorError) -> ! {
    error!(error = %e, "Startup aborted");
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

/// Input problems (bad JSON, unknown fields, model failures on one record)
/// leave the loop running; anything else stops it.
fn is_recoverable(e: &anyhow::Error) -> bool {
    match e.downcast_ref::<PredictorError>() {
        Some(e) => e.is_recoverable(),
        None => e.downcast_ref::<serde_json::Error>().is_some(),
    }
}

/// Handle one submission: defaults, then the line's overrides, then inference.
fn submit(adapter: &InferenceAdapter<'_>, line: &str) -> Result<Prediction> {
    let overrides: FeatureRecord =
        serde_json::from_str(line).context("Submission is not a JSON object of numbers")?;

    let mut form = FormState::new(*adapter.schema());
    form.apply(&overrides)?;

    Ok(adapter.predict(&form.submit())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use household_income_predictor::models::LinearRegressor;

    fn linear_adapter(model: &LinearRegressor) -> InferenceAdapter<'_> {
        InferenceAdapter::new(model, ModelVariant::LinearRegression.schema()).unwrap()
    }

    #[test]
    fn test_format_flag() {
        let cli = Cli::try_parse_from(["income-predictor", "--format", "json"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Json));

        let cli = Cli::try_parse_from(["income-predictor"]).unwrap();
        assert_eq!(cli.format, None);

        assert!(Cli::try_parse_from(["income-predictor", "--format", "yaml"]).is_err());
    }

    #[test]
    fn test_bad_submissions_are_recoverable() {
        let model = LinearRegressor::new(vec![1.0; 9], 0.0);
        let adapter = linear_adapter(&model);

        for line in ["not json", "[1, 2]", r#"{"Region": 1}"#, r#"{"a": 1, "a": 2}"#] {
            let err = submit(&adapter, line).unwrap_err();
            assert!(is_recoverable(&err), "{}: {:#}", line, err);
        }
        assert!(submit(&adapter, "{}").is_ok());
    }

    #[test]
    fn test_binding_errors_are_not_recoverable() {
        let err = anyhow::Error::from(PredictorError::ColumnOrder {
            position: 2,
            expected: "Transportation Expenditure".to_string(),
            found: "Education Expenditure".to_string(),
        });
        assert!(!is_recoverable(&err));

        let err = anyhow::anyhow!("stdin closed unexpectedly");
        assert!(!is_recoverable(&err));
    }
}
