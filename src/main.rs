//! Command-line front end for the CredSetu prediction client.
//!
//! ```bash
//! # Check service reachability
//! credsetu status
//!
//! # Predict with the sample application
//! credsetu predict
//!
//! # Predict with overrides
//! credsetu predict --age 45 --grade F --defaulted
//!
//! # Predict from a JSON file
//! credsetu predict --input application.json
//!
//! # Retrain the remote model
//! credsetu train
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use argh::FromArgs;
use serde::de::DeserializeOwned;
use serde_json::Value;

use credsetu::{
    init_tracing, ApiClient, ApiConfig, LoanApplication, Predictor, PredictionResult,
    ServerStatus, StatusHandle, StatusMonitor,
};

#[derive(FromArgs)]
/// CredSetu loan default prediction client.
struct Args {
    /// path to a TOML config file
    #[argh(option)]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Status(StatusCmd),
    Predict(PredictCmd),
    Train(TrainCmd),
}

/// Check whether the prediction service is reachable.
#[derive(FromArgs)]
#[argh(subcommand, name = "status")]
struct StatusCmd {}

/// Submit a loan application for a default-risk prediction.
#[derive(FromArgs)]
#[argh(subcommand, name = "predict")]
struct PredictCmd {
    /// read the application from a JSON file (field flags are ignored)
    #[argh(option)]
    input: Option<PathBuf>,

    /// applicant age
    #[argh(option)]
    age: Option<u32>,

    /// annual income
    #[argh(option)]
    income: Option<u64>,

    /// home ownership: rent, mortgage, own or other
    #[argh(option)]
    home: Option<String>,

    /// employment length in years
    #[argh(option)]
    emp_length: Option<f64>,

    /// loan intent: personal, education, medical, venture,
    /// homeimprovement or debtconsolidation
    #[argh(option)]
    intent: Option<String>,

    /// loan grade letter A-G
    #[argh(option)]
    grade: Option<String>,

    /// loan amount
    #[argh(option)]
    amount: Option<u64>,

    /// interest rate percentage
    #[argh(option)]
    rate: Option<f64>,

    /// loan amount to annual income ratio (0-1)
    #[argh(option)]
    percent_income: Option<f64>,

    /// applicant has a prior default on file
    #[argh(switch)]
    defaulted: bool,

    /// credit history length in years
    #[argh(option)]
    history: Option<u32>,
}

/// Retrain the remote prediction model.
#[derive(FromArgs)]
#[argh(subcommand, name = "train")]
struct TrainCmd {}

/// Parse a categorical flag through its serde wire value, so the CLI accepts
/// exactly what the backend accepts.
fn parse_category<T: DeserializeOwned>(flag: &str, value: &str) -> Result<T> {
    serde_json::from_value(Value::String(value.to_uppercase()))
        .map_err(|_| anyhow!("Invalid value '{}' for --{}", value, flag))
}

impl PredictCmd {
    fn application(&self) -> Result<LoanApplication> {
        if let Some(path) = &self.input {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return serde_json::from_str(&raw)
                .with_context(|| format!("Invalid application in {}", path.display()));
        }

        let mut app = LoanApplication::default();
        if let Some(age) = self.age {
            app.person_age = age;
        }
        if let Some(income) = self.income {
            app.person_income = income;
        }
        if let Some(home) = &self.home {
            app.person_home_ownership = parse_category("home", home)?;
        }
        if let Some(emp_length) = self.emp_length {
            app.person_emp_length = emp_length;
        }
        if let Some(intent) = &self.intent {
            app.loan_intent = parse_category("intent", intent)?;
        }
        if let Some(grade) = &self.grade {
            app.loan_grade = parse_category("grade", grade)?;
        }
        if let Some(amount) = self.amount {
            app.loan_amnt = amount;
        }
        if let Some(rate) = self.rate {
            app.loan_int_rate = rate;
        }
        if let Some(percent_income) = self.percent_income {
            app.loan_percent_income = percent_income;
        }
        if self.defaulted {
            app.cb_person_default_on_file = credsetu::api::DefaultOnFile::Yes;
        }
        if let Some(history) = self.history {
            app.cb_person_cred_hist_length = history;
        }
        Ok(app)
    }
}

fn render_result(application: &LoanApplication, result: &PredictionResult) {
    match result {
        PredictionResult::Failed { message } => {
            println!("Prediction failed: {}", message);
        }
        PredictionResult::Outcome(outcome) => {
            let pct = outcome.default_probability * 100.0;
            let filled = (outcome.default_probability * 20.0).round() as usize;
            let bar: String = "#".repeat(filled.min(20)) + &"-".repeat(20 - filled.min(20));

            println!("Loan status:         {}", outcome.loan_status);
            println!("Default probability: {:>5.1}%  [{}]", pct, bar);
            if outcome.is_default() {
                println!(
                    "This loan has a high probability of defaulting. Consider additional \
                     verification or collateral."
                );
            } else {
                println!("This loan has a low probability of defaulting.");
            }
            if application.is_high_risk() {
                println!("Note: the application itself carries high-risk markers.");
            }
        }
    }
}

async fn run_predict(config: &ApiConfig, cmd: &PredictCmd) -> Result<()> {
    let application = cmd.application()?;
    let client = ApiClient::new(config)?;
    let status = StatusHandle::new();
    let monitor = StatusMonitor::start(
        client.clone(),
        status.clone(),
        Duration::from_secs(config.status_poll_secs),
    );

    // Wait for the initial probe so the pre-flight check sees a settled
    // status rather than the startup "checking" value.
    let mut rx = status.subscribe();
    while status.current() == ServerStatus::Checking {
        rx.changed().await?;
    }
    println!("Server status: {}", status.current());

    let predictor = Predictor::new(client, status);
    let result = predictor
        .submit_with_progress(&application, |interim| {
            if let PredictionResult::Failed { message } = interim {
                println!("{}", message);
            }
        })
        .await;

    render_result(&application, &result);
    monitor.stop();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Args = argh::from_env();
    let config = ApiConfig::load(args.config.as_deref()).map_err(|e| anyhow!(e))?;

    match &args.command {
        Command::Status(_) => {
            let client = ApiClient::new(&config)?;
            let status = StatusHandle::new();
            match credsetu::probe(&client, &status).await {
                ServerStatus::Online => println!("Server online ({})", client.base_url()),
                _ => {
                    println!("Server offline ({})", client.base_url());
                    std::process::exit(1);
                }
            }
        }
        Command::Predict(cmd) => run_predict(&config, cmd).await?,
        Command::Train(_) => {
            let client = ApiClient::new(&config)?;
            let response = client.train().await?;
            let message = response["message"].as_str().unwrap_or("Training complete");
            println!("{}", message);
        }
    }

    Ok(())
}
