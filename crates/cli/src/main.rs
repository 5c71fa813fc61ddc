use api_shared::{AnalyzeReq, AnalyzeRes};
use clap::{Parser, Subcommand};
use rx_client::BackendClient;
use rx_core::config::ner_labels_from_env_value;
use rx_core::constants::{DEFAULT_BACKEND_ENDPOINT, DEFAULT_HTTP_TIMEOUT_SECS};
use rx_core::{
    extract_drug_entities, parse_drug_list, AnalysisError, AnalysisInput, AnalysisReport,
    AnalysisService, EntityFilter, PatientAge,
};
use rx_ner::HttpEntityRecogniser;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rxcheck")]
#[command(about = "Drug interaction and dosage analysis CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse drugs locally and print the report
    Analyze {
        /// Patient age in years (0-120)
        #[arg(long, default_value_t = 30, allow_negative_numbers = true)]
        age: i64,
        /// Drug name; repeat for each drug field (blank fields are ignored)
        #[arg(long = "drug")]
        drugs: Vec<String>,
        /// Unstructured medical text for drug information extraction
        #[arg(long, default_value = "")]
        text: String,
        /// Maximum number of drug fields
        #[arg(long, env = "RX_MAX_DRUG_FIELDS", default_value_t = 10)]
        max_drugs: usize,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send drugs to the analysis backend and print its response
    Remote {
        /// Patient age in years
        #[arg(long, default_value_t = 30, allow_negative_numbers = true)]
        age: i64,
        /// Drugs, comma separated
        #[arg(long, default_value = "aspirin, ibuprofen")]
        drugs: String,
        /// Backend analyse endpoint
        #[arg(long, env = "RX_BACKEND_ENDPOINT", default_value = DEFAULT_BACKEND_ENDPOINT)]
        endpoint: String,
        /// Request timeout in seconds
        #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
        timeout_secs: u64,
    },
    /// Extract drug names from free text with an external NER service
    Extract {
        /// Text to analyse
        #[arg(long)]
        text: String,
        /// NER inference endpoint
        #[arg(long, env = "RX_NER_ENDPOINT")]
        ner_endpoint: String,
        /// Entity labels treated as drugs (comma separated)
        #[arg(long, env = "RX_NER_LABELS")]
        labels: Option<String>,
        /// Minimum entity score
        #[arg(long, env = "RX_NER_MIN_SCORE", default_value_t = 0.0)]
        min_score: f32,
        /// Request timeout in seconds
        #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("rx_cli=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            age,
            drugs,
            text,
            max_drugs,
            json,
        }) => match run_analysis(age, drugs, text, max_drugs) {
            Ok(report) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", report.render_text());
                }
            }
            Err(e) => {
                eprintln!("{}", e);
                return Ok(ExitCode::FAILURE);
            }
        },
        Some(Commands::Remote {
            age,
            drugs,
            endpoint,
            timeout_secs,
        }) => {
            let client = BackendClient::new(&endpoint, Duration::from_secs(timeout_secs))?;
            let req = AnalyzeReq {
                drugs: parse_drug_list(&drugs),
                age,
                text: None,
            };
            match client.analyze(&req).await {
                Ok(res) => print!("{}", render_backend_response(&res)?),
                Err(e) => {
                    tracing::error!("Backend call error: {}", e);
                    eprintln!("{}", e.user_message());
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Some(Commands::Extract {
            text,
            ner_endpoint,
            labels,
            min_score,
            timeout_secs,
        }) => {
            let recogniser =
                HttpEntityRecogniser::new(&ner_endpoint, Duration::from_secs(timeout_secs))?;
            let filter = EntityFilter::new(ner_labels_from_env_value(labels), min_score);
            let drugs = extract_drug_entities(&recogniser, &filter, &text).await?;
            if drugs.is_empty() {
                println!("No drug entities found.");
            } else {
                for drug in drugs {
                    println!("- {}", drug);
                }
            }
        }
        None => {
            println!("Use 'rxcheck --help' for commands");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Validate form-style arguments and run the local analysers.
///
/// With no `--drug` at all the form still has one (blank) field, so the result is the
/// "enter at least one drug" warning rather than a field-count error.
fn run_analysis(
    age: i64,
    drugs: Vec<String>,
    text: String,
    max_drugs: usize,
) -> Result<AnalysisReport, AnalysisError> {
    let age = PatientAge::new(age)?;
    let fields = if drugs.is_empty() {
        vec![String::new()]
    } else {
        drugs
    };
    let input = AnalysisInput::from_form(age, &fields, text, max_drugs)?;
    Ok(AnalysisService::mock().analyse(&input))
}

fn render_backend_response(res: &AnalyzeRes) -> serde_json::Result<String> {
    Ok(format!(
        "Interactions\n{}\n\nDosage Recommendations\n{}\n\nAlternatives\n{}\n",
        serde_json::to_string_pretty(&res.interactions)?,
        serde_json::to_string_pretty(&res.dosage)?,
        serde_json::to_string_pretty(&res.alternatives)?,
    ))
}
