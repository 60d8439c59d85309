use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing::error;

use pokeapi_etl::app::Extractor;
use pokeapi_etl::config::ConfigLoader;
use pokeapi_etl::error::EtlError;
use pokeapi_etl::logging;
use pokeapi_etl::output::SummaryOutput;
use pokeapi_etl::pokeapi::PokeApiHttpClient;
use pokeapi_etl::store::DataStore;

#[derive(Parser)]
#[command(name = "extractor")]
#[command(about = "Fetch creatures from the PokeAPI catalog and write them as JSON and CSV")]
#[command(version)]
struct Cli {
    /// JSON config file (defaults to pokeapi-etl.json when present)
    #[arg(long)]
    config: Option<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<EtlError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &EtlError) -> u8 {
    match error {
        EtlError::ConfigRead(_) | EtlError::ConfigParse(_) | EtlError::InvalidConfig(_) => 2,
        err if err.is_remote() => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    let config = ConfigLoader::resolve(cli.config.as_deref())?;
    logging::init(&config.log_file)?;

    let client = PokeApiHttpClient::from_config(&config)
        .inspect_err(|err| error!("failed to build catalog client: {err}"))?;
    let store = DataStore::new(config.data_dir.clone());
    let extractor = Extractor::new(client);

    let result = extractor
        .run_and_store(config.count, &store)
        .inspect_err(|err| error!("extraction failed: {err}"))?;

    SummaryOutput::print(&result).into_diagnostic()?;
    Ok(())
}
