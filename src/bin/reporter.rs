use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use pokeapi_etl::config::ConfigLoader;
use pokeapi_etl::error::EtlError;
use pokeapi_etl::logging;
use pokeapi_etl::report::{self, Reporter};
use pokeapi_etl::store::DataStore;

#[derive(Parser)]
#[command(name = "reporter")]
#[command(about = "Render the descriptive charts from the extracted creature table")]
#[command(version)]
struct Cli {
    /// JSON config file (defaults to pokeapi-etl.json when present)
    #[arg(long)]
    config: Option<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(EtlError::ConfigRead(_) | EtlError::ConfigParse(_) | EtlError::InvalidConfig(_)) =
            report.downcast_ref::<EtlError>()
        {
            return ExitCode::from(2);
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    let config = ConfigLoader::resolve(cli.config.as_deref())?;
    logging::init(&config.log_file)?;

    let store = DataStore::new(config.data_dir.clone());
    let records = report::load_table(&store)?;

    let reporter = Reporter::new(config.reports_dir.clone());
    let written = reporter
        .run(&records, |chart, path| {
            println!("✅ Gráfica {} guardada: {path}", chart.number);
        })
        .inspect_err(|err| error!("reporting aborted: {err}"))?;

    info!("{} charts written to {}", written.len(), reporter.reports_dir());
    println!(
        "\n🎉 ¡Todas las gráficas generadas en la carpeta {}/!",
        reporter.reports_dir()
    );
    Ok(())
}
