use clap::{Parser, Subcommand};
use tracing::error;

use exo_etl::config::Config;
use exo_etl::logging;
use exo_etl::pipeline::EtlPipeline;

#[derive(Parser)]
#[command(name = "exo_etl")]
#[command(about = "Batch ETL pipeline for exoplanet observation data")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: extract, stage, curate, load
    Run,
    /// Normalize the raw area into the staging area
    Stage,
    /// Clean the staging area into the curated area
    Curate,
    /// Load the curated area into the SQLite store
    Load,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load_or_default()?;
    let pipeline = EtlPipeline::new(config);

    match cli.command {
        Commands::Run => match pipeline.run() {
            Ok(result) => {
                println!("\n📊 Pipeline results for run {}:", result.run_id);
                println!("   Raw files: {}", result.raw_files);
                println!("   Staged files: {}", result.staging_files);
                println!("   Curated files: {}", result.curated_files);
                println!("   Rows loaded: {}", result.rows_loaded);
            }
            Err(e) => {
                error!("Pipeline failed: {}", e);
                println!("❌ Pipeline failed: {e}");
                return Err(e.into());
            }
        },
        Commands::Stage => {
            let staged = pipeline.run_staging().map_err(|e| {
                error!("Staging run failed: {}", e);
                e
            })?;
            println!("✅ Staged {} file(s)", staged.len());
        }
        Commands::Curate => {
            let curated = pipeline.run_curated().map_err(|e| {
                error!("Curation run failed: {}", e);
                e
            })?;
            println!("✅ Curated {} file(s)", curated.len());
        }
        Commands::Load => {
            let rows = pipeline.run_load().map_err(|e| {
                error!("Load run failed: {}", e);
                e
            })?;
            println!("✅ Loaded {rows} row(s)");
        }
    }
    Ok(())
}
