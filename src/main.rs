//! zpgen CLI: generates the Zebrafish Phenotype Ontology from ZFIN phenotype data.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use zpgen::generator::{self, GeneratorConfig};

#[derive(Parser)]
#[command(
    name = "zpgen",
    version,
    about = "Generates the Zebrafish Phenotype Ontology and gene annotations"
)]
struct Cli {
    /// ZFIN phenotype file, plain or gzip compressed.
    #[arg(short = 'z', long = "zfin-input-file")]
    zfin_input_file: PathBuf,

    /// Where the ontology is written to.
    #[arg(short = 'o', long = "ontology-output-file")]
    ontology_output_file: PathBuf,

    /// Where the gene annotations are written to.
    #[arg(short = 'a', long = "annotation-output-file")]
    annotation_output_file: PathBuf,

    /// Re-use the identifiers of the existing ontology output file.
    #[arg(short = 'k', long = "keep-ids")]
    keep_ids: bool,

    /// Annotate each class with the terms it was generated from.
    #[arg(long = "add-source-information")]
    add_source_information: bool,

    /// Also write the source information to this file. Implies --add-source-information.
    #[arg(short = 's', long = "source-information-output-file")]
    source_information_output_file: Option<PathBuf>,

    /// Log debug messages.
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = GeneratorConfig::new(
        cli.zfin_input_file,
        cli.ontology_output_file,
        cli.annotation_output_file,
    );
    config.keep_ids = cli.keep_ids;
    config.add_source_information = cli.add_source_information;
    config.source_information_output = cli.source_information_output_file;

    match generator::run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("zpgen: {err}");
            ExitCode::FAILURE
        }
    }
}
