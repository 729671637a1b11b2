//! A CLI that prints the structural metadata snapshot of a container as JSON.

use clap::Parser;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use h5meta::collect::CollectOptions;
use h5meta::container::MemoryContainer;
use h5meta::record::RecordStore;
use h5meta::serialize::to_json_text;

/// Print a structural metadata snapshot of a hierarchical data container as
/// JSON.
#[derive(Parser, Debug)]
#[command(name = "h5meta", version, about)]
struct Cli {
    /// Path of the container document to inspect.
    input: PathBuf,

    /// Reserved; snapshots are always written to standard output.
    output: Option<PathBuf>,

    /// Do not materialize dataset values with more than this many elements.
    #[arg(long)]
    max_value_elements: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(output) = &cli.output {
        log::warn!(
            "output path {} is reserved and ignored; writing to standard output",
            output.display()
        );
    }

    let container = MemoryContainer::open(&cli.input)?;
    log::debug!("opened container {}", cli.input.display());

    let mut options = CollectOptions::default();
    options.set_max_value_elements(cli.max_value_elements);
    let store = RecordStore::from_container(&container, &options)?;
    log::debug!("collected {} records", store.len());

    // Render the whole snapshot before writing the first byte, so a failure
    // never leaves partial JSON on standard output.
    let text = to_json_text(&store)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}
