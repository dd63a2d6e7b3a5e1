use clap::Parser;
use log::info;
use miette::{IntoDiagnostic, Result};
use std::fs;

/// Convert a tag-delimited MUD area file to JSON.
#[derive(Parser, Debug)]
#[command(name = "are2json", version, about)]
struct Args {
    /// Area base name: reads `<name>.are` and writes `<name>.json`.
    area: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let input_path = format!("{}.are", args.area);
    let output_path = format!("{}.json", args.area);

    let source = fs::read_to_string(&input_path).into_diagnostic()?;
    info!("parsing {input_path}");
    let document = are_core::parse(&source, &input_path)?;

    let json = document.to_json().into_diagnostic()?;
    fs::write(&output_path, json).into_diagnostic()?;
    info!("wrote {output_path}");
    Ok(())
}
