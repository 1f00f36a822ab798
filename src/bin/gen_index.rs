//! Generate `index.json` for a question bank directory.
//!
//! Scans the directory for `*.json` question files (excluding the index
//! itself and the optional focus-area metadata), sorts them, and writes the
//! file list the bank loader expects.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

#[derive(Parser)]
#[command(name = "gen_index", about = "Generate index.json for a question bank directory")]
struct Cli {
    #[arg(default_value = "questions", help = "Bank directory to scan")]
    dir: PathBuf,
}

const EXCLUDED: &[&str] = &["index.json", "focus-areas.json"];

fn main() -> Result<()> {
    let cli = Cli::parse();
    if !cli.dir.is_dir() {
        bail!("directory not found: {}", cli.dir.display());
    }

    let mut files: Vec<String> = fs::read_dir(&cli.dir)
        .with_context(|| format!("cannot read {}", cli.dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.ends_with(".json") && !EXCLUDED.contains(&name.as_str()))
        .collect();
    files.sort();

    let out = cli.dir.join("index.json");
    let mut json = serde_json::to_string_pretty(&files)?;
    json.push('\n');
    fs::write(&out, &json).with_context(|| format!("cannot write {}", out.display()))?;

    println!("Wrote {} with {} files:", out.display(), files.len());
    for name in &files {
        println!("  - {name}");
    }
    Ok(())
}
