use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use seqindex::{FmIndex, IndexOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "seqindex", about = "Succinct FM-index substring counting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count occurrences of each pattern in a reference text.
    Count {
        /// Reference text (plain FASTA without headers or raw sequence file).
        reference: PathBuf,
        /// Patterns file (one pattern per line).
        patterns: PathBuf,
        /// Ordered alphabet; the first symbol is the sentinel.
        #[arg(long, default_value = "$ACGT")]
        alphabet: String,
        /// Bit-vector rank sampling stride; omit to disable sampling.
        #[arg(long)]
        block_size: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Count {
            reference,
            patterns,
            alphabet,
            block_size,
        } => run_count(reference, patterns, alphabet, block_size)?,
    }

    Ok(())
}

fn run_count(
    reference_path: PathBuf,
    patterns_path: PathBuf,
    alphabet: String,
    block_size: Option<usize>,
) -> Result<()> {
    let mut reference = read_reference(&reference_path, alphabet.as_bytes())
        .with_context(|| format!("failed to read reference from {}", reference_path.display()))?;

    // The index expects the sentinel as the final symbol; append it on the
    // caller's behalf when the file does not carry one.
    let sentinel = *alphabet.as_bytes().first().context("alphabet is empty")?;
    if reference.last() != Some(&sentinel) {
        reference.push(sentinel);
    }

    let options = IndexOptions { block_size };
    let index = FmIndex::build(&reference, alphabet.as_bytes(), &options)
        .context("failed to build FM-index")?;

    let reader = BufReader::new(File::open(&patterns_path).with_context(|| {
        format!("failed to open patterns file {}", patterns_path.display())
    })?);

    for (idx, line) in reader.lines().enumerate() {
        let pattern = line?.trim().to_string();
        if pattern.is_empty() {
            continue;
        }
        let occurrences = index
            .count(pattern.as_bytes())
            .with_context(|| format!("count failed for pattern {}", idx + 1))?;
        println!("{pattern}\t{occurrences}");
    }

    Ok(())
}

/// Read a reference sequence, skipping FASTA header and comment lines, and
/// reject any byte that is not a symbol of the configured alphabet so a typo
/// in the input is reported with its file position rather than surfacing later
/// as an index build failure.
fn read_reference(path: &PathBuf, alphabet: &[u8]) -> Result<Vec<u8>> {
    let raw = std::fs::read_to_string(path)?;
    let mut reference = Vec::with_capacity(raw.len());

    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('>') || line.starts_with(';') {
            continue;
        }
        for (column, &byte) in line.as_bytes().iter().enumerate() {
            if !alphabet.contains(&byte) {
                anyhow::bail!(
                    "line {}, column {}: symbol {:?} is not in the alphabet {:?}",
                    line_no + 1,
                    column + 1,
                    byte as char,
                    String::from_utf8_lossy(alphabet)
                );
            }
            reference.push(byte);
        }
    }

    Ok(reference)
}
