//! PowerShell string-command obfuscator.
//!
//! Rewrites a command into a syntactically disguised expression that
//! reproduces the original behavior when evaluated. Three layered levels:
//!
//! 1. **Concat** — special characters hidden behind random tokens, the
//!    text split into a concatenation of literals, restore code appended
//! 2. **Reorder** — level 1 plus the fragments shuffled behind a
//!    positional format expression
//! 3. **Reverse** — a level-1 encoding reversed wholesale, plus
//!    reconstruction code that re-reverses it before evaluation
//!
//! Output is randomized on every run; `--seed` pins it for reproducibility.

mod chance;
mod charset;
mod concat;
mod level;
mod reorder;
mod restore;
mod reverse;
mod substitute;
mod tokenize;
mod wrap;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "psmask", about = "PowerShell string-command obfuscator")]
struct Cli {
    /// Inline command text to obfuscate
    #[arg(short = 'c', long = "command", conflicts_with = "input")]
    command: Option<String>,

    /// Read the command from a file instead
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Obfuscation level: 0 = pass-through, 1 = concat, 2 = reorder,
    /// 3 = reverse. Random among 1-3 when omitted; out-of-range values
    /// clamp to 3.
    #[arg(short = 'l', long = "level")]
    level: Option<i64>,

    /// Seed for the randomness source (entropy when omitted)
    #[arg(long = "seed")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = match (&cli.command, &cli.input) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("nothing to obfuscate: pass -c <command> or -i <file>"),
    };
    if source.is_empty() {
        bail!("input command is empty");
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let charset = charset::Charset::default();
    let selected = level::Level::select(cli.level, &mut rng);
    let result = level::obfuscate(&source, selected, &charset, &mut rng)?;

    match &cli.output {
        Some(path) => fs::write(path, &result)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{result}"),
    }
    Ok(())
}
