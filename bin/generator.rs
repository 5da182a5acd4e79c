// Invoice Analytics - Test Data Generator

use anyhow::{bail, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::path::PathBuf;

use invoice_analytics::generator::DEFAULT_OUTPUT;
use invoice_analytics::{prompt_entries, write_test_data, GeneratorConfig};

/// Generate synthetic invoice data
#[derive(Debug, Parser)]
#[command(name = "invoice-generator", version)]
struct Cli {
    /// Number of invoices to generate (prompts when omitted)
    #[arg(long, allow_negative_numbers = true)]
    entries: Option<i64>,

    /// Output file path
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Fail instead of prompting when --entries is missing
    #[arg(long)]
    non_interactive: bool,
}

impl Cli {
    /// `ask_entries` is only called when `--entries` is missing and prompting is allowed
    fn into_config(self, ask_entries: impl FnOnce() -> Result<usize>) -> Result<GeneratorConfig> {
        let entries = match self.entries {
            Some(n) if n > 0 => n as usize,
            Some(n) => bail!("Number of invoices must be a positive number (got {})", n),
            None if self.non_interactive => bail!("--entries is required in non-interactive mode"),
            None => ask_entries()?,
        };

        Ok(GeneratorConfig {
            entries,
            output: self.output,
            seed: self.seed,
        })
    }
}

fn main() -> Result<()> {
    let config = Cli::parse().into_config(|| {
        let stdin = io::stdin();
        prompt_entries(&mut stdin.lock(), &mut io::stdout())
    })?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    write_test_data(config.entries, &config.output, &mut rng)?;
    println!("✓ Generated {} invoices in {}", config.entries, config.output.display());

    Ok(())
}
