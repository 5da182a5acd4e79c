use anyhow::{bail, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;

use invoice_analytics::analyzer::{DEFAULT_INPUT, DEFAULT_OUTPUT_DIR};
use invoice_analytics::{
    prompt_percentile, prompt_tags, run_analysis, AnalyzerConfig, InvoiceAnalyzer, Percentile,
};

/// Process invoice data and generate weekly percentile reports
#[derive(Debug, Parser)]
#[command(name = "invoice-analyzer", version)]
struct Cli {
    /// Percentile value (0-100)
    #[arg(long, allow_negative_numbers = true)]
    percentile: Option<f64>,

    /// Input CSV file path
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Output directory for reports
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Filter by specific tags (space separated)
    #[arg(long, num_args = 1..)]
    tags: Option<Vec<String>>,

    /// Run in interactive mode
    #[arg(long)]
    interactive: bool,
}

impl Cli {
    /// Non-interactive run configuration; the percentile is required and range-checked
    fn into_config(self) -> Result<AnalyzerConfig> {
        let Some(percentile) = self.percentile else {
            bail!("Please provide --percentile value or use --interactive mode");
        };
        Percentile::new(percentile)?;

        Ok(AnalyzerConfig {
            input: self.input,
            output_dir: self.output_dir,
            percentile,
            custom_tags: self.tags.map(|tags| tags.into_iter().collect()),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.interactive {
        run_interactive(&cli)?;
    } else {
        run_analysis(&cli.into_config()?)?;
    }

    println!("\n✅ Report generation complete!");
    Ok(())
}

fn run_interactive(cli: &Cli) -> Result<()> {
    println!("📂 Loading invoices from {}...", cli.input.display());
    let analyzer = InvoiceAnalyzer::from_csv(&cli.input, &cli.output_dir)?;
    println!("✓ Loaded {} invoices", analyzer.invoices().len());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let percentile = prompt_percentile(&mut input, &mut output)?;
    let custom_tags = prompt_tags(&mut input, &mut output, &analyzer.available_tags())?;

    analyzer.generate_all_reports(percentile, custom_tags.as_ref())?;
    Ok(())
}
