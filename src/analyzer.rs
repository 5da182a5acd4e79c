// 🔍 Invoice Analyzer - loads invoices once, emits every report for a percentile
//
// Report set for percentile P:
//   1. overall_report_pP.csv           (no filter)
//   2. {tag}_report_pP.csv             (one per distinct tag, alphabetical)
//   3. discounted_upi_report_pP.csv    (discounted AND upi)
//   4. custom_tag_report_pP.csv        (only when custom tags are given)

use crate::invoice::{load_csv, Invoice, TagSet};
use crate::report::{generate_report, save_report, ReportKind, TagFilter};
use crate::stats::Percentile;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "data/invoices.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "reports";

/// Everything a non-interactive analyzer run needs
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub percentile: f64,
    pub custom_tags: Option<TagSet>,
}

pub struct InvoiceAnalyzer {
    invoices: Vec<Invoice>,
    output_dir: PathBuf,
}

impl InvoiceAnalyzer {
    pub fn new(invoices: Vec<Invoice>, output_dir: impl Into<PathBuf>) -> Self {
        InvoiceAnalyzer {
            invoices,
            output_dir: output_dir.into(),
        }
    }

    pub fn from_csv(input: &Path, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let invoices = load_csv(input)?;
        Ok(InvoiceAnalyzer::new(invoices, output_dir))
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    /// Union of all tags in the dataset, sorted alphabetically
    pub fn available_tags(&self) -> Vec<String> {
        self.invoices
            .iter()
            .flat_map(|inv| inv.tags.iter().cloned())
            .collect::<TagSet>()
            .into_iter()
            .collect()
    }

    /// The reports produced for one run, in generation order
    pub fn report_kinds(&self, custom_tags: Option<&TagSet>) -> Vec<ReportKind> {
        let mut kinds = vec![ReportKind::Overall];
        kinds.extend(self.available_tags().into_iter().map(ReportKind::Tag));
        kinds.push(ReportKind::DiscountedUpi);

        if let Some(tags) = custom_tags.filter(|t| !t.is_empty()) {
            kinds.push(ReportKind::Custom(TagFilter::from(tags.clone())));
        }

        kinds
    }

    /// Generate and save every report; returns the paths actually written
    pub fn generate_all_reports(
        &self,
        percentile: Percentile,
        custom_tags: Option<&TagSet>,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for kind in self.report_kinds(custom_tags) {
            match &kind {
                ReportKind::Overall => println!("\nGenerating overall report..."),
                ReportKind::Tag(tag) => println!("\nGenerating '{}' tag report...", tag),
                ReportKind::DiscountedUpi => {
                    println!("\nGenerating combined tag report (discounted + upi)...")
                }
                ReportKind::Custom(_) => println!("\nGenerating custom tag report..."),
            }

            let rows = generate_report(&self.invoices, percentile, &kind.filter());
            let file_name = kind.file_name(percentile);
            if let Some(path) = save_report(&rows, percentile, &self.output_dir, &file_name)? {
                written.push(path);
            }
        }

        Ok(written)
    }
}

/// Validate the percentile, load the input and write all reports
pub fn run_analysis(config: &AnalyzerConfig) -> Result<Vec<PathBuf>> {
    // Validate before touching the file system so a bad percentile writes nothing
    let percentile = Percentile::new(config.percentile)?;

    println!("📂 Loading invoices from {}...", config.input.display());
    let analyzer = InvoiceAnalyzer::from_csv(&config.input, &config.output_dir)?;
    println!("✓ Loaded {} invoices", analyzer.invoices().len());

    analyzer.generate_all_reports(percentile, config.custom_tags.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE_CSV: &str = "Date,Invoice Amount,Tags\n\
        2024-01-01,100.00,\"cash\"\n\
        2024-01-02,200.00,\"cash,discounted\"\n\
        2024-01-08,50.00,\"upi\"\n";

    fn setup(dir: &TempDir) -> AnalyzerConfig {
        let input = dir.path().join("invoices.csv");
        fs::write(&input, SAMPLE_CSV).unwrap();

        AnalyzerConfig {
            input,
            output_dir: dir.path().join("reports"),
            percentile: 50.0,
            custom_tags: None,
        }
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_available_tags_sorted() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir);
        let analyzer = InvoiceAnalyzer::from_csv(&config.input, &config.output_dir).unwrap();

        assert_eq!(analyzer.available_tags(), vec!["cash", "discounted", "upi"]);
    }

    #[test]
    fn test_full_report_set() {
        let dir = TempDir::new().unwrap();
        let mut config = setup(&dir);
        config.custom_tags = Some(["cash".to_string()].into_iter().collect());

        let written = run_analysis(&config).unwrap();

        // discounted + upi never co-occur in the sample, so that report is skipped
        assert_eq!(
            file_names(&written),
            vec![
                "overall_report_p50.0.csv",
                "cash_report_p50.0.csv",
                "discounted_report_p50.0.csv",
                "upi_report_p50.0.csv",
                "custom_tag_report_p50.0.csv",
            ]
        );
        assert!(!config.output_dir.join("discounted_upi_report_p50.0.csv").exists());

        let discounted =
            fs::read_to_string(config.output_dir.join("discounted_report_p50.0.csv")).unwrap();
        assert_eq!(discounted.lines().count(), 2);
        assert!(discounted.contains("2024-01-01,200.00,1,200.00,200.00"));
    }

    #[test]
    fn test_empty_custom_tags_skip_custom_report() {
        let dir = TempDir::new().unwrap();
        let mut config = setup(&dir);
        config.custom_tags = Some(TagSet::new());

        let written = run_analysis(&config).unwrap();
        assert!(!file_names(&written).contains(&"custom_tag_report_p50.0.csv".to_string()));
    }

    #[test]
    fn test_rejects_out_of_range_percentile() {
        let dir = TempDir::new().unwrap();
        let mut config = setup(&dir);
        config.percentile = 150.0;

        assert!(run_analysis(&config).is_err());
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_path_like_tag_fails_before_any_report() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir);
        fs::write(
            &config.input,
            "Date,Invoice Amount,Tags\n2024-01-02,200.00,\"cash,../escaped\"\n",
        )
        .unwrap();

        let err = run_analysis(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid tag '../escaped'"));
        assert!(!config.output_dir.exists());
        assert!(!dir.path().join("escaped_report_p50.0.csv").exists());
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = setup(&dir);
        config.input = dir.path().join("missing.csv");

        assert!(run_analysis(&config).is_err());
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_reports_are_idempotent() {
        let dir = TempDir::new().unwrap();
        let config = setup(&dir);

        let first: Vec<Vec<u8>> = run_analysis(&config)
            .unwrap()
            .iter()
            .map(|p| fs::read(p).unwrap())
            .collect();
        let second: Vec<Vec<u8>> = run_analysis(&config)
            .unwrap()
            .iter()
            .map(|p| fs::read(p).unwrap())
            .collect();

        assert_eq!(first, second);
    }
}
