// Invoice Analytics - Core Library
// Shared by the analyzer and generator binaries

pub mod invoice;
pub mod week;
pub mod stats;
pub mod report;
pub mod analyzer;
pub mod generator;
pub mod prompt;

// Re-export commonly used types
pub use invoice::{Invoice, TagSet, load_csv, write_csv, parse_tags};
pub use week::week_start;
pub use stats::{Percentile, WeeklyStats, percentile_linear};
pub use report::{ReportKind, ReportRow, TagFilter, generate_report, save_report};
pub use analyzer::{AnalyzerConfig, InvoiceAnalyzer, run_analysis};
pub use generator::{
    CategoricalSampler, GeneratorConfig, PaymentMethod, TagCombination, TAG_COMBINATIONS,
    generate_invoices, write_test_data,
};
pub use prompt::{prompt_entries, prompt_percentile, prompt_tags};
