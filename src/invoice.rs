// 🧾 Invoice records - CSV in, CSV out
//
// File format (both directions):
//   Date,Invoice Amount,Tags
//   2024-01-01,100.00,"cash, loyaltycard"

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const CSV_HEADER: [&str; 3] = ["Date", "Invoice Amount", "Tags"];

/// Set of tag labels. Ordered so that iteration (and therefore output) is deterministic.
pub type TagSet = BTreeSet<String>;

// ============================================================================
// INVOICE
// ============================================================================

/// A single transaction record. Immutable once loaded or generated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub date: NaiveDate,
    pub amount: f64,
    pub tags: TagSet,
}

impl Invoice {
    pub fn new<I, S>(date: NaiveDate, amount: f64, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Invoice {
            date,
            amount,
            tags: tags
                .into_iter()
                .map(|t| t.as_ref().trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Tags joined the way they appear in the CSV `Tags` field
    pub fn tags_field(&self) -> String {
        self.tags.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }
}

/// Raw CSV row, before any parsing
#[derive(Debug, Deserialize)]
struct InvoiceRow {
    #[serde(rename = "Date")]
    date: String,

    #[serde(rename = "Invoice Amount")]
    amount: String,

    #[serde(rename = "Tags")]
    tags: String,
}

impl InvoiceRow {
    /// `row` is the 1-based data row number, used only in error messages
    fn into_invoice(self, row: usize) -> Result<Invoice> {
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .with_context(|| format!("Invalid date '{}' on row {}", self.date, row))?;

        let amount: f64 = self
            .amount
            .parse()
            .with_context(|| format!("Invalid amount '{}' on row {}", self.amount, row))?;

        if !amount.is_finite() || amount < 0.0 {
            bail!("Invalid amount '{}' on row {}", self.amount, row);
        }

        let tags = parse_tags(&self.tags);
        if let Some(tag) = tags.iter().find(|t| !is_safe_tag(t)) {
            bail!("Invalid tag '{}' on row {}", tag, row);
        }

        Ok(Invoice::new(date, amount, tags))
    }
}

/// Tags end up in report file names, so they must not contain path separators or `..`
pub fn is_safe_tag(tag: &str) -> bool {
    !tag.contains(['/', '\\']) && !tag.contains("..")
}

/// Split a `Tags` field on commas, trimming each label
pub fn parse_tags(field: &str) -> TagSet {
    field
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// CSV I/O
// ============================================================================

/// Load every invoice from a CSV file. Any malformed row fails the whole load.
pub fn load_csv(csv_path: &Path) -> Result<Vec<Invoice>> {
    if !csv_path.exists() {
        bail!("Input file '{}' not found", csv_path.display());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file '{}'", csv_path.display()))?;

    let mut invoices = Vec::new();

    for (idx, result) in rdr.deserialize().enumerate() {
        let row: InvoiceRow =
            result.with_context(|| format!("Failed to read invoice on row {}", idx + 1))?;
        invoices.push(row.into_invoice(idx + 1)?);
    }

    Ok(invoices)
}

/// Write invoices to `csv_path`, creating parent directories and overwriting any existing file
pub fn write_csv(csv_path: &Path, invoices: &[Invoice]) -> Result<()> {
    if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }

    let mut wtr = csv::Writer::from_path(csv_path)
        .with_context(|| format!("Failed to create '{}'", csv_path.display()))?;

    wtr.write_record(CSV_HEADER)?;
    for invoice in invoices {
        wtr.write_record([
            invoice.date.format(DATE_FORMAT).to_string(),
            format!("{:.2}", invoice.amount),
            invoice.tags_field(),
        ])?;
    }
    wtr.flush()?;

    Ok(())
}
