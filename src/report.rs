// 📈 Weekly percentile reports
//
// One report = invoices matching a tag filter, bucketed by Monday-aligned week,
// with percentile / count / total / average per week.

use crate::invoice::{Invoice, TagSet, DATE_FORMAT};
use crate::stats::{Percentile, WeeklyStats};
use crate::week::week_start;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// TAG FILTER
// ============================================================================

/// Conjunctive tag predicate: an invoice matches when it carries every tag in the filter.
/// An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    tags: TagSet,
}

impl TagFilter {
    /// Filter that matches every invoice
    pub fn all() -> Self {
        TagFilter::default()
    }

    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagFilter {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.tags.iter().all(|tag| invoice.has_tag(tag))
    }
}

impl From<TagSet> for TagFilter {
    fn from(tags: TagSet) -> Self {
        TagFilter { tags }
    }
}

// ============================================================================
// REPORT ROWS
// ============================================================================

/// One week of a report. Values are kept unrounded; rounding happens when written.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub week_start: NaiveDate,
    pub stats: WeeklyStats,
}

impl ReportRow {
    fn to_record(&self) -> [String; 5] {
        [
            self.week_start.format(DATE_FORMAT).to_string(),
            format!("{:.2}", self.stats.percentile),
            self.stats.count.to_string(),
            format!("{:.2}", self.stats.total),
            format!("{:.2}", self.stats.average),
        ]
    }
}

pub fn report_header(percentile: Percentile) -> [String; 5] {
    [
        "Week Start".to_string(),
        format!("{}th Percentile", percentile),
        "Number of Invoices".to_string(),
        "Total Amount".to_string(),
        "Average Amount".to_string(),
    ]
}

/// Bucket matching invoices by week and compute stats, ordered by week start
pub fn generate_report(
    invoices: &[Invoice],
    percentile: Percentile,
    filter: &TagFilter,
) -> Vec<ReportRow> {
    let mut weekly: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();

    for invoice in invoices.iter().filter(|inv| filter.matches(inv)) {
        weekly
            .entry(week_start(invoice.date))
            .or_default()
            .push(invoice.amount);
    }

    weekly
        .into_iter()
        .filter_map(|(week_start, amounts)| {
            WeeklyStats::compute(&amounts, percentile).map(|stats| ReportRow { week_start, stats })
        })
        .collect()
}

// ============================================================================
// REPORT KINDS
// ============================================================================

/// Which slice of the data a report covers; determines the filter and the file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    Overall,
    Tag(String),
    DiscountedUpi,
    Custom(TagFilter),
}

impl ReportKind {
    pub fn filter(&self) -> TagFilter {
        match self {
            ReportKind::Overall => TagFilter::all(),
            ReportKind::Tag(tag) => TagFilter::new([tag.as_str()]),
            ReportKind::DiscountedUpi => TagFilter::new(["discounted", "upi"]),
            ReportKind::Custom(filter) => filter.clone(),
        }
    }

    pub fn file_name(&self, percentile: Percentile) -> String {
        match self {
            ReportKind::Overall => format!("overall_report_p{}.csv", percentile),
            ReportKind::Tag(tag) => format!("{}_report_p{}.csv", tag, percentile),
            ReportKind::DiscountedUpi => format!("discounted_upi_report_p{}.csv", percentile),
            ReportKind::Custom(_) => format!("custom_tag_report_p{}.csv", percentile),
        }
    }
}

/// Write a report into `output_dir`. Empty reports are skipped and return `Ok(None)`.
pub fn save_report(
    rows: &[ReportRow],
    percentile: Percentile,
    output_dir: &Path,
    file_name: &str,
) -> Result<Option<PathBuf>> {
    if rows.is_empty() {
        println!("No data available for {}", file_name);
        return Ok(None);
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let output_path = output_dir.join(file_name);
    let mut wtr = csv::Writer::from_path(&output_path)
        .with_context(|| format!("Failed to create report '{}'", output_path.display()))?;

    wtr.write_record(report_header(percentile))?;
    for row in rows {
        wtr.write_record(row.to_record())?;
    }
    wtr.flush()?;

    println!("✓ Generated report: {}", output_path.display());
    Ok(Some(output_path))
}
