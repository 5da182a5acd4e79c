// 🎲 Synthetic invoice generator
//
// Dates start at 2024-01-01 and advance one day every `max(1, N / 90)` invoices.
// Tags come from a fixed weighted table of combinations; the amount range
// depends on the payment method in the drawn combination.

use crate::invoice::{write_csv, Invoice};
use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate};
use rand::Rng;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "data/invoices.csv";
pub const SPREAD_DAYS: usize = 90;

// ============================================================================
// PAYMENT METHODS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    Upi,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [PaymentMethod::Cash, PaymentMethod::CreditCard, PaymentMethod::Upi];

    pub fn tag(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "creditcard",
            PaymentMethod::Upi => "upi",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        PaymentMethod::ALL.into_iter().find(|m| m.tag() == tag)
    }

    /// Inclusive (min, max) invoice amount
    pub fn amount_range(&self) -> (f64, f64) {
        match self {
            PaymentMethod::Cash => (20.0, 500.0),
            PaymentMethod::CreditCard => (100.0, 1000.0),
            PaymentMethod::Upi => (50.0, 800.0),
        }
    }
}

// ============================================================================
// TAG COMBINATIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagCombination {
    pub payment: PaymentMethod,
    pub modifiers: &'static [&'static str],
    pub weight: f64,
}

impl TagCombination {
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags = vec![self.payment.tag()];
        tags.extend_from_slice(self.modifiers);
        tags
    }
}

/// Weights sum to 1.0
pub const TAG_COMBINATIONS: [TagCombination; 9] = [
    TagCombination { payment: PaymentMethod::Cash, modifiers: &["loyaltycard"], weight: 0.15 },
    TagCombination { payment: PaymentMethod::CreditCard, modifiers: &["discounted"], weight: 0.15 },
    TagCombination { payment: PaymentMethod::Upi, modifiers: &["discounted"], weight: 0.15 },
    TagCombination { payment: PaymentMethod::Cash, modifiers: &[], weight: 0.10 },
    TagCombination { payment: PaymentMethod::CreditCard, modifiers: &[], weight: 0.10 },
    TagCombination { payment: PaymentMethod::Upi, modifiers: &[], weight: 0.10 },
    TagCombination { payment: PaymentMethod::Cash, modifiers: &["discounted", "loyaltycard"], weight: 0.05 },
    TagCombination { payment: PaymentMethod::CreditCard, modifiers: &["discounted", "loyaltycard"], weight: 0.10 },
    TagCombination { payment: PaymentMethod::Upi, modifiers: &["discounted", "loyaltycard"], weight: 0.10 },
];

// ============================================================================
// CATEGORICAL SAMPLER
// ============================================================================

/// Weighted draw over a fixed slice: cumulative weight table + one uniform roll
pub struct CategoricalSampler<'a, T> {
    items: &'a [T],
    cumulative: Vec<f64>,
}

impl<'a, T> CategoricalSampler<'a, T> {
    pub fn new(items: &'a [T], weight: impl Fn(&T) -> f64) -> Result<Self> {
        if items.is_empty() {
            bail!("Cannot sample from an empty table");
        }

        let mut cumulative = Vec::with_capacity(items.len());
        let mut running = 0.0;
        for item in items {
            let w = weight(item);
            if !w.is_finite() || w < 0.0 {
                bail!("Invalid sampling weight {}", w);
            }
            running += w;
            cumulative.push(running);
        }

        if running <= 0.0 {
            bail!("Sampling weights must not all be zero");
        }

        Ok(CategoricalSampler { items, cumulative })
    }

    pub fn total_weight(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a T {
        let roll = rng.gen::<f64>() * self.total_weight();
        let idx = self
            .cumulative
            .partition_point(|&c| c <= roll)
            .min(self.items.len() - 1);
        &self.items[idx]
    }
}

// ============================================================================
// GENERATION
// ============================================================================

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub entries: usize,
    pub output: PathBuf,
    pub seed: Option<u64>,
}

pub fn generation_epoch() -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, 1).context("Invalid generation epoch")
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build `count` synthetic invoices
pub fn generate_invoices<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Result<Vec<Invoice>> {
    if count == 0 {
        bail!("Number of invoices must be a positive number");
    }

    let epoch = generation_epoch()?;
    let entries_per_day = (count / SPREAD_DAYS).max(1);
    let sampler = CategoricalSampler::new(&TAG_COMBINATIONS, |c| c.weight)?;

    let invoices = (0..count)
        .map(|i| {
            let date = epoch + Duration::days((i / entries_per_day) as i64);
            let combination = sampler.sample(&mut *rng);
            let (min, max) = combination.payment.amount_range();
            let amount = round_cents(rng.gen_range(min..=max));
            Invoice::new(date, amount, combination.tags())
        })
        .collect();

    Ok(invoices)
}

/// Generate `count` invoices and write them to `output`
pub fn write_test_data<R: Rng + ?Sized>(
    count: usize,
    output: &Path,
    rng: &mut R,
) -> Result<Vec<Invoice>> {
    let invoices = generate_invoices(count, rng)?;
    write_csv(output, &invoices)?;
    Ok(invoices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::load_csv;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn payment_of(invoice: &Invoice) -> PaymentMethod {
        let methods: Vec<PaymentMethod> = invoice
            .tags
            .iter()
            .filter_map(|t| PaymentMethod::from_tag(t))
            .collect();
        assert_eq!(methods.len(), 1, "exactly one payment tag in {:?}", invoice.tags);
        methods[0]
    }

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = TAG_COMBINATIONS.iter().map(|c| c.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sampler_frequencies() {
        let mut rng = StdRng::seed_from_u64(7);
        let sampler = CategoricalSampler::new(&TAG_COMBINATIONS, |c| c.weight).unwrap();
        let draws = 100_000;
        let mut counts = [0usize; 9];

        for _ in 0..draws {
            let picked = sampler.sample(&mut rng);
            let idx = TAG_COMBINATIONS.iter().position(|c| c == picked).unwrap();
            counts[idx] += 1;
        }

        for (combination, count) in TAG_COMBINATIONS.iter().zip(counts) {
            let freq = count as f64 / draws as f64;
            assert!((freq - combination.weight).abs() < 0.01, "{:?}: {}", combination, freq);
        }
    }

    #[test]
    fn test_sampler_rejects_bad_weights() {
        assert!(CategoricalSampler::new(&[] as &[u8], |_| 1.0).is_err());
        assert!(CategoricalSampler::new(&[1, 2], |_| 0.0).is_err());
        assert!(CategoricalSampler::new(&[1, 2], |_| -1.0).is_err());
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let mut rng = StdRng::seed_from_u64(1);
        let items = ["never", "always"];
        let sampler = CategoricalSampler::new(&items, |s| if *s == "never" { 0.0 } else { 1.0 }).unwrap();

        for _ in 0..1000 {
            assert_eq!(*sampler.sample(&mut rng), "always");
        }
    }

    #[test]
    fn test_amounts_within_payment_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let invoices = generate_invoices(2000, &mut rng).unwrap();

        assert_eq!(invoices.len(), 2000);
        for invoice in &invoices {
            let (min, max) = payment_of(invoice).amount_range();
            assert!(invoice.amount >= min && invoice.amount <= max);
            assert_eq!(round_cents(invoice.amount), invoice.amount);
        }
    }

    #[test]
    fn test_dates_spread_over_window() {
        let mut rng = StdRng::seed_from_u64(3);
        let epoch = generation_epoch().unwrap();

        // 900 entries -> 10 per day -> 90 distinct days
        let invoices = generate_invoices(900, &mut rng).unwrap();
        assert_eq!(invoices[0].date, epoch);
        assert_eq!(invoices[9].date, epoch);
        assert_eq!(invoices[10].date, epoch + Duration::days(1));
        assert_eq!(invoices[899].date, epoch + Duration::days(89));

        // fewer than 90 entries -> one per day
        let invoices = generate_invoices(5, &mut rng).unwrap();
        assert_eq!(invoices[4].date, epoch + Duration::days(4));
    }

    #[test]
    fn test_zero_entries_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_invoices(0, &mut rng).is_err());
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_invoices(50, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = generate_invoices(50, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_write_test_data() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("data").join("invoices.csv");
        let mut rng = StdRng::seed_from_u64(11);

        let generated = write_test_data(250, &output, &mut rng).unwrap();
        let loaded = load_csv(&output).unwrap();

        assert_eq!(loaded.len(), 250);
        assert_eq!(loaded, generated);

        // overwrite with a smaller file
        write_test_data(3, &output, &mut rng).unwrap();
        assert_eq!(load_csv(&output).unwrap().len(), 3);
    }
}
