//! Price buckets for the bar-chart histogram.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One histogram bucket: prices in `[lower, upper)` are counted under `label`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBucket {
    pub lower: f64,
    pub upper: f64,
    pub label: &'static str,
}

const fn bucket(lower: f64, upper: f64, label: &'static str) -> PriceBucket {
    PriceBucket {
        lower,
        upper,
        label,
    }
}

/// Bucket table, scanned in order. The last bucket is open-ended.
pub const PRICE_BUCKETS: [PriceBucket; 10] = [
    bucket(0.0, 100.0, "0-100"),
    bucket(100.0, 200.0, "101-200"),
    bucket(200.0, 300.0, "201-300"),
    bucket(300.0, 400.0, "301-400"),
    bucket(400.0, 500.0, "401-500"),
    bucket(500.0, 600.0, "501-600"),
    bucket(600.0, 700.0, "601-700"),
    bucket(700.0, 800.0, "701-800"),
    bucket(800.0, 900.0, "801-900"),
    bucket(900.0, f64::INFINITY, "901-above"),
];

/// Index into [`PRICE_BUCKETS`] of the bucket `price` falls into.
///
/// Prices below zero land in the first bucket; NaN lands in the last.
#[must_use]
pub fn bucket_index(price: f64) -> usize {
    PRICE_BUCKETS
        .iter()
        .position(|b| price < b.upper)
        .unwrap_or(PRICE_BUCKETS.len() - 1)
}

/// Per-bucket counts, always holding every label.
///
/// Serializes as a JSON object whose keys follow the bucket table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceHistogram {
    counts: [u64; PRICE_BUCKETS.len()],
}

impl PriceHistogram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, price: f64) {
        self.counts[bucket_index(price)] += 1;
    }

    #[must_use]
    pub fn count(&self, label: &str) -> Option<u64> {
        PRICE_BUCKETS
            .iter()
            .position(|b| b.label == label)
            .map(|i| self.counts[i])
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(label, count)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        PRICE_BUCKETS
            .iter()
            .zip(self.counts.iter())
            .map(|(b, &count)| (b.label, count))
    }
}

impl FromIterator<f64> for PriceHistogram {
    fn from_iter<I: IntoIterator<Item = f64>>(prices: I) -> Self {
        let mut histogram = Self::new();
        for price in prices {
            histogram.record(price);
        }
        histogram
    }
}

impl Serialize for PriceHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PRICE_BUCKETS.len()))?;
        for (label, count) in self.iter() {
            map.serialize_entry(label, &count)?;
        }
        map.end()
    }
}
