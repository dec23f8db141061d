use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Currency code → conversion rate as the rate service publishes it for the
/// base currency (`conversion_rates` of a `latest/GBP` call). Salaries are
/// multiplied by the rate of their currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRates(HashMap<String, f64>);

impl ExchangeRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: impl Into<String>, rate: f64) {
        self.0.insert(code.into(), rate);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.contains_key(code)
    }

    /// `None` for unknown codes and for non-finite rates.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.0.get(code).copied().filter(|r| r.is_finite())
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ExchangeRates {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        ExchangeRates(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<HashMap<String, f64>> for ExchangeRates {
    fn from(map: HashMap<String, f64>) -> Self {
        ExchangeRates(map)
    }
}
