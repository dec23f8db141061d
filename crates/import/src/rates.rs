use propensity_core::{ExchangeRates, Gbp};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::salary::parse_salary;

pub const DEFAULT_RATES_URL: &str = "https://v6.exchangerate-api.com";

#[derive(Debug, Error)]
pub enum RateError {
    #[error("Rate request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Rate service returned HTTP {0}")]
    Status(u16),
    #[error("Rate service reported failure: {0}")]
    Service(String),
    #[error("Rate table has no entry for base currency {0}")]
    MissingBase(String),
}

/// Anything that can produce a rate table for a base currency.
#[allow(async_fn_in_trait)]
pub trait RateSource {
    async fn fetch_rates(&self, base: &str) -> Result<ExchangeRates, RateError>;
}

/// A rate table is its own source; handy for offline runs and tests.
impl RateSource for ExchangeRates {
    async fn fetch_rates(&self, base: &str) -> Result<ExchangeRates, RateError> {
        if !self.contains(base) {
            return Err(RateError::MissingBase(base.to_string()));
        }
        Ok(self.clone())
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    conversion_rates: Option<ExchangeRates>,
}

/// Client for an exchangerate-api style `/v6/{key}/latest/{base}` endpoint.
pub struct ExchangeRateClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExchangeRateClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn latest_url(&self, base: &str) -> String {
        format!(
            "{}/v6/{}/latest/{}",
            self.base_url.trim_end_matches('/'),
            self.api_key,
            base
        )
    }
}

impl RateSource for ExchangeRateClient {
    async fn fetch_rates(&self, base: &str) -> Result<ExchangeRates, RateError> {
        let response = self.http.get(self.latest_url(base)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Status(status.as_u16()));
        }

        let body: LatestResponse = response.json().await?;
        if let Some(result) = body.result.as_deref() {
            if result != "success" {
                let reason = body.error_type.unwrap_or_else(|| result.to_string());
                return Err(RateError::Service(reason));
            }
        }
        let rates = body
            .conversion_rates
            .ok_or_else(|| RateError::Service("response has no conversion_rates".to_string()))?;
        if !rates.contains(base) {
            return Err(RateError::MissingBase(base.to_string()));
        }

        info!(base, currencies = rates.len(), "fetched exchange rates");
        Ok(rates)
    }
}

/// Parses every salary string in order. When `rates` is absent or empty the
/// table is fetched from `source` once, with GBP as base; a failed fetch
/// fails the whole batch.
pub async fn convert_salaries<S: AsRef<str>>(
    values: &[S],
    rates: Option<&ExchangeRates>,
    source: &impl RateSource,
) -> Result<Vec<Option<Gbp>>, RateError> {
    let fetched;
    let rates = match rates {
        Some(r) if !r.is_empty() => r,
        _ => {
            fetched = source.fetch_rates("GBP").await?;
            &fetched
        }
    };

    let parsed: Vec<Option<Gbp>> = values
        .iter()
        .map(|v| parse_salary(v.as_ref(), rates))
        .collect();

    let missing = parsed.iter().filter(|p| p.is_none()).count();
    if !parsed.is_empty() && missing == parsed.len() {
        warn!(rows = parsed.len(), "no salary could be parsed");
    } else if missing > 0 {
        info!(rows = parsed.len(), missing, "some salaries could not be parsed");
    }
    Ok(parsed)
}
