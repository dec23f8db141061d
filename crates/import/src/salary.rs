use std::sync::OnceLock;

use propensity_core::{ExchangeRates, Gbp};
use regex::Regex;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// At least two digits; a lone digit is never an amount.
re!(re_amount, r"\d+\.?\d+");
re!(re_currency, r"£|[A-Z]+");
re!(re_frequency, r"[a-z]+");

/// Annualising multiplier for a pay-frequency word. Unknown words
/// ("yearly", "range", ...) are taken as already annual.
pub fn frequency_multiplier(token: &str) -> f64 {
    match token {
        "month" => 12.0,
        "pw" => 52.0,
        _ => 1.0,
    }
}

/// The pieces of a salary string before conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryBand {
    /// Mean of every number in the text.
    pub amount: f64,
    /// ISO code; `£` reads as `GBP`, and no currency at all defaults to it.
    pub currency: String,
    pub multiplier: f64,
}

impl SalaryBand {
    /// `None` when the text holds no amount.
    pub fn parse(text: &str) -> Option<Self> {
        let amounts: Vec<f64> = re_amount()
            .find_iter(text)
            .map(|m| m.as_str().parse().ok())
            .collect::<Option<_>>()?;
        if amounts.is_empty() {
            return None;
        }
        let amount = amounts.iter().sum::<f64>() / amounts.len() as f64;

        let currency = match re_currency().find(text).map(|m| m.as_str()) {
            Some("£") | None => "GBP".to_string(),
            Some(code) => code.to_string(),
        };

        let multiplier = re_frequency()
            .find_iter(text)
            .last()
            .map(|m| frequency_multiplier(m.as_str()))
            .unwrap_or(1.0);

        Some(SalaryBand {
            amount,
            currency,
            multiplier,
        })
    }

    /// Yearly pounds at `rates`; `None` if the currency has no rate.
    /// The product is taken in `f64` and then rounded to pence.
    pub fn to_annual_gbp(&self, rates: &ExchangeRates) -> Option<Gbp> {
        let rate = rates.rate(&self.currency)?;
        Gbp::from_f64(self.amount * rate * self.multiplier)
    }
}

/// Parses a free-text salary into yearly pounds. Never fails: text without
/// an amount, or in a currency missing from `rates`, gives `None`.
pub fn parse_salary(text: &str, rates: &ExchangeRates) -> Option<Gbp> {
    SalaryBand::parse(text)?.to_annual_gbp(rates)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rates() -> ExchangeRates {
        [
            ("GBP", 1.0),
            ("GTQ", 0.11),
            ("SDG", 0.0015),
            ("GMD", 0.015),
            ("DZD", 0.0057),
            ("AOA", 0.0019),
        ]
        .into_iter()
        .collect()
    }

    fn parse(text: &str) -> Option<f64> {
        parse_salary(text, &test_rates()).map(Gbp::to_f64)
    }

    #[test]
    fn yearly_pounds() {
        assert_eq!(parse("£16486 yearly"), Some(16486.0));
        assert_eq!(parse("£46653 yearly"), Some(46653.0));
    }

    #[test]
    fn weekly_pounds() {
        assert_eq!(parse("£733.14 pw"), Some(38123.28));
        assert_eq!(parse("£403.48 pw"), Some(20980.96));
        assert_eq!(parse("£421.7 pw"), Some(21928.4));
    }

    #[test]
    fn monthly_pounds() {
        assert_eq!(parse("£2120.82 per month"), Some(25449.84));
        assert_eq!(parse("£1592.17 per month"), Some(19106.04));
    }

    #[test]
    fn ranges_take_the_mean() {
        assert_eq!(parse("£26851 - 48668 range"), Some(37759.5));
        assert_eq!(parse("£14536 - 26347 range"), Some(20441.5));
        assert_eq!(parse("£17701 - 32084 range"), Some(24892.5));
    }

    #[test]
    fn foreign_currency_codes() {
        assert_eq!(parse("44462895188.2GTQ"), Some(4890918470.7));
        assert_eq!(parse("1675262.85SDG"), Some(2512.89));
        assert_eq!(parse("416544.02GMD"), Some(6248.16));
        assert_eq!(parse("362461282142.49DZD"), Some(2066029308.21));
        assert_eq!(parse("94860480.06AOA"), Some(180234.91));
    }

    #[test]
    fn no_amount_is_none() {
        assert_eq!(parse("AUD"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("£5 pw"), None);
    }

    #[test]
    fn unknown_currency_is_none() {
        assert_eq!(parse("52000USD"), None);
    }

    #[test]
    fn missing_currency_defaults_to_pounds() {
        assert_eq!(parse("30000 yearly"), Some(30000.0));
        assert_eq!(parse("250.5 pw"), Some(13026.0));
    }

    #[test]
    fn band_components() {
        let band = SalaryBand::parse("£2120.82 per month").unwrap();
        assert_eq!(band.amount, 2120.82);
        assert_eq!(band.currency, "GBP");
        assert_eq!(band.multiplier, 12.0);

        let band = SalaryBand::parse("416544.02GMD").unwrap();
        assert_eq!(band.currency, "GMD");
        assert_eq!(band.multiplier, 1.0);
    }

    #[test]
    fn last_lowercase_word_is_frequency() {
        // "per" is ignored, "month" wins
        assert_eq!(frequency_multiplier("per"), 1.0);
        let band = SalaryBand::parse("£100 per pw month").unwrap();
        assert_eq!(band.multiplier, 12.0);
    }

    #[test]
    fn half_penny_products_round_as_doubles() {
        // 768457 * 0.015 is stored just below 11526.855
        assert_eq!(parse("768457GMD yearly"), Some(11526.85));
        assert_eq!(parse("£1592.17 per month"), Some(19106.04));
    }

    #[test]
    fn deterministic() {
        let rates = test_rates();
        for text in ["£733.14 pw", "44462895188.2GTQ", "£15180 - 27514 range"] {
            assert_eq!(parse_salary(text, &rates), parse_salary(text, &rates));
        }
    }
}
