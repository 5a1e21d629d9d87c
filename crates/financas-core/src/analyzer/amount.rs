//! Amount extraction from Brazilian-Portuguese descriptions

use regex::{Captures, Regex};

use crate::error::Result;

use super::text::normalize;

/// Ordered amount patterns; the first one that matches anywhere wins.
/// Group 1 is the integer part in reais, group 2 the optional centavos.
const AMOUNT_PATTERNS: [&str; 4] = [
    r"r\$\s*(\d+)(?:,(\d{1,2}))?",
    r"(\d+)(?:,(\d{1,2}))?\s*reais?",
    r"(\d+)(?:,(\d{1,2}))?\s*(?:no|na|do|da)",
    r"\b(\d+)(?:,(\d{1,2}))?\b",
];

/// Compiled amount patterns
#[derive(Debug, Clone)]
pub struct AmountExtractor {
    patterns: Vec<Regex>,
}

impl AmountExtractor {
    pub fn new() -> Result<Self> {
        let patterns = AMOUNT_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Extract the amount in reais, 0 when none is found
    pub fn extract(&self, description: &str) -> f64 {
        let text = normalize(description);
        for (index, pattern) in self.patterns.iter().enumerate() {
            let Some(caps) = pattern.captures(&text) else {
                continue;
            };
            match amount_from_captures(&caps) {
                Some(amount) => {
                    tracing::debug!(pattern = index, amount, "Amount matched");
                    return amount;
                }
                None => {
                    tracing::debug!(pattern = index, "Amount candidate out of range, trying next pattern");
                }
            }
        }
        0.0
    }
}

/// Build the amount from reais and centavos captures.
///
/// The centavos are right-padded to two digits, so "29,9" reads as 29.90.
/// An integer part that does not fit a u32 yields `None`.
fn amount_from_captures(caps: &Captures<'_>) -> Option<f64> {
    let reais: u32 = caps.get(1)?.as_str().parse().ok()?;
    let centavos: u64 = match caps.get(2) {
        Some(frac) => format!("{:0<2}", frac.as_str()).parse().ok()?,
        None => 0,
    };
    let cents = u64::from(reais) * 100 + centavos;
    Some(cents as f64 / 100.0)
}

/// Parse an entity's text with a permissive numeric cleaner.
///
/// Everything but digits, `,` and `.` is stripped, then the raw string, the
/// comma-to-dot and the dot-to-comma variants are tried in that order. A final
/// attempt reads dots as thousands separators ("1.234,56"). Only non-negative
/// finite values are accepted.
pub fn parse_entity_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let candidates = [
        cleaned.clone(),
        cleaned.replace(',', "."),
        cleaned.replace('.', ","),
        cleaned.replace('.', "").replace(',', "."),
    ];

    candidates
        .iter()
        .filter_map(|c| c.parse::<f64>().ok())
        .find(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> f64 {
        AmountExtractor::new().unwrap().extract(text)
    }

    #[test]
    fn test_currency_marker() {
        assert_eq!(extract("Almoço R$ 45,90 no centro"), 45.9);
        assert_eq!(extract("r$12"), 12.0);
    }

    #[test]
    fn test_reais_suffix() {
        assert_eq!(extract("Paguei 37 reais no Uber para o trabalho"), 37.0);
        assert_eq!(extract("1 real de bala"), 1.0);
    }

    #[test]
    fn test_preposition_suffix() {
        assert_eq!(extract("gastei 80 no mercado"), 80.0);
        assert_eq!(extract("3 pães e 12,5 na padaria"), 12.5);
    }

    #[test]
    fn test_bare_number() {
        assert_eq!(extract("Netflix assinatura mensal 29,90"), 29.9);
        assert_eq!(extract("Supermercado Extra compras 156,50"), 156.5);
    }

    #[test]
    fn test_fraction_is_right_padded() {
        assert_eq!(extract("Netflix 29,9"), 29.9);
        assert_ne!(extract("Netflix 29,9"), 29.09);
    }

    #[test]
    fn test_pattern_order_wins_over_position() {
        // The currency marker beats an earlier bare number
        assert_eq!(extract("2 pizzas por R$ 70"), 70.0);
    }

    #[test]
    fn test_no_amount() {
        assert_eq!(extract("oi"), 0.0);
        assert_eq!(extract(""), 0.0);
    }

    #[test]
    fn test_overflow_falls_through_to_next_pattern() {
        // 99999999999 overflows in the "reais" pattern; the "no" pattern then matches 5
        assert_eq!(extract("99999999999 reais e 5 no bar"), 5.0);
    }

    #[test]
    fn test_parse_entity_amount() {
        assert_eq!(parse_entity_amount("156,50"), Some(156.5));
        assert_eq!(parse_entity_amount("R$ 37"), Some(37.0));
        assert_eq!(parse_entity_amount("29.90"), Some(29.9));
        assert_eq!(parse_entity_amount("1.234,56"), Some(1234.56));
        assert_eq!(parse_entity_amount("mensal"), None);
        assert_eq!(parse_entity_amount(",."), None);
    }
}
