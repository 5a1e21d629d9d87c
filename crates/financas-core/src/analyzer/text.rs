//! Text normalization shared by the keyword tables and the extractors

/// Replace Portuguese diacritics with their base letter
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            other => other,
        })
        .collect()
}

/// Lowercase and accent-fold, the form every keyword comparison uses
pub fn normalize(text: &str) -> String {
    fold_accents(&text.to_lowercase())
}

/// True if any keyword is a substring of `text`
///
/// Both sides are expected to be normalized already.
pub fn contains_any<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    keywords.iter().any(|k| text.contains(k.as_ref()))
}

/// First character upper, the rest lower ("MAGALU" -> "Magalu")
pub fn title_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("Farmácia São João"), "Farmacia Sao Joao");
        assert_eq!(fold_accents("ÔNIBUS ação"), "ONIBUS acao");
        assert_eq!(fold_accents("R$ 10,00"), "R$ 10,00");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Remédio na FARMÁCIA"), "remedio na farmacia");
    }

    #[test]
    fn test_contains_any() {
        let keywords = vec!["uber".to_string(), "taxi".to_string()];
        assert!(contains_any("paguei o uber", &keywords));
        assert!(!contains_any("paguei o onibus", &keywords));
        assert!(!contains_any::<String>("uber", &[]));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("mercado livre"), "Mercado livre");
        assert_eq!(title_case("SHOPEE"), "Shopee");
        assert_eq!(title_case(""), "");
    }
}
