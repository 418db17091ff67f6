use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Folds text for comparisons: lowercase, no diacritics, single spaces.
///
/// `"  Alimentação   Fora "` becomes `"alimentacao fora"`.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trims and collapses whitespace while keeping case and accents
pub fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_accents_and_case() {
        assert_eq!(normalize("Alimentação"), "alimentacao");
        assert_eq!(normalize("ORÇAMENTOS"), "orcamentos");
        assert_eq!(normalize("Café"), "cafe");
        assert_eq!(normalize("fundo de emergência"), "fundo de emergencia");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  renda   extra \n"), "renda extra");
        assert_eq!(clean("  Renda   Extra "), "Renda Extra");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}
