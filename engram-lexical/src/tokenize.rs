/// Lowercase alphanumeric tokenization.
///
/// Splits on any non-alphanumeric `char` (Unicode-aware), lowercases,
/// and drops the separators. No stemming: "running" and "run" are
/// distinct terms.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("Hello, World! It's 2024."),
            vec!["hello", "world", "it", "s", "2024"]
        );
    }

    #[test]
    fn unicode_words_survive() {
        assert_eq!(tokenize("Müller straße"), vec!["müller", "straße"]);
    }

    #[test]
    fn empty_and_punctuation_only_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("... !!! ---").is_empty());
    }
}
