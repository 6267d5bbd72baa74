/// Splits `text` on runs of whitespace.
///
/// Empty or whitespace-only input yields no tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_runs() {
        assert_eq!(
            tokenize("  Hola,\tsoy  un\nLLM "),
            ["Hola,", "soy", "un", "LLM"]
        );
    }

    #[test]
    fn blank_input_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
