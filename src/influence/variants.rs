// Leave-one-out variant generation.
//
// For an N-word prompt, produce N copies, each with one word replaced by
// the placeholder marker. Re-prompting the model with a variant and
// measuring how far its response drifts from the base response tells us
// how much the replaced word mattered.

/// Marker substituted for the removed word. The angle brackets keep it from
/// colliding with real prompt words.
pub const PLACEHOLDER: &str = "<placeholder>";

/// Split a prompt into its whitespace-delimited words.
///
/// This is the tokenization used everywhere in the pipeline; word identity
/// is positional, and every downstream index refers to this sequence.
pub fn split_words(prompt: &str) -> Vec<String> {
    prompt.split_whitespace().map(str::to_string).collect()
}

/// Produce one variant per word position, each with that position replaced
/// by [`PLACEHOLDER`] and the words rejoined with single spaces.
///
/// The output length equals the word count; variant `i` corresponds to word
/// `i`. An empty prompt produces no variants.
pub fn create_variants(prompt: &str) -> Vec<String> {
    let words = split_words(prompt);
    (0..words.len())
        .map(|index| {
            let replaced: Vec<&str> = words
                .iter()
                .enumerate()
                .map(|(i, word)| if i == index { PLACEHOLDER } else { word.as_str() })
                .collect();
            replaced.join(" ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_variant_per_word() {
        let variants = create_variants("fix the bug now");
        assert_eq!(variants.len(), 4);
    }

    #[test]
    fn each_variant_differs_in_exactly_one_position() {
        let prompt = "fix the bug now";
        let words = split_words(prompt);
        for (i, variant) in create_variants(prompt).iter().enumerate() {
            let variant_words = split_words(variant);
            assert_eq!(variant_words.len(), words.len());
            for (j, word) in variant_words.iter().enumerate() {
                if j == i {
                    assert_eq!(word, PLACEHOLDER, "Position {j} should be the placeholder");
                } else {
                    assert_eq!(word, &words[j], "Position {j} should be unchanged");
                }
            }
        }
    }

    #[test]
    fn empty_prompt_yields_no_variants() {
        assert!(create_variants("").is_empty());
        assert!(create_variants("   ").is_empty());
    }

    #[test]
    fn single_word_prompt_yields_placeholder_only_variant() {
        let variants = create_variants("hello");
        assert_eq!(variants, vec![PLACEHOLDER.to_string()]);
    }

    #[test]
    fn whitespace_runs_collapse_to_single_spaces() {
        let variants = create_variants("fix   the\tbug");
        assert_eq!(variants[0], "<placeholder> the bug");
        assert_eq!(variants[2], "fix the <placeholder>");
    }

    #[test]
    fn split_words_ignores_leading_and_trailing_whitespace() {
        assert_eq!(split_words("  fix the bug  "), vec!["fix", "the", "bug"]);
    }
}
