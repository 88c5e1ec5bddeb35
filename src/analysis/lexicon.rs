//! Fixed subject lexicon for topic tagging.
//!
//! Tags are matched by exact case-insensitive token comparison; no fuzzy
//! matching. The lexicon is grouped by subject and the subject name is the
//! tag that flows through the rest of the pipeline (and keys the knowledge
//! base).

use std::collections::HashSet;

/// Subject tags and the tokens that trigger them.
///
/// Ordering is stable so that tag output is deterministic.
pub const LEXICON: &[(&str, &[&str])] = &[
    (
        "physics",
        &[
            "gravity",
            "force",
            "energy",
            "momentum",
            "velocity",
            "quantum",
            "relativity",
            "thermodynamics",
            "photon",
            "electron",
        ],
    ),
    (
        "mathematics",
        &[
            "math",
            "mathematics",
            "algebra",
            "geometry",
            "calculus",
            "equation",
            "theorem",
            "fraction",
            "derivative",
            "integral",
        ],
    ),
    (
        "biology",
        &[
            "biology",
            "cell",
            "dna",
            "evolution",
            "photosynthesis",
            "organism",
            "protein",
            "ecosystem",
            "gene",
        ],
    ),
    (
        "chemistry",
        &[
            "chemistry",
            "atom",
            "molecule",
            "reaction",
            "acid",
            "element",
            "compound",
            "electronegativity",
        ],
    ),
    (
        "astronomy",
        &[
            "astronomy",
            "planet",
            "star",
            "galaxy",
            "universe",
            "orbit",
            "telescope",
            "nebula",
        ],
    ),
    (
        "programming",
        &[
            "programming",
            "code",
            "algorithm",
            "software",
            "computer",
            "function",
            "variable",
            "compiler",
            "recursion",
        ],
    ),
    (
        "history",
        &[
            "history",
            "ancient",
            "empire",
            "revolution",
            "war",
            "civilization",
            "medieval",
            "renaissance",
        ],
    ),
    (
        "literature",
        &[
            "literature",
            "poem",
            "poetry",
            "novel",
            "shakespeare",
            "metaphor",
            "narrative",
            "prose",
        ],
    ),
];

/// Match lowercased tokens against the lexicon and return the subject tags
/// they trigger, in lexicon order, without duplicates.
pub fn topic_tags(tokens: &[String]) -> Vec<String> {
    let token_set: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    LEXICON
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| token_set.contains(k)))
        .map(|(subject, _)| (*subject).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_single_subject_match() {
        let tags = topic_tags(&toks(&["what", "is", "gravity"]));
        assert_eq!(tags, vec!["physics".to_string()]);
    }

    #[test]
    fn test_multiple_subjects_in_lexicon_order() {
        let tags = topic_tags(&toks(&["code", "for", "a", "calculus", "equation"]));
        assert_eq!(
            tags,
            vec!["mathematics".to_string(), "programming".to_string()]
        );
    }

    #[test]
    fn test_no_match_yields_empty() {
        let tags = topic_tags(&toks(&["hello", "there"]));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_repeated_keyword_tags_once() {
        let tags = topic_tags(&toks(&["gravity", "gravity", "force"]));
        assert_eq!(tags, vec!["physics".to_string()]);
    }
}
