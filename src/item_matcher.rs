use crate::models::MatchMode;

/// Decides whether a result item is the product being searched for.
#[derive(Debug, Clone, Copy)]
pub struct ItemMatcher {
    mode: MatchMode,
    display_term_fallback: bool,
}

impl ItemMatcher {
    pub fn new(mode: MatchMode, display_term_fallback: bool) -> Self {
        Self {
            mode,
            display_term_fallback,
        }
    }

    /// Case-insensitive substring containment only; an EAN that happens to
    /// occur inside a longer number still counts as a match.
    pub fn matches(&self, item_text: &str, identifier: &str, display_term: Option<&str>) -> bool {
        match self.mode {
            MatchMode::None => true,
            MatchMode::ByIdentifierInText => {
                let text = item_text.to_lowercase();

                if contains_term(&text, identifier) {
                    return true;
                }

                self.display_term_fallback
                    && display_term.is_some_and(|term| contains_term(&text, term))
            }
        }
    }
}

fn contains_term(lowered_text: &str, term: &str) -> bool {
    let term = term.trim();
    !term.is_empty() && lowered_text.contains(&term.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EAN: &str = "7503002941409";

    #[rstest]
    #[case("Dove Shampoo 400ml EAN 7503002941409", None, true)]
    #[case("Dove Shampoo 400ml", Some("dove shampoo"), true)]
    #[case("Other Product", Some("dove shampoo"), false)]
    #[case("DOVE SHAMPOO 400ML", Some("Dove Shampoo"), true)]
    #[case("Dove Shampoo 400ml", None, false)]
    #[case("Dove Shampoo 400ml", Some(""), false)]
    fn test_matches_by_identifier(
        #[case] item_text: &str,
        #[case] display_term: Option<&str>,
        #[case] expected: bool,
    ) {
        let matcher = ItemMatcher::new(MatchMode::ByIdentifierInText, true);
        assert_eq!(matcher.matches(item_text, EAN, display_term), expected);
    }

    #[test]
    fn test_display_term_ignored_without_fallback() {
        let matcher = ItemMatcher::new(MatchMode::ByIdentifierInText, false);

        assert!(!matcher.matches("Dove Shampoo 400ml", EAN, Some("dove shampoo")));
        assert!(matcher.matches("Dove Shampoo 400ml 7503002941409", EAN, Some("dove shampoo")));
    }

    #[test]
    fn test_substring_collision_is_accepted() {
        let matcher = ItemMatcher::new(MatchMode::ByIdentifierInText, false);
        assert!(matcher.matches("Código 975030029414091", EAN, None));
    }

    #[test]
    fn test_match_mode_none_always_matches() {
        let matcher = ItemMatcher::new(MatchMode::None, false);

        assert!(matcher.matches("Anything at all", EAN, None));
        assert!(matcher.matches("", EAN, None));
    }
}
