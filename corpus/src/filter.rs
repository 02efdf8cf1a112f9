use std::collections::BTreeSet;

/// Tag and character exclusion rules applied while building a dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRules {
    pub excluded_tags: BTreeSet<String>,
    pub excluded_chars: BTreeSet<char>,
}

impl FilterRules {
    pub fn new<T, C>(excluded_tags: T, excluded_chars: C) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        C: IntoIterator<Item = char>,
    {
        Self {
            excluded_tags: excluded_tags.into_iter().map(Into::into).collect(),
            excluded_chars: excluded_chars.into_iter().collect(),
        }
    }

    pub fn is_excluded_tag(&self, tag: &str) -> bool {
        is_excluded_tag(tag, &self.excluded_tags)
    }

    pub fn clean_text(&self, text: &str) -> String {
        clean_text(text, &self.excluded_chars)
    }
}

/// Exact membership; no case folding or prefix matching.
pub fn is_excluded_tag(tag: &str, excluded_tags: &BTreeSet<String>) -> bool {
    excluded_tags.contains(tag)
}

/// Remove every excluded character. Whitespace around removed characters is
/// left as is.
pub fn clean_text(text: &str, excluded_chars: &BTreeSet<char>) -> String {
    text.chars().filter(|c| !excluded_chars.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> FilterRules {
        FilterRules::new(["x"], ['<', '>', '(', ')', '-', '#'])
    }

    #[test]
    fn excluded_tag_is_exact_match() {
        let rules = rules();
        assert!(rules.is_excluded_tag("x"));
        assert!(!rules.is_excluded_tag("X"));
        assert!(!rules.is_excluded_tag("xx"));
        assert!(!rules.is_excluded_tag("sd"));
    }

    #[test]
    fn strips_markup_characters() {
        assert_eq!(rules().clean_text("<laughter> hi"), "laughter hi");
        assert_eq!(rules().clean_text("how-are you"), "howare you");
        assert_eq!(rules().clean_text("(( yeah )) #right#"), " yeah  right");
    }

    #[test]
    fn keeps_other_characters_in_order() {
        let text = "{D Well, } uh, I think so. /";
        assert_eq!(rules().clean_text(text), text);
    }

    #[test]
    fn cleaning_everything_leaves_empty_text() {
        assert_eq!(rules().clean_text("<->#"), "");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let rules = rules();
        for text in ["<laughter> hi", "a-b-c", "((x))", "", "plain text", "<<->>"] {
            let once = rules.clean_text(text);
            assert_eq!(rules.clean_text(&once), once);
        }
    }

    #[test]
    fn cleaned_text_never_contains_excluded_characters() {
        let rules = rules();
        let cleaned = rules.clean_text("<b>- (a) #c# - <d>");
        assert!(cleaned.chars().all(|c| !rules.excluded_chars.contains(&c)));
    }

    #[test]
    fn empty_rules_change_nothing() {
        let rules = FilterRules::default();
        assert!(!rules.is_excluded_tag("x"));
        assert_eq!(rules.clean_text("<laughter>"), "<laughter>");
    }
}
