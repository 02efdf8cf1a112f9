use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// How raw corpus act tags are presented to the filter and the writers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagScheme {
    /// The tag exactly as annotated.
    Raw,
    /// Collapsed to the 42-class SWBD-DAMSL set.
    #[default]
    Damsl,
}

impl FromStr for TagScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "damsl" => Ok(Self::Damsl),
            other => Err(format!("unknown tag scheme '{other}' (expected raw or damsl)")),
        }
    }
}

impl fmt::Display for TagScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::Damsl => f.write_str("damsl"),
        }
    }
}

pub struct TagNormalizer {
    scheme: TagScheme,
    list_separator: Regex,
    caret_suffix: Regex,
    markers: Regex,
}

impl TagNormalizer {
    pub fn new(scheme: TagScheme) -> Self {
        Self {
            scheme,
            list_separator: Regex::new(r"\s*[,;]\s*").unwrap(),
            caret_suffix: Regex::new(r"(.)\^.*").unwrap(),
            markers: Regex::new(r"[()@*]").unwrap(),
        }
    }

    pub fn scheme(&self) -> TagScheme {
        self.scheme
    }

    pub fn normalize(&self, act_tag: &str) -> String {
        match self.scheme {
            TagScheme::Raw => act_tag.to_string(),
            TagScheme::Damsl => self.damsl(act_tag),
        }
    }

    /// Collapse a raw act tag to its DAMSL class. Multi-tag annotations keep
    /// only the first tag.
    fn damsl(&self, act_tag: &str) -> String {
        let first = self
            .list_separator
            .split(act_tag)
            .next()
            .unwrap_or(act_tag);

        match first {
            "qy^d" | "qw^d" | "b^m" => return first.to_string(),
            "nn^e" => return "ng".to_string(),
            "ny^e" => return "na".to_string(),
            _ => {}
        }

        let tag = self.caret_suffix.replace(first, "$1");
        let tag = self.markers.replace_all(&tag, "");
        match tag.as_ref() {
            "qr" | "qy" => "qy".to_string(),
            "fe" | "ba" => "ba".to_string(),
            "oo" | "co" | "cc" => "oo_co_cc".to_string(),
            "fx" | "sv" => "sv".to_string(),
            "aap" | "am" => "aap_am".to_string(),
            "arp" | "nd" => "arp_nd".to_string(),
            "fo" | "o" | "fw" | "\"" | "by" | "bc" => "fo_o_fw_\"_by_bc".to_string(),
            other => other.to_string(),
        }
    }
}

impl Default for TagNormalizer {
    fn default() -> Self {
        Self::new(TagScheme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn damsl() -> TagNormalizer {
        TagNormalizer::new(TagScheme::Damsl)
    }

    #[test]
    fn raw_scheme_passes_through() {
        let n = TagNormalizer::new(TagScheme::Raw);
        assert_eq!(n.normalize("sd^e"), "sd^e");
        assert_eq!(n.normalize("qy^d"), "qy^d");
    }

    #[test]
    fn strips_caret_suffix() {
        assert_eq!(damsl().normalize("sd^e"), "sd");
        assert_eq!(damsl().normalize("sv^t"), "sv");
    }

    #[test]
    fn keeps_declarative_question_tags() {
        assert_eq!(damsl().normalize("qy^d"), "qy^d");
        assert_eq!(damsl().normalize("qw^d"), "qw^d");
        assert_eq!(damsl().normalize("b^m"), "b^m");
    }

    #[test]
    fn maps_elaborated_answers() {
        assert_eq!(damsl().normalize("nn^e"), "ng");
        assert_eq!(damsl().normalize("ny^e"), "na");
    }

    #[test]
    fn merges_tag_families() {
        let n = damsl();
        assert_eq!(n.normalize("qr"), "qy");
        assert_eq!(n.normalize("fe"), "ba");
        assert_eq!(n.normalize("cc"), "oo_co_cc");
        assert_eq!(n.normalize("fx"), "sv");
        assert_eq!(n.normalize("am"), "aap_am");
        assert_eq!(n.normalize("nd"), "arp_nd");
        assert_eq!(n.normalize("bc"), "fo_o_fw_\"_by_bc");
        assert_eq!(n.normalize("\""), "fo_o_fw_\"_by_bc");
    }

    #[test]
    fn removes_marker_characters() {
        assert_eq!(damsl().normalize("(%)"), "%");
        assert_eq!(damsl().normalize("sd@"), "sd");
        assert_eq!(damsl().normalize("b*"), "b");
    }

    #[test]
    fn uses_first_of_multiple_tags() {
        assert_eq!(damsl().normalize("sd ; qy^d"), "sd");
        assert_eq!(damsl().normalize("qy^d,sd"), "qy^d");
    }

    #[test]
    fn non_verbal_tag_is_stable() {
        assert_eq!(damsl().normalize("x"), "x");
    }

    #[test]
    fn parses_scheme_names() {
        assert_eq!("raw".parse::<TagScheme>().unwrap(), TagScheme::Raw);
        assert_eq!(" DAMSL ".parse::<TagScheme>().unwrap(), TagScheme::Damsl);
        assert!("swbd".parse::<TagScheme>().is_err());
    }
}
