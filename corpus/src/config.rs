use crate::tags::TagScheme;
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

// ── Default path constants (relative to the working directory) ──────────

/// Packaged corpus archive.
const DEFAULT_ARCHIVE: &str = "swda_archive/swda_archive.zip";

/// Parent of the temporary extraction directory.
const DEFAULT_SCRATCH_DIR: &str = "swda_archive";

/// Root for every produced text file.
const DEFAULT_DATA_DIR: &str = "swda_data";

/// Split lists, relative to the data directory.
const DEFAULT_METADATA_REL: &str = "metadata";

// ── Default filter rules ────────────────────────────────────────────────

/// `x` is the non-verbal act.
const DEFAULT_EXCLUDED_TAGS: &[&str] = &["x"];

/// Markup characters such as `<laughter>` or `{D well, }` fragments.
const DEFAULT_EXCLUDED_CHARS: &str = "<>()-#";

// ── Config struct ───────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SwdaConfig {
    pub archive_path: PathBuf,
    pub scratch_dir: PathBuf,
    pub data_dir: PathBuf,
    pub metadata_dir: PathBuf,
    pub utterance_only: bool,
    pub excluded_tags: BTreeSet<String>,
    pub excluded_chars: BTreeSet<char>,
    pub tag_scheme: TagScheme,
}

impl SwdaConfig {
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir().context("could not resolve home directory")?;

        let data_dir = env_path("SWDA_DATA_DIR", PathBuf::from(DEFAULT_DATA_DIR), &home);
        let metadata_dir = env_path(
            "SWDA_METADATA_DIR",
            data_dir.join(DEFAULT_METADATA_REL),
            &home,
        );
        let tag_scheme = match env::var("SWDA_TAG_SCHEME") {
            Ok(val) if !val.trim().is_empty() => val
                .parse::<TagScheme>()
                .map_err(|e| anyhow!("invalid SWDA_TAG_SCHEME: {e}"))?,
            _ => TagScheme::default(),
        };

        Ok(Self {
            archive_path: env_path("SWDA_ARCHIVE", PathBuf::from(DEFAULT_ARCHIVE), &home),
            scratch_dir: env_path(
                "SWDA_SCRATCH_DIR",
                PathBuf::from(DEFAULT_SCRATCH_DIR),
                &home,
            ),
            data_dir,
            metadata_dir,
            utterance_only: env_bool("SWDA_UTTERANCE_ONLY", false),
            excluded_tags: match env::var("SWDA_EXCLUDED_TAGS") {
                Ok(val) => parse_tag_list(&val),
                Err(_) => default_excluded_tags(),
            },
            excluded_chars: match env::var("SWDA_EXCLUDED_CHARS") {
                Ok(val) => parse_char_set(&val),
                Err(_) => parse_char_set(DEFAULT_EXCLUDED_CHARS),
            },
            tag_scheme,
        })
    }
}

impl Default for SwdaConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from(DEFAULT_DATA_DIR);
        Self {
            archive_path: PathBuf::from(DEFAULT_ARCHIVE),
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            metadata_dir: data_dir.join(DEFAULT_METADATA_REL),
            data_dir,
            utterance_only: false,
            excluded_tags: default_excluded_tags(),
            excluded_chars: parse_char_set(DEFAULT_EXCLUDED_CHARS),
            tag_scheme: TagScheme::default(),
        }
    }
}

fn default_excluded_tags() -> BTreeSet<String> {
    DEFAULT_EXCLUDED_TAGS.iter().map(|t| t.to_string()).collect()
}

/// Comma-separated tag list; blank entries are ignored.
pub fn parse_tag_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Every character of `raw` is excluded, whitespace included.
pub fn parse_char_set(raw: &str) -> BTreeSet<char> {
    raw.chars().collect()
}

fn env_path(key: &str, default: PathBuf, home: &Path) -> PathBuf {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => expand_tilde(&val, home),
        _ => default,
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(val) => matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}

fn expand_tilde(input: &str, home: &Path) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        return home.join(rest);
    }
    PathBuf::from(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_exclude_non_verbal_and_markup() {
        let config = SwdaConfig::default();
        assert!(config.excluded_tags.contains("x"));
        assert_eq!(config.excluded_tags.len(), 1);
        for c in ['<', '>', '(', ')', '-', '#'] {
            assert!(config.excluded_chars.contains(&c));
        }
        assert_eq!(config.metadata_dir, PathBuf::from("swda_data/metadata"));
        assert!(!config.utterance_only);
    }

    #[test]
    fn tag_list_skips_blank_entries() {
        let tags = parse_tag_list(" x, +, ,%");
        let expected: BTreeSet<String> = ["x", "+", "%"].iter().map(|s| s.to_string()).collect();
        assert_eq!(tags, expected);
        assert!(parse_tag_list("").is_empty());
    }

    #[test]
    fn char_set_keeps_every_character() {
        let chars = parse_char_set("<<>{");
        assert_eq!(chars.len(), 3);
        assert!(chars.contains(&'{'));
    }

    #[test]
    fn expand_tilde_joins_home() {
        let home = Path::new("/home/someone");
        assert_eq!(
            expand_tilde("~/corpus/swda.zip", home),
            PathBuf::from("/home/someone/corpus/swda.zip")
        );
        assert_eq!(expand_tilde("relative/dir", home), PathBuf::from("relative/dir"));
    }
}
