use crate::splits::Split;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Aggregate file holding every dialogue of the run.
pub const ALL_CORPUS_FILE: &str = "all_swda";

/// Suffix on every file and folder name when only utterance text is written.
pub const UTTERANCE_ONLY_SUFFIX: &str = "_utt";

/// An aggregate destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sink {
    All,
    Split(Split),
}

impl Sink {
    pub const AGGREGATES: [Sink; 5] = [
        Sink::All,
        Sink::Split(Split::Train),
        Sink::Split(Split::Test),
        Sink::Split(Split::Validation),
        Sink::Split(Split::Development),
    ];
}

/// Resolves output paths below the data root.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    utterance_only: bool,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>, utterance_only: bool) -> Self {
        Self {
            root: root.into(),
            utterance_only,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn utterance_only(&self) -> bool {
        self.utterance_only
    }

    pub fn aggregate_path(&self, sink: Sink) -> PathBuf {
        let name = match sink {
            Sink::All => ALL_CORPUS_FILE,
            Sink::Split(split) => split_names(split).1,
        };
        self.root.join(self.suffixed(name))
    }

    pub fn split_dir(&self, split: Split) -> PathBuf {
        self.root.join(self.suffixed(split_names(split).0))
    }

    pub fn conversation_path(&self, split: Split, conversation_id: &str) -> PathBuf {
        self.split_dir(split).join(conversation_id)
    }

    fn suffixed(&self, name: &str) -> String {
        if self.utterance_only {
            format!("{name}{UTTERANCE_ONLY_SUFFIX}")
        } else {
            name.to_string()
        }
    }
}

/// Split -> (per-conversation folder, aggregate file).
fn split_names(split: Split) -> (&'static str, &'static str) {
    match split {
        Split::Train => ("train", "train_set"),
        Split::Test => ("test", "test_set"),
        Split::Validation => ("eval", "eval_set"),
        Split::Development => ("dev", "dev_set"),
    }
}

/// Conversation ids become file names inside a split folder, so they must be
/// a single plain path component.
pub fn validate_conversation_id(conversation_id: &str) -> Result<()> {
    let plain = !conversation_id.is_empty()
        && conversation_id != "."
        && !conversation_id.contains("..")
        && !conversation_id.contains(['/', '\\', '\0']);
    if !plain {
        bail!("invalid conversation id {conversation_id:?}");
    }
    Ok(())
}
