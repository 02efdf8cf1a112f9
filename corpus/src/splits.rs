use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Canonical dataset partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Split {
    Train,
    Test,
    Validation,
    Development,
}

impl Split {
    pub const ALL: [Split; 4] = [
        Split::Train,
        Split::Test,
        Split::Validation,
        Split::Development,
    ];

    /// Primary splits in resolution priority order.
    pub const PRIMARY: [Split; 3] = [Split::Train, Split::Test, Split::Validation];

    /// File name of the id list under the metadata directory.
    pub fn metadata_file(self) -> &'static str {
        match self {
            Split::Train => "train_split.txt",
            Split::Test => "test_split.txt",
            Split::Validation => "eval_split.txt",
            Split::Development => "dev_split.txt",
        }
    }
}

/// Conversation ids belonging to each split.
#[derive(Debug, Clone, Default)]
pub struct SplitMembership {
    pub train: HashSet<String>,
    pub test: HashSet<String>,
    pub validation: HashSet<String>,
    pub development: HashSet<String>,
}

impl SplitMembership {
    /// Load all four id lists from `metadata_dir`. Any missing list is fatal.
    pub fn load(metadata_dir: &Path) -> Result<Self> {
        Ok(Self {
            train: load_split_ids(&metadata_dir.join(Split::Train.metadata_file()))?,
            test: load_split_ids(&metadata_dir.join(Split::Test.metadata_file()))?,
            validation: load_split_ids(&metadata_dir.join(Split::Validation.metadata_file()))?,
            development: load_split_ids(&metadata_dir.join(Split::Development.metadata_file()))?,
        })
    }

    pub fn ids(&self, split: Split) -> &HashSet<String> {
        match split {
            Split::Train => &self.train,
            Split::Test => &self.test,
            Split::Validation => &self.validation,
            Split::Development => &self.development,
        }
    }

    /// First of train, test, validation that lists the conversation.
    pub fn primary_split(&self, conversation_id: &str) -> Option<Split> {
        resolve_primary_split(conversation_id, &self.train, &self.test, &self.validation)
    }

    pub fn is_development(&self, conversation_id: &str) -> bool {
        is_development(conversation_id, &self.development)
    }

    /// Every split the conversation is written to, primary first.
    pub fn routes(&self, conversation_id: &str) -> Vec<Split> {
        let mut routes: Vec<Split> = self.primary_split(conversation_id).into_iter().collect();
        if self.is_development(conversation_id) {
            routes.push(Split::Development);
        }
        routes
    }
}

/// One id per line; surrounding whitespace is trimmed and blank lines skipped.
pub fn load_split_ids(path: &Path) -> Result<HashSet<String>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read split list {}", path.display()))?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

pub fn resolve_primary_split(
    conversation_id: &str,
    train_ids: &HashSet<String>,
    test_ids: &HashSet<String>,
    val_ids: &HashSet<String>,
) -> Option<Split> {
    if train_ids.contains(conversation_id) {
        Some(Split::Train)
    } else if test_ids.contains(conversation_id) {
        Some(Split::Test)
    } else if val_ids.contains(conversation_id) {
        Some(Split::Validation)
    } else {
        None
    }
}

pub fn is_development(conversation_id: &str, dev_ids: &HashSet<String>) -> bool {
    dev_ids.contains(conversation_id)
}
