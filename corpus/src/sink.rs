//! Dialogue serialization and the per-run file lifecycle.
//!
//! Aggregate files are truncated the first time they are touched in a run and
//! appended to afterwards. Per-conversation files are always overwritten. No
//! file handle outlives a single `write_dialogue` call.

use crate::layout::{validate_conversation_id, OutputLayout, Sink};
use crate::splits::Split;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use swda_types::{Dialogue, Utterance};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Create if absent, otherwise append.
    Append,
    /// Create if absent, otherwise replace.
    Overwrite,
}

/// `speaker|tag|text`, or the text alone in utterance-only mode. Line breaks
/// inside the text become spaces so every utterance stays on one line.
pub fn format_utterance(utterance: &Utterance, utterance_only: bool) -> String {
    let text = single_line(&utterance.text);
    if utterance_only {
        text
    } else {
        format!("{}|{}|{}", utterance.speaker, utterance.dialogue_act_tag, text)
    }
}

fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Write one line per utterance. The body is rendered before the file is
/// opened and handed to the OS in a single `write_all`.
pub fn write_dialogue(
    path: &Path,
    dialogue: &Dialogue,
    utterance_only: bool,
    mode: WriteMode,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output dir {}", parent.display()))?;
        }
    }

    let mut body = String::new();
    for utterance in &dialogue.utterances {
        body.push_str(&format_utterance(utterance, utterance_only));
        body.push('\n');
    }

    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        WriteMode::Append => options.append(true),
        WriteMode::Overwrite => options.write(true).truncate(true),
    };
    let mut file = options
        .open(path)
        .with_context(|| format!("open {} ({mode:?})", path.display()))?;
    file.write_all(body.as_bytes())
        .with_context(|| format!("write dialogue {} to {}", dialogue.conversation_id, path.display()))?;
    Ok(())
}

/// Routes dialogues to their destinations and tracks which aggregate files
/// have been touched this run.
pub struct SplitWriter {
    layout: OutputLayout,
    touched: HashSet<PathBuf>,
    ready_dirs: HashSet<PathBuf>,
}

impl SplitWriter {
    pub fn new(layout: OutputLayout) -> Self {
        Self {
            layout,
            touched: HashSet::new(),
            ready_dirs: HashSet::new(),
        }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Remove every aggregate left by a previous run, so aggregates that get
    /// no dialogue this run do not keep stale lines.
    pub fn reset_aggregates(&mut self) -> Result<()> {
        fs::create_dir_all(self.layout.root()).with_context(|| {
            format!("create data dir {}", self.layout.root().display())
        })?;
        for sink in Sink::AGGREGATES {
            let path = self.layout.aggregate_path(sink);
            match fs::remove_file(&path) {
                Ok(()) => info!(path = %path.display(), "removed previous aggregate"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("remove {}", path.display()));
                }
            }
        }
        self.touched.clear();
        Ok(())
    }

    /// Truncate on the first write of the run, append afterwards.
    pub fn append_aggregate(&mut self, sink: Sink, dialogue: &Dialogue) -> Result<()> {
        let path = self.layout.aggregate_path(sink);
        let mode = if self.touched.insert(path.clone()) {
            WriteMode::Overwrite
        } else {
            WriteMode::Append
        };
        write_dialogue(&path, dialogue, self.layout.utterance_only(), mode)
    }

    /// Per-conversation file plus the split aggregate.
    pub fn write_split(&mut self, split: Split, dialogue: &Dialogue) -> Result<()> {
        validate_conversation_id(&dialogue.conversation_id)?;
        self.ensure_split_dir(split)?;
        let path = self
            .layout
            .conversation_path(split, &dialogue.conversation_id);
        write_dialogue(
            &path,
            dialogue,
            self.layout.utterance_only(),
            WriteMode::Overwrite,
        )?;
        self.append_aggregate(Sink::Split(split), dialogue)
    }

    fn ensure_split_dir(&mut self, split: Split) -> Result<()> {
        let dir = self.layout.split_dir(split);
        if self.ready_dirs.contains(&dir) {
            return Ok(());
        }
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("create split dir {}", dir.display()))?;
            info!(path = %dir.display(), ?split, "created split folder");
        }
        self.ready_dirs.insert(dir);
        Ok(())
    }
}
