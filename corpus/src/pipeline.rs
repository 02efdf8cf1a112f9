//! Corpus conversion driver.
//!
//! `convert` owns the whole batch run: split lists, archive extraction into a
//! scratch directory, then `run_pipeline` over the extracted transcripts.
//! Any error aborts the run; files written for earlier conversations stay on
//! disk.

use crate::archive::extract_archive;
use crate::config::SwdaConfig;
use crate::dialogue::build_dialogue;
use crate::filter::FilterRules;
use crate::layout::{OutputLayout, Sink};
use crate::reader::CorpusReader;
use crate::sink::SplitWriter;
use crate::splits::{Split, SplitMembership};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use swda_types::TranscriptRecord;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub transcripts: usize,
    pub utterances_kept: usize,
    pub utterances_dropped: usize,
    /// Conversations routed to no primary split.
    pub unassigned: usize,
    pub per_split: BTreeMap<Split, usize>,
}

impl RunStats {
    pub fn split_count(&self, split: Split) -> usize {
        self.per_split.get(&split).copied().unwrap_or(0)
    }
}

/// Build, route and write every transcript yielded by `transcripts`.
pub fn run_pipeline<I>(
    transcripts: I,
    splits: &SplitMembership,
    rules: &FilterRules,
    layout: OutputLayout,
) -> Result<RunStats>
where
    I: IntoIterator<Item = Result<TranscriptRecord>>,
{
    let mut writer = SplitWriter::new(layout);
    writer.reset_aggregates()?;

    let mut stats = RunStats::default();
    for transcript in transcripts {
        let transcript = transcript?;
        let dialogue = build_dialogue(&transcript, rules);
        debug!(
            conversation = %dialogue.conversation_id,
            kept = dialogue.len(),
            raw = transcript.utterances.len(),
            "built dialogue"
        );

        stats.transcripts += 1;
        stats.utterances_kept += dialogue.len();
        stats.utterances_dropped += transcript.utterances.len() - dialogue.len();

        writer.append_aggregate(Sink::All, &dialogue)?;

        let routes = splits.routes(&dialogue.conversation_id);
        if !routes.iter().any(|split| Split::PRIMARY.contains(split)) {
            warn!(conversation = %dialogue.conversation_id, "conversation is in no primary split");
            stats.unassigned += 1;
        }
        for split in routes {
            writer.write_split(split, &dialogue)?;
            *stats.per_split.entry(split).or_default() += 1;
        }
    }

    Ok(stats)
}

/// Full run from `config`: load split lists, read the corpus and write all
/// destinations below `config.data_dir`.
pub fn convert(config: &SwdaConfig) -> Result<RunStats> {
    info!(
        archive = %config.archive_path.display(),
        data_dir = %config.data_dir.display(),
        utterance_only = config.utterance_only,
        tag_scheme = %config.tag_scheme,
        "starting corpus conversion"
    );

    let splits = SplitMembership::load(&config.metadata_dir)?;
    let rules = FilterRules {
        excluded_tags: config.excluded_tags.clone(),
        excluded_chars: config.excluded_chars.clone(),
    };
    let layout = OutputLayout::new(&config.data_dir, config.utterance_only);

    let stats = if config.archive_path.is_dir() {
        let reader = CorpusReader::new(&config.archive_path, config.tag_scheme)?;
        run_pipeline(reader.iter_transcripts(), &splits, &rules, layout)?
    } else {
        fs::create_dir_all(&config.scratch_dir).with_context(|| {
            format!("create scratch dir {}", config.scratch_dir.display())
        })?;
        let scratch = tempfile::Builder::new()
            .prefix("swda-")
            .tempdir_in(&config.scratch_dir)
            .with_context(|| format!("create temp dir in {}", config.scratch_dir.display()))?;
        info!(path = %scratch.path().display(), "created temporary directory");

        extract_archive(&config.archive_path, scratch.path())?;
        let reader = CorpusReader::new(scratch.path(), config.tag_scheme)?;
        run_pipeline(reader.iter_transcripts(), &splits, &rules, layout)?
    };

    info!(
        transcripts = stats.transcripts,
        kept = stats.utterances_kept,
        dropped = stats.utterances_dropped,
        unassigned = stats.unassigned,
        "corpus conversion complete"
    );
    Ok(stats)
}
