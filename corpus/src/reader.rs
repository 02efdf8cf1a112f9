use crate::layout::validate_conversation_id;
use crate::tags::{TagNormalizer, TagScheme};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use swda_types::{RawUtterance, TranscriptRecord};
use walkdir::WalkDir;

/// Per-utterance transcript files end with this suffix.
const TRANSCRIPT_SUFFIX: &str = ".utt.csv";

/// Columns consumed from a transcript CSV; the rest are ignored.
#[derive(Debug, Deserialize)]
struct UtteranceRow {
    conversation_no: String,
    act_tag: String,
    caller: String,
    text: String,
}

/// Reads an extracted corpus one transcript file at a time.
pub struct CorpusReader {
    files: Vec<PathBuf>,
    tags: TagNormalizer,
}

impl CorpusReader {
    pub fn new(root: &Path, scheme: TagScheme) -> Result<Self> {
        if !root.is_dir() {
            bail!("corpus root {} is not a directory", root.display());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.with_context(|| format!("walk corpus root {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let is_transcript = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(TRANSCRIPT_SUFFIX));
            if is_transcript {
                files.push(entry.into_path());
            }
        }
        files.sort();

        Ok(Self {
            files,
            tags: TagNormalizer::new(scheme),
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Transcripts in path order. Each file is parsed when the iterator
    /// reaches it.
    pub fn iter_transcripts(&self) -> impl Iterator<Item = Result<TranscriptRecord>> + '_ {
        self.files
            .iter()
            .map(move |path| read_transcript(path, &self.tags))
    }
}

pub fn read_transcript(path: &Path, tags: &TagNormalizer) -> Result<TranscriptRecord> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open transcript {}", path.display()))?;

    let mut conversation_id: Option<String> = None;
    let mut utterances = Vec::new();
    for (index, row) in reader.deserialize::<UtteranceRow>().enumerate() {
        let row = row.with_context(|| {
            format!("malformed utterance row {} in {}", index + 1, path.display())
        })?;
        if conversation_id.is_none() {
            conversation_id = Some(row.conversation_no.trim().to_string());
        }
        utterances.push(RawUtterance {
            speaker: row.caller,
            act_tag: tags.normalize(row.act_tag.trim()),
            text: row.text,
        });
    }

    let conversation_id = match conversation_id {
        Some(id) if !id.is_empty() => id,
        _ => conversation_id_from_path(path)
            .with_context(|| format!("no conversation id for {}", path.display()))?,
    };
    validate_conversation_id(&conversation_id)
        .with_context(|| format!("transcript {}", path.display()))?;

    Ok(TranscriptRecord {
        conversation_id,
        utterances,
    })
}

/// `sw_0001_4325.utt.csv` -> `4325`.
fn conversation_id_from_path(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(TRANSCRIPT_SUFFIX)?;
    let id = stem.rsplit('_').next()?;
    (!id.is_empty() && id != stem).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str =
        "swda_filename,ptb_basename,conversation_no,transcript_index,act_tag,caller,utterance_index,subutterance_index,text,pos,trees,ptb_treenumbers";

    fn write_transcript(dir: &Path, rel: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut body = String::from(HEADER);
        body.push('\n');
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn reads_rows_in_order_with_damsl_tags() {
        let dir = tempdir().expect("tempdir");
        let path = write_transcript(
            dir.path(),
            "sw00utt/sw_0001_4325.utt.csv",
            &[
                r#"sw00utt/sw_0001_4325.utt,4325,4325,0,o,A,1,1,"Okay.  /",,,"#,
                r#"sw00utt/sw_0001_4325.utt,4325,4325,1,qw,A,1,2,"{D So, }",,,"#,
                r#"sw00utt/sw_0001_4325.utt,4325,4325,2,sd^e,B,2,1,"<Laughter> [ I, + I ] think -- /",,,"#,
            ],
        );

        let transcript = read_transcript(&path, &TagNormalizer::new(TagScheme::Damsl)).unwrap();
        assert_eq!(transcript.conversation_id, "4325");
        let tags: Vec<&str> = transcript.utterances().map(|u| u.act_tag.as_str()).collect();
        assert_eq!(tags, vec!["fo_o_fw_\"_by_bc", "qw", "sd"]);
        assert_eq!(transcript.utterances[1].text, "{D So, }");
        assert_eq!(transcript.utterances[2].speaker, "B");
    }

    #[test]
    fn raw_scheme_keeps_annotated_tags() {
        let dir = tempdir().expect("tempdir");
        let path = write_transcript(
            dir.path(),
            "sw_0002_4330.utt.csv",
            &[r#"x,4330,4330,0,sd^e,A,1,1,"hello",,,"#],
        );
        let transcript = read_transcript(&path, &TagNormalizer::new(TagScheme::Raw)).unwrap();
        assert_eq!(transcript.utterances[0].act_tag, "sd^e");
    }

    #[test]
    fn empty_transcript_takes_id_from_file_name() {
        let dir = tempdir().expect("tempdir");
        let path = write_transcript(dir.path(), "sw_0003_4617.utt.csv", &[]);
        let transcript = read_transcript(&path, &TagNormalizer::default()).unwrap();
        assert_eq!(transcript.conversation_id, "4617");
        assert!(transcript.utterances.is_empty());
    }

    #[test]
    fn missing_column_is_fatal() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("sw_0004_4000.utt.csv");
        fs::write(&path, "conversation_no,caller,text\n4000,A,hi\n").unwrap();

        let err = read_transcript(&path, &TagNormalizer::default()).unwrap_err();
        assert!(err.to_string().contains("malformed utterance row 1"));
    }

    #[test]
    fn conversation_id_with_path_separators_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = write_transcript(
            dir.path(),
            "sw_0005_5000.utt.csv",
            &[r#"x,../escaped,5000,0,sd,A,1,1,"hi",,,"#],
        );

        let err = read_transcript(&path, &TagNormalizer::default()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid conversation id \"../escaped\""));
    }

    #[test]
    fn discovers_transcripts_sorted_and_skips_other_files() {
        let dir = tempdir().expect("tempdir");
        write_transcript(dir.path(), "swda/sw01utt/sw_0101_2000.utt.csv", &[]);
        write_transcript(dir.path(), "swda/sw00utt/sw_0001_1000.utt.csv", &[]);
        fs::write(dir.path().join("swda/swda-metadata.csv"), "a,b\n").unwrap();

        let reader = CorpusReader::new(dir.path(), TagScheme::Damsl).unwrap();
        assert_eq!(reader.len(), 2);
        let ids: Vec<String> = reader
            .iter_transcripts()
            .map(|t| t.unwrap().conversation_id)
            .collect();
        assert_eq!(ids, vec!["1000", "2000"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().expect("tempdir");
        assert!(CorpusReader::new(&dir.path().join("nope"), TagScheme::Raw).is_err());
    }

    #[test]
    fn id_from_path_requires_numbered_name() {
        assert_eq!(
            conversation_id_from_path(Path::new("sw_0001_4325.utt.csv")).as_deref(),
            Some("4325")
        );
        assert_eq!(conversation_id_from_path(Path::new("plain.utt.csv")), None);
        assert_eq!(conversation_id_from_path(Path::new("notes.txt")), None);
    }
}
