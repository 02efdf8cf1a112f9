use serde::{Deserialize, Serialize};

/// One utterance as read from the corpus, before any filtering.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RawUtterance {
    pub speaker: String,
    pub act_tag: String,
    pub text: String,
}

/// The full raw record of one conversation.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TranscriptRecord {
    pub conversation_id: String,
    pub utterances: Vec<RawUtterance>,
}

impl TranscriptRecord {
    pub fn new(conversation_id: impl Into<String>, utterances: Vec<RawUtterance>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            utterances,
        }
    }

    /// Raw utterances in transcript order.
    pub fn utterances(&self) -> impl Iterator<Item = &RawUtterance> {
        self.utterances.iter()
    }
}

/// A retained utterance: tag not excluded, text already cleaned.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub speaker: String,
    pub dialogue_act_tag: String,
    pub text: String,
}

impl Utterance {
    pub fn new(
        speaker: impl Into<String>,
        dialogue_act_tag: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            speaker: speaker.into(),
            dialogue_act_tag: dialogue_act_tag.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Dialogue {
    pub conversation_id: String,
    pub utterances: Vec<Utterance>,
}

impl Dialogue {
    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }
}
