use crate::filter::FilterRules;
use swda_types::{Dialogue, TranscriptRecord, Utterance};

/// Build the filtered dialogue for one transcript.
///
/// Utterances whose tag is excluded are dropped whole; every other utterance
/// keeps its position relative to the others and has its text cleaned. An
/// utterance whose cleaned text is empty is still kept, since only the tag
/// decides exclusion.
pub fn build_dialogue(transcript: &TranscriptRecord, rules: &FilterRules) -> Dialogue {
    let utterances = transcript
        .utterances()
        .filter(|raw| !rules.is_excluded_tag(&raw.act_tag))
        .map(|raw| Utterance {
            speaker: raw.speaker.clone(),
            dialogue_act_tag: raw.act_tag.clone(),
            text: rules.clean_text(&raw.text),
        })
        .collect();

    Dialogue {
        conversation_id: transcript.conversation_id.clone(),
        utterances,
    }
}
