pub mod archive;
pub mod config;
pub mod dialogue;
pub mod filter;
pub mod layout;
pub mod pipeline;
pub mod reader;
pub mod sink;
pub mod splits;
pub mod tags;

pub use swda_types::{Dialogue, RawUtterance, TranscriptRecord, Utterance};
