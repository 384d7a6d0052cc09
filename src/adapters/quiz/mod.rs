//! Quiz answer key adapters.

mod answer_key_source;

pub use answer_key_source::{StaticAnswerKeySource, YamlAnswerKeySource};
