//! Keyword extraction from free-form language-model output.
//!
//! Models answer a "give me the key terms" prompt in several shapes: a bare
//! JSON array, a JSON array inside a fenced code block, or a plain list.
//! [`extract`] accepts all of them and never fails; an unusable answer
//! simply yields an empty [`Keywords`].

mod extract;
mod prompt;

pub use extract::{Extraction, KeywordSource, extract, extract_with_source};
pub use prompt::{
    ChatCompletion, ChatMessage, KeywordRequest, Role, extract_from_response, keyword_prompt,
};

pub use mindscribe_shared::Keywords;
