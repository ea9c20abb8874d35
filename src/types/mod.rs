//! Request and response types for the ask flow.

mod answer;
mod ask;

pub use answer::{CachedAnswer, GeneratedText};
pub use ask::{AskMode, AskRequest, AskResponse};
