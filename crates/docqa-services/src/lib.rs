//! External collaborators of the docqa service.

pub mod answer;

pub use answer::{
    build_grounding_prompt, AnswerEngine, AnswerError, GeminiAnswerEngine, GeminiConfig,
};
