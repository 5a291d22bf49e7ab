//! Generative text expansion for resume prose

pub mod enhancer;
pub mod expander;
pub mod prompts;

pub use enhancer::{EnhancementSummary, ResumeEnhancer};
pub use expander::{HuggingFaceExpander, TextExpander};
