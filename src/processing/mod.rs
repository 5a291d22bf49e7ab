//! Resume scoring and the generation pipeline

pub mod generator;
pub mod heuristic;
pub mod keywords;
pub mod matching;
pub mod ranking;
pub mod similarity;
pub mod structure;
pub mod text_processor;

pub use generator::{GenerateOptions, ResumeGenerator};
pub use ranking::{RankingResult, RankingService};
