//! Input processing module
//! Handles file detection, text extraction, input management and validation

pub mod file_detector;
pub mod text_extractor;
pub mod manager;
pub mod parser;

pub use manager::InputManager;
pub use parser::{parse_resume_input, ResumeData};
