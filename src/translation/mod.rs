/*!
 * AI-powered translation of dashboard records.
 *
 * - `translation::core`: single-record and free-text translation
 * - `translation::batch`: sequential batch processing with pacing
 * - `translation::prompts`: instruction templates
 * - `translation::response`: defensive parsing of provider output
 */

pub mod batch;
pub mod core;
pub mod prompts;
pub mod response;

// Re-export main types
pub use batch::{BatchOptions, BatchReport, BatchRunner, MultiKindReport};
pub use core::{SourceFields, TextDirection, TranslationService};
pub use response::TargetFields;
