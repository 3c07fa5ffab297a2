/*!
 * # tripdash - Trip Dashboard Translation Service
 *
 * A Rust backend for a team itinerary-planning dashboard, translating
 * schedule entries, tasks and info notes between languages using a
 * generative-language API.
 *
 * ## Features
 *
 * - Batch translation of records with blank target-language fields
 * - Single-record sync jobs triggered from the dashboard
 * - Ad-hoc phrasebook translation (Vietnamese <-> Korean)
 * - Itinerary-aware chat replies
 * - Defensive parsing of loosely-structured provider output
 * - Fixed inter-request pacing to respect provider rate limits
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `store`: SQLite-backed record store (itinerary, tasks, info_cards)
 * - `translation`: AI-powered translation services:
 *   - `translation::core`: Single-record and free-text translation
 *   - `translation::batch`: Sequential batch processing with pacing
 *   - `translation::response`: Defensive parsing of provider output
 *   - `translation::prompts`: Instruction templates
 * - `providers`: Clients for the completion provider:
 *   - `providers::gemini`: Google Generative Language API client
 *   - `providers::mock`: Scripted provider for tests
 * - `assistant`: Itinerary-aware chat assistant
 * - `server`: Admin HTTP surface (axum)
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod assistant;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod server;
pub mod store;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, TranslationError};
pub use store::{FieldPlan, RecordKind, Repository, TranslatableRecord};
pub use translation::{
    BatchOptions, BatchReport, BatchRunner, SourceFields, TargetFields, TextDirection,
    TranslationService,
};
