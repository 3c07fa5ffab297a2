/*!
 * Record store for the dashboard tables.
 *
 * This module provides SQLite-based persistence for the three translatable
 * record kinds (schedule entries, tasks, info notes), exposing the fetch and
 * partial-update operations the translation pipeline relies on.
 */

// Allow dead code - store types are for library consumers
#![allow(dead_code)]

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{FieldPlan, RecordKind, TranslatableRecord};
pub use repository::Repository;
