/*!
 * Common test utilities shared across the test suite.
 */

#![allow(dead_code)]

use std::collections::BTreeMap;

use tripdash::store::{RecordKind, Repository};

/// Initialize logging for tests that want to inspect pipeline output
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create an in-memory repository for tests
pub fn test_repository() -> Repository {
    Repository::new_in_memory().expect("Failed to create in-memory repository")
}

/// Insert a record with a source title and optional pre-filled Chinese title.
/// Returns the new record id.
pub async fn seed_record(
    repository: &Repository,
    kind: RecordKind,
    title: &str,
    title_zh: Option<&str>,
) -> i64 {
    let mut values = BTreeMap::new();
    values.insert("title".to_string(), title.to_string());
    if let Some(title_zh) = title_zh {
        values.insert("title_zh".to_string(), title_zh.to_string());
    }

    repository
        .insert(kind, &values)
        .await
        .expect("Failed to seed record")
}

/// Provider reply carrying a translated title (and optional description)
pub fn zh_reply(title: &str, description: Option<&str>) -> String {
    match description {
        Some(description) => format!(
            r#"{{"title_zh":"{}","description_zh":"{}"}}"#,
            title, description
        ),
        None => format!(r#"{{"title_zh":"{}"}}"#, title),
    }
}
