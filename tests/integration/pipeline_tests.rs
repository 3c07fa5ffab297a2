/*!
 * End-to-end batch pipeline tests against an in-memory record store and a
 * scripted provider.
 */

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use tripdash::errors::ProviderError;
use tripdash::providers::CompletionProvider;
use tripdash::providers::mock::MockProvider;
use tripdash::store::{FieldPlan, RecordKind, Repository};
use tripdash::translation::{BatchOptions, BatchRunner, TranslationService};

use crate::common::{init_test_logging, seed_record, test_repository, zh_reply};

fn fast_options() -> BatchOptions {
    BatchOptions {
        inter_item_delay: Duration::from_millis(1),
        force: false,
    }
}

fn runner_with(mock: Arc<MockProvider>, repository: Repository) -> BatchRunner {
    BatchRunner::new(
        TranslationService::new(mock),
        repository,
        fast_options(),
    )
}

fn vi_to_zh(kind: RecordKind) -> FieldPlan {
    FieldPlan::new(kind, "vi", "zh").expect("Failed to build plan")
}

#[tokio::test]
async fn test_endToEnd_withOneBlankAndOneFilledTarget_shouldOnlyTranslateBlank() {
    init_test_logging();
    let repository = test_repository();
    let blank_id = seed_record(&repository, RecordKind::Schedule, "Xin chào", None).await;
    let filled_id =
        seed_record(&repository, RecordKind::Schedule, "Cảm ơn", Some("謝謝")).await;

    let mock = Arc::new(MockProvider::returning(zh_reply("你好", None)));
    let runner = runner_with(mock.clone(), repository.clone());

    let report = runner
        .run_batch(&vi_to_zh(RecordKind::Schedule))
        .await
        .expect("Batch failed");

    assert_eq!(report.processed, 1);
    assert_eq!(report.updated, 1);
    assert!(report.errors.is_empty());
    assert_eq!(mock.call_count(), 1);

    let blank = repository
        .fetch_one(RecordKind::Schedule, blank_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(blank.field("title_zh"), Some("你好"));

    // The already-translated record is untouched
    let filled = repository
        .fetch_one(RecordKind::Schedule, filled_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(filled.field("title_zh"), Some("謝謝"));
}

#[tokio::test]
async fn test_runBatch_twiceInSuccession_shouldBeIdempotent() {
    let repository = test_repository();
    seed_record(&repository, RecordKind::Task, "Đặt vé máy bay", None).await;
    seed_record(&repository, RecordKind::Task, "Đổi tiền", None).await;

    let mock = Arc::new(MockProvider::returning(zh_reply("訂機票", None)));
    let runner = runner_with(mock.clone(), repository.clone());
    let plan = vi_to_zh(RecordKind::Task);

    let first = runner.run_batch(&plan).await.expect("First run failed");
    assert_eq!(first.updated, 2);
    assert_eq!(mock.call_count(), 2);

    // All targets are now filled; the second run must find nothing to do.
    let second = runner.run_batch(&plan).await.expect("Second run failed");
    assert_eq!(second.processed, 0);
    assert_eq!(second.updated, 0);
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_runBatch_withFailingRecord_shouldContinueWithRemaining() {
    let repository = test_repository();
    let failing_id = seed_record(&repository, RecordKind::Note, "Ga tàu", None).await;
    let ok_id = seed_record(&repository, RecordKind::Note, "Sân bay", None).await;

    let mock = Arc::new(MockProvider::scripted(vec![
        Err("simulated transport failure".to_string()),
        Ok(r#"{"title_zh":"機場"}"#.to_string()),
    ]));
    let runner = runner_with(mock.clone(), repository.clone());

    let report = runner
        .run_batch(&vi_to_zh(RecordKind::Note))
        .await
        .expect("Batch failed");

    assert_eq!(report.processed, 2);
    assert_eq!(report.updated, 1);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors.contains_key(&failing_id));
    assert!(report.errors[&failing_id].contains("simulated transport failure"));

    let ok_record = repository
        .fetch_one(RecordKind::Note, ok_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ok_record.field("title_zh"), Some("機場"));
}

#[tokio::test]
async fn test_runBatch_withIncompleteReply_shouldRecordErrorUnderRecordId() {
    let repository = test_repository();
    let incomplete_id = seed_record(&repository, RecordKind::Schedule, "Xin chào", None).await;
    seed_record(&repository, RecordKind::Schedule, "Tạm biệt", None).await;

    let mock = Arc::new(MockProvider::scripted(vec![
        // Missing the required title key
        Ok(r#"{"description_zh":"首爾"}"#.to_string()),
        Ok(zh_reply("再見", None)),
    ]));
    let runner = runner_with(mock.clone(), repository.clone());

    let report = runner
        .run_batch(&vi_to_zh(RecordKind::Schedule))
        .await
        .expect("Batch failed");

    assert_eq!(report.processed, 2);
    assert_eq!(report.updated, 1);
    assert!(report.errors[&incomplete_id].contains("title_zh"));

    // The failed record keeps a blank target and stays a candidate
    let failed = repository
        .fetch_one(RecordKind::Schedule, incomplete_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(failed.field("title_zh"), None);
}

#[tokio::test]
async fn test_runBatch_shouldCallProviderOncePerRecordWithPacing() {
    let repository = test_repository();
    for title in ["Một", "Hai", "Ba"] {
        seed_record(&repository, RecordKind::Task, title, None).await;
    }

    let delay = Duration::from_millis(50);
    let mock = Arc::new(MockProvider::returning(zh_reply("一", None)));
    let runner = BatchRunner::new(
        TranslationService::new(mock.clone()),
        repository,
        BatchOptions {
            inter_item_delay: delay,
            force: false,
        },
    );

    let report = runner
        .run_batch(&vi_to_zh(RecordKind::Task))
        .await
        .expect("Batch failed");

    assert_eq!(report.processed, 3);

    // Exactly one provider call per eligible record
    let calls = mock.calls();
    assert_eq!(calls.len(), 3);

    // At least the configured delay between the starts of consecutive calls
    for pair in calls.windows(2) {
        let elapsed = pair[1].at.duration_since(pair[0].at);
        assert!(
            elapsed >= delay,
            "Calls only {:?} apart, expected at least {:?}",
            elapsed,
            delay
        );
    }
}

/// Provider that reports a missing credential on every call
struct UnconfiguredProvider;

#[async_trait]
impl CompletionProvider for UnconfiguredProvider {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::MissingApiKey("GOOGLE_API_KEY".to_string()))
    }
}

#[tokio::test]
async fn test_runBatch_withMissingCredential_shouldAbortInsteadOfLoopingRecords() {
    let repository = test_repository();
    seed_record(&repository, RecordKind::Task, "Một", None).await;
    seed_record(&repository, RecordKind::Task, "Hai", None).await;

    let runner = BatchRunner::new(
        TranslationService::new(Arc::new(UnconfiguredProvider)),
        repository.clone(),
        fast_options(),
    );

    let result = runner.run_batch(&vi_to_zh(RecordKind::Task)).await;
    assert!(result.is_err());

    // Nothing was written
    let records = repository.fetch_all(RecordKind::Task).await.unwrap();
    assert!(records.iter().all(|r| r.field("title_zh").is_none()));
}

/// Provider that deletes the record it is translating before replying,
/// forcing the subsequent sink update to fail
struct SabotageProvider {
    repository: Repository,
    victim_id: i64,
}

#[async_trait]
impl CompletionProvider for SabotageProvider {
    fn name(&self) -> &str {
        "sabotage"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.repository
            .database()
            .execute(|conn| {
                conn.execute("DELETE FROM tasks WHERE id = ?1", [self.victim_id])?;
                Ok(())
            })
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        Ok(r#"{"title_zh":"孤兒"}"#.to_string())
    }
}

#[tokio::test]
async fn test_runBatch_withSinkFailure_shouldRecordErrorAndContinue() {
    let repository = test_repository();
    let victim_id = seed_record(&repository, RecordKind::Task, "Một", None).await;

    let runner = BatchRunner::new(
        TranslationService::new(Arc::new(SabotageProvider {
            repository: repository.clone(),
            victim_id,
        })),
        repository.clone(),
        fast_options(),
    );

    let report = runner
        .run_batch(&vi_to_zh(RecordKind::Task))
        .await
        .expect("Batch failed");

    assert_eq!(report.processed, 1);
    assert_eq!(report.updated, 0);
    assert!(report.errors[&victim_id].contains("Update failed"));
}

#[tokio::test]
async fn test_runBatch_reverseDirection_shouldFallBackToBaseColumns() {
    let repository = test_repository();
    // A record whose base columns hold Chinese text and whose Vietnamese
    // target is blank (the reverse-direction job)
    let id = seed_record(&repository, RecordKind::Schedule, "景福宮", None).await;

    let mock = Arc::new(MockProvider::returning(
        r#"{"title_vi":"Cung Gyeongbok"}"#,
    ));
    let runner = runner_with(mock.clone(), repository.clone());

    let plan = FieldPlan::new(RecordKind::Schedule, "zh", "vi").expect("Failed to build plan");
    let report = runner.run_batch(&plan).await.expect("Batch failed");

    assert_eq!(report.updated, 1);
    let record = repository
        .fetch_one(RecordKind::Schedule, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.field("title_vi"), Some("Cung Gyeongbok"));

    // The prompt used the base title as source text
    assert!(mock.calls()[0].prompt.contains("景福宮"));
}

#[tokio::test]
async fn test_runAllKinds_shouldCoverEveryTable() {
    let repository = test_repository();
    seed_record(&repository, RecordKind::Schedule, "Xin chào", None).await;
    seed_record(&repository, RecordKind::Task, "Đặt vé", None).await;
    seed_record(&repository, RecordKind::Note, "Ga tàu", None).await;

    let mock = Arc::new(MockProvider::returning(zh_reply("一", None)));
    let runner = runner_with(mock.clone(), repository.clone());

    let report = runner
        .run_all_kinds("vi", "zh")
        .await
        .expect("Batch failed");

    assert_eq!(report.total_processed(), 3);
    assert_eq!(report.total_updated(), 3);
    assert_eq!(report.total_errors(), 0);
    assert_eq!(report.itinerary.updated, 1);
    assert_eq!(report.tasks.updated, 1);
    assert_eq!(report.info_cards.updated, 1);
}

#[tokio::test]
async fn test_translateRecordAndUpdate_secondaryIsBestEffort() {
    // A reply without the optional secondary key still updates the title
    let repository = test_repository();
    let mut values = BTreeMap::new();
    values.insert("title".to_string(), "Xin chào".to_string());
    values.insert("description".to_string(), "Chào buổi sáng".to_string());
    let id = repository
        .insert(RecordKind::Schedule, &values)
        .await
        .unwrap();

    let mock = Arc::new(MockProvider::returning(zh_reply("你好", None)));
    let runner = runner_with(mock.clone(), repository.clone());

    let report = runner
        .run_batch(&vi_to_zh(RecordKind::Schedule))
        .await
        .expect("Batch failed");
    assert_eq!(report.updated, 1);

    let record = repository
        .fetch_one(RecordKind::Schedule, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.field("title_zh"), Some("你好"));
    assert_eq!(record.field("description_zh"), None);

    // The prompt still carried the secondary source text
    assert!(mock.calls()[0].prompt.contains("Chào buổi sáng"));
}
