/*!
 * Batch translation processing.
 *
 * One parameterized runner replaces the per-table jobs of the original
 * dashboard: records whose target title column is blank are translated
 * strictly sequentially, with a fixed delay between provider calls to stay
 * under the provider's request-rate ceiling. A single record's failure is
 * recorded and never aborts the batch.
 */

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::store::{FieldPlan, RecordKind, Repository};

use super::core::{SourceFields, TranslationService};

/// Options controlling one batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Delay between the starts of consecutive provider calls
    pub inter_item_delay: Duration,

    /// Re-translate records whose target title is already filled
    pub force: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            inter_item_delay: Duration::from_millis(500),
            force: false,
        }
    }
}

/// Summary of one batch run over one record kind
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Identifier of this run, for correlating log lines
    pub run_id: String,

    /// Records that passed the eligibility filter and were attempted
    pub processed: usize,

    /// Records whose translated fields were written back
    pub updated: usize,

    /// Per-record failure messages, keyed by record id
    pub errors: BTreeMap<i64, String>,
}

impl BatchReport {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            processed: 0,
            updated: 0,
            errors: BTreeMap::new(),
        }
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        format!(
            "processed {}, updated {}, {} error(s)",
            self.processed,
            self.updated,
            self.errors.len()
        )
    }
}

/// Combined report for an all-kinds run, keyed the way the dashboard
/// admin panel displays it
#[derive(Debug, Clone, Serialize)]
pub struct MultiKindReport {
    pub itinerary: BatchReport,
    pub tasks: BatchReport,
    pub info_cards: BatchReport,
}

impl MultiKindReport {
    /// Total records attempted across all kinds
    pub fn total_processed(&self) -> usize {
        self.itinerary.processed + self.tasks.processed + self.info_cards.processed
    }

    /// Total records updated across all kinds
    pub fn total_updated(&self) -> usize {
        self.itinerary.updated + self.tasks.updated + self.info_cards.updated
    }

    /// Total per-record errors across all kinds
    pub fn total_errors(&self) -> usize {
        self.itinerary.errors.len() + self.tasks.errors.len() + self.info_cards.errors.len()
    }
}

/// Batch runner for translating records of one kind at a time
pub struct BatchRunner {
    /// The translation service to use
    service: TranslationService,

    /// Record source and sink
    repository: Repository,

    /// Pacing and filter options
    options: BatchOptions,
}

impl BatchRunner {
    /// Create a new batch runner
    pub fn new(service: TranslationService, repository: Repository, options: BatchOptions) -> Self {
        Self {
            service,
            repository,
            options,
        }
    }

    /// Run a batch over one record kind
    pub async fn run_batch(&self, plan: &FieldPlan) -> Result<BatchReport> {
        self.run_batch_with_progress(plan, |_, _| {}).await
    }

    /// Run a batch over one record kind, reporting progress after each record
    pub async fn run_batch_with_progress(
        &self,
        plan: &FieldPlan,
        progress_callback: impl Fn(usize, usize),
    ) -> Result<BatchReport> {
        // A fetch failure here is batch-fatal; nothing has been attempted yet.
        let records = self
            .repository
            .fetch_all(plan.kind)
            .await
            .with_context(|| format!("Failed to fetch {} records", plan.kind))?;

        let title_candidates = plan.source_title_candidates();
        let secondary_candidates = plan.source_secondary_candidates();
        let target_title = plan.target_title_column();

        // Eligibility: blank target title (unless forced) and a non-blank
        // source title somewhere along the fallback chain. Records failing
        // the filter are skipped silently, not counted as errors.
        let candidates: Vec<(i64, SourceFields)> = records
            .iter()
            .filter(|record| self.options.force || !record.has_text(&target_title))
            .filter_map(|record| {
                let title = record.resolve(&title_candidates)?;
                let secondary = record
                    .resolve(&secondary_candidates)
                    .map(|s| s.to_string());
                Some((record.id, SourceFields::new(title, secondary)))
            })
            .collect();

        let mut report = BatchReport::new();
        let total = candidates.len();

        info!(
            "[batch {}] {} -> {}: {} of {} {} record(s) need translation",
            report.run_id,
            plan.source_lang,
            plan.target_lang,
            total,
            records.len(),
            plan.kind
        );

        for (index, (id, source)) in candidates.into_iter().enumerate() {
            // Fixed pacing between provider calls; never before the first,
            // never after the last.
            if index > 0 {
                tokio::time::sleep(self.options.inter_item_delay).await;
            }

            report.processed += 1;

            match self.service.translate_record(plan, &source).await {
                Ok(target) => {
                    let updates = target.into_updates(plan);
                    match self.repository.update_fields(plan.kind, id, &updates).await {
                        Ok(()) => {
                            report.updated += 1;
                        }
                        Err(e) => {
                            warn!("[batch {}] record {}: update failed: {}", report.run_id, id, e);
                            report.errors.insert(id, format!("Update failed: {}", e));
                        }
                    }
                }
                Err(e) if e.is_recoverable() => {
                    warn!("[batch {}] record {}: {}", report.run_id, id, e);
                    report.errors.insert(id, e.to_string());
                }
                Err(e) => {
                    // Missing credential is a precondition failure; abort
                    // instead of burning through every record.
                    return Err(anyhow!(e)).context("Batch aborted");
                }
            }

            progress_callback(index + 1, total);
        }

        info!("[batch {}] done: {}", report.run_id, report.summary());
        Ok(report)
    }

    /// Run batches over all record kinds in order (schedule, task, note)
    pub async fn run_all_kinds(
        &self,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<MultiKindReport> {
        let mut reports: Vec<BatchReport> = Vec::with_capacity(3);

        for kind in RecordKind::all() {
            let plan = FieldPlan::new(kind, source_lang, target_lang)?;
            reports.push(self.run_batch(&plan).await?);
        }

        let mut reports = reports.into_iter();
        Ok(MultiKindReport {
            itinerary: reports.next().expect("schedule report"),
            tasks: reports.next().expect("task report"),
            info_cards: reports.next().expect("note report"),
        })
    }
}
