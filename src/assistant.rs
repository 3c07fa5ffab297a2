/*!
 * Itinerary-aware chat assistant.
 *
 * Renders the schedule into a plain-text summary, wraps it in the tour-guide
 * system prompt and forwards the user's message to the completion provider.
 */

use anyhow::Result;
use log::warn;

use crate::errors::TranslationError;
use crate::store::Repository;
use crate::store::models::ScheduleSummary;
use crate::translation::TranslationService;
use crate::translation::prompts;

/// Chat assistant over the trip itinerary
pub struct Assistant {
    service: TranslationService,
    repository: Repository,
}

impl Assistant {
    /// Create a new assistant
    pub fn new(service: TranslationService, repository: Repository) -> Self {
        Self {
            service,
            repository,
        }
    }

    /// Answer a user message with the itinerary as context.
    ///
    /// A failed itinerary fetch degrades to an empty-context reply; only a
    /// blank message or a provider failure is an error.
    pub async fn reply(&self, message: &str) -> Result<String, TranslationError> {
        if message.trim().is_empty() {
            return Err(TranslationError::EmptyTitle);
        }

        let summary = match self.repository.fetch_schedule_summaries().await {
            Ok(rows) => render_summary(&rows),
            Err(e) => {
                warn!("Chat: itinerary fetch failed, replying without context: {}", e);
                String::new()
            }
        };

        let prompt = prompts::build_chat_prompt(&summary, message);
        self.service.complete_raw(&prompt).await
    }
}

/// Render schedule rows into one summary line per entry
fn render_summary(rows: &[ScheduleSummary]) -> String {
    rows.iter()
        .map(|row| {
            let day = row
                .day_number
                .map(|d| d.to_string())
                .unwrap_or_else(|| "?".to_string());
            let date = row
                .date
                .as_deref()
                .map(|d| format!(" ({})", d))
                .unwrap_or_default();
            let time = row.start_time.as_deref().unwrap_or("");
            let end_time = row
                .end_time
                .as_deref()
                .map(|t| format!(" - {}", t))
                .unwrap_or_default();
            let title = row
                .title_vi
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .or(row.title.as_deref())
                .unwrap_or("");
            let desc = row
                .description_vi
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .or(row.description.as_deref())
                .filter(|d| !d.trim().is_empty())
                .map(|d| format!(": {}", d))
                .unwrap_or_default();
            let location = row
                .location
                .as_deref()
                .map(|l| format!(" @ {}", l))
                .unwrap_or_default();
            let category = row
                .category
                .as_deref()
                .map(|c| format!(" [{}]", c))
                .unwrap_or_default();
            let owner = row
                .owner
                .as_deref()
                .map(|o| format!(" ({})", o))
                .unwrap_or_default();

            format!(
                "Day {}{}: {}{} - {}{}{}{}{}",
                day, date, time, end_time, title, desc, location, category, owner
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
