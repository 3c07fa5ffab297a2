/*!
 * Data models for the record store.
 *
 * The translation pipeline is configuration-driven: `RecordKind` names the
 * table and its secondary text column, and `FieldPlan` derives the concrete
 * source/target column names for a language pair. Records travel through the
 * pipeline as a generic column map so one runner serves all three kinds.
 */

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Language codes for which parallel columns exist on every table
pub const TRANSLATION_LANGUAGES: [&str; 3] = ["vi", "en", "zh"];

/// The three translatable record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Trip schedule entry (itinerary table)
    Schedule,
    /// Team task (tasks table)
    Task,
    /// Info note (info_cards table)
    Note,
}

impl RecordKind {
    /// All kinds in batch-processing order
    pub fn all() -> [RecordKind; 3] {
        [RecordKind::Schedule, RecordKind::Task, RecordKind::Note]
    }

    /// The backing table name
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::Schedule => "itinerary",
            RecordKind::Task => "tasks",
            RecordKind::Note => "info_cards",
        }
    }

    /// The secondary text column for this kind
    pub fn secondary_column(&self) -> &'static str {
        match self {
            RecordKind::Schedule | RecordKind::Task => "description",
            RecordKind::Note => "content",
        }
    }

    /// All text columns carrying translatable content, base plus per-language
    pub fn text_columns(&self) -> Vec<String> {
        let mut columns = vec!["title".to_string(), self.secondary_column().to_string()];
        for lang in TRANSLATION_LANGUAGES {
            columns.push(column_name("title", Some(lang)));
            columns.push(column_name(self.secondary_column(), Some(lang)));
        }
        columns
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Schedule => "schedule",
            RecordKind::Task => "task",
            RecordKind::Note => "note",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for RecordKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "schedule" | "itinerary" => Ok(RecordKind::Schedule),
            "task" | "tasks" => Ok(RecordKind::Task),
            "note" | "info" | "info_cards" => Ok(RecordKind::Note),
            other => Err(anyhow!("Unknown record kind: {}", other)),
        }
    }
}

/// Build a column name for a base field and an optional language suffix
pub fn column_name(base: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!("{}_{}", base, lang),
        None => base.to_string(),
    }
}

/// A record as seen by the translation pipeline: an id plus a map of
/// text columns to their (possibly NULL) values.
#[derive(Debug, Clone)]
pub struct TranslatableRecord {
    /// Opaque record id
    pub id: i64,
    /// Text column values, NULL preserved as None
    pub fields: BTreeMap<String, Option<String>>,
}

impl TranslatableRecord {
    /// Get a column value, treating NULL as absent
    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(|v| v.as_deref())
    }

    /// Whether a column holds a non-blank value
    pub fn has_text(&self, column: &str) -> bool {
        self.field(column).is_some_and(|v| !v.trim().is_empty())
    }

    /// Resolve the first non-blank value along a fallback chain of columns
    pub fn resolve<'a>(&'a self, candidates: &[String]) -> Option<&'a str> {
        candidates
            .iter()
            .filter_map(|c| self.field(c))
            .find(|v| !v.trim().is_empty())
    }
}

/// Concrete column mapping for one (kind, source language, target language)
/// combination. This is the data-driven replacement for the per-table jobs
/// of the original system.
#[derive(Debug, Clone)]
pub struct FieldPlan {
    /// Record kind being translated
    pub kind: RecordKind,
    /// Source language code
    pub source_lang: String,
    /// Target language code
    pub target_lang: String,
}

impl FieldPlan {
    /// Create a plan, validating the language pair
    pub fn new(kind: RecordKind, source_lang: &str, target_lang: &str) -> Result<Self> {
        crate::language_utils::validate_language_code(source_lang)?;
        crate::language_utils::validate_language_code(target_lang)?;

        if source_lang.eq_ignore_ascii_case(target_lang) {
            return Err(anyhow!(
                "Source and target language must differ: {}",
                source_lang
            ));
        }

        Ok(Self {
            kind,
            source_lang: source_lang.trim().to_lowercase(),
            target_lang: target_lang.trim().to_lowercase(),
        })
    }

    /// Source title columns, most specific first (language column, then base)
    pub fn source_title_candidates(&self) -> Vec<String> {
        vec![
            column_name("title", Some(&self.source_lang)),
            "title".to_string(),
        ]
    }

    /// Source secondary columns, most specific first
    pub fn source_secondary_candidates(&self) -> Vec<String> {
        let base = self.kind.secondary_column();
        vec![column_name(base, Some(&self.source_lang)), base.to_string()]
    }

    /// Target title column; also the required key in the provider reply
    pub fn target_title_column(&self) -> String {
        column_name("title", Some(&self.target_lang))
    }

    /// Target secondary column; also the optional key in the provider reply
    pub fn target_secondary_column(&self) -> String {
        column_name(self.kind.secondary_column(), Some(&self.target_lang))
    }
}

/// A schedule row shaped for the chat assistant's itinerary summary
#[derive(Debug, Clone)]
pub struct ScheduleSummary {
    pub day_number: Option<i64>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
    pub title: Option<String>,
    pub title_vi: Option<String>,
    pub description: Option<String>,
    pub description_vi: Option<String>,
}
