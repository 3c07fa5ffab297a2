/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, responsible for
 * turning one record (or one free-form text) into its translated form via a
 * single provider call. Persistence is the caller's job.
 */

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use log::debug;

use crate::app_config::Config;
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::providers::CompletionProvider;
use crate::providers::gemini::Gemini;
use crate::store::FieldPlan;

use super::prompts;
use super::response::{self, TargetFields, strip_code_fences};

/// Source text bundle for one translation job
#[derive(Debug, Clone)]
pub struct SourceFields {
    /// Primary title text (required, non-blank)
    pub title: String,
    /// Secondary text (description or content), best-effort
    pub secondary: Option<String>,
}

impl SourceFields {
    /// Create a bundle, normalizing blank secondary text to None
    pub fn new(title: impl Into<String>, secondary: Option<String>) -> Self {
        Self {
            title: title.into(),
            secondary: secondary.filter(|s| !s.trim().is_empty()),
        }
    }
}

/// Direction for ad-hoc text translation (the tourist phrasebook widget)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    /// Vietnamese to Korean
    ViToKo,
    /// Korean to Vietnamese
    KoToVi,
}

impl TextDirection {
    /// (source code, target code) for this direction
    pub fn language_pair(&self) -> (&'static str, &'static str) {
        match self {
            TextDirection::ViToKo => ("vi", "ko"),
            TextDirection::KoToVi => ("ko", "vi"),
        }
    }
}

impl FromStr for TextDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "vi2ko" => Ok(TextDirection::ViToKo),
            "ko2vi" => Ok(TextDirection::KoToVi),
            other => Err(anyhow!(
                "Direction must be 'vi2ko' or 'ko2vi', got '{}'",
                other
            )),
        }
    }
}

/// Main translation service
pub struct TranslationService {
    /// Completion provider
    provider: Arc<dyn CompletionProvider>,
}

impl TranslationService {
    /// Create a service over an existing provider
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Create a service from the application config.
    ///
    /// Resolving the API key here makes the missing-credential case a
    /// precondition failure, reported once before any record is touched.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let api_key = config.provider.resolve_api_key()?;
        let provider = Gemini::new(
            api_key,
            config.provider.endpoint.clone(),
            config.provider.model.clone(),
            config.provider.timeout_secs,
        );
        Ok(Self::new(Arc::new(provider)))
    }

    /// The provider behind this service
    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.provider
    }

    /// Translate one record's source fields per the given field plan.
    ///
    /// Exactly one provider call; no retry. The returned fields are trimmed
    /// and validated, ready for the record sink.
    pub async fn translate_record(
        &self,
        plan: &FieldPlan,
        source: &SourceFields,
    ) -> Result<TargetFields, TranslationError> {
        if source.title.trim().is_empty() {
            return Err(TranslationError::EmptyTitle);
        }

        let source_name = language_utils::prompt_language_name(&plan.source_lang)
            .unwrap_or_else(|_| plan.source_lang.clone());
        let target_name = language_utils::prompt_language_name(&plan.target_lang)
            .unwrap_or_else(|_| plan.target_lang.clone());

        let prompt = prompts::build_record_prompt(plan, source, &source_name, &target_name);
        debug!(
            "Requesting {} -> {} translation from {} for a {} record",
            plan.source_lang,
            plan.target_lang,
            self.provider.name(),
            plan.kind
        );

        let raw = self.provider.complete(&prompt).await?;

        response::parse_target_fields(&raw, plan)
    }

    /// Translate a free-form text in the given direction.
    ///
    /// Returns the trimmed translation with any stray code fences removed.
    pub async fn translate_text(
        &self,
        text: &str,
        direction: TextDirection,
    ) -> Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Err(TranslationError::EmptyTitle);
        }

        let (source_code, target_code) = direction.language_pair();
        let source_name = language_utils::prompt_language_name(source_code)
            .unwrap_or_else(|_| source_code.to_string());
        let target_name = language_utils::prompt_language_name(target_code)
            .unwrap_or_else(|_| target_code.to_string());

        let prompt = prompts::build_text_prompt(
            text.trim(),
            &source_name,
            &target_name,
            direction == TextDirection::ViToKo,
        );

        let raw = self.provider.complete(&prompt).await?;
        Ok(strip_code_fences(&raw))
    }

    /// Send an already-built prompt and return the raw reply (chat surface)
    pub async fn complete_raw(&self, prompt: &str) -> Result<String, TranslationError> {
        Ok(self.provider.complete(prompt).await?)
    }
}
