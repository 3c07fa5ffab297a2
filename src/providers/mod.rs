/*!
 * Provider implementations for the completion service.
 *
 * This module contains the client used to reach the generative-language API:
 * - Gemini: Google Generative Language API integration
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;

use crate::errors::ProviderError;

/// Common trait for completion providers
///
/// The pipeline treats the provider as an opaque prompt -> text function;
/// everything about transport, authentication and response shape stays
/// behind this trait.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &str;

    /// Complete a prompt and return the raw response text
    ///
    /// # Arguments
    /// * `prompt` - The full prompt to send
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The response text or an error
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.complete("Reply with OK.").await.map(|_| ())
    }
}

pub mod gemini;
pub mod mock;
