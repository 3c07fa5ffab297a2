/*!
 * Mock provider implementation for testing.
 *
 * The mock records every prompt it receives together with the call instant,
 * which lets tests assert exact call counts and pacing between calls.
 */

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::CompletionProvider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always return the same response text
    Static(String),
    /// Pop scripted results one by one; falls back to the last error once drained
    Scripted,
    /// Always fail with a transport error
    Failing(String),
}

/// A recorded provider call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// When the call started
    pub at: Instant,
    /// The prompt that was sent
    pub prompt: String,
}

/// Mock provider for testing pipeline behavior
pub struct MockProvider {
    behavior: MockBehavior,
    scripted: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockProvider {
    /// Create a mock that always returns `text`
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Static(text.into()),
            scripted: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns `value` serialized as JSON
    pub fn returning_json(value: &serde_json::Value) -> Self {
        Self::returning(value.to_string())
    }

    /// Create a mock that replays the given results in order.
    ///
    /// `Ok` entries become response text; `Err` entries become transport
    /// failures. Draining the script is a test bug and fails the call.
    pub fn scripted(results: Vec<Result<String, String>>) -> Self {
        Self {
            behavior: MockBehavior::Scripted,
            scripted: Mutex::new(results.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always fails with a transport error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Failing(message.into()),
            scripted: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Snapshot of the recorded calls
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(RecordedCall {
            at: Instant::now(),
            prompt: prompt.to_string(),
        });

        match &self.behavior {
            MockBehavior::Static(text) => Ok(text.clone()),
            MockBehavior::Failing(message) => {
                Err(ProviderError::RequestFailed(message.clone()))
            }
            MockBehavior::Scripted => {
                let next = self.scripted.lock().unwrap().pop_front();
                match next {
                    Some(Ok(text)) => Ok(text),
                    Some(Err(message)) => Err(ProviderError::RequestFailed(message)),
                    None => Err(ProviderError::RequestFailed(
                        "mock script exhausted".to_string(),
                    )),
                }
            }
        }
    }
}
