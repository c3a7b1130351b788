//! CompletionClient trait definition

use async_trait::async_trait;
#[allow(unused_imports)]
use tracing::debug;

use super::{CompletionError, ConversationTurn};

/// Stateless completion client - each call is one independent request
///
/// This is the core abstraction for reaching the language model. The
/// assembled message list carries everything the model needs; no
/// conversation state is kept between calls, and each call performs exactly
/// one outbound request - no retries, no streaming. Retry policy, if any,
/// belongs to callers as a cross-cutting concern.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one completion request and return the assistant's raw text
    ///
    /// The text is returned exactly as the model produced it, fence markers
    /// and all - no trimming or parsing happens at this layer. An empty
    /// string is a valid success.
    async fn complete(&self, messages: &[ConversationTurn]) -> Result<String, CompletionError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock completion client for unit tests
    ///
    /// Returns scripted responses in order and records every request it saw.
    pub struct MockCompletionClient {
        responses: Vec<String>,
        call_count: AtomicUsize,
        requests: Mutex<Vec<Vec<ConversationTurn>>>,
    }

    impl MockCompletionClient {
        pub fn new(responses: Vec<String>) -> Self {
            debug!(response_count = %responses.len(), "MockCompletionClient::new: called");
            Self {
                responses,
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Message lists received so far, in call order
        pub fn requests(&self) -> Vec<Vec<ConversationTurn>> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for MockCompletionClient {
        async fn complete(&self, messages: &[ConversationTurn]) -> Result<String, CompletionError> {
            debug!("MockCompletionClient::complete: called");
            self.requests.lock().unwrap().push(messages.to_vec());
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.responses.get(idx).cloned().ok_or_else(|| {
                debug!("MockCompletionClient::complete: no more mock responses");
                CompletionError::MalformedResponse("No more mock responses".to_string())
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_client_returns_responses_in_order() {
            let client = MockCompletionClient::new(vec!["Response 1".to_string(), "Response 2".to_string()]);

            let messages = vec![ConversationTurn::user("Hello")];

            let resp1 = client.complete(&messages).await.unwrap();
            assert_eq!(resp1, "Response 1");

            let resp2 = client.complete(&messages).await.unwrap();
            assert_eq!(resp2, "Response 2");

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.requests().len(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockCompletionClient::new(vec![]);

            let result = client.complete(&[ConversationTurn::user("Hello")]).await;
            assert!(result.is_err());
        }
    }
}
