//! Hosted assistant API seam and the transient-run helper
//!
//! Structured generation creates a short-lived assistant and thread per
//! call. `AssistantRunner::run_transient` owns both for the duration of the
//! call and deletes them on every exit path.

use super::types::{AssistantSpec, ResponseFormat, Run, RunStatus, ThreadMessage};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Assistants, threads and runs of the hosted LLM
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Create an assistant with file search, returning its id
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<String>;

    async fn delete_assistant(&self, assistant_id: &str) -> Result<()>;

    /// Create a thread seeded with `messages`, optionally bound to a store
    async fn create_thread(
        &self,
        messages: &[ThreadMessage],
        vector_store_id: Option<&str>,
    ) -> Result<String>;

    async fn delete_thread(&self, thread_id: &str) -> Result<()>;

    /// Append a user message to a thread
    async fn add_message(&self, thread_id: &str, content: &str) -> Result<()>;

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        response_format: Option<&ResponseFormat>,
    ) -> Result<Run>;

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Text of the newest message on the thread
    async fn latest_message(&self, thread_id: &str) -> Result<Option<String>>;
}

/// Drives runs to completion with bounded polling
#[derive(Clone)]
pub struct AssistantRunner {
    api: Arc<dyn AssistantApi>,
    poll_interval: Duration,
    timeout: Duration,
}

impl AssistantRunner {
    pub fn new(api: Arc<dyn AssistantApi>, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            api,
            poll_interval,
            timeout,
        }
    }

    pub fn api(&self) -> &Arc<dyn AssistantApi> {
        &self.api
    }

    /// Run `prompt` against a fresh assistant built from `spec`.
    ///
    /// The assistant and its thread are deleted whatever the outcome,
    /// including when the returned future is dropped mid-run.
    /// Cleanup failures are logged and never replace the run's result.
    pub async fn run_transient(
        &self,
        spec: &AssistantSpec,
        prompt: &str,
        response_format: Option<&ResponseFormat>,
    ) -> Result<String> {
        let assistant_id = self.api.create_assistant(spec).await?;
        tracing::debug!(assistant_id = %assistant_id, name = %spec.name, "Created transient assistant");
        let guard = CleanupGuard::new(self.api.clone(), Transient::Assistant, assistant_id);

        let outcome = self
            .run_on_fresh_thread(guard.id(), prompt, response_format)
            .await;

        guard.release().await;
        outcome
    }

    /// `run_transient` with the reply parsed as JSON
    pub async fn run_structured<T: DeserializeOwned>(
        &self,
        spec: &AssistantSpec,
        prompt: &str,
        response_format: &ResponseFormat,
    ) -> Result<T> {
        let reply = self
            .run_transient(spec, prompt, Some(response_format))
            .await?;
        parse_json_reply(&reply)
    }

    async fn run_on_fresh_thread(
        &self,
        assistant_id: &str,
        prompt: &str,
        response_format: Option<&ResponseFormat>,
    ) -> Result<String> {
        let thread_id = self
            .api
            .create_thread(&[ThreadMessage::user(prompt)], None)
            .await?;
        let guard = CleanupGuard::new(self.api.clone(), Transient::Thread, thread_id);

        let outcome = self
            .run_on_thread(guard.id(), assistant_id, response_format)
            .await;

        guard.release().await;
        outcome
    }

    /// Delete a thread this runner no longer tracks, logging failures
    pub async fn discard_thread(&self, thread_id: &str) {
        Transient::Thread.delete(self.api.as_ref(), thread_id).await;
    }

    /// Start a run on an existing thread and return the reply text.
    ///
    /// Any terminal status other than `completed` is an error.
    pub async fn run_on_thread(
        &self,
        thread_id: &str,
        assistant_id: &str,
        response_format: Option<&ResponseFormat>,
    ) -> Result<String> {
        let run = self
            .api
            .create_run(thread_id, assistant_id, response_format)
            .await?;
        let run = self.wait_for(thread_id, run).await?;

        if run.status != RunStatus::Completed {
            let detail = run
                .last_error
                .map(|e| format!(": {} ({})", e.message, e.code))
                .unwrap_or_default();
            return Err(Error::ExternalService(format!(
                "run {} ended with status {}{}",
                run.id, run.status, detail
            )));
        }

        self.api
            .latest_message(thread_id)
            .await?
            .ok_or_else(|| Error::ExternalService(format!("run {} produced no reply", run.id)))
    }

    async fn wait_for(&self, thread_id: &str, mut run: Run) -> Result<Run> {
        let deadline = Instant::now() + self.timeout;
        while !run.status.is_terminal() {
            if Instant::now() >= deadline {
                return Err(Error::ExternalService(format!(
                    "run {} did not finish within {}s",
                    run.id,
                    self.timeout.as_secs()
                )));
            }
            tokio::time::sleep(self.poll_interval).await;
            run = self.api.get_run(thread_id, &run.id).await?;
        }
        Ok(run)
    }
}

/// Hosted resource owned by a transient run
#[derive(Debug, Clone, Copy)]
enum Transient {
    Assistant,
    Thread,
}

impl Transient {
    async fn delete(self, api: &dyn AssistantApi, id: &str) {
        let result = match self {
            Self::Assistant => api.delete_assistant(id).await,
            Self::Thread => api.delete_thread(id).await,
        };
        if let Err(e) = result {
            tracing::warn!(id = %id, kind = ?self, error = %e, "Failed to delete transient resource");
        }
    }
}

/// Deletes a transient resource when dropped before `release`.
///
/// The drop-time delete is spawned onto the current runtime.
struct CleanupGuard {
    api: Arc<dyn AssistantApi>,
    kind: Transient,
    id: String,
    armed: bool,
}

impl CleanupGuard {
    fn new(api: Arc<dyn AssistantApi>, kind: Transient, id: String) -> Self {
        Self {
            api,
            kind,
            id,
            armed: true,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    /// Delete inline and disarm
    async fn release(mut self) {
        self.armed = false;
        self.kind.delete(self.api.as_ref(), &self.id).await;
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(id = %self.id, kind = ?self.kind, "No runtime to delete abandoned transient resource");
            return;
        };
        tracing::debug!(id = %self.id, kind = ?self.kind, "Deleting abandoned transient resource");
        let api = self.api.clone();
        let kind = self.kind;
        let id = std::mem::take(&mut self.id);
        handle.spawn(async move { kind.delete(api.as_ref(), &id).await });
    }
}

/// Parse a model reply as JSON, tolerating a surrounding code fence
pub fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T> {
    let trimmed = reply.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(body.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::{MockAssistantApi, MockReply};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Answer {
        value: u32,
    }

    fn runner(api: Arc<MockAssistantApi>) -> AssistantRunner {
        AssistantRunner::new(api, Duration::from_millis(1), Duration::from_secs(5))
    }

    fn spec() -> AssistantSpec {
        AssistantSpec::new("Tester", "Answer tersely.", "test-model").with_vector_store("vs_1")
    }

    fn format() -> ResponseFormat {
        ResponseFormat::json_schema("answer", serde_json::json!({"type": "object"}))
    }

    #[tokio::test]
    async fn test_run_transient_returns_reply_and_cleans_up() {
        let api = Arc::new(MockAssistantApi::with_replies(vec![MockReply::text("hello")]));
        let reply = runner(api.clone())
            .run_transient(&spec(), "hi", None)
            .await
            .unwrap();

        assert_eq!(reply, "hello");
        assert_eq!(api.live_assistants(), 0);
        assert_eq!(api.live_threads(), 0);
        assert_eq!(api.created_assistants()[0].vector_store_id.as_deref(), Some("vs_1"));
    }

    #[tokio::test]
    async fn test_cleanup_after_api_failure() {
        let api = Arc::new(MockAssistantApi::with_replies(vec![MockReply::ApiError]));
        let err = runner(api.clone())
            .run_transient(&spec(), "hi", None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ExternalService(_)));
        assert_eq!(api.created_assistants().len(), 1);
        assert_eq!(api.live_assistants(), 0);
        assert_eq!(api.live_threads(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_after_failed_run() {
        let api = Arc::new(MockAssistantApi::with_replies(vec![MockReply::RunFails]));
        let err = runner(api.clone())
            .run_transient(&spec(), "hi", None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("failed"));
        assert_eq!(api.live_assistants(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_after_parse_failure() {
        let api = Arc::new(MockAssistantApi::with_replies(vec![MockReply::text("not json")]));
        let err = runner(api.clone())
            .run_structured::<Answer>(&spec(), "hi", &format())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(api.live_assistants(), 0);
        assert_eq!(api.live_threads(), 0);
    }

    #[tokio::test]
    async fn test_run_structured_passes_format() {
        let api = Arc::new(MockAssistantApi::with_replies(vec![MockReply::text(
            r#"{"value": 7}"#,
        )]));
        let answer: Answer = runner(api.clone())
            .run_structured(&spec(), "hi", &format())
            .await
            .unwrap();

        assert_eq!(answer, Answer { value: 7 });
        assert_eq!(api.response_formats(), vec![Some("answer".to_string())]);
    }

    #[tokio::test]
    async fn test_cleanup_failure_does_not_mask_reply() {
        let api = Arc::new(
            MockAssistantApi::with_replies(vec![MockReply::text("kept")]).failing_deletes(),
        );
        let reply = runner(api).run_transient(&spec(), "hi", None).await.unwrap();
        assert_eq!(reply, "kept");
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let api = Arc::new(MockAssistantApi::with_replies(vec![MockReply::Stalls]));
        let runner = AssistantRunner::new(
            api.clone(),
            Duration::from_millis(5),
            Duration::from_millis(20),
        );
        let err = runner.run_transient(&spec(), "hi", None).await.unwrap_err();

        assert!(err.to_string().contains("did not finish"));
        assert_eq!(api.live_assistants(), 0);
    }

    #[tokio::test]
    async fn test_dropped_run_still_cleans_up() {
        let api = Arc::new(MockAssistantApi::with_replies(vec![MockReply::Stalls]));
        let runner = runner(api.clone());

        let result = tokio::time::timeout(
            Duration::from_millis(50),
            runner.run_transient(&spec(), "hi", None),
        )
        .await;
        assert!(result.is_err());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(api.created_assistants().len(), 1);
        assert_eq!(api.live_assistants(), 0);
        assert_eq!(api.live_threads(), 0);
    }

    #[test]
    fn test_parse_json_reply_strips_fence() {
        let fenced: Answer = parse_json_reply("```json\n{\"value\": 3}\n```").unwrap();
        assert_eq!(fenced.value, 3);
        let plain: Answer = parse_json_reply(" {\"value\": 4} ").unwrap();
        assert_eq!(plain.value, 4);
        assert!(parse_json_reply::<Answer>("{").is_err());
    }
}
