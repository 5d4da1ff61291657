//! In-process doubles for the hosted LLM adapters

use super::assistant::AssistantApi;
use super::image::ImageGenerator;
use super::types::{AssistantSpec, ResponseFormat, Run, RunStatus, ThreadMessage};
use super::vector_store::RetrievalStore;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted outcome for the next run
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Run completes and the thread's newest message is this text
    Text(String),
    /// Run reaches `failed`
    RunFails,
    /// `create_run` itself errors
    ApiError,
    /// Run stays `in_progress` forever
    Stalls,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

#[derive(Default)]
struct MockState {
    assistants: Vec<AssistantSpec>,
    live_assistants: HashSet<String>,
    live_threads: HashSet<String>,
    thread_stores: HashMap<String, Option<String>>,
    thread_messages: HashMap<String, Vec<String>>,
    replies_by_thread: HashMap<String, String>,
    run_outcomes: HashMap<String, MockReply>,
    response_formats: Vec<Option<String>>,
}

/// Records every call and answers runs from a script
#[derive(Default)]
pub struct MockAssistantApi {
    script: Mutex<VecDeque<MockReply>>,
    state: Mutex<MockState>,
    ids: AtomicUsize,
    fail_deletes: bool,
}

impl MockAssistantApi {
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn push_reply(&self, reply: MockReply) {
        self.script.lock().unwrap().push_back(reply);
    }

    pub fn created_assistants(&self) -> Vec<AssistantSpec> {
        self.state.lock().unwrap().assistants.clone()
    }

    pub fn live_assistants(&self) -> usize {
        self.state.lock().unwrap().live_assistants.len()
    }

    pub fn live_threads(&self) -> usize {
        self.state.lock().unwrap().live_threads.len()
    }

    /// Number of threads ever created
    pub fn threads_created(&self) -> usize {
        self.state.lock().unwrap().thread_messages.len()
    }

    /// Schema names passed to each run, in order
    pub fn response_formats(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().response_formats.clone()
    }

    /// Every message posted to any thread, in order of creation
    pub fn prompts(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let mut threads: Vec<_> = state.thread_messages.iter().collect();
        threads.sort_by_key(|(id, _)| id.trim_start_matches("thread_").parse::<usize>().unwrap_or(0));
        threads
            .into_iter()
            .flat_map(|(_, messages)| messages.clone())
            .collect()
    }

    pub fn thread_store(&self, thread_id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .thread_stores
            .get(thread_id)
            .cloned()
            .flatten()
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.ids.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl AssistantApi for MockAssistantApi {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<String> {
        let id = self.next_id("asst");
        let mut state = self.state.lock().unwrap();
        state.assistants.push(spec.clone());
        state.live_assistants.insert(id.clone());
        Ok(id)
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<()> {
        if self.fail_deletes {
            return Err(Error::ExternalService("delete refused".to_string()));
        }
        self.state.lock().unwrap().live_assistants.remove(assistant_id);
        Ok(())
    }

    async fn create_thread(
        &self,
        messages: &[ThreadMessage],
        vector_store_id: Option<&str>,
    ) -> Result<String> {
        let id = self.next_id("thread");
        let mut state = self.state.lock().unwrap();
        state.live_threads.insert(id.clone());
        state
            .thread_stores
            .insert(id.clone(), vector_store_id.map(str::to_string));
        state.thread_messages.insert(
            id.clone(),
            messages.iter().map(|m| m.content.clone()).collect(),
        );
        Ok(id)
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        if self.fail_deletes {
            return Err(Error::ExternalService("delete refused".to_string()));
        }
        self.state.lock().unwrap().live_threads.remove(thread_id);
        Ok(())
    }

    async fn add_message(&self, thread_id: &str, content: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match state.thread_messages.get_mut(thread_id) {
            Some(messages) => {
                messages.push(content.to_string());
                Ok(())
            }
            None => Err(Error::ExternalService(format!("no thread {}", thread_id))),
        }
    }

    async fn create_run(
        &self,
        thread_id: &str,
        _assistant_id: &str,
        response_format: Option<&ResponseFormat>,
    ) -> Result<Run> {
        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockReply::ApiError);
        if let MockReply::ApiError = reply {
            return Err(Error::ExternalService("scripted API failure".to_string()));
        }

        let id = self.next_id("run");
        let mut state = self.state.lock().unwrap();
        state
            .response_formats
            .push(response_format.map(|f| f.name.clone()));
        if let MockReply::Text(text) = &reply {
            state
                .replies_by_thread
                .insert(thread_id.to_string(), text.clone());
        }
        state.run_outcomes.insert(id.clone(), reply);
        Ok(Run {
            id,
            status: RunStatus::Queued,
            last_error: None,
        })
    }

    async fn get_run(&self, _thread_id: &str, run_id: &str) -> Result<Run> {
        let state = self.state.lock().unwrap();
        let status = match state.run_outcomes.get(run_id) {
            Some(MockReply::Text(_)) => RunStatus::Completed,
            Some(MockReply::RunFails) => RunStatus::Failed,
            Some(MockReply::Stalls) => RunStatus::InProgress,
            Some(MockReply::ApiError) | None => {
                return Err(Error::ExternalService(format!("no run {}", run_id)))
            }
        };
        Ok(Run {
            id: run_id.to_string(),
            status,
            last_error: None,
        })
    }

    async fn latest_message(&self, thread_id: &str) -> Result<Option<String>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .replies_by_thread
            .get(thread_id)
            .cloned())
    }
}

/// Retrieval store that keeps names and uploads in memory
#[derive(Default)]
pub struct MockRetrievalStore {
    stores: Mutex<HashMap<String, String>>,
    uploads: Mutex<Vec<(String, Vec<u8>, String)>>,
    fail: bool,
    ids: AtomicUsize,
}

impl MockRetrievalStore {
    /// A store whose every call fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn store_count(&self) -> usize {
        self.stores.lock().unwrap().len()
    }

    /// `(filename, bytes, store_id)` per upload
    pub fn uploads(&self) -> Vec<(String, Vec<u8>, String)> {
        self.uploads.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(Error::ExternalService("vector store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RetrievalStore for MockRetrievalStore {
    async fn create(&self, name: &str) -> Result<String> {
        self.check()?;
        let id = format!("vs_{}", self.ids.fetch_add(1, Ordering::SeqCst) + 1);
        self.stores
            .lock()
            .unwrap()
            .insert(name.to_string(), id.clone());
        Ok(id)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.stores.lock().unwrap().get(name).cloned())
    }

    async fn upload(&self, filename: &str, bytes: Vec<u8>, store_id: &str) -> Result<String> {
        self.check()?;
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((filename.to_string(), bytes, store_id.to_string()));
        Ok(format!("file_{}", uploads.len()))
    }
}

/// Image generator answering with a fixed URL
#[derive(Default)]
pub struct MockImageGenerator {
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl MockImageGenerator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(Error::ExternalService("image generation failed".to_string()));
        }
        Ok("https://images.example/mind-map.png".to_string())
    }
}
