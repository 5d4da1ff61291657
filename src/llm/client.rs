//! OpenAI REST client for assistants, vector stores and images

use super::assistant::AssistantApi;
use super::image::{clip_prompt, ImageGenerator};
use super::types::{AssistantSpec, ResponseFormat, Run, ThreadMessage};
use super::vector_store::RetrievalStore;
use crate::config::OpenAiConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const ASSISTANTS_BETA: &str = "assistants=v2";
const STORE_PAGE_SIZE: u32 = 100;

/// OpenAI API client
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    image_model: String,
    image_size: String,
    image_quality: String,
}

impl OpenAiClient {
    /// Build a client, resolving the API key from the environment
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            Error::Config(format!(
                "OpenAI API key not found in env var {}",
                config.api_key_ref
            ))
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            image_model: config.image_model.clone(),
            image_size: config.image_size.clone(),
            image_quality: config.image_quality.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", ASSISTANTS_BETA)
    }

    /// Send and decode, turning non-2xx replies into errors
    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let response = ensure_success(request.send().await?, what).await?;
        response
            .json()
            .await
            .map_err(|e| Error::ExternalService(format!("Failed to parse {} response: {}", what, e)))
    }

    async fn delete(&self, path: &str, what: &str) -> Result<()> {
        let response = self.request(reqwest::Method::DELETE, path).send().await?;
        ensure_success(response, what).await?;
        Ok(())
    }
}

async fn ensure_success(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::ExternalService(format!(
        "{} failed with {}: {}",
        what, status, body
    )))
}

#[derive(Deserialize)]
struct IdObject {
    id: String,
}

#[derive(Deserialize)]
struct MessageList {
    data: Vec<MessageObject>,
}

#[derive(Deserialize)]
struct MessageObject {
    content: Vec<MessageContent>,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<MessageText>,
}

#[derive(Deserialize)]
struct MessageText {
    value: String,
}

#[derive(Deserialize)]
struct StoreList {
    data: Vec<StoreObject>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    last_id: Option<String>,
}

#[derive(Deserialize)]
struct StoreObject {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct ImageList {
    data: Vec<ImageObject>,
}

#[derive(Deserialize)]
struct ImageObject {
    #[serde(default)]
    url: Option<String>,
}

fn file_search_resources(store_id: Option<&str>) -> Option<serde_json::Value> {
    store_id.map(|id| {
        serde_json::json!({
            "file_search": { "vector_store_ids": [id] }
        })
    })
}

#[async_trait]
impl AssistantApi for OpenAiClient {
    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<String> {
        let mut payload = serde_json::json!({
            "name": spec.name,
            "instructions": spec.instructions,
            "model": spec.model,
            "tools": [{ "type": "file_search" }],
        });
        if let Some(resources) = file_search_resources(spec.vector_store_id.as_deref()) {
            payload["tool_resources"] = resources;
        }

        let created: IdObject = self
            .send(
                self.request(reqwest::Method::POST, "/assistants")
                    .json(&payload),
                "create assistant",
            )
            .await?;
        Ok(created.id)
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<()> {
        self.delete(&format!("/assistants/{}", assistant_id), "delete assistant")
            .await
    }

    async fn create_thread(
        &self,
        messages: &[ThreadMessage],
        vector_store_id: Option<&str>,
    ) -> Result<String> {
        let mut payload = serde_json::json!({ "messages": messages });
        if let Some(resources) = file_search_resources(vector_store_id) {
            payload["tool_resources"] = resources;
        }

        let created: IdObject = self
            .send(
                self.request(reqwest::Method::POST, "/threads").json(&payload),
                "create thread",
            )
            .await?;
        Ok(created.id)
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        self.delete(&format!("/threads/{}", thread_id), "delete thread")
            .await
    }

    async fn add_message(&self, thread_id: &str, content: &str) -> Result<()> {
        let _: IdObject = self
            .send(
                self.request(
                    reqwest::Method::POST,
                    &format!("/threads/{}/messages", thread_id),
                )
                .json(&ThreadMessage::user(content)),
                "add message",
            )
            .await?;
        Ok(())
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        response_format: Option<&ResponseFormat>,
    ) -> Result<Run> {
        let mut payload = serde_json::json!({ "assistant_id": assistant_id });
        if let Some(format) = response_format {
            payload["response_format"] = format.to_wire();
        }

        self.send(
            self.request(reqwest::Method::POST, &format!("/threads/{}/runs", thread_id))
                .json(&payload),
            "create run",
        )
        .await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.send(
            self.request(
                reqwest::Method::GET,
                &format!("/threads/{}/runs/{}", thread_id, run_id),
            ),
            "get run",
        )
        .await
    }

    async fn latest_message(&self, thread_id: &str) -> Result<Option<String>> {
        let list: MessageList = self
            .send(
                self.request(
                    reqwest::Method::GET,
                    &format!("/threads/{}/messages", thread_id),
                )
                .query(&[("order", "desc"), ("limit", "1")]),
                "list messages",
            )
            .await?;

        Ok(list.data.into_iter().next().and_then(|message| {
            message
                .content
                .into_iter()
                .find(|part| part.kind == "text")
                .and_then(|part| part.text)
                .map(|text| text.value)
        }))
    }
}

#[async_trait]
impl RetrievalStore for OpenAiClient {
    async fn create(&self, name: &str) -> Result<String> {
        let created: IdObject = self
            .send(
                self.request(reqwest::Method::POST, "/vector_stores")
                    .json(&serde_json::json!({ "name": name })),
                "create vector store",
            )
            .await?;
        Ok(created.id)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<String>> {
        let mut after: Option<String> = None;
        loop {
            let mut request = self
                .request(reqwest::Method::GET, "/vector_stores")
                .query(&[("limit", STORE_PAGE_SIZE.to_string())]);
            if let Some(cursor) = &after {
                request = request.query(&[("after", cursor)]);
            }

            let page: StoreList = self.send(request, "list vector stores").await?;
            if let Some(found) = page
                .data
                .iter()
                .find(|store| store.name.as_deref() == Some(name))
            {
                return Ok(Some(found.id.clone()));
            }

            match (page.has_more, page.last_id) {
                (true, Some(last)) => after = Some(last),
                _ => return Ok(None),
            }
        }
    }

    async fn upload(&self, filename: &str, bytes: Vec<u8>, store_id: &str) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", part);

        let file: IdObject = self
            .send(
                self.request(reqwest::Method::POST, "/files").multipart(form),
                "upload file",
            )
            .await?;

        let _: IdObject = self
            .send(
                self.request(
                    reqwest::Method::POST,
                    &format!("/vector_stores/{}/files", store_id),
                )
                .json(&serde_json::json!({ "file_id": file.id })),
                "attach file to vector store",
            )
            .await?;

        tracing::debug!(store_id, file_id = %file.id, filename, "Uploaded file to retrieval store");
        Ok(file.id)
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.image_model,
            "prompt": clip_prompt(prompt),
            "size": self.image_size,
            "quality": self.image_quality,
            "n": 1,
        });

        let images: ImageList = self
            .send(
                self.request(reqwest::Method::POST, "/images/generations")
                    .json(&payload),
                "generate image",
            )
            .await?;

        images
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or_else(|| Error::ExternalService("image generation returned no URL".to_string()))
    }
}
