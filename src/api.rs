//! Unified API router for Study Assistant
//!
//! Wires the services onto their backends and merges all module routers
//! into a single axum `Router` with CORS, request tracing and an upload
//! body limit.
//!
//! ## Endpoint Map
//!
//! | Prefix                              | Module    | Description                      |
//! |-------------------------------------|-----------|----------------------------------|
//! | `/health`                           | api       | Load balancer health probe       |
//! | `/api/v1/sessions`                  | sessions  | Session CRUD                     |
//! | `/api/v1/sessions/:id/messages`     | sessions  | Tutor chat                       |
//! | `/api/v1/logout`                    | sessions  | Clear chat history               |
//! | `/api/v1/sessions/:id/materials`    | materials | Material upload and listing      |
//! | `/api/v1/sessions/:id/homework`     | homework  | Generate and list homework       |
//! | `/api/v1/homework/*`                | homework  | Upload, submit, grade            |
//! | `/api/v1/sessions/:id/mind-maps`    | mind_maps | Mind map generation              |
//! | `/api/v1/sessions/:id/lessons`      | lessons   | Lesson progress                  |

use crate::auth::USER_ID_HEADER;
use crate::config::{ServerConfig, StudyAssistantConfig};
use crate::error::Result;
use crate::homework::{homework_router, HomeworkService, HomeworkState, HomeworkStore};
use crate::lessons::{lessons_router, LessonStore, LessonsState};
use crate::llm::{
    AssistantApi, AssistantRunner, ConversationalAgent, ImageGenerator, OpenAiClient,
    RetrievalStore,
};
use crate::materials::{materials_router, MaterialService, MaterialStore, MaterialsState};
use crate::mind_maps::{mind_maps_router, MindMapService, MindMapStore, MindMapsState};
use crate::sessions::{sessions_router, ChatMessageStore, ChatService, SessionStore, SessionsState};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Hosted backends the services talk to
#[derive(Clone)]
pub struct Backends {
    pub assistants: Arc<dyn AssistantApi>,
    pub retrieval: Arc<dyn RetrievalStore>,
    pub images: Arc<dyn ImageGenerator>,
}

impl Backends {
    /// All three backends served by one OpenAI client
    pub fn openai(client: OpenAiClient) -> Self {
        let client = Arc::new(client);
        Self {
            assistants: client.clone(),
            retrieval: client.clone(),
            images: client,
        }
    }
}

/// Router state for every module
#[derive(Clone)]
pub struct AppServices {
    pub sessions: SessionsState,
    pub materials: MaterialsState,
    pub homework: HomeworkState,
    pub mind_maps: MindMapsState,
    pub lessons: LessonsState,
}

impl AppServices {
    pub fn new(db: DatabaseConnection, config: &StudyAssistantConfig, backends: Backends) -> Self {
        let openai = &config.openai;
        let runner = || {
            AssistantRunner::new(
                backends.assistants.clone(),
                openai.poll_interval(),
                openai.run_timeout(),
            )
        };

        let session_store = SessionStore::new(db.clone());
        let material_store = MaterialStore::new(db.clone());

        let agent = Arc::new(ConversationalAgent::new(
            runner(),
            &openai.chat_model,
            &config.conversation,
        ));
        let chat = ChatService::new(
            session_store.clone(),
            ChatMessageStore::new(db.clone()),
            agent,
            backends.retrieval.clone(),
        );
        let materials = MaterialService::new(
            session_store.clone(),
            material_store.clone(),
            backends.retrieval.clone(),
        );
        let homework = HomeworkService::new(
            session_store.clone(),
            material_store,
            HomeworkStore::new(db.clone()),
            backends.retrieval.clone(),
            runner(),
            &openai.assistant_model,
        );
        let mind_maps = MindMapService::new(
            session_store.clone(),
            MindMapStore::new(db.clone()),
            backends.retrieval.clone(),
            backends.images.clone(),
            runner(),
            &openai.assistant_model,
        );

        Self {
            sessions: SessionsState {
                service: Arc::new(chat),
            },
            materials: MaterialsState {
                service: Arc::new(materials),
            },
            homework: HomeworkState {
                service: Arc::new(homework),
            },
            mind_maps: MindMapsState {
                service: Arc::new(mind_maps),
            },
            lessons: LessonsState {
                sessions: session_store,
                lessons: LessonStore::new(db),
            },
        }
    }

    /// Services backed by the configured OpenAI account
    pub fn from_config(db: DatabaseConnection, config: &StudyAssistantConfig) -> Result<Self> {
        let client = OpenAiClient::new(&config.openai)?;
        Ok(Self::new(db, config, Backends::openai(client)))
    }
}

/// Build the complete Study Assistant HTTP application
///
/// Merges all module routers, adds middleware, and returns a single
/// `Router` ready to be served by `axum::serve`.
pub fn build_app(services: AppServices, server: &ServerConfig) -> Router {
    let cors = build_cors(&server.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .merge(sessions_router(services.sessions))
        .merge(materials_router(services.materials))
        .merge(homework_router(services.homework))
        .merge(mind_maps_router(services.mind_maps))
        .merge(lessons_router(services.lessons))
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static(USER_ID_HEADER),
        ]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(parsed)
    }
}
