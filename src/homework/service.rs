//! Homework lifecycle: generation, solution upload, submission and grading

use super::prompt::{
    fallback_tasks, focus_clause, generation_prompt, generation_schema, grading_prompt,
    grading_schema, homework_title, normalize_tasks, round_score, GeneratedTasks, GradingReply,
    GENERATOR_INSTRUCTIONS, GENERATOR_NAME, GRADER_INSTRUCTIONS, GRADER_NAME, GRADER_REVIEWER,
};
use super::store::{GradingRecord, HomeworkDetail, HomeworkStore, TaskReviewRecord};
use crate::entity::{homework, homework_task, session, HomeworkStatus};
use crate::error::{Error, Result};
use crate::llm::{
    session_store, upload_document, AssistantRunner, AssistantSpec, ResponseFormat,
    RetrievalStore,
};
use crate::materials::MaterialStore;
use crate::sessions::SessionStore;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

pub struct HomeworkService {
    sessions: SessionStore,
    materials: MaterialStore,
    homework: HomeworkStore,
    retrieval: Arc<dyn RetrievalStore>,
    runner: AssistantRunner,
    model: String,
}

impl HomeworkService {
    pub fn new(
        sessions: SessionStore,
        materials: MaterialStore,
        homework: HomeworkStore,
        retrieval: Arc<dyn RetrievalStore>,
        runner: AssistantRunner,
        model: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            materials,
            homework,
            retrieval,
            runner,
            model: model.into(),
        }
    }

    /// Generate a pending homework from the session's materials.
    ///
    /// LLM or retrieval failures never fail the call; the fixed fallback
    /// task set is used instead.
    pub async fn generate(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        prompt: &str,
        material_ids: &[Uuid],
    ) -> Result<HomeworkDetail> {
        let request = prompt.trim();
        if request.is_empty() {
            return Err(Error::Validation("prompt must not be empty".to_string()));
        }
        let session = self.sessions.require_owned(session_id, user_id).await?;
        let focus_names = self
            .materials
            .names_in_session(session_id, material_ids)
            .await?;

        let descriptions = match self.generate_tasks(session_id, request, &focus_names).await {
            Ok(Some(tasks)) => tasks,
            Ok(None) => {
                tracing::info!(session_id = %session_id, "Too few usable generated tasks, using fallback");
                fallback_tasks(request)
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Homework generation failed, using fallback");
                fallback_tasks(request)
            }
        };

        let title = homework_title(&session.title, Utc::now());
        let homework = self
            .homework
            .create_with_tasks(session_id, &title, &descriptions)
            .await?;
        tracing::info!(
            session_id = %session_id,
            homework_id = %homework.id,
            tasks = descriptions.len(),
            "Generated homework"
        );
        self.homework.detail(homework).await
    }

    async fn generate_tasks(
        &self,
        session_id: Uuid,
        request: &str,
        focus_names: &[String],
    ) -> Result<Option<Vec<String>>> {
        let store_id = session_store(self.retrieval.as_ref(), session_id).await?;
        let focus = focus_clause(focus_names);
        let prompt = generation_prompt(request, focus.as_deref());

        let spec = AssistantSpec::new(GENERATOR_NAME, GENERATOR_INSTRUCTIONS, &self.model)
            .with_vector_store(store_id);
        let format = ResponseFormat::json_schema("homework_generation", generation_schema());
        let generated: GeneratedTasks = self.runner.run_structured(&spec, &prompt, &format).await?;
        Ok(normalize_tasks(generated))
    }

    /// Attach a solution file to one task of an ungraded homework
    pub async fn upload_solution(
        &self,
        homework_id: Uuid,
        task_id: Uuid,
        user_id: Uuid,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<homework_task::Model> {
        let (homework, _) = self.require_owned(homework_id, user_id).await?;
        let task = self
            .homework
            .get_task(task_id)
            .await?
            .filter(|task| task.homework_id == homework.id)
            .ok_or_else(|| Error::not_found("Task"))?;

        if homework.status == HomeworkStatus::Graded {
            return Err(Error::Conflict(
                "graded homework no longer accepts uploads".to_string(),
            ));
        }
        if filename.trim().is_empty() {
            return Err(Error::Validation("uploaded file has no name".to_string()));
        }

        let store_id = session_store(self.retrieval.as_ref(), homework.session_id).await?;
        let file_id = upload_document(self.retrieval.as_ref(), filename, bytes, &store_id).await?;

        let task = self.homework.set_task_upload(task, filename).await?;
        tracing::info!(
            homework_id = %homework.id,
            task_number = task.task_number,
            file_id = %file_id,
            "Uploaded task solution"
        );
        Ok(task)
    }

    /// `pending | submitted → submitted`. Does not grade.
    pub async fn submit(&self, homework_id: Uuid, user_id: Uuid) -> Result<HomeworkDetail> {
        let (homework, _) = self.require_owned(homework_id, user_id).await?;
        if !homework.status.can_submit() {
            return Err(Error::Conflict("homework is already graded".to_string()));
        }
        if !self.homework.mark_submitted(homework.id, Utc::now()).await? {
            return Err(Error::Conflict("homework is already graded".to_string()));
        }
        tracing::info!(homework_id = %homework.id, "Submitted homework");

        let homework = self.reload(homework.id).await?;
        self.homework.detail(homework).await
    }

    /// Grade a submitted homework and persist the reviews.
    ///
    /// A failed or unusable grading call leaves the homework `submitted` and
    /// returns `GradingUnavailable`.
    pub async fn grade(&self, homework_id: Uuid, user_id: Uuid) -> Result<HomeworkDetail> {
        let (homework, session) = self.require_owned(homework_id, user_id).await?;
        match homework.status {
            HomeworkStatus::Pending => {
                return Err(Error::Conflict(
                    "homework must be submitted before grading".to_string(),
                ))
            }
            HomeworkStatus::Graded => {
                return Err(Error::Conflict("homework is already graded".to_string()))
            }
            HomeworkStatus::Submitted => {}
        }

        let tasks = self.homework.tasks(homework.id).await?;
        let reply = self
            .request_grading(&session, &tasks)
            .await
            .map_err(|e| {
                tracing::warn!(homework_id = %homework.id, error = %e, "Grading failed");
                Error::GradingUnavailable(e.to_string())
            })?;

        let record = grading_record(homework.id, reply, &tasks);
        let reviewed = record.task_reviews.len();
        self.homework.record_grading(homework.id, record).await?;
        tracing::info!(homework_id = %homework.id, reviewed, "Graded homework");

        let homework = self.reload(homework.id).await?;
        self.homework.detail(homework).await
    }

    async fn request_grading(
        &self,
        session: &session::Model,
        tasks: &[homework_task::Model],
    ) -> Result<GradingReply> {
        let store_id = session_store(self.retrieval.as_ref(), session.id).await?;
        let prompt = grading_prompt(&session.title, tasks);

        let spec = AssistantSpec::new(GRADER_NAME, GRADER_INSTRUCTIONS, &self.model)
            .with_vector_store(store_id);
        let format = ResponseFormat::json_schema("homework_grading", grading_schema());
        self.runner.run_structured(&spec, &prompt, &format).await
    }

    /// Every homework of a session with tasks and reviews, newest first
    pub async fn list_for_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<Vec<HomeworkDetail>> {
        self.sessions.require_owned(session_id, user_id).await?;
        let mut details = Vec::new();
        for homework in self.homework.list_for_session(session_id).await? {
            details.push(self.homework.detail(homework).await?);
        }
        Ok(details)
    }

    pub async fn get(&self, homework_id: Uuid, user_id: Uuid) -> Result<HomeworkDetail> {
        let (homework, _) = self.require_owned(homework_id, user_id).await?;
        self.homework.detail(homework).await
    }

    /// Load a homework whose session belongs to `user_id`
    async fn require_owned(
        &self,
        homework_id: Uuid,
        user_id: Uuid,
    ) -> Result<(homework::Model, session::Model)> {
        let homework = self.reload(homework_id).await?;
        let session = self
            .sessions
            .require_owned(homework.session_id, user_id)
            .await
            .map_err(|e| match e {
                Error::NotFound(_) => Error::not_found("Homework"),
                other => other,
            })?;
        Ok((homework, session))
    }

    async fn reload(&self, homework_id: Uuid) -> Result<homework::Model> {
        self.homework
            .get(homework_id)
            .await?
            .ok_or_else(|| Error::not_found("Homework"))
    }
}

/// Match grader entries to tasks by number.
///
/// Unknown numbers are dropped. For a repeated number the first entry wins.
fn grading_record(
    homework_id: Uuid,
    reply: GradingReply,
    tasks: &[homework_task::Model],
) -> GradingRecord {
    let by_number: HashMap<i32, Uuid> = tasks.iter().map(|t| (t.task_number, t.id)).collect();
    let mut seen = HashSet::new();
    let mut task_reviews = Vec::new();

    for entry in reply.tasks {
        let Some(&task_id) = by_number.get(&entry.task_number) else {
            tracing::warn!(
                homework_id = %homework_id,
                task_number = entry.task_number,
                "Grader returned an unknown task number"
            );
            continue;
        };
        if !seen.insert(entry.task_number) {
            tracing::debug!(
                homework_id = %homework_id,
                task_number = entry.task_number,
                "Ignoring repeated grade for task"
            );
            continue;
        }
        task_reviews.push(TaskReviewRecord {
            task_id,
            feedback: entry.feedback,
            score: round_score(entry.score),
        });
    }

    GradingRecord {
        grade: reply.grade,
        overall_feedback: reply.overall_feedback,
        reviewed_by: GRADER_REVIEWER.to_string(),
        task_reviews,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{memory_db, seed_user};
    use crate::entity::{FileType, Grade};
    use crate::llm::testing::{MockAssistantApi, MockReply, MockRetrievalStore};
    use crate::materials::store::NewMaterial;
    use std::time::Duration;

    struct Fixture {
        service: HomeworkService,
        api: Arc<MockAssistantApi>,
        retrieval: Arc<MockRetrievalStore>,
        materials: MaterialStore,
        sessions: SessionStore,
        owner: Uuid,
        stranger: Uuid,
        session_id: Uuid,
    }

    async fn fixture_with(retrieval: MockRetrievalStore) -> Fixture {
        let db = memory_db().await;
        let owner = seed_user(&db, "owner@example.com").await;
        let stranger = seed_user(&db, "stranger@example.com").await;
        let sessions = SessionStore::new(db.clone());
        let session = sessions.create(owner, "Biology").await.unwrap();
        let materials = MaterialStore::new(db.clone());

        let api = Arc::new(MockAssistantApi::default());
        let retrieval = Arc::new(retrieval);
        let runner = AssistantRunner::new(api.clone(), Duration::from_millis(1), Duration::from_secs(5));
        let service = HomeworkService::new(
            sessions.clone(),
            materials.clone(),
            HomeworkStore::new(db),
            retrieval.clone(),
            runner,
            "test-model",
        );
        Fixture {
            service,
            api,
            retrieval,
            materials,
            sessions,
            owner,
            stranger,
            session_id: session.id,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(MockRetrievalStore::default()).await
    }

    fn tasks_reply(n: usize) -> MockReply {
        let tasks: Vec<_> = (1..=n)
            .map(|i| serde_json::json!({ "description": format!("Generated task {}", i) }))
            .collect();
        MockReply::text(serde_json::json!({ "tasks": tasks }).to_string())
    }

    fn grading_reply(entries: &[(i32, f64)]) -> MockReply {
        let tasks: Vec<_> = entries
            .iter()
            .map(|(number, score)| {
                serde_json::json!({
                    "task_number": number,
                    "score": score,
                    "feedback": format!("Feedback {}", number),
                })
            })
            .collect();
        MockReply::text(
            serde_json::json!({
                "overall_feedback": "Good effort overall.",
                "grade": "B",
                "tasks": tasks,
            })
            .to_string(),
        )
    }

    async fn generated(f: &Fixture, n: usize) -> HomeworkDetail {
        f.api.push_reply(tasks_reply(n));
        f.service
            .generate(f.session_id, f.owner, "cell structure", &[])
            .await
            .unwrap()
    }

    async fn submitted(f: &Fixture, n: usize) -> HomeworkDetail {
        let detail = generated(f, n).await;
        f.service.submit(detail.homework.id, f.owner).await.unwrap()
    }

    fn descriptions(detail: &HomeworkDetail) -> Vec<String> {
        detail.tasks.iter().map(|t| t.task.description.clone()).collect()
    }

    #[tokio::test]
    async fn test_generate_uses_model_tasks() {
        let f = fixture().await;
        let detail = generated(&f, 4).await;

        assert_eq!(detail.homework.status, HomeworkStatus::Pending);
        assert!(detail.homework.title.starts_with("Homework for Biology - "));
        assert!(detail.reviews.is_empty());
        let numbers: Vec<i32> = detail.tasks.iter().map(|t| t.task.task_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(descriptions(&detail)[3], "Generated task 4");

        let created = f.api.created_assistants();
        assert_eq!(created[0].name, GENERATOR_NAME);
        assert!(created[0].vector_store_id.is_some());
        assert_eq!(f.api.live_assistants(), 0);
        assert_eq!(f.api.response_formats(), vec![Some("homework_generation".to_string())]);
    }

    #[tokio::test]
    async fn test_generate_truncates_to_five() {
        let f = fixture().await;
        let detail = generated(&f, 7).await;
        assert_eq!(detail.tasks.len(), 5);
        assert_eq!(detail.tasks[4].task.task_number, 5);
    }

    #[tokio::test]
    async fn test_generate_falls_back_on_failures() {
        let f = fixture().await;
        for reply in [
            MockReply::ApiError,
            MockReply::RunFails,
            MockReply::text("{\"tasks\": \"nope\"}"),
            tasks_reply(2),
        ] {
            f.api.push_reply(reply);
            let detail = f
                .service
                .generate(f.session_id, f.owner, "enzymes", &[])
                .await
                .unwrap();
            assert_eq!(descriptions(&detail), fallback_tasks("enzymes"));
        }
        assert_eq!(f.api.live_assistants(), 0);
        assert_eq!(f.api.live_threads(), 0);
    }

    #[tokio::test]
    async fn test_generate_falls_back_when_store_unavailable() {
        let f = fixture_with(MockRetrievalStore::failing()).await;
        let detail = f
            .service
            .generate(f.session_id, f.owner, "osmosis", &[])
            .await
            .unwrap();
        assert_eq!(detail.tasks.len(), 3);
        assert!(f.api.created_assistants().is_empty());
    }

    #[tokio::test]
    async fn test_focus_names_only_same_session_materials() {
        let f = fixture().await;
        let other = f.sessions.create(f.owner, "Other").await.unwrap();
        let material = |session_id, name: &str| NewMaterial {
            session_id,
            name: name.to_string(),
            file_url: "file_x".to_string(),
            file_type: FileType::Pdf,
            size: 1,
        };
        let mine = f.materials.create(material(f.session_id, "mine.pdf")).await.unwrap();
        let theirs = f.materials.create(material(other.id, "theirs.pdf")).await.unwrap();

        f.api.push_reply(tasks_reply(3));
        f.service
            .generate(f.session_id, f.owner, "cells", &[mine.id, theirs.id])
            .await
            .unwrap();

        let prompt = f.api.prompts().pop().unwrap();
        assert!(prompt.contains(
            "IMPORTANT: Please focus specifically on the following materials: 'mine.pdf'."
        ));
        assert!(!prompt.contains("theirs.pdf"));
    }

    #[tokio::test]
    async fn test_generate_in_foreign_session_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .generate(f.session_id, f.stranger, "cells", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(f.api.created_assistants().is_empty());
    }

    #[tokio::test]
    async fn test_upload_solution_records_filename() {
        let f = fixture().await;
        let detail = generated(&f, 3).await;
        let task = &detail.tasks[1].task;

        let updated = f
            .service
            .upload_solution(detail.homework.id, task.id, f.owner, "answer.txt", b"42".to_vec())
            .await
            .unwrap();
        assert_eq!(updated.uploaded_file_url.as_deref(), Some("answer.txt"));
        assert_eq!(f.retrieval.uploads()[0].0, "answer.txt");
    }

    #[tokio::test]
    async fn test_upload_to_task_of_other_homework_is_not_found() {
        let f = fixture().await;
        let first = generated(&f, 3).await;
        let second = generated(&f, 3).await;

        let err = f
            .service
            .upload_solution(
                first.homework.id,
                second.tasks[0].task.id,
                f.owner,
                "a.txt",
                b"x".to_vec(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = f
            .service
            .upload_solution(first.homework.id, Uuid::new_v4(), f.owner, "a.txt", b"x".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(f.retrieval.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_upload_by_stranger_is_not_found() {
        let f = fixture().await;
        let detail = generated(&f, 3).await;
        let err = f
            .service
            .upload_solution(
                detail.homework.id,
                detail.tasks[0].task.id,
                f.stranger,
                "a.txt",
                b"x".to_vec(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_is_idempotent_and_does_not_grade() {
        let f = fixture().await;
        let detail = generated(&f, 3).await;
        let created_before = f.api.created_assistants().len();

        let first = f.service.submit(detail.homework.id, f.owner).await.unwrap();
        assert_eq!(first.homework.status, HomeworkStatus::Submitted);
        assert!(first.homework.submitted_at.is_some());

        let second = f.service.submit(detail.homework.id, f.owner).await.unwrap();
        assert_eq!(second.homework.status, HomeworkStatus::Submitted);
        assert!(second.reviews.is_empty());
        assert_eq!(f.api.created_assistants().len(), created_before);
    }

    #[tokio::test]
    async fn test_grade_pending_is_conflict() {
        let f = fixture().await;
        let detail = generated(&f, 3).await;
        let created_before = f.api.created_assistants().len();

        let err = f.service.grade(detail.homework.id, f.owner).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        let reloaded = f.service.get(detail.homework.id, f.owner).await.unwrap();
        assert!(reloaded.reviews.is_empty());
        assert_eq!(reloaded.homework.status, HomeworkStatus::Pending);
        assert_eq!(f.api.created_assistants().len(), created_before);
    }

    #[tokio::test]
    async fn test_grade_writes_reviews_for_matching_tasks() {
        let f = fixture().await;
        let detail = submitted(&f, 3).await;

        f.api
            .push_reply(grading_reply(&[(1, 8.456), (2, 7.0), (4, 10.0), (1, 1.0)]));
        let graded = f.service.grade(detail.homework.id, f.owner).await.unwrap();

        assert_eq!(graded.homework.status, HomeworkStatus::Graded);
        assert_eq!(graded.reviews.len(), 1);
        let review = &graded.reviews[0];
        assert_eq!(review.grade, Some(Grade::B));
        assert_eq!(review.reviewed_by.as_deref(), Some(GRADER_REVIEWER));
        assert_eq!(review.overall_feedback.as_deref(), Some("Good effort overall."));

        let written: usize = graded.tasks.iter().map(|t| t.reviews.len()).sum();
        assert_eq!(written, 2);
        assert_eq!(graded.tasks[0].reviews[0].score, Some(8.46));
        assert_eq!(graded.tasks[0].reviews[0].task_feedback.as_deref(), Some("Feedback 1"));
        assert_eq!(graded.tasks[1].reviews[0].score, Some(7.0));
        assert!(graded.tasks[2].reviews.is_empty());
        assert_eq!(f.api.live_assistants(), 0);
        assert_eq!(f.api.created_assistants().last().unwrap().name, GRADER_NAME);
    }

    #[tokio::test]
    async fn test_grading_prompt_mentions_uploaded_solutions() {
        let f = fixture().await;
        let detail = generated(&f, 3).await;
        f.service
            .upload_solution(
                detail.homework.id,
                detail.tasks[0].task.id,
                f.owner,
                "work/answer1.txt",
                b"done".to_vec(),
            )
            .await
            .unwrap();
        f.service.submit(detail.homework.id, f.owner).await.unwrap();

        f.api.push_reply(grading_reply(&[(1, 9.0)]));
        f.service.grade(detail.homework.id, f.owner).await.unwrap();

        let prompt = f.api.prompts().pop().unwrap();
        assert!(prompt.starts_with("Please grade the following homework for the session 'Biology'."));
        assert!(prompt.contains("Task 1: Generated task 1\nSolution File: answer1.txt (available in vector store)"));
        assert!(prompt.contains("Task 2: Generated task 2\nSolution: No solution provided."));
    }

    #[tokio::test]
    async fn test_grading_failure_is_reported_and_leaves_submitted() {
        let f = fixture().await;
        let detail = submitted(&f, 3).await;

        for reply in [MockReply::RunFails, MockReply::text("not json"), MockReply::ApiError] {
            f.api.push_reply(reply);
            let err = f.service.grade(detail.homework.id, f.owner).await.unwrap_err();
            assert!(matches!(err, Error::GradingUnavailable(_)));
        }

        let reloaded = f.service.get(detail.homework.id, f.owner).await.unwrap();
        assert_eq!(reloaded.homework.status, HomeworkStatus::Submitted);
        assert!(reloaded.reviews.is_empty());
        assert_eq!(f.api.live_assistants(), 0);
    }

    #[tokio::test]
    async fn test_graded_homework_is_final() {
        let f = fixture().await;
        let detail = submitted(&f, 3).await;
        f.api.push_reply(grading_reply(&[(1, 5.0)]));
        f.service.grade(detail.homework.id, f.owner).await.unwrap();

        let err = f.service.grade(detail.homework.id, f.owner).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        let err = f.service.submit(detail.homework.id, f.owner).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        let err = f
            .service
            .upload_solution(
                detail.homework.id,
                detail.tasks[0].task.id,
                f.owner,
                "late.txt",
                b"x".to_vec(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        let reloaded = f.service.get(detail.homework.id, f.owner).await.unwrap();
        assert_eq!(reloaded.reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_queries_check_ownership() {
        let f = fixture().await;
        let detail = generated(&f, 3).await;
        generated(&f, 3).await;

        assert_eq!(
            f.service
                .list_for_session(f.session_id, f.owner)
                .await
                .unwrap()
                .len(),
            2
        );
        let err = f
            .service
            .list_for_session(f.session_id, f.stranger)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = f.service.get(detail.homework.id, f.stranger).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = f.service.get(Uuid::new_v4(), f.owner).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let ready = submitted(&f, 2).await;
        let assistants = f.api.created_assistants().len();
        let err = f.service.grade(ready.homework.id, f.stranger).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(f.api.created_assistants().len(), assistants);
    }

    #[test]
    fn test_grading_record_matches_by_number() {
        let tasks: Vec<homework_task::Model> = (1..=3)
            .map(|n| homework_task::Model {
                id: Uuid::new_v4(),
                homework_id: Uuid::nil(),
                task_number: n,
                description: String::new(),
                uploaded_file_url: None,
            })
            .collect();
        let reply: GradingReply = serde_json::from_str(
            r#"{"overall_feedback":"ok","grade":"A","tasks":[
                {"task_number":3,"score":9.999,"feedback":"first"},
                {"task_number":3,"score":1,"feedback":"second"},
                {"task_number":0,"score":5,"feedback":"stray"}
            ]}"#,
        )
        .unwrap();

        let record = grading_record(Uuid::nil(), reply, &tasks);
        assert_eq!(record.task_reviews.len(), 1);
        assert_eq!(record.task_reviews[0].task_id, tasks[2].id);
        assert_eq!(record.task_reviews[0].feedback, "first");
        assert_eq!(record.task_reviews[0].score, 10.0);
        assert_eq!(record.reviewed_by, "AI Grader");
    }
}
