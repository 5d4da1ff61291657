//! Prompts, response schemas and reply normalization for homework

use crate::entity::{homework_task, Grade};
use crate::extract::basename;
use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const GENERATOR_NAME: &str = "Homework Generator";
pub const GENERATOR_INSTRUCTIONS: &str = "You are an expert teacher who creates precise, \
actionable homework tasks. Follow the provided prompt structure exactly.";

pub const GRADER_NAME: &str = "Homework Grader";
pub const GRADER_INSTRUCTIONS: &str = "You are a strict but fair grader. You have access to \
the student's submitted files in your vector store.";

/// Recorded as the reviewer of automated grading passes
pub const GRADER_REVIEWER: &str = "AI Grader";

pub const MIN_TASKS: usize = 3;
pub const MAX_TASKS: usize = 5;

const GENERATION_TEMPLATE: &str = r#"# Role
You are an experienced teacher in every subject. Stay professional, encouraging and patient, and pitch the homework at the learner's level.

# Instructions
* Every task must relate to the materials the learner uploaded. Use the file search tool to read them; do not guess at their content.
* Tasks should promote reasoning and critical thinking rather than recall.
* Avoid repetition. Once a concept is mastered, move on to related or more advanced topics.
* Give 3-5 tasks. Each description must be clear, specific and actionable, and tasks should build on each other.

# Output format
Return only a JSON object of this shape, with no text outside it:
{"tasks": [{"description": "..."}, {"description": "..."}]}

# Example
{"tasks": [
  {"description": "Explain in your own words why hidden layers need non-linear activation functions. Describe what happens without them."},
  {"description": "Draw a small neural network and trace how backpropagation updates weights from the output layer back to the input layer."},
  {"description": "List three techniques that reduce overfitting and say when you would use each."}
]}"#;

/// Reply shape for task generation
#[derive(Debug, Deserialize)]
pub struct GeneratedTasks {
    pub tasks: Vec<GeneratedTask>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedTask {
    pub description: String,
}

/// Reply shape for grading
#[derive(Debug, Deserialize)]
pub struct GradingReply {
    pub overall_feedback: String,
    pub grade: Grade,
    pub tasks: Vec<TaskGrade>,
}

#[derive(Debug, Deserialize)]
pub struct TaskGrade {
    pub task_number: i32,
    pub score: f64,
    pub feedback: String,
}

pub fn generation_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "tasks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "description": { "type": "string" }
                    },
                    "required": ["description"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["tasks"],
        "additionalProperties": false
    })
}

pub fn grading_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "overall_feedback": { "type": "string" },
            "grade": { "type": "string", "enum": Grade::ALL },
            "tasks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "task_number": { "type": "integer" },
                        "score": { "type": "number" },
                        "feedback": { "type": "string" }
                    },
                    "required": ["task_number", "score", "feedback"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["overall_feedback", "grade", "tasks"],
        "additionalProperties": false
    })
}

/// Clause steering generation towards named materials
pub fn focus_clause(material_names: &[String]) -> Option<String> {
    if material_names.is_empty() {
        return None;
    }
    let quoted: Vec<String> = material_names
        .iter()
        .map(|name| format!("'{}'", name))
        .collect();
    Some(format!(
        "IMPORTANT: Please focus specifically on the following materials: {}.",
        quoted.join(", ")
    ))
}

pub fn generation_prompt(user_request: &str, focus: Option<&str>) -> String {
    let focus = focus.map(|f| format!("\n\n{}", f)).unwrap_or_default();
    format!(
        "{template}\n\n---\nUSER REQUEST: {request}{focus}\n\n\
         Based on the materials in the vector store and the user's request above, \
         create 3-5 precise, actionable homework tasks.\n\
         Return ONLY the JSON with the tasks array as specified in the prompt.",
        template = GENERATION_TEMPLATE,
        request = user_request,
        focus = focus,
    )
}

/// Keep non-blank descriptions, at most `MAX_TASKS` of them.
///
/// Returns None when fewer than `MIN_TASKS` remain.
pub fn normalize_tasks(generated: GeneratedTasks) -> Option<Vec<String>> {
    let tasks: Vec<String> = generated
        .tasks
        .into_iter()
        .map(|t| t.description.trim().to_string())
        .filter(|d| !d.is_empty())
        .take(MAX_TASKS)
        .collect();
    (tasks.len() >= MIN_TASKS).then_some(tasks)
}

pub fn fallback_tasks(user_request: &str) -> Vec<String> {
    vec![
        format!(
            "Summarize the key points from the provided materials based on: {}",
            user_request
        ),
        "Identify 3 main concepts and explain them.".to_string(),
        "Create a quiz question based on the material.".to_string(),
    ]
}

pub fn homework_title(session_title: &str, at: DateTime<Utc>) -> String {
    format!(
        "Homework for {} - {}",
        session_title,
        at.format("%Y-%m-%d %H:%M")
    )
}

/// One block per task, in task order
pub fn grading_prompt(session_title: &str, tasks: &[homework_task::Model]) -> String {
    let mut prompt = format!(
        "Please grade the following homework for the session '{}'.\n\n",
        session_title
    );
    for task in tasks {
        prompt.push_str(&format!("Task {}: {}\n", task.task_number, task.description));
        match &task.uploaded_file_url {
            Some(file) => prompt.push_str(&format!(
                "Solution File: {} (available in vector store)\n",
                basename(file)
            )),
            None => prompt.push_str("Solution: No solution provided.\n"),
        }
        prompt.push('\n');
    }
    prompt
}

pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
