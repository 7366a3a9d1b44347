//! Task data model and batch parsing.
//!
//! Callers submit tasks as JSON. Each record arrives as a loosely typed
//! [`TaskInput`] and is validated into a [`Task`] before any graph or
//! scoring work runs. Scored results come back as [`ScoredTask`].

use crate::core::warning::Warning;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Date format accepted for `due_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fields computed during scoring. Input fields of the same name are
/// replaced by the computed values.
const COMPUTED_FIELDS: [&str; 4] = ["score", "explanation", "unlocks_count", "has_cycle"];

/// Identifier of a task within one batch.
///
/// Caller-supplied ids are kept verbatim. Tasks submitted without one get
/// a generated `auto-<uuid>` id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create a synthetic id for a task submitted without one.
    pub fn generate() -> Self {
        Self(format!("auto-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Ids may be sent as strings or integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(d)?.map(String::from))
}

fn de_ids<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<RawId>>::deserialize(d)?
        .unwrap_or_default()
        .into_iter()
        .map(String::from)
        .collect())
}

/// A task record as it arrives on the wire, before validation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaskInput {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub importance: Option<f64>,
    #[serde(default, deserialize_with = "de_ids")]
    pub dependencies: Vec<String>,
    /// Any other fields the caller sent, echoed back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskInput {
    /// Validate into a [`Task`]. `position` is zero-based and only used in
    /// error messages.
    pub fn validate(self, position: usize) -> Result<Task> {
        let label = match &self.id {
            Some(id) => format!("task #{} ({})", position + 1, id),
            None => format!("task #{}", position + 1),
        };
        let invalid = |reason: String| Error::Validation(format!("{}: {}", label, reason));

        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| invalid("title is required".to_string()))?;

        let due_date = match self.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                invalid(format!("due_date must be YYYY-MM-DD, got {:?}", raw))
            })?),
        };

        if let Some(hours) = self.estimated_hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(invalid(format!(
                    "estimated_hours must be a non-negative number, got {}",
                    hours
                )));
            }
        }

        let importance = match self.importance {
            None => None,
            Some(v) if v.fract() == 0.0 && (1.0..=10.0).contains(&v) => Some(v as u8),
            Some(v) => {
                return Err(invalid(format!(
                    "importance must be an integer from 1 to 10, got {}",
                    v
                )))
            }
        };

        let id = match self.id.map(|s| s.trim().to_string()) {
            Some(id) if !id.is_empty() => TaskId::new(id),
            _ => TaskId::generate(),
        };

        let mut extra = self.extra;
        extra.retain(|key, _| !COMPUTED_FIELDS.contains(&key.as_str()));

        Ok(Task {
            id,
            title,
            due_date,
            estimated_hours: self.estimated_hours,
            importance,
            dependencies: self
                .dependencies
                .into_iter()
                .map(|d| TaskId::new(d.trim()))
                .collect(),
            extra,
        })
    }
}

/// A validated task.
///
/// Optional fields stay `None` when the caller left them out; scoring maps
/// absence to neutral values rather than to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    /// Importance on a 1-10 scale.
    pub importance: Option<u8>,
    /// Prerequisites, in the order the caller listed them.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Create a task with only an id and title set.
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: TaskId::from(id),
            title: title.to_string(),
            due_date: None,
            estimated_hours: None,
            importance: None,
            dependencies: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = Some(importance);
        self
    }

    pub fn with_dependencies(mut self, deps: &[&str]) -> Self {
        self.dependencies = deps.iter().map(|d| TaskId::from(*d)).collect();
        self
    }
}

/// A task with its computed priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    /// Priority in [0, 1], rounded to two decimals.
    pub score: f64,
    pub explanation: String,
    /// Number of tasks that depend on this one, directly or transitively.
    pub unlocks_count: usize,
    /// Whether the task sits on a dependency cycle.
    pub has_cycle: bool,
}

/// A parsed batch document: the task records plus an optional strategy
/// name carried in the document itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBatch {
    pub tasks: Vec<TaskInput>,
    pub strategy: Option<String>,
}

impl TaskBatch {
    /// Parse a batch from JSON.
    ///
    /// Accepts either a bare array of tasks or a request object of the form
    /// `{"tasks": [...], "strategy": "..."}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        match value {
            serde_json::Value::Array(items) => Ok(Self {
                tasks: parse_items(items)?,
                strategy: None,
            }),
            serde_json::Value::Object(mut map) => {
                let tasks = match map.remove("tasks") {
                    Some(serde_json::Value::Array(items)) => parse_items(items)?,
                    _ => {
                        return Err(Error::Validation("'tasks' must be a list".to_string()));
                    }
                };
                let strategy = match map.remove("strategy") {
                    None | Some(serde_json::Value::Null) => None,
                    Some(serde_json::Value::String(s)) => Some(s),
                    Some(other) => {
                        return Err(Error::Validation(format!(
                            "'strategy' must be a string, got {}",
                            other
                        )))
                    }
                };
                Ok(Self { tasks, strategy })
            }
            _ => Err(Error::Validation(
                "expected a list of tasks or an object with a 'tasks' list".to_string(),
            )),
        }
    }

    /// Parse a batch that arrived percent-encoded in a query string.
    ///
    /// `query` is either the encoded value on its own or a query string
    /// (a leading `?` is allowed) holding a `tasks=` pair and optionally a
    /// `strategy=` pair, in any order. Other parameters are ignored.
    pub fn from_query(query: &str) -> Result<Self> {
        let raw = query.trim().trim_start_matches('?');
        if !is_query_pairs(raw) {
            return Self::from_json(&decode_component(raw)?);
        }

        let mut tasks = None;
        let mut strategy = None;
        for pair in raw.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "tasks" => tasks = Some(decode_component(value)?),
                "strategy" => strategy = Some(decode_component(value)?),
                _ => {}
            }
        }

        let tasks = tasks.ok_or_else(|| {
            Error::Validation("please provide tasks as ?tasks=<json_array>".to_string())
        })?;
        let mut batch = Self::from_json(&tasks)?;
        if strategy.is_some() {
            batch.strategy = strategy;
        }
        Ok(batch)
    }

    /// Validate every record. The first invalid record rejects the batch.
    pub fn into_tasks(self) -> Result<Vec<Task>> {
        self.tasks
            .into_iter()
            .enumerate()
            .map(|(i, input)| input.validate(i))
            .collect()
    }
}

fn parse_items(items: Vec<serde_json::Value>) -> Result<Vec<TaskInput>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<TaskInput>(item)
                .map_err(|e| Error::Validation(format!("task #{}: {}", i + 1, e)))
        })
        .collect()
}

const QUERY_KEYS: [&str; 2] = ["tasks", "strategy"];

/// Whether `raw` is a `key=value&...` query string rather than a bare
/// encoded batch. A batch never has a known key followed by `=`.
fn is_query_pairs(raw: &str) -> bool {
    raw.split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, _)| QUERY_KEYS.contains(&key))
}

/// Decode one `application/x-www-form-urlencoded` component.
fn decode_component(value: &str) -> Result<String> {
    let spaced = value.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| Error::Validation(format!("tasks are not valid UTF-8 once decoded: {}", e)))
}

/// Drop earlier occurrences of duplicated ids, keeping the last one.
///
/// Surviving tasks keep their relative order, so the retained duplicate
/// sits at the position of its last occurrence. One warning is raised per
/// duplicated id.
pub fn normalize_batch(tasks: Vec<Task>) -> (Vec<Task>, Vec<Warning>) {
    let mut last_seen: HashMap<TaskId, usize> = HashMap::new();
    for (i, task) in tasks.iter().enumerate() {
        last_seen.insert(task.id.clone(), i);
    }

    let mut warned: HashSet<TaskId> = HashSet::new();
    let mut warnings = Vec::new();
    let mut kept = Vec::with_capacity(last_seen.len());
    for (i, task) in tasks.into_iter().enumerate() {
        if last_seen.get(&task.id) == Some(&i) {
            kept.push(task);
        } else if warned.insert(task.id.clone()) {
            warnings.push(Warning::DuplicateTaskId { id: task.id });
        }
    }
    (kept, warnings)
}
