//! TaskBuilder — resolves a task "type" discriminator to the sub-builder
//! that knows how to construct it.
//!
//! Each sub-builder is a typed constructor: it consumes exactly the option
//! keys legal for its task kind and rejects unknown ones, instead of
//! reflectively assigning arbitrary properties.

use crate::error::{Result, TaskmillError};
use crate::task::{Task, TaskState};
use serde_json::{Map, Value};

/// String-keyed configuration mapping handed to [`TaskBuilder::create`].
#[derive(Debug, Clone, Default)]
pub struct TaskOptions {
    values: Map<String, Value>,
}

impl TaskOptions {
    pub fn new() -> Self {
        Self { values: Map::new() }
    }

    /// Set an option, builder-style.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn get_str(&self, key: &str) -> Result<Option<String>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(TaskmillError::InvalidArgument(format!(
                "The option \"{key}\" must be a string, received {other}"
            ))),
        }
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(TaskmillError::InvalidArgument(format!(
                "The option \"{key}\" must be a boolean, received {other}"
            ))),
        }
    }

    fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) if n.is_i64() => Ok(n.as_i64()),
            Some(other) => Err(TaskmillError::InvalidArgument(format!(
                "The option \"{key}\" must be an integer, received {other}"
            ))),
        }
    }

    fn get_string_array(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(TaskmillError::InvalidArgument(format!(
                        "The option \"{key}\" must be an array of strings, received {other}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(other) => Err(TaskmillError::InvalidArgument(format!(
                "The option \"{key}\" must be an array of strings, received {other}"
            ))),
        }
    }

    /// Reject any key outside the given set.
    fn ensure_only(&self, allowed: &[&str]) -> Result<()> {
        for key in self.values.keys() {
            if !allowed.contains(&key.as_str()) {
                return Err(TaskmillError::InvalidArgument(format!(
                    "The option \"{key}\" does not exist for this task type"
                )));
            }
        }
        Ok(())
    }
}

/// A sub-builder that answers to one or more type discriminators.
pub trait BuilderStrategy: Send + Sync {
    /// Whether this builder handles the given type discriminator.
    fn support(&self, task_type: &str) -> bool;

    /// Build a fully populated task from the options.
    fn build(&self, options: &TaskOptions) -> Result<Task>;
}

/// Option keys every task kind accepts.
const COMMON_KEYS: &[&str] = &[
    "type",
    "name",
    "expression",
    "timezone",
    "tracked",
    "nice",
    "due",
];

/// Apply the options shared by every task kind onto a freshly built task.
fn apply_common(task: &mut Task, options: &TaskOptions) -> Result<()> {
    if let Some(expression) = options.get_str("expression")? {
        task.expression = expression;
    }
    if let Some(timezone) = options.get_str("timezone")? {
        task.timezone = timezone;
    }
    if let Some(tracked) = options.get_bool("tracked")? {
        task.tracked = tracked;
    }
    if let Some(due) = options.get_bool("due")? {
        task.due = due;
    }
    if let Some(nice) = options.get_i64("nice")? {
        task.nice = i8::try_from(nice).map_err(|_| {
            TaskmillError::InvalidArgument(format!(
                "The nice value \"{nice}\" is out of range, expected -20..=19"
            ))
        })?;
    }
    task.state = TaskState::ReadyToExecute;
    task.validate()
}

fn required_name(options: &TaskOptions) -> Result<String> {
    options.get_str("name")?.ok_or_else(|| {
        TaskmillError::InvalidArgument("The \"name\" option is required to build a task".into())
    })
}

/// Builds no-op tasks (`type: "null"`).
#[derive(Debug, Default)]
pub struct NullBuilder;

impl BuilderStrategy for NullBuilder {
    fn support(&self, task_type: &str) -> bool {
        task_type == "null"
    }

    fn build(&self, options: &TaskOptions) -> Result<Task> {
        options.ensure_only(COMMON_KEYS)?;
        let mut task = Task::null(&required_name(options)?);
        apply_common(&mut task, options)?;
        Ok(task)
    }
}

/// Builds shell tasks (`type: "shell"`, requires `command`).
#[derive(Debug, Default)]
pub struct ShellBuilder;

impl BuilderStrategy for ShellBuilder {
    fn support(&self, task_type: &str) -> bool {
        task_type == "shell"
    }

    fn build(&self, options: &TaskOptions) -> Result<Task> {
        let mut allowed = COMMON_KEYS.to_vec();
        allowed.push("command");
        options.ensure_only(&allowed)?;
        let command = options.get_string_array("command")?.ok_or_else(|| {
            TaskmillError::InvalidArgument(
                "The \"command\" option is required to build a shell task".into(),
            )
        })?;
        let mut task = Task::shell(&required_name(options)?, command);
        apply_common(&mut task, options)?;
        Ok(task)
    }
}

/// Builds HTTP tasks (`type: "http"`, requires `url`, optional `method`).
#[derive(Debug, Default)]
pub struct HttpBuilder;

impl BuilderStrategy for HttpBuilder {
    fn support(&self, task_type: &str) -> bool {
        task_type == "http"
    }

    fn build(&self, options: &TaskOptions) -> Result<Task> {
        let mut allowed = COMMON_KEYS.to_vec();
        allowed.extend(["url", "method"]);
        options.ensure_only(&allowed)?;
        let url = options.get_str("url")?.ok_or_else(|| {
            TaskmillError::InvalidArgument(
                "The \"url\" option is required to build an http task".into(),
            )
        })?;
        let method = options.get_str("method")?.unwrap_or_else(|| "GET".to_string());
        let mut task = Task::http(&required_name(options)?, &url, &method);
        apply_common(&mut task, options)?;
        Ok(task)
    }
}

/// Orchestrator: scans registered sub-builders in order and delegates to the
/// first that supports the requested type. New task kinds are added purely by
/// registering a new strategy.
pub struct TaskBuilder {
    builders: Vec<Box<dyn BuilderStrategy>>,
}

impl TaskBuilder {
    pub fn new(builders: Vec<Box<dyn BuilderStrategy>>) -> Self {
        Self { builders }
    }

    /// Builder pre-loaded with every task kind this crate ships.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            Box::new(NullBuilder),
            Box::new(ShellBuilder),
            Box::new(HttpBuilder),
        ])
    }

    /// Build a task from an option mapping. The `type` key is required.
    pub fn create(&self, options: &TaskOptions) -> Result<Task> {
        let task_type = options.get_str("type")?.ok_or_else(|| {
            TaskmillError::InvalidArgument("The \"type\" option is required to build a task".into())
        })?;

        for builder in &self.builders {
            if !builder.support(&task_type) {
                continue;
            }
            return builder.build(options);
        }

        Err(TaskmillError::InvalidArgument(format!(
            "The task cannot be created as no builder has been defined for \"{task_type}\""
        )))
    }
}
