//! TaskList — an ordered, name-keyed collection with transactional add.
//!
//! Replacing a task under an existing name keeps the original position;
//! iteration always follows insertion order.

use crate::error::Result;
use crate::task::Task;

/// Ordered, name-keyed task collection.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Build a list from tasks, applying the same per-task validation as
    /// [`add`](Self::add).
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Result<Self> {
        let mut list = Self::new();
        list.add(tasks)?;
        Ok(list)
    }

    /// Insert or replace each task by name. All-or-nothing per task: a task
    /// failing validation is removed again before the fault propagates, so
    /// the list never keeps a partially-inserted entry. Tasks inserted
    /// earlier in the same call remain. No-op on an empty iterator.
    pub fn add(&mut self, tasks: impl IntoIterator<Item = Task>) -> Result<()> {
        for task in tasks {
            let name = task.name.clone();
            self.insert(task);
            if let Err(err) = self.get(&name).map(Task::validate).unwrap_or(Ok(())) {
                self.remove(&name);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Insert or replace a single task by name, keeping the position of a
    /// replaced entry. Explicit-key write; routes through the same slot as
    /// [`add`] but skips validation.
    pub fn set(&mut self, task: Task) {
        self.insert(task);
    }

    fn insert(&mut self, task: Task) {
        match self.position(&task.name) {
            Some(idx) => self.tasks[idx] = task,
            None => self.tasks.push(task),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.name == name)
    }

    /// Whether a task with the given name exists.
    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Look up a task by name. A missing name is not a fault.
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Mutable lookup by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.name == name)
    }

    /// New list containing only tasks whose name is in `names`, preserving
    /// relative order.
    pub fn find_by_name(&self, names: &[&str]) -> Self {
        Self {
            tasks: self
                .tasks
                .iter()
                .filter(|t| names.contains(&t.name.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// New list containing only tasks satisfying the predicate. The
    /// predicate receives the task and its key (the name).
    pub fn filter(&self, predicate: impl Fn(&Task, &str) -> bool) -> Self {
        Self {
            tasks: self
                .tasks
                .iter()
                .filter(|t| predicate(t, &t.name))
                .cloned()
                .collect(),
        }
    }

    /// Remove a task by name. No-op (returns `None`) if absent.
    pub fn remove(&mut self, name: &str) -> Option<Task> {
        let idx = self.position(name)?;
        Some(self.tasks.remove(idx))
    }

    /// Number of tasks held.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterate over `(name, task)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Task)> {
        self.tasks.iter().map(|t| (t.name.as_str(), t))
    }

    /// Borrow the tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Consume the list, yielding tasks in insertion order.
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Clone the tasks out, in insertion order.
    pub fn to_vec(&self) -> Vec<Task> {
        self.tasks.clone()
    }
}

impl IntoIterator for TaskList {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

impl FromIterator<Task> for TaskList {
    /// Collect without validation; use [`TaskList::from_tasks`] when the
    /// transactional contract matters.
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut list = Self::new();
        for task in iter {
            list.set(task);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    #[test]
    fn test_add_is_unique_per_name() {
        let mut list = TaskList::new();
        let mut replacement = Task::null("foo");
        replacement.nice = 5;

        list.add([Task::null("foo"), Task::null("bar"), replacement]).unwrap();

        assert_eq!(list.len(), 2);
        // Last write wins, original position kept.
        assert_eq!(list.get("foo").unwrap().nice, 5);
        let names: Vec<&str> = list.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["foo", "bar"]);
    }

    #[test]
    fn test_add_empty_is_noop() {
        let mut list = TaskList::new();
        list.add([]).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_rolls_back_invalid_task() {
        let mut list = TaskList::new();
        let mut invalid = Task::null("bad");
        invalid.nice = 42;

        let result = list.add([Task::null("good"), invalid, Task::null("late")]);

        assert!(result.is_err());
        // Earlier successes remain, the faulting task does not, and the
        // batch stopped at the fault.
        assert!(list.has("good"));
        assert!(!list.has("bad"));
        assert!(!list.has("late"));
    }

    #[test]
    fn test_get_missing_is_none_not_a_fault() {
        let list = TaskList::new();
        assert!(list.get("ghost").is_none());
        assert!(!list.has("ghost"));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut list = TaskList::new();
        assert!(list.remove("ghost").is_none());
    }

    #[test]
    fn test_find_by_name_preserves_order() {
        let mut list = TaskList::new();
        list.add([Task::null("a"), Task::null("b"), Task::null("c")]).unwrap();

        let found = list.find_by_name(&["c", "a"]);
        let names: Vec<&str> = found.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn test_filter_sees_task_and_key() {
        let mut list = TaskList::new();
        let mut due = Task::null("due");
        due.due = true;
        list.add([due, Task::null("idle")]).unwrap();

        let filtered = list.filter(|task, name| task.is_due() && name == "due");
        assert_eq!(filtered.len(), 1);
        assert!(filtered.has("due"));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut list = TaskList::new();
        list.add([Task::null("x"), Task::null("y")]).unwrap();

        let mut replacement = Task::null("x");
        replacement.due = true;
        list.set(replacement);

        assert_eq!(list.len(), 2);
        assert!(list.get("x").unwrap().is_due());
        assert_eq!(list.iter().next().unwrap().0, "x");
    }
}
