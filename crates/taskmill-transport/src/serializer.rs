//! Task serialization — the injected marshalling collaborator used by
//! transports that move tasks across a process boundary.

use taskmill_core::{Result, Task};

/// Opaque encode/decode service for tasks.
pub trait TaskSerializer: Send + Sync {
    fn serialize(&self, task: &Task) -> Result<Vec<u8>>;

    fn deserialize(&self, payload: &[u8]) -> Result<Task>;
}

/// JSON marshalling via serde.
#[derive(Debug, Default)]
pub struct JsonTaskSerializer;

impl TaskSerializer for JsonTaskSerializer {
    fn serialize(&self, task: &Task) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(task)?)
    }

    fn deserialize(&self, payload: &[u8]) -> Result<Task> {
        Ok(serde_json::from_slice(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let serializer = JsonTaskSerializer;
        let mut task = Task::null("foo");
        task.due = true;
        task.nice = -3;

        let bytes = serializer.serialize(&task).unwrap();
        let back = serializer.deserialize(&bytes).unwrap();
        assert_eq!(back.name, "foo");
        assert!(back.due);
        assert_eq!(back.nice, -3);
    }

    #[test]
    fn test_garbage_payload_is_a_serialization_error() {
        let serializer = JsonTaskSerializer;
        assert!(serializer.deserialize(b"not json").is_err());
    }
}
