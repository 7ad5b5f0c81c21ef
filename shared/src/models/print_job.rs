//! Print Job Model

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque job identifier assigned by the remote queue
///
/// The queue sends either a number or a string; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => JobId(s),
            Raw::Number(n) => JobId(n.to_string()),
        })
    }
}

/// A pending job observed on the remote print queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: JobId,
    /// Logical destination ("Kitchen", "Bar"), used for routing only
    #[serde(alias = "zona")]
    pub zone: String,
    /// Ticket payload as formed by the server
    #[serde(default, alias = "contenido")]
    pub content: Option<serde_json::Value>,
}

impl PrintJob {
    /// The job content, if the server supplied any
    ///
    /// JSON `null` and empty strings count as missing.
    pub fn content(&self) -> Option<&serde_json::Value> {
        match &self.content {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) if s.trim().is_empty() => None,
            Some(value) => Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_id_from_number_or_string() {
        let job: PrintJob = serde_json::from_value(json!({"id": 42, "zone": "Kitchen"})).unwrap();
        assert_eq!(job.id, JobId::from(42));

        let job: PrintJob =
            serde_json::from_value(json!({"id": "a1b2", "zone": "Bar"})).unwrap();
        assert_eq!(job.id.as_str(), "a1b2");
    }

    #[test]
    fn test_legacy_field_names() {
        let job: PrintJob = serde_json::from_value(json!({
            "id": 7,
            "zona": "Cocina",
            "contenido": {"titulo": "NUEVO PEDIDO"}
        }))
        .unwrap();
        assert_eq!(job.zone, "Cocina");
        assert!(job.content().is_some());
    }

    #[test]
    fn test_missing_content() {
        let absent: PrintJob = serde_json::from_value(json!({"id": 1, "zone": "Bar"})).unwrap();
        assert!(absent.content().is_none());

        let null: PrintJob =
            serde_json::from_value(json!({"id": 1, "zone": "Bar", "content": null})).unwrap();
        assert!(null.content().is_none());

        let blank: PrintJob =
            serde_json::from_value(json!({"id": 1, "zone": "Bar", "content": "  "})).unwrap();
        assert!(blank.content().is_none());
    }
}
