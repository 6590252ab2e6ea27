//! Opaque identifiers handed out by the art service.
//!
//! The service returns image, job and output ids either as JSON strings or
//! as integers depending on the deployment. [`RemoteId`] keeps whichever
//! form arrived so it can be echoed back unchanged, and displays as the
//! plain text interpolated into URLs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a remote image, job or output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(i64),
    Text(String),
}

impl RemoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self::Text(id.into())
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteId::Number(n) => write!(f, "{n}"),
            RemoteId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RemoteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RemoteId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl From<i64> for RemoteId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_string_ids() {
        let id: RemoteId = serde_json::from_str(r#""5f2a-b""#).unwrap();
        assert_eq!(id, RemoteId::new("5f2a-b"));
        assert_eq!(id.to_string(), "5f2a-b");
    }

    #[test]
    fn accepts_integer_ids() {
        let id: RemoteId = serde_json::from_str("42").unwrap();
        assert_eq!(id, RemoteId::Number(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_other_json_types() {
        assert!(serde_json::from_str::<RemoteId>("[1]").is_err());
        assert!(serde_json::from_str::<RemoteId>("null").is_err());
        assert!(serde_json::from_str::<RemoteId>("1.5").is_err());
    }

    #[test]
    fn echoes_the_form_it_arrived_in() {
        assert_eq!(serde_json::to_string(&RemoteId::new("abc")).unwrap(), r#""abc""#);
        assert_eq!(serde_json::to_string(&RemoteId::from(7)).unwrap(), "7");
    }
}
