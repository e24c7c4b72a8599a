//! JSON protocol spoken with provider binaries over stdin/stdout.
//!
//! One request line in, one response document out:
//!
//! ```text
//! > {"command":"fetch_planning","params":{"school":"isen"}}
//! < {"status":"success","data":[{"id":"a","title":"Math",...}]}
//! ```

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::event::Event;

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    FetchPlanning,
}

/// Request sent to the provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent back by the provider.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

/// Fetch the planning of the account the provider is configured for.
#[derive(Debug, Serialize, Deserialize)]
pub struct FetchPlanning {
    /// Provider-specific settings from the `[remote]` config table
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
}

impl ProviderCommand for FetchPlanning {
    type Response = Vec<Event>;
    fn command() -> Command {
        Command::FetchPlanning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let mut remote_config = serde_json::Map::new();
        remote_config.insert("school".into(), "isen".into());
        let params = serde_json::to_value(FetchPlanning { remote_config }).unwrap();

        let request = Request {
            command: FetchPlanning::command(),
            params,
        };

        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"command":"fetch_planning","params":{"school":"isen"}}"#
        );
    }

    #[test]
    fn test_response_variants() {
        let ok: Response<Vec<Event>> = serde_json::from_str(
            r#"{"status":"success","data":[{"id":"a","title":"Math","start":"2024-01-08T08:00+01:00","end":"2024-01-08T10:00+01:00"}]}"#,
        )
        .unwrap();
        assert!(matches!(ok, Response::Success { ref data } if data.len() == 1));

        let err: Response<Vec<Event>> =
            serde_json::from_str(r#"{"status":"error","error":"session expired"}"#).unwrap();
        assert!(matches!(err, Response::Error { ref error } if error == "session expired"));
    }
}
