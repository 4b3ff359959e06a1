use miette::Diagnostic;
use serde_json::{json, Value};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(
        code(calendly_mcp::environment),
        help("Set CALENDLY_API_KEY in the environment or in a .env file")
    )]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calendly_mcp::config))]
    Config(String),

    #[error("Invalid arguments: {0}")]
    #[diagnostic(code(calendly_mcp::invalid_arguments))]
    InvalidArguments(String),

    #[error("Unknown operation: {0}")]
    #[diagnostic(code(calendly_mcp::unknown_operation))]
    UnknownOperation(String),

    #[error("Transport error: {0}")]
    #[diagnostic(code(calendly_mcp::transport))]
    Transport(String),

    #[error("Calendly API returned HTTP {status}: {body}")]
    #[diagnostic(code(calendly_mcp::remote))]
    Remote { status: u16, body: String },

    #[error("Protocol error: {0}")]
    #[diagnostic(code(calendly_mcp::protocol))]
    Protocol(String),

    #[error(transparent)]
    #[diagnostic(code(calendly_mcp::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calendly_mcp::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(calendly_mcp::other))]
    Other(String),
}

impl Error {
    /// Stable, machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Environment(_) | Error::Config(_) => "configuration",
            Error::InvalidArguments(_) | Error::UnknownOperation(_) => "caller_error",
            Error::Transport(_) => "transport",
            Error::Remote { .. } => "remote_rejection",
            Error::Protocol(_) => "protocol",
            Error::Io(_) => "io",
            Error::Serialization(_) => "serialization",
            Error::Other(_) => "other",
        }
    }

    /// HTTP status reported by the remote service, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured form handed back to the agent.
    ///
    /// Remote rejections carry the upstream body untouched in `message`.
    pub fn to_payload(&self) -> Value {
        match self {
            Error::Remote { status, body } => json!({
                "error": true,
                "kind": self.kind(),
                "status_code": status,
                "message": body,
            }),
            other => json!({
                "error": true,
                "kind": other.kind(),
                "message": other.to_string(),
            }),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create caller errors
pub fn argument_error(message: &str) -> Error {
    Error::InvalidArguments(message.to_string())
}

/// Helper to create transport errors
pub fn transport_error(message: &str) -> Error {
    Error::Transport(message.to_string())
}

/// Helper to create protocol errors
pub fn protocol_error(message: &str) -> Error {
    Error::Protocol(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_payload_keeps_body_verbatim() {
        let err = Error::Remote {
            status: 422,
            body: r#"{"title":"Invalid Argument"}"#.to_string(),
        };

        let payload = err.to_payload();
        assert_eq!(payload["kind"], "remote_rejection");
        assert_eq!(payload["status_code"], 422);
        assert_eq!(payload["message"], r#"{"title":"Invalid Argument"}"#);
    }

    #[test]
    fn test_kinds_are_distinct() {
        let transport = transport_error("connection refused");
        let remote = Error::Remote {
            status: 404,
            body: String::new(),
        };

        assert_eq!(transport.kind(), "transport");
        assert_eq!(remote.kind(), "remote_rejection");
        assert!(transport.status_code().is_none());
        assert_eq!(remote.status_code(), Some(404));
        assert!(transport.to_payload().get("status_code").is_none());
    }

    #[test]
    fn test_caller_errors() {
        assert_eq!(argument_error("uuid is required").kind(), "caller_error");
        assert_eq!(
            Error::UnknownOperation("nope".to_string()).kind(),
            "caller_error"
        );
        assert_eq!(env_error("CALENDLY_API_KEY").kind(), "configuration");
    }
}
