use thiserror::Error;

/// Errors surfaced by the remote dispatch pipeline.
///
/// Transient RPC failures never reach callers of [crate::retry::Retrier];
/// everything here is either terminal for the current invocation or an
/// instruction to fall back to local execution (see the orchestrator in
/// `main.rs`).
#[derive(Debug, Error)]
pub enum Error {
    #[error("usage error: {0}")]
    Usage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The local dependency-discovery command failed; its exit status is
    /// forwarded so the caller can rerun the command locally and let the
    /// compiler print its own diagnostics.
    #[error("dependency command exited with status {exit_code}")]
    SubprocessFailed { exit_code: i32 },

    /// A non-retryable gRPC status.
    #[error("gRPC error {}: {}", .0.code() as i32, .0.message())]
    Rpc(tonic::Status),

    #[error("Retry limit exceeded. Last gRPC error was {code}: {message}")]
    RetryLimitExceeded { code: i32, message: String },

    /// The server sent something the protocol does not allow (malformed
    /// Operation, missing response, unexpected payload type).
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("auth error: {0}")]
    Auth(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        Error::Rpc(status)
    }
}

impl From<prost::DecodeError> for Error {
    fn from(e: prost::DecodeError) -> Self {
        Error::Protocol(format!("message decoding failed: {}", e))
    }
}

/// Checks an embedded `google.rpc.Status` the way gRPC statuses are checked.
pub fn ensure_status_ok(status: &recc_reapi::google::rpc::Status) -> Result<()> {
    if status.code == tonic::Code::Ok as i32 {
        Ok(())
    } else {
        Err(Error::Rpc(tonic::Status::new(
            tonic::Code::from(status.code),
            status.message.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_limit_exceeded_message() {
        let err = Error::RetryLimitExceeded {
            code: 14,
            message: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "Retry limit exceeded. Last gRPC error was 14: connection refused"
        );
    }

    #[test]
    fn embedded_status_round_trips_code() {
        let status = recc_reapi::google::rpc::Status {
            code: tonic::Code::NotFound as i32,
            message: "Blob not found".into(),
            details: vec![],
        };
        match ensure_status_ok(&status) {
            Err(Error::Rpc(s)) => {
                assert_eq!(s.code(), tonic::Code::NotFound);
                assert_eq!(s.message(), "Blob not found");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(ensure_status_ok(&Default::default()).is_ok());
    }
}
