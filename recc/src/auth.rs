//! Bearer-token handling for authenticated servers. The token lives in a
//! JSON file maintained by an external refresh helper; this module reads it,
//! attaches it to outgoing requests, and re-reads it when the server says
//! the current token is no longer valid.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::errors::{Error, Result};

#[derive(Deserialize)]
struct TokenFile {
    access_token: String,
}

/// A process-wide authentication session. Reads are cheap; refreshing is
/// serialized so concurrent RPC workers observing an expired token trigger
/// a single re-read.
pub struct AuthSession {
    path: PathBuf,
    access_token: RwLock<String>,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl AuthSession {
    /// Loads the token file, failing with a config error naming the path
    /// and what is wrong with it.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Arc<AuthSession>> {
        let path = path.into();
        let token = read_token(&path)?;
        Ok(Arc::new(AuthSession {
            path,
            access_token: RwLock::new(token),
            refresh_lock: tokio::sync::Mutex::new(()),
        }))
    }

    pub fn access_token(&self) -> String {
        self.access_token.read().expect("token lock poisoned").clone()
    }

    /// Re-reads the token file. The external refresh helper is responsible
    /// for rotating the file contents; callers racing here share one
    /// re-read.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn refresh(&self) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        let token = read_token(&self.path)?;
        debug!("refreshed access token");
        *self.access_token.write().expect("token lock poisoned") = token;
        Ok(())
    }
}

fn read_token(path: &std::path::Path) -> Result<String> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        Error::Auth(format!("cannot read JWT file {}: {}", path.display(), e))
    })?;
    let parsed: TokenFile = serde_json::from_str(&contents).map_err(|e| {
        Error::Auth(format!("malformed JWT file {}: {}", path.display(), e))
    })?;
    if parsed.access_token.is_empty() {
        return Err(Error::Auth(format!(
            "JWT file {} has an empty access_token field",
            path.display()
        )));
    }
    Ok(parsed.access_token)
}

/// Wraps a message into a request, attaching the `authorization` header
/// when a session is configured. Every RPC in the pipeline goes through
/// here so a refreshed token is picked up by the next attempt.
pub fn request<M>(message: M, auth: Option<&Arc<AuthSession>>) -> tonic::Request<M> {
    let mut request = tonic::Request::new(message);
    if let Some(session) = auth {
        if let Ok(value) = format!("Bearer {}", session.access_token()).parse() {
            request.metadata_mut().insert("authorization", value);
        }
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn token_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_access_token() {
        let file = token_file(r#"{"access_token": "tok-1", "refresh_token": "r"}"#);
        let session = AuthSession::from_file(file.path()).unwrap();
        assert_eq!(session.access_token(), "tok-1");
    }

    #[test]
    fn missing_file_and_missing_field_are_auth_errors() {
        assert!(matches!(
            AuthSession::from_file("/nonexistent/recc-jwt.json"),
            Err(Error::Auth(_))
        ));
        let file = token_file(r#"{"refresh_token": "r"}"#);
        assert!(matches!(
            AuthSession::from_file(file.path()),
            Err(Error::Auth(_))
        ));
        let file = token_file(r#"{"access_token": ""}"#);
        assert!(matches!(
            AuthSession::from_file(file.path()),
            Err(Error::Auth(_))
        ));
    }

    #[tokio::test]
    async fn refresh_rereads_the_file() {
        let file = token_file(r#"{"access_token": "old"}"#);
        let session = AuthSession::from_file(file.path()).unwrap();
        std::fs::write(file.path(), r#"{"access_token": "new"}"#).unwrap();
        session.refresh().await.unwrap();
        assert_eq!(session.access_token(), "new");
    }

    #[test]
    fn requests_carry_bearer_metadata() {
        let file = token_file(r#"{"access_token": "tok"}"#);
        let session = AuthSession::from_file(file.path()).unwrap();
        let req = request((), Some(&session));
        assert_eq!(
            req.metadata().get("authorization").unwrap(),
            "Bearer tok"
        );
        let req = request((), None);
        assert!(req.metadata().get("authorization").is_none());
    }
}
