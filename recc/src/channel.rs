//! Turns configured `host:port` endpoints into tonic channels. Channels are
//! cheap to clone and shared by every client bound to the same server.

use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use crate::config::Config;
use crate::errors::{Error, Result};

/// Builds a lazily-connecting channel for `server`. Plain `host:port`
/// strings get a scheme according to the TLS configuration; full URIs are
/// taken as-is.
pub fn channel_for(server: &str, config: &Config) -> Result<Channel> {
    let use_tls = config.server_ssl || config.server_auth_googleapi;
    let uri = if server.contains("://") {
        server.to_string()
    } else if use_tls {
        format!("https://{}", server)
    } else {
        format!("http://{}", server)
    };

    let mut endpoint = Endpoint::from_shared(uri.clone())
        .map_err(|e| Error::Config(format!("invalid server endpoint {:?}: {}", uri, e)))?;
    if use_tls || uri.starts_with("https://") {
        endpoint = endpoint
            .tls_config(ClientTlsConfig::new().with_native_roots())
            .map_err(|e| Error::Config(format!("TLS configuration failed: {}", e)))?;
    }
    Ok(endpoint.connect_lazy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plain_host_port_is_accepted() {
        let config = Config::default();
        assert!(channel_for("localhost:8085", &config).is_ok());
    }

    #[tokio::test]
    async fn explicit_scheme_is_kept() {
        let config = Config::default();
        assert!(channel_for("http://localhost:8085", &config).is_ok());
    }

    #[test]
    fn garbage_endpoints_are_config_errors() {
        let config = Config::default();
        match channel_for("not a uri", &config) {
            Err(Error::Config(_)) => {}
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
