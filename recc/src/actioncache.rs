//! Action Cache lookup. A NOT_FOUND here is a cache miss, not an error;
//! anything else non-OK goes through the retry driver.

use std::sync::Arc;

use recc_reapi::remote_execution::{self as re, action_cache_client::ActionCacheClient as Stub};
use tonic::transport::Channel;
use tracing::{debug, instrument};

use crate::auth::{self, AuthSession};
use crate::digest::Digest;
use crate::errors::Result;
use crate::retry::Retrier;

pub struct ActionCacheClient {
    client: Stub<Channel>,
    instance: String,
    auth: Option<Arc<AuthSession>>,
    retrier: Retrier,
}

impl ActionCacheClient {
    pub fn new(
        channel: Channel,
        instance: String,
        auth: Option<Arc<AuthSession>>,
        retrier: Retrier,
    ) -> Self {
        ActionCacheClient {
            client: Stub::new(channel),
            instance,
            auth,
            retrier,
        }
    }

    /// Looks up a previously computed result for the given Action digest.
    #[instrument(skip_all, fields(action = %action_digest))]
    pub async fn get_action_result(
        &self,
        action_digest: &Digest,
    ) -> Result<Option<re::ActionResult>> {
        let request = re::GetActionResultRequest {
            instance_name: self.instance.clone(),
            action_digest: Some(action_digest.into()),
        };
        let result = self
            .retrier
            .retry("GetActionResult", || {
                let mut client = self.client.clone();
                let request = request.clone();
                let auth = self.auth.clone();
                async move {
                    match client
                        .get_action_result(auth::request(request, auth.as_ref()))
                        .await
                    {
                        Ok(response) => Ok(Some(response.into_inner())),
                        Err(status) if status.code() == tonic::Code::NotFound => Ok(None),
                        Err(status) => Err(status),
                    }
                }
            })
            .await?;
        if result.is_some() {
            debug!("action cache hit");
        }
        Ok(result)
    }
}
