//! Content Addressable Storage client: digest-deduplicated upload of the
//! input root and fetches of output blobs. Small blobs ride the batch RPCs,
//! large ones go through the byte-stream service.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures::stream::{StreamExt, TryStreamExt};
use recc_reapi::google::bytestream::{self as bs, byte_stream_client::ByteStreamClient};
use recc_reapi::remote_execution::{
    self as re, content_addressable_storage_client::ContentAddressableStorageClient,
};
use tonic::transport::Channel;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::auth::{self, AuthSession};
use crate::digest::Digest;
use crate::errors::{ensure_status_ok, Error, Result};
use crate::merkle::BlobMap;
use crate::retry::Retrier;

/// FindMissingBlobs requests are chunked to this many digests.
pub const MAX_MISSING_BLOBS_REQUEST_ITEMS: usize = 1 << 14;
/// Blobs up to this total ride in a BatchUpdateBlobs/BatchReadBlobs call;
/// anything larger is streamed. Slightly under 4 MiB to leave room for the
/// request envelope.
pub const MAX_TOTAL_BATCH_SIZE_BYTES: usize = 4 * 1024 * 1024 - 1024;
/// Chunk size for byte-stream writes.
pub const BYTESTREAM_CHUNK_SIZE: usize = 1 << 20;

pub struct CasClient {
    cas: ContentAddressableStorageClient<Channel>,
    bytestream: ByteStreamClient<Channel>,
    instance: String,
    /// Upload session id, part of every byte-stream write resource name.
    upload_id: Uuid,
    auth: Option<Arc<AuthSession>>,
    retrier: Retrier,
    max_concurrent: usize,
}

impl CasClient {
    pub fn new(
        channel: Channel,
        instance: String,
        auth: Option<Arc<AuthSession>>,
        retrier: Retrier,
        max_concurrent: usize,
    ) -> Self {
        CasClient {
            cas: ContentAddressableStorageClient::new(channel.clone()),
            bytestream: ByteStreamClient::new(channel),
            instance,
            upload_id: Uuid::new_v4(),
            auth,
            retrier,
            max_concurrent: max_concurrent.max(1),
        }
    }

    fn instance_prefix(&self) -> String {
        if self.instance.is_empty() {
            String::new()
        } else {
            format!("{}/", self.instance)
        }
    }

    fn upload_resource_name(&self, digest: &Digest) -> String {
        format!(
            "{}uploads/{}/blobs/{}/{}",
            self.instance_prefix(),
            self.upload_id,
            digest.hash(),
            digest.size_bytes()
        )
    }

    fn download_resource_name(&self, digest: &Digest) -> String {
        format!(
            "{}blobs/{}/{}",
            self.instance_prefix(),
            digest.hash(),
            digest.size_bytes()
        )
    }

    /// Uploads every blob the server doesn't already have. Blobs are
    /// deduplicated with FindMissingBlobs first; the survivors are packed
    /// into batch requests or streamed individually, with a bounded number
    /// of RPCs in flight.
    #[instrument(skip_all, fields(blobs = blobs.len()))]
    pub async fn upload_resources(&self, blobs: &BlobMap) -> Result<()> {
        let digests: Vec<Digest> = blobs.keys().cloned().collect();
        let mut missing: Vec<Digest> = Vec::new();
        for chunk in digests.chunks(MAX_MISSING_BLOBS_REQUEST_ITEMS) {
            let request = re::FindMissingBlobsRequest {
                instance_name: self.instance.clone(),
                blob_digests: chunk.iter().map(Into::into).collect(),
            };
            let response = self
                .retrier
                .retry("FindMissingBlobs", || {
                    let mut client = self.cas.clone();
                    let request = request.clone();
                    let auth = self.auth.clone();
                    async move {
                        client
                            .find_missing_blobs(auth::request(request, auth.as_ref()))
                            .await
                            .map(|r| r.into_inner())
                    }
                })
                .await?;
            missing.extend(response.missing_blob_digests.into_iter().map(Digest::from));
        }
        debug!(
            total = digests.len(),
            missing = missing.len(),
            "deduplicated blobs against CAS"
        );

        let mut small: Vec<(Digest, Bytes)> = Vec::new();
        let mut streamed: Vec<(Digest, Bytes)> = Vec::new();
        for digest in missing {
            let data = blobs.get(&digest).ok_or_else(|| {
                Error::Protocol(format!("CAS server requested nonexistent digest {}", digest))
            })?;
            if digest.size_bytes() > MAX_TOTAL_BATCH_SIZE_BYTES as i64 {
                streamed.push((digest, data.clone()));
            } else {
                small.push((digest, data.clone()));
            }
        }

        let mut uploads: Vec<futures::future::BoxFuture<'_, Result<()>>> = Vec::new();
        for batch in pack_batches(small, MAX_TOTAL_BATCH_SIZE_BYTES) {
            uploads.push(Box::pin(self.upload_batch(batch)));
        }
        for (digest, data) in streamed {
            uploads.push(Box::pin(self.upload_blob(digest, data)));
        }
        futures::stream::iter(uploads)
            .buffer_unordered(self.max_concurrent)
            .try_collect::<Vec<()>>()
            .await?;
        Ok(())
    }

    async fn upload_batch(&self, batch: Vec<(Digest, Bytes)>) -> Result<()> {
        let request = re::BatchUpdateBlobsRequest {
            instance_name: self.instance.clone(),
            requests: batch
                .iter()
                .map(|(digest, data)| re::batch_update_blobs_request::Request {
                    digest: Some(digest.into()),
                    data: data.clone(),
                })
                .collect(),
        };
        let response = self
            .retrier
            .retry("BatchUpdateBlobs", || {
                let mut client = self.cas.clone();
                let request = request.clone();
                let auth = self.auth.clone();
                async move {
                    client
                        .batch_update_blobs(auth::request(request, auth.as_ref()))
                        .await
                        .map(|r| r.into_inner())
                }
            })
            .await?;
        for blob_response in &response.responses {
            if let Some(status) = &blob_response.status {
                ensure_status_ok(status)?;
            }
        }
        Ok(())
    }

    /// Streams one large blob through `ByteStream.Write`. A committed size
    /// that disagrees with the blob length counts as a failed attempt.
    #[instrument(skip_all, fields(digest = %digest))]
    async fn upload_blob(&self, digest: Digest, data: Bytes) -> Result<()> {
        let resource_name = self.upload_resource_name(&digest);
        self.retrier
            .retry("ByteStream.Write", || {
                let mut client = self.bytestream.clone();
                let requests = write_requests(&resource_name, &data);
                let auth = self.auth.clone();
                let expected = digest.size_bytes();
                async move {
                    let response = client
                        .write(auth::request(tokio_stream::iter(requests), auth.as_ref()))
                        .await?
                        .into_inner();
                    if response.committed_size != expected {
                        return Err(tonic::Status::internal(format!(
                            "ByteStream upload committed {} of {} bytes",
                            response.committed_size, expected
                        )));
                    }
                    Ok(())
                }
            })
            .await
    }

    /// Fetches a blob, choosing batch or streaming reads by size.
    pub async fn fetch_blob(&self, digest: &Digest) -> Result<Bytes> {
        if digest.size_bytes() <= MAX_TOTAL_BATCH_SIZE_BYTES as i64 {
            self.fetch_blob_batched(digest).await
        } else {
            self.fetch_blob_streamed(digest).await
        }
    }

    /// Fetches a blob and decodes it as a proto message.
    pub async fn fetch_message<M: prost::Message + Default>(&self, digest: &Digest) -> Result<M> {
        let data = self.fetch_blob(digest).await?;
        Ok(M::decode(data)?)
    }

    async fn fetch_blob_batched(&self, digest: &Digest) -> Result<Bytes> {
        let request = re::BatchReadBlobsRequest {
            instance_name: self.instance.clone(),
            digests: vec![digest.into()],
        };
        let response = self
            .retrier
            .retry("BatchReadBlobs", || {
                let mut client = self.cas.clone();
                let request = request.clone();
                let auth = self.auth.clone();
                async move {
                    client
                        .batch_read_blobs(auth::request(request, auth.as_ref()))
                        .await
                        .map(|r| r.into_inner())
                }
            })
            .await?;

        let blob_response = response.responses.into_iter().next().ok_or_else(|| {
            Error::Protocol(format!("BatchReadBlobs returned no entry for {}", digest))
        })?;
        if let Some(status) = &blob_response.status {
            ensure_status_ok(status)?;
        }
        Ok(blob_response.data)
    }

    /// Byte-stream read that picks up where the previous attempt stopped:
    /// each retry re-opens the stream at the offset already received.
    async fn fetch_blob_streamed(&self, digest: &Digest) -> Result<Bytes> {
        let resource_name = self.download_resource_name(digest);
        let buffer = Arc::new(tokio::sync::Mutex::new(BytesMut::new()));
        self.retrier
            .retry("ByteStream.Read", || {
                let mut client = self.bytestream.clone();
                let resource_name = resource_name.clone();
                let buffer = buffer.clone();
                let auth = self.auth.clone();
                async move {
                    let mut received = buffer.lock().await;
                    let request = bs::ReadRequest {
                        resource_name,
                        read_offset: received.len() as i64,
                        read_limit: 0,
                    };
                    let mut stream = client
                        .read(auth::request(request, auth.as_ref()))
                        .await?
                        .into_inner();
                    while let Some(response) = stream.message().await? {
                        received.extend_from_slice(&response.data);
                    }
                    Ok(())
                }
            })
            .await?;

        let buffer = Arc::try_unwrap(buffer)
            .map_err(|_| Error::Protocol("blob buffer still shared after fetch".into()))?;
        Ok(buffer.into_inner().freeze())
    }
}

/// Greedily packs `(digest, data)` pairs into batches whose accounted size
/// (payload plus hash text) stays under `limit`. Callers must route blobs
/// larger than `limit` to the byte stream instead.
fn pack_batches(items: Vec<(Digest, Bytes)>, limit: usize) -> Vec<Vec<(Digest, Bytes)>> {
    let mut batches = Vec::new();
    let mut current: Vec<(Digest, Bytes)> = Vec::new();
    let mut current_size = 0usize;
    for (digest, data) in items {
        let item_size = digest.size_bytes() as usize + digest.hash().len();
        if !current.is_empty() && current_size + item_size > limit {
            batches.push(std::mem::take(&mut current));
            current_size = 0;
        }
        current_size += item_size;
        current.push((digest, data));
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

fn write_requests(resource_name: &str, data: &Bytes) -> Vec<bs::WriteRequest> {
    if data.is_empty() {
        return vec![bs::WriteRequest {
            resource_name: resource_name.to_string(),
            write_offset: 0,
            finish_write: true,
            data: Bytes::new(),
        }];
    }
    let mut requests = Vec::new();
    let mut offset = 0usize;
    while offset < data.len() {
        let end = (offset + BYTESTREAM_CHUNK_SIZE).min(data.len());
        requests.push(bs::WriteRequest {
            // The resource name is only required on the first message.
            resource_name: if offset == 0 {
                resource_name.to_string()
            } else {
                String::new()
            },
            write_offset: offset as i64,
            finish_write: end == data.len(),
            data: data.slice(offset..end),
        });
        offset = end;
    }
    requests
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(content: &[u8]) -> (Digest, Bytes) {
        (Digest::of_bytes(content), Bytes::copy_from_slice(content))
    }

    fn sized_blob(size: usize) -> (Digest, Bytes) {
        let data = Bytes::from(vec![0u8; size]);
        (Digest::of_bytes(&data), data)
    }

    #[test]
    fn packs_everything_into_one_batch_when_it_fits() {
        let batches = pack_batches(vec![blob(b"a"), blob(b"b"), blob(b"c")], 1 << 20);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 3);
    }

    #[test]
    fn splits_batches_at_the_size_limit() {
        // Each entry accounts for 100 bytes of payload plus 64 hash chars.
        let items: Vec<_> = (0..10).map(|_| sized_blob(100)).collect();
        let batches = pack_batches(items, 400);
        // 164 * 2 = 328 fits, a third would exceed 400.
        assert!(batches.iter().all(|b| b.len() <= 2));
        assert_eq!(batches.iter().map(Vec::len).sum::<usize>(), 10);
    }

    #[test]
    fn single_oversized_item_still_gets_a_batch() {
        let batches = pack_batches(vec![sized_blob(1000)], 10);
        assert_eq!(batches.len(), 1);
    }

    #[test]
    fn write_requests_chunk_and_finish() {
        let (_, data) = sized_blob(BYTESTREAM_CHUNK_SIZE + 5);
        let requests = write_requests("res", &data);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].resource_name, "res");
        assert_eq!(requests[0].write_offset, 0);
        assert!(!requests[0].finish_write);
        assert_eq!(requests[0].data.len(), BYTESTREAM_CHUNK_SIZE);
        assert_eq!(requests[1].resource_name, "");
        assert_eq!(requests[1].write_offset, BYTESTREAM_CHUNK_SIZE as i64);
        assert!(requests[1].finish_write);
        assert_eq!(requests[1].data.len(), 5);
    }

    #[test]
    fn empty_blob_writes_a_single_finishing_request() {
        let requests = write_requests("res", &Bytes::new());
        assert_eq!(requests.len(), 1);
        assert!(requests[0].finish_write);
        assert_eq!(requests[0].resource_name, "res");
    }

    #[tokio::test]
    async fn resource_names_include_instance_and_digest() {
        let retrier = Retrier::new(0, std::time::Duration::from_millis(1), None);
        let channel =
            tonic::transport::Endpoint::from_static("http://localhost:1").connect_lazy();
        let client = CasClient::new(channel, "main".to_string(), None, retrier, 4);

        let digest = Digest::of_bytes(b"abc");
        assert_eq!(
            client.download_resource_name(&digest),
            format!("main/blobs/{}/3", digest.hash())
        );
        let upload = client.upload_resource_name(&digest);
        assert!(upload.starts_with("main/uploads/"));
        assert!(upload.ends_with(&format!("/blobs/{}/3", digest.hash())));
    }
}
