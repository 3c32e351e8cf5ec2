//! Drives the server-streaming `Execute` RPC to completion. A dedicated
//! task reads Operations off the stream while the main task polls a
//! process-wide SIGINT flag, so a user interrupt turns into a best-effort
//! `CancelOperation` and exit code 130 within one poll interval.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use prost::Message;
use recc_reapi::google::longrunning::{
    operation, operations_client::OperationsClient, CancelOperationRequest, Operation,
};
use recc_reapi::remote_execution::{self as re, execution_client::ExecutionClient as ExecutionStub};
use tonic::transport::Channel;
use tracing::{debug, info, instrument, warn};

use crate::auth::{self, AuthSession};
use crate::cas::CasClient;
use crate::digest::Digest;
use crate::errors::{ensure_status_ok, Error, Result};
use crate::retry::Retrier;

/// How often the cancellation flag is checked while the Execute stream is
/// open.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

static SIGINT_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Installs the process-wide SIGINT listener. The flag is polled by
/// [ExecutionClient::execute_action]; outside of an Execute stream the
/// default Ctrl-C behavior applies.
pub fn install_sigint_handler() {
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            SIGINT_RECEIVED.store(true, Ordering::SeqCst);
        }
    });
}

pub fn cancellation_requested() -> bool {
    SIGINT_RECEIVED.load(Ordering::SeqCst)
}

/// stdout or stderr of a finished action: inline bytes when the server sent
/// them, otherwise a digest to fetch. Inline bytes win when both are set.
pub struct OutputBlob {
    inline: bool,
    data: Bytes,
    digest: Option<Digest>,
}

impl OutputBlob {
    pub fn new(raw: Bytes, digest: Option<re::Digest>) -> Self {
        let digest = digest.map(Digest::from);
        let inline = !raw.is_empty() || digest.as_ref().map_or(true, |d| d.size_bytes() == 0);
        OutputBlob {
            inline,
            data: raw,
            digest,
        }
    }

    pub async fn bytes(&self, cas: &CasClient) -> Result<Bytes> {
        if self.inline {
            return Ok(self.data.clone());
        }
        match &self.digest {
            Some(digest) => cas.fetch_blob(digest).await,
            None => Ok(self.data.clone()),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct OutputFile {
    pub digest: Digest,
    pub executable: bool,
}

/// An ActionResult with its output directories flattened into plain file
/// paths, ready for materialization.
pub struct ActionResult {
    pub exit_code: i32,
    pub stdout: OutputBlob,
    pub stderr: OutputBlob,
    pub output_files: BTreeMap<String, OutputFile>,
}

pub struct ExecutionClient {
    execution: ExecutionStub<Channel>,
    operations: OperationsClient<Channel>,
    instance: String,
    auth: Option<Arc<AuthSession>>,
    retrier: Retrier,
    poll_interval: Duration,
}

impl ExecutionClient {
    pub fn new(
        channel: Channel,
        instance: String,
        auth: Option<Arc<AuthSession>>,
        retrier: Retrier,
    ) -> Self {
        ExecutionClient {
            execution: ExecutionStub::new(channel.clone()),
            operations: OperationsClient::new(channel),
            instance,
            auth,
            retrier,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Runs the action with the given digest remotely, waiting for the
    /// Operation to finish. The Action and all its inputs must already be
    /// in CAS. Transient stream failures re-open the stream from scratch.
    #[instrument(skip_all, fields(action = %action_digest))]
    pub async fn execute_action(
        &self,
        action_digest: &Digest,
        skip_cache: bool,
    ) -> Result<re::ActionResult> {
        let request = re::ExecuteRequest {
            instance_name: self.instance.clone(),
            skip_cache_lookup: skip_cache,
            action_digest: Some(action_digest.into()),
        };

        let operation = self
            .retrier
            .retry("Execute", || {
                let client = self.execution.clone();
                let operations = self.operations.clone();
                let request = request.clone();
                let auth = self.auth.clone();
                let poll_interval = self.poll_interval;
                async move {
                    execute_attempt(client, operations, auth, request, poll_interval).await
                }
            })
            .await?;

        match operation {
            Some(operation) if operation.done => get_action_result(operation),
            _ => Err(Error::Protocol(
                "server closed stream before Operation finished".into(),
            )),
        }
    }
}

/// One attempt at the Execute stream. Returns the last Operation received
/// (which may not be done, if the server closed early); stream errors are
/// returned for the retry driver to classify.
async fn execute_attempt(
    mut client: ExecutionStub<Channel>,
    operations: OperationsClient<Channel>,
    auth: Option<Arc<AuthSession>>,
    request: re::ExecuteRequest,
    poll_interval: Duration,
) -> std::result::Result<Option<Operation>, tonic::Status> {
    let mut stream = client
        .execute(auth::request(request, auth.as_ref()))
        .await?
        .into_inner();

    // The stream read blocks until the server sends something, so it runs
    // on its own task and feeds a channel the select loop can poll.
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let reader = tokio::spawn(async move {
        loop {
            match stream.message().await {
                Ok(Some(operation)) => {
                    if tx.send(operation).is_err() {
                        return Ok(());
                    }
                }
                Ok(None) => return Ok(()),
                Err(status) => return Err(status),
            }
        }
    });

    let mut poll = tokio::time::interval(poll_interval);
    poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last: Option<Operation> = None;
    let mut operation_name = String::new();
    let finished = loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(operation) => {
                    if operation_name.is_empty() && !operation.name.is_empty() {
                        // The name is needed to cancel; remember the first
                        // one the server assigns.
                        operation_name = operation.name.clone();
                    }
                    let done = operation.done;
                    last = Some(operation);
                    if done {
                        break true;
                    }
                }
                None => break false,
            },
            _ = poll.tick() => {
                if cancellation_requested() {
                    debug!("cancellation requested");
                    if !operation_name.is_empty() {
                        cancel_operation(operations.clone(), auth.clone(), &operation_name).await;
                    }
                    // Conventional exit status for SIGINT.
                    std::process::exit(130);
                }
            }
        }
    };

    if finished {
        reader.abort();
        return Ok(last);
    }
    match reader.await {
        Ok(Ok(())) => Ok(last),
        Ok(Err(status)) => Err(status),
        Err(join_error) => Err(tonic::Status::internal(format!(
            "operation reader task failed: {}",
            join_error
        ))),
    }
}

/// Best-effort cancellation on a fresh client; the streaming call's context
/// cannot be reused for a second concurrent RPC.
async fn cancel_operation(
    mut operations: OperationsClient<Channel>,
    auth: Option<Arc<AuthSession>>,
    name: &str,
) {
    let request = CancelOperationRequest {
        name: name.to_string(),
    };
    match operations
        .cancel_operation(auth::request(request, auth.as_ref()))
        .await
    {
        Ok(_) => info!(operation = name, "cancelled remote job"),
        Err(status) => warn!(
            operation = name,
            code = ?status.code(),
            message = status.message(),
            "failed to cancel remote job"
        ),
    }
}

/// Extracts the ActionResult from a terminal Operation, surfacing the
/// operation error, a non-OK ExecuteResponse status, or a malformed
/// response payload.
pub fn get_action_result(operation: Operation) -> Result<re::ActionResult> {
    if !operation.done {
        return Err(Error::Protocol(
            "asked for the result of an unfinished Operation".into(),
        ));
    }
    match operation.result {
        None => Err(Error::Protocol(
            "terminal Operation carries neither error nor response".into(),
        )),
        Some(operation::Result::Error(status)) => {
            ensure_status_ok(&status)?;
            Err(Error::Protocol(
                "terminal Operation carries an empty error".into(),
            ))
        }
        Some(operation::Result::Response(any)) => {
            if !any
                .type_url
                .ends_with("build.bazel.remote.execution.v2.ExecuteResponse")
            {
                return Err(Error::Protocol(format!(
                    "server returned invalid Operation result ({})",
                    any.type_url
                )));
            }
            let response = re::ExecuteResponse::decode(any.value.as_slice())
                .map_err(|_| Error::Protocol("Operation response unpacking failed".into()))?;
            if let Some(status) = &response.status {
                ensure_status_ok(status)?;
            }
            Ok(response.result.unwrap_or_default())
        }
    }
}

/// Converts the wire ActionResult into the client-side form, fetching Tree
/// messages to flatten output directories into individual files.
pub async fn resolve_action_result(
    proto: re::ActionResult,
    cas: &CasClient,
) -> Result<ActionResult> {
    let mut output_files = BTreeMap::new();
    for file in &proto.output_files {
        let digest = file
            .digest
            .as_ref()
            .ok_or_else(|| Error::Protocol(format!("output file {} without digest", file.path)))?;
        output_files.insert(
            file.path.clone(),
            OutputFile {
                digest: digest.into(),
                executable: file.is_executable,
            },
        );
    }

    for directory in &proto.output_directories {
        let tree_digest = directory.tree_digest.as_ref().ok_or_else(|| {
            Error::Protocol(format!(
                "output directory {} without tree digest",
                directory.path
            ))
        })?;
        let tree: re::Tree = cas.fetch_message(&tree_digest.into()).await?;
        for (path, file) in flatten_tree(&directory.path, &tree)? {
            output_files.insert(path, file);
        }
    }

    Ok(ActionResult {
        exit_code: proto.exit_code,
        stdout: OutputBlob::new(proto.stdout_raw, proto.stdout_digest),
        stderr: OutputBlob::new(proto.stderr_raw, proto.stderr_digest),
        output_files,
    })
}

/// Walks a Tree message, producing `path -> file` entries rooted at
/// `prefix`. Children are looked up by the digest of their canonical
/// serialization.
fn flatten_tree(prefix: &str, tree: &re::Tree) -> Result<Vec<(String, OutputFile)>> {
    let root = tree
        .root
        .as_ref()
        .ok_or_else(|| Error::Protocol("Tree message without a root directory".into()))?;
    let children: HashMap<Digest, &re::Directory> = tree
        .children
        .iter()
        .map(|child| (Digest::of_message(child), child))
        .collect();

    let mut result = Vec::new();
    walk_tree(root, prefix, &children, &mut result)?;
    Ok(result)
}

fn walk_tree(
    directory: &re::Directory,
    prefix: &str,
    children: &HashMap<Digest, &re::Directory>,
    result: &mut Vec<(String, OutputFile)>,
) -> Result<()> {
    for file in &directory.files {
        let digest = file
            .digest
            .as_ref()
            .ok_or_else(|| Error::Protocol(format!("tree file {} without digest", file.name)))?;
        result.push((
            format!("{}/{}", prefix, file.name),
            OutputFile {
                digest: digest.into(),
                executable: file.is_executable,
            },
        ));
    }
    for subdirectory in &directory.directories {
        let digest: Digest = subdirectory
            .digest
            .as_ref()
            .ok_or_else(|| {
                Error::Protocol(format!("tree directory {} without digest", subdirectory.name))
            })?
            .into();
        let child = children.get(&digest).ok_or_else(|| {
            Error::Protocol(format!(
                "Tree is missing child directory {} ({})",
                subdirectory.name, digest
            ))
        })?;
        walk_tree(
            child,
            &format!("{}/{}", prefix, subdirectory.name),
            children,
            result,
        )?;
    }
    Ok(())
}

/// Materializes the output files under `root`, creating intermediate
/// directories and applying the executable bit.
pub async fn write_files_to_disk(result: &ActionResult, cas: &CasClient, root: &str) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    for (path, file) in &result.output_files {
        let local = Path::new(root).join(path);
        debug!(path = %local.display(), "writing output file");
        let data = cas.fetch_blob(&file.digest).await?;
        if let Some(parent) = local.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&local, &data).await?;
        if file.executable {
            let mut permissions = tokio::fs::metadata(&local).await?.permissions();
            permissions.set_mode(permissions.mode() | 0o111);
            tokio::fs::set_permissions(&local, permissions).await?;
        }
    }
    Ok(())
}
