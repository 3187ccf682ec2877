//! UDS JSON-RPC server: minimal hand-rolled implementation.
//! Connection-per-request, newline-delimited JSON.

use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tokio::sync::{Mutex, Notify};

use nudge_core::NotificationEngine;
use nudge_core::protocol::Request;

use crate::scheduler::{DaemonState, log_events};

const PARSE_ERROR: i64 = -32700;

/// Socket file created by [`bind_socket`].
///
/// Remembers the inode it bound so shutdown only unlinks its own socket,
/// never one a later daemon has bound at the same path.
#[derive(Debug)]
pub struct SocketFile {
    path: PathBuf,
    dev: u64,
    ino: u64,
}

impl SocketFile {
    /// Unlink the socket if the path still refers to it.
    ///
    /// Returns `Ok(false)` when the path is gone or now names another file.
    pub fn remove(&self) -> std::io::Result<bool> {
        let meta = match std::fs::symlink_metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        if meta.dev() != self.dev || meta.ino() != self.ino {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)?;
        Ok(true)
    }
}

/// Create the socket directory and bind the listener.
///
/// A socket file nobody answers on is a leftover and gets replaced; one with
/// a live daemon behind it is an error.
pub async fn bind_socket(socket_path: &str) -> anyhow::Result<(UnixListener, SocketFile)> {
    // Create socket directory with mode 0700
    let socket_dir = Path::new(socket_path)
        .parent()
        .ok_or_else(|| anyhow::anyhow!("invalid socket path"))?;

    std::fs::create_dir_all(socket_dir)?;
    std::fs::set_permissions(socket_dir, std::fs::Permissions::from_mode(0o700))?;

    if Path::new(socket_path).exists() {
        if tokio::net::UnixStream::connect(socket_path).await.is_err() {
            std::fs::remove_file(socket_path)?;
            tracing::info!("removed stale socket at {socket_path}");
        } else {
            anyhow::bail!("another daemon is already running at {socket_path}");
        }
    }

    let listener = UnixListener::bind(socket_path)?;
    std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))?;

    let meta = std::fs::symlink_metadata(socket_path)?;
    let socket = SocketFile {
        path: PathBuf::from(socket_path),
        dev: meta.dev(),
        ino: meta.ino(),
    };

    tracing::info!("UDS server listening on {socket_path}");
    Ok((listener, socket))
}

/// Accept connections until the listener fails.
pub async fn serve(
    listener: UnixListener,
    state: Arc<Mutex<DaemonState>>,
    wake: Arc<Notify>,
) -> anyhow::Result<()> {
    loop {
        let (stream, _) = listener.accept().await?;
        let state = Arc::clone(&state);
        let wake = Arc::clone(&wake);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, state, wake).await {
                tracing::debug!("connection error: {e}");
            }
        });
    }
}

async fn handle_connection(
    stream: tokio::net::UnixStream,
    state: Arc<Mutex<DaemonState>>,
    wake: Arc<Notify>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    reader.read_line(&mut line).await?;

    let (response, mutated) = {
        let mut st = state.lock().await;
        let now = st.now_ms();
        handle_line(&mut st.engine, &line, now)
    };
    if mutated {
        wake.notify_one();
    }

    let mut resp = serde_json::to_string(&response)?;
    resp.push('\n');
    writer.write_all(resp.as_bytes()).await?;

    Ok(())
}

/// Handle one request line. Returns the JSON-RPC response and whether the
/// engine may have changed (the scheduler must re-arm its deadline).
pub(crate) fn handle_line(
    engine: &mut NotificationEngine,
    line: &str,
    now_ms: u64,
) -> (Value, bool) {
    let request: Value = match serde_json::from_str(line.trim()) {
        Ok(v) => v,
        Err(e) => return (error_response(Value::Null, PARSE_ERROR, &e.to_string()), false),
    };
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or("");
    let params = request.get("params").cloned().unwrap_or_else(|| json!({}));

    match Request::parse(method, &params) {
        Ok(req) => {
            let mutated = req.is_mutation();
            let result = dispatch(engine, req, now_ms);
            let response = json!({
                "jsonrpc": "2.0",
                "result": result,
                "id": id,
            });
            (response, mutated)
        }
        Err(e) => (error_response(id, e.code(), &e.to_string()), false),
    }
}

fn error_response(id: Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "error": {"code": code, "message": message},
        "id": id,
    })
}

/// Apply a request to the engine and build its result payload.
pub(crate) fn dispatch(engine: &mut NotificationEngine, request: Request, now_ms: u64) -> Value {
    match request {
        Request::Enqueue(raw) => {
            let outcome = engine.enqueue(raw, now_ms);
            tracing::debug!(id = %outcome.id, queue_length = engine.queue_length(), "enqueued");
            for evicted in &outcome.evicted {
                tracing::debug!(id = %evicted.id, kind = %evicted.kind, "evicted at capacity");
            }
            log_events(&outcome.events);
            json!({
                "id": outcome.id,
                "evicted": outcome.evicted.iter().map(|n| &n.id).collect::<Vec<_>>(),
                "is_displaying": engine.is_displaying(),
                "queue_length": engine.queue_length(),
            })
        }
        Request::Dismiss => {
            let report = engine.dismiss(now_ms);
            if let Some(d) = &report.dismissed {
                tracing::info!(
                    id = %d.notification.id,
                    early = d.early,
                    shown_for_ms = d.shown_for_ms,
                    "notification dismissed"
                );
            }
            log_events(&report.events);
            json!({
                "dismissed": report.dismissed.as_ref().map(|d| &d.notification.id),
                "early": report.dismissed.as_ref().is_some_and(|d| d.early),
            })
        }
        Request::ClearStale { context_hash } => {
            let outcome = engine.clear_stale(&context_hash, now_ms);
            prune_result(outcome)
        }
        Request::ChangeContext { context_hash } => {
            let outcome = engine.change_context(&context_hash, now_ms);
            prune_result(outcome)
        }
        Request::SetContext { context_hash } => {
            let changed = engine.set_context(&context_hash);
            if changed {
                tracing::debug!(context = %context_hash, "context changed");
            }
            json!({ "changed": changed })
        }
        Request::Current => json!(engine.current()),
        Request::Status => json!(engine.snapshot()),
    }
}

fn prune_result(outcome: nudge_core::PruneOutcome) -> Value {
    if outcome.context_changed {
        tracing::debug!(context = %outcome.target, "context changed");
    }
    if !outcome.pruned.is_empty() {
        tracing::debug!(
            target_scene = %outcome.target,
            pruned = outcome.pruned.len(),
            "pruned stale notifications"
        );
    }
    log_events(&outcome.events);
    json!({
        "pruned": outcome.pruned.len(),
        "context_changed": outcome.context_changed,
    })
}
