//! One-shot control subcommands: enqueue, dismiss, set-context, clear-stale.

use nudge_core::RawNotification;
use nudge_core::protocol::Request;

use crate::cli::{EnqueueOpts, SceneOpts, SetContextOpts};
use crate::client::rpc_call;

pub(crate) fn enqueue_request(opts: EnqueueOpts) -> Request {
    Request::Enqueue(RawNotification {
        kind: opts.kind,
        content: opts.content,
        description: opts.description,
        context_hash: opts.context,
    })
}

pub(crate) fn set_context_request(opts: &SetContextOpts) -> anyhow::Result<Request> {
    let context_hash = opts.scene.resolve()?;
    Ok(if opts.prune {
        Request::ChangeContext { context_hash }
    } else {
        Request::SetContext { context_hash }
    })
}

pub(crate) fn clear_stale_request(opts: &SceneOpts) -> anyhow::Result<Request> {
    Ok(Request::ClearStale {
        context_hash: opts.resolve()?,
    })
}

/// Send a request and print its result as compact JSON.
pub async fn send(socket_path: &str, request: Request) -> anyhow::Result<()> {
    let result = rpc_call(socket_path, &request).await?;
    println!("{result}");
    Ok(())
}
