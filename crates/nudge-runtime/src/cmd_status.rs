//! `nudge status`: what occupies the slot and how much is queued.

use nudge_core::EngineSnapshot;
use nudge_core::protocol::Request;

use crate::client::rpc_call;

const DESCRIPTION_MAX_CHARS: usize = 60;

/// Fetch the engine snapshot from the daemon.
pub(crate) async fn fetch_snapshot(socket_path: &str) -> anyhow::Result<EngineSnapshot> {
    let result = rpc_call(socket_path, &Request::Status).await?;
    Ok(serde_json::from_value(result)?)
}

/// Entry point for `nudge status`.
pub async fn cmd_status(socket_path: &str, json: bool) -> anyhow::Result<()> {
    let snapshot = fetch_snapshot(socket_path).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", format_status_line(&snapshot));
    }
    Ok(())
}

/// One-line summary: `[kind] content description (+N queued)` or `idle`.
pub(crate) fn format_status_line(snapshot: &EngineSnapshot) -> String {
    let queued = match snapshot.queue_length {
        0 => String::new(),
        n => format!(" (+{n} queued)"),
    };

    match &snapshot.current {
        Some(n) => {
            let description = truncate(&n.description, DESCRIPTION_MAX_CHARS);
            let body = if n.content.is_empty() {
                description
            } else {
                format!("{} {description}", n.content)
            };
            format!("[{}] {body}{queued}", n.kind)
        }
        None => format!("idle{queued}"),
    }
}

/// Multi-line view used by `nudge watch`.
pub(crate) fn format_status_block(snapshot: &EngineSnapshot) -> String {
    let mut lines = vec![format_status_line(snapshot)];

    if let (Some(shown), Some(hide)) = (snapshot.shown_at_ms, snapshot.hide_at_ms) {
        let dwell = if snapshot.min_dwell_elapsed {
            "dwell met"
        } else {
            "in dwell"
        };
        lines.push(format!("  shown for up to {}ms, {dwell}", hide.saturating_sub(shown)));
    }

    for (i, n) in snapshot.pending.iter().enumerate() {
        lines.push(format!(
            "  {}. p{} [{}] {}",
            i + 1,
            n.priority,
            n.kind,
            truncate(&n.description, DESCRIPTION_MAX_CHARS)
        ));
    }

    if let Some(ctx) = &snapshot.current_context {
        lines.push(format!("  scene {ctx}"));
    }

    lines.join("\n")
}

/// Right-truncate to `max_chars` characters, appending `…` if truncated.
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}\u{2026}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudge_core::{NotificationEngine, RawNotification};

    fn snapshot_with(items: &[(&str, &str, &str)]) -> EngineSnapshot {
        let mut engine = NotificationEngine::default();
        for (i, (kind, content, desc)) in items.iter().enumerate() {
            engine.enqueue(RawNotification::new(*kind, *content, *desc), i as u64);
        }
        engine.snapshot()
    }

    #[test]
    fn idle_line() {
        assert_eq!(format_status_line(&snapshot_with(&[])), "idle");
    }

    #[test]
    fn displaying_line_with_queue() {
        let snap = snapshot_with(&[
            ("insight", "💡", "try the new API"),
            ("chat", "", "hi"),
            ("reaction", "", "ok"),
        ]);
        assert_eq!(format_status_line(&snap), "[insight] 💡 try the new API (+2 queued)");
    }

    #[test]
    fn line_without_content() {
        let snap = snapshot_with(&[("chat", "", "hello there")]);
        assert_eq!(format_status_line(&snap), "[chat] hello there");
    }

    #[test]
    fn block_lists_pending_in_order() {
        let snap = snapshot_with(&[
            ("insight", "", "a"),
            ("reaction", "", "b"),
            ("chat", "", "c"),
        ]);
        let block = format_status_block(&snap);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "[insight] a (+2 queued)");
        assert_eq!(lines[1], "  shown for up to 8000ms, in dwell");
        assert_eq!(lines[2], "  1. p2 [chat] c");
        assert_eq!(lines[3], "  2. p3 [reaction] b");
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd\u{2026}");
        assert_eq!(truncate("😀😀😀😀", 3), "😀😀\u{2026}");
    }
}
