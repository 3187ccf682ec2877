//! `nudge feed`: forward backend update objects from stdin to the daemon.
//!
//! One JSON object per line, as answered by the backend's update poll.
//! Empty updates are skipped, malformed lines are logged and skipped.

use tokio::io::{AsyncBufReadExt, BufReader};

use nudge_core::feed::parse_update_line;
use nudge_core::protocol::Request;

use crate::client::rpc_call;

/// Counters reported when the feed ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FeedStats {
    pub forwarded: usize,
    pub empty: usize,
    pub malformed: usize,
}

/// Classify one line into a request, updating `stats`.
pub(crate) fn feed_request(line: &str, line_num: usize, stats: &mut FeedStats) -> Option<Request> {
    match parse_update_line(line) {
        Ok(Some(raw)) => {
            stats.forwarded += 1;
            Some(Request::Enqueue(raw))
        }
        Ok(None) => {
            stats.empty += 1;
            None
        }
        Err(e) => {
            stats.malformed += 1;
            tracing::warn!(line = line_num, "skipping update: {e}");
            None
        }
    }
}

/// Entry point for `nudge feed`.
pub async fn cmd_feed(socket_path: &str) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stats = FeedStats::default();
    let mut line_num = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_num += 1;
        if let Some(request) = feed_request(&line, line_num, &mut stats) {
            rpc_call(socket_path, &request).await?;
        }
    }

    tracing::info!(
        forwarded = stats.forwarded,
        empty = stats.empty,
        malformed = stats.malformed,
        "feed finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_input() {
        let input = [
            r#"{"type":"reaction","content":"😯","description":"wow"}"#,
            r#"{"type":"none"}"#,
            "",
            "garbage",
            r#"{"type":"reaction","content":"😯","description":"wow"}"#,
        ];
        let mut stats = FeedStats::default();
        let requests: Vec<_> = input
            .iter()
            .enumerate()
            .filter_map(|(i, line)| feed_request(line, i + 1, &mut stats))
            .collect();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
        assert_eq!(
            stats,
            FeedStats {
                forwarded: 2,
                empty: 2,
                malformed: 1,
            }
        );
    }
}
