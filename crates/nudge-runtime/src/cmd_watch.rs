//! `nudge watch`: live-refresh view of the display slot.

use std::time::Duration;

use crate::cmd_status::{fetch_snapshot, format_status_block};

/// Entry point for `nudge watch`.
pub async fn cmd_watch(socket_path: &str, interval_ms: u64) -> anyhow::Result<()> {
    let interval = Duration::from_millis(interval_ms.max(50));

    loop {
        // Clear screen + cursor home
        print!("\x1b[2J\x1b[H");

        match fetch_snapshot(socket_path).await {
            Ok(snapshot) => println!("{}", format_status_block(&snapshot)),
            Err(e) => println!("Cannot connect to daemon: {e}"),
        }

        println!("\nnudge watch \u{2014} Ctrl-C to quit");

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => { break; }
        }
    }

    Ok(())
}
