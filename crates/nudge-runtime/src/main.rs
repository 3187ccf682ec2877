//! nudge: single-slot notification scheduler daemon and CLI.
//! The daemon hosts the engine on a single-threaded event loop; every other
//! subcommand talks to it over the UDS JSON-RPC socket.

use clap::Parser;

mod cli;
mod client;
mod cmd_control;
mod cmd_feed;
mod cmd_status;
mod cmd_watch;
mod scheduler;
mod server;

fn init_tracing() {
    let filter = std::env::var("NUDGE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    let socket_path = args.socket_path.unwrap_or_else(cli::default_socket_path);

    match args.command {
        cli::Command::Daemon(opts) => {
            init_tracing();
            tracing::info!("nudge daemon starting");
            scheduler::run_daemon(opts, &socket_path).await?;
        }
        cli::Command::Enqueue(opts) => {
            cmd_control::send(&socket_path, cmd_control::enqueue_request(opts)).await?;
        }
        cli::Command::Feed => {
            init_tracing();
            cmd_feed::cmd_feed(&socket_path).await?;
        }
        cli::Command::Dismiss => {
            cmd_control::send(&socket_path, nudge_core::protocol::Request::Dismiss).await?;
        }
        cli::Command::SetContext(opts) => {
            let request = cmd_control::set_context_request(&opts)?;
            cmd_control::send(&socket_path, request).await?;
        }
        cli::Command::ClearStale(opts) => {
            let request = cmd_control::clear_stale_request(&opts)?;
            cmd_control::send(&socket_path, request).await?;
        }
        cli::Command::Status(opts) => {
            cmd_status::cmd_status(&socket_path, opts.json).await?;
        }
        cli::Command::Watch(opts) => {
            cmd_watch::cmd_watch(&socket_path, opts.interval_ms).await?;
        }
    }

    Ok(())
}
