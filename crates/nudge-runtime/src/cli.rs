//! CLI definition using clap derive.

use clap::{Parser, Subcommand};

use nudge_core::policy::{DEFAULT_MIN_DWELL_MS, DEFAULT_PENDING_CAPACITY};
use nudge_core::{EngineConfig, scene_hash};

#[derive(Parser)]
#[command(name = "nudge", about = "single-slot notification scheduler")]
pub struct Cli {
    /// UDS socket path (default: /tmp/nudge-$USER/nudged.sock)
    #[arg(long, short = 's', global = true)]
    pub socket_path: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the daemon (scheduler + UDS server)
    Daemon(DaemonOpts),
    /// Queue a single notification
    Enqueue(EnqueueOpts),
    /// Forward newline-delimited update objects from stdin
    Feed,
    /// Dismiss the displayed notification
    Dismiss,
    /// Set the current scene (optionally pruning stale notifications)
    SetContext(SetContextOpts),
    /// Drop pending notifications scoped to another scene
    ClearStale(SceneOpts),
    /// Show the displayed notification and queue length
    Status(StatusOpts),
    /// Live-refresh status view
    Watch(WatchOpts),
}

#[derive(clap::Args)]
pub struct DaemonOpts {
    /// Pending set capacity
    #[arg(long, default_value_t = DEFAULT_PENDING_CAPACITY)]
    pub capacity: usize,

    /// Minimum dwell before a notification has had a fair showing (ms)
    #[arg(long, default_value_t = DEFAULT_MIN_DWELL_MS)]
    pub min_dwell_ms: u64,
}

impl DaemonOpts {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.capacity, self.min_dwell_ms)
    }
}

#[derive(clap::Args)]
pub struct EnqueueOpts {
    /// Human-readable text
    pub description: String,

    /// Notification kind (insight, proactive, chat, reaction, observation)
    #[arg(long = "type", short = 't')]
    pub kind: Option<String>,

    /// Short glyph/icon payload
    #[arg(long, short = 'c', default_value = "")]
    pub content: String,

    /// Scene the notification is scoped to (defaults to the current scene)
    #[arg(long)]
    pub context: Option<String>,
}

#[derive(clap::Args)]
pub struct SceneOpts {
    /// Scene hash
    #[arg(long, conflicts_with_all = ["app", "window"])]
    pub hash: Option<String>,

    /// Active application name (hashed together with --window)
    #[arg(long, requires = "window")]
    pub app: Option<String>,

    /// Active window title (hashed together with --app)
    #[arg(long, requires = "app")]
    pub window: Option<String>,
}

impl SceneOpts {
    /// Resolve the scene hash from `--hash` or `--app` + `--window`.
    pub fn resolve(&self) -> anyhow::Result<String> {
        match (&self.hash, &self.app, &self.window) {
            (Some(hash), _, _) if !hash.is_empty() => Ok(hash.clone()),
            (_, Some(app), Some(window)) => Ok(scene_hash(app, window)),
            _ => anyhow::bail!("a scene is required: pass --hash or --app with --window"),
        }
    }
}

#[derive(clap::Args)]
pub struct SetContextOpts {
    #[command(flatten)]
    pub scene: SceneOpts,

    /// Also prune pending notifications scoped to other scenes
    #[arg(long)]
    pub prune: bool,
}

#[derive(clap::Args, Default)]
pub struct StatusOpts {
    /// Print the raw JSON snapshot
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct WatchOpts {
    /// Refresh interval in milliseconds
    #[arg(long, default_value = "500")]
    pub interval_ms: u64,
}

/// Default socket path using $USER for per-user isolation.
pub fn default_socket_path() -> String {
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        return format!("{dir}/nudge/nudged.sock");
    }
    let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
    format!("/tmp/nudge-{user}/nudged.sock")
}
