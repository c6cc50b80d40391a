//! Clap derive structures for the `airscope` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// airscope -- single-host Wi-Fi survey and frame-capture service
#[derive(Debug, Parser)]
#[command(
    name = "airscope",
    version,
    about = "Survey nearby Wi-Fi networks and stream raw 802.11 frames",
    long_about = "Discovers nearby wireless networks through NetworkManager with a\n\
        wireless-tools fallback, serves the results over HTTP, and can place\n\
        an adapter into monitor mode to stream raw 802.11 frame metadata to\n\
        an MQTT broker.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to a TOML config file
    #[arg(long, env = "AIRSCOPE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Wireless interface to scan or capture on
    #[arg(long, short = 'i', env = "AIRSCOPE_INTERFACE", global = true)]
    pub interface: Option<String>,

    /// Output format for scan results
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve scan results over HTTP
    Serve(ServeArgs),

    /// Capture raw 802.11 frames and publish them to the message bus
    Sniff(SniffArgs),

    /// Run a one-shot network scan and print the results
    Scan,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Bind address (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port (overrides config)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Forward bus frames to WebSocket clients at /ws/live
    #[arg(long)]
    pub bridge: bool,
}

#[derive(Debug, Args)]
pub struct SniffArgs {
    /// Leave the adapter in monitor mode on exit
    #[arg(long)]
    pub keep_monitor: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
}
