//! Traffic-mirroring comparison proxy.
//!
//! Every inbound request is sent to a primary and a secondary upstream
//! concurrently. The primary's response is returned to the client; the two
//! responses are compared and one JSON line per request is written to stdout.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                 MIRROR PROXY                 │
//!                         │                                              │
//!   Client Request        │  ┌─────────┐    ┌──────────┐   ┌──────────┐  │
//!   ──────────────────────┼─▶│  http   │───▶│  mirror  │──▶│ upstream │──┼──▶ Primary
//!                         │  │ server  │    │dispatcher│   │  client  │──┼──▶ Secondary
//!                         │  └─────────┘    └────┬─────┘   └──────────┘  │
//!                         │                      │                       │
//!   Client Response       │                      ▼                       │
//!   ◀─────────────────────┼── primary ◀── ┌────────────┐                 │
//!                         │               │ comparison │──▶ stdout (JSON)│
//!                         │               └────────────┘                 │
//!                         │                                              │
//!                         │  config · observability · lifecycle          │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use mirror_proxy::config::load_config;
use mirror_proxy::lifecycle::startup;

#[derive(Parser)]
#[command(name = "mirror-proxy")]
#[command(about = "Mirror traffic to two upstreams and log how their responses differ", long_about = None)]
struct Args {
    /// Optional TOML configuration file; environment variables override it
    #[arg(short, long, env = "MIRROR_PROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    startup::run(config).await?;

    Ok(())
}
