use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use preclab::config::MalformedPolicy;
use preclab::logging::{init_logging, LogOptions};
use preclab::math::objective::Paraboloid;
use preclab::server::EvalServer;

#[derive(Parser, Debug)]
#[command(name = "eval_server")]
#[command(about = "Evaluates f(x, y) = x² + y² + 3 for each \"x y\" pair read from stdin")]
struct Args {
    /// Response to a request that cannot be parsed
    #[arg(long, value_enum, default_value_t = MalformedPolicy::Reply)]
    on_malformed: MalformedPolicy,

    #[arg(long, default_value = "warn")]
    log_level: String,

    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&LogOptions { level: args.log_level.clone(), json: args.log_json });

    let objective = Paraboloid::default();
    info!(%objective, policy = ?args.on_malformed, "serving");

    let server = EvalServer::new(objective, args.on_malformed);
    let summary = server
        .serve(io::stdin().lock(), io::stdout().lock())
        .context("evaluation loop failed")?;
    info!(answered = summary.answered, rejected = summary.rejected, "shutting down");
    Ok(())
}
