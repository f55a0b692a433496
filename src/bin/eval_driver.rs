use std::env;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use preclab::client::EvalClient;
use preclab::error::ClientError;
use preclab::logging::{init_logging, LogOptions};
use preclab::optimize::NelderMead;

#[derive(Parser, Debug)]
#[command(name = "eval_driver")]
#[command(about = "Minimizes the evaluation server's function with Nelder-Mead")]
struct Args {
    /// Server executable, defaults to eval_server next to this binary
    #[arg(long)]
    server: Option<PathBuf>,

    #[arg(long, default_value_t = 2.0, allow_hyphen_values = true)]
    x0: f64,

    #[arg(long, default_value_t = 2.0, allow_hyphen_values = true)]
    y0: f64,

    #[arg(long, default_value_t = 1e-10)]
    ftol: f64,

    #[arg(long, default_value_t = 1e-4)]
    xtol: f64,

    #[arg(long)]
    max_iterations: Option<usize>,

    #[arg(long, default_value = "warn")]
    log_level: String,

    #[arg(long)]
    log_json: bool,
}

fn server_path(args: &Args) -> Result<PathBuf> {
    if let Some(path) = &args.server {
        return Ok(path.clone());
    }
    let exe = env::current_exe().context("cannot locate the running executable")?;
    let dir = exe.parent().context("executable has no parent directory")?;
    Ok(dir.join(format!("eval_server{}", env::consts::EXE_SUFFIX)))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&LogOptions { level: args.log_level.clone(), json: args.log_json });

    let path = server_path(&args)?;
    let mut client = EvalClient::spawn(Command::new(&path))
        .with_context(|| format!("cannot start {}", path.display()))?;
    println!("{}", client.banner());

    let solver = NelderMead {
        ftol: args.ftol,
        xtol: args.xtol,
        max_iterations: args.max_iterations,
        ..NelderMead::default()
    };
    let min = solver.minimize(&[args.x0, args.y0], |p| {
        let value = client.evaluate(p[0], p[1])?;
        println!("x={:.6e} y={:.6e} f(x,y)={:.16}", p[0], p[1], value);
        Ok::<_, ClientError>(value)
    })?;

    if !min.converged {
        warn!(iterations = min.iterations, "stopped before reaching tolerance");
    }
    println!(
        "minimum f({:.6e}, {:.6e}) = {:.16} after {} iterations and {} evaluations",
        min.point[0], min.point[1], min.value, min.iterations, min.evaluations
    );

    let status = client.shutdown()?;
    if !status.success() {
        warn!(%status, "evaluation server exited abnormally");
    }
    Ok(())
}
