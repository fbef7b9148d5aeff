mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wishr", version, about = "A shared wishlist for one wisher and their family")]
struct Cli {
    /// Owner or viewer secret (prompted for when needed and not given)
    #[arg(long, global = true, env = "WISHR_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Your name, used as the default buyer name
    #[arg(long, global = true, env = "WISHR_USER")]
    name: Option<String>,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context {
        secret: cli.secret,
        name: cli.name,
    };
    commands::run(cli.command, &ctx)
}
