//! oxide-cli
//!
//! Sample command-line host for the router.

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_cli_router::{Failure, Logging, Middleware, ParseOptions, Router, RouterOptions};

/// Routes its arguments through a handful of sample commands.
#[derive(Parser)]
#[command(name = "oxide-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, env = "OXIDE_CLI_VERBOSE")]
    verbose: bool,

    /// Arguments handed to the router (command first).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

/// Marks a run as handled by a command.
struct Handled;

const USAGE: &str = "\
usage: oxide-cli [-v] <command> [args]

commands:
  greet [name] [--shout]   print a greeting
  args [...]               print the parsed arguments as JSON
  fail                     fail on purpose";

fn build_router(args: Vec<String>) -> Router {
    let options = RouterOptions::new()
        .args(
            ParseOptions::new()
                .boolean("shout")
                .alias("n", "name")
                .default_value("name", "world"),
        )
        .default_argv(move || args.clone());

    Router::with_options(options)
        .middleware(Middleware::stage(|ctx, next| {
            Box::pin(async move {
                next.run(ctx).await?;
                if ctx.contains::<Handled>() {
                    Ok(())
                } else {
                    Err(Failure::msg(format!("unknown command `{}`\n\n{USAGE}", ctx.path)))
                }
            })
        }))
        .middleware(Logging::middleware())
        .route(
            "index",
            Middleware::handler(|ctx| {
                if ctx.path.is_empty() {
                    println!("{USAGE}");
                    ctx.insert(Handled);
                }
                Ok(())
            }),
        )
        .route(
            "greet",
            Middleware::handler(|ctx| {
                let name = ctx
                    .positional()
                    .first()
                    .cloned()
                    .or_else(|| ctx.args.get("name").map(ToString::to_string))
                    .unwrap_or_default();
                let greeting = format!("hello, {name}");
                if ctx.args.is_set("shout") {
                    println!("{}", greeting.to_uppercase());
                } else {
                    println!("{greeting}");
                }
                ctx.insert(Handled);
                Ok(())
            }),
        )
        .route(
            "args",
            Middleware::handler(|ctx| {
                println!("{}", serde_json::to_string_pretty(&ctx.args)?);
                ctx.insert(Handled);
                Ok(())
            }),
        )
        .route(
            "fail",
            Middleware::handler(|ctx| {
                ctx.insert(Handled);
                Err(Failure::msg("failed on request"))
            }),
        )
        .on_error(|err| error!(error = %err, "command failed"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let router = build_router(cli.args);
    router.run_default()?.await.map_err(Failure::into_shared)?;

    Ok(())
}
