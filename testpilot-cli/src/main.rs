use std::fmt::Display;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use server::ServeArgs;
use tracing::Instrument;
use tracing_chrome::ChromeLayerBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod ask;
mod server;

const DEFAULT_LOG_ENV: &str = "testpilot_server=debug,testpilot_core=debug,axum=info";

#[derive(Parser)]
struct Cli {
    /// Tracing output (chrome generates a trace-timestamp.json file).
    #[arg(long, default_value_t)]
    tracing: TracingArgs,
    #[command(subcommand)]
    runner: Runner,
}

#[derive(Subcommand)]
enum Runner {
    /// Run the prompt-relay server.
    Serve(ServeArgs),
    /// Run the prompt-relay server from a saved TOML config.
    ServeConfig {
        #[arg(long)]
        path: PathBuf,
    },
    /// Send a single prompt to the completion API and print the reply.
    Ask(ask::AskArgs),
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum TracingArgs {
    Chrome,
    #[default]
    Stdout,
    None,
}

impl Display for TracingArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TracingArgs::Chrome => write!(f, "chrome"),
            TracingArgs::Stdout => write!(f, "stdout"),
            TracingArgs::None => write!(f, "none"),
        }
    }
}

fn setup_tracing(tracing_args: TracingArgs) -> anyhow::Result<Option<Box<dyn Drop>>> {
    match tracing_args {
        TracingArgs::Chrome => {
            let (chrome_layer, guard) = ChromeLayerBuilder::new().build();
            tracing_subscriber::registry().with(chrome_layer).init();
            Ok(Some(Box::new(guard)))
        }
        TracingArgs::Stdout => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| DEFAULT_LOG_ENV.into()),
                )
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();

            tracing::info!("tracing started");

            Ok(None)
        }
        TracingArgs::None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let _guard = setup_tracing(args.tracing)?;
    match args.runner {
        Runner::Serve(args) => server::run(args).await,
        Runner::ServeConfig { path } => {
            let config = server::load_config(path).await?;
            let span = tracing::info_span!("run_server span");
            testpilot_server::run_server(config).instrument(span).await
        }
        Runner::Ask(args) => ask::run(args).await,
    }
}
