pub use error::{Error, Result};
pub use server::{build_service, Config, Context, HttpServer, Json};

use tracing::instrument;

mod error;
mod handlers;
mod server;

#[instrument]
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let context = Context::new(&config)?;

    let server = server::HttpServerBuilder::default()
        .config(config)
        .context(context)
        .build()?;

    server.start().await
}
