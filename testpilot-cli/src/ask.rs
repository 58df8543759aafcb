use clap::Parser;
use testpilot_core::{CompletionClient, RelayConfig};

#[derive(Parser, Clone, Debug)]
pub struct AskArgs {
    /// The prompt to send.
    prompt: String,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = RelayConfig::load()?;
    let client = CompletionClient::from_env(&config)?;

    let reply = client.complete(&args.prompt).await?;
    println!("{reply}");

    Ok(())
}
