use std::{
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

use clap::Parser;
use testpilot_core::{config::DEFAULT_CONFIG_DIR, RelayConfig};
use testpilot_server::Config;
use tracing::instrument;

const DEFAULT_HOST_ADDR: &str = "::1";
const DEFAULT_HOST_PORT: u16 = 8080;

#[derive(Parser, Clone, Debug, PartialEq)]
pub struct ServeArgs {
    #[arg(long, default_value = DEFAULT_HOST_ADDR)]
    ip: String,
    #[arg(long, default_value_t = DEFAULT_HOST_PORT)]
    port: u16,
    /// Where server configs are stored
    #[arg(long, default_value = DEFAULT_CONFIG_DIR)]
    config_dir: PathBuf,
    /// An optional name of this config to save to [`ServeArgs::config_dir`]
    #[arg(long)]
    save_config: Option<String>,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            ip: DEFAULT_HOST_ADDR.to_string(),
            port: DEFAULT_HOST_PORT,
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            save_config: None,
        }
    }
}

impl TryFrom<ServeArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(value: ServeArgs) -> anyhow::Result<Self> {
        let ServeArgs { ip, port, .. } = value;

        let relay = RelayConfig::load()?;

        let address: IpAddr = ip.parse()?;
        let full_address = SocketAddr::new(address, port);
        Ok(Config::new(full_address, relay))
    }
}

pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    let config: Config = args.clone().try_into()?;

    if let Some(ref name) = args.save_config {
        tracing::info!(name, "saving config");
        save_config(args).await?;
    }

    tracing::info!(?config, "starting server");
    testpilot_server::run_server(config).await
}

#[instrument]
async fn save_config(args: ServeArgs) -> anyhow::Result<()> {
    let name = args.save_config.clone().expect("no config name given!");
    let filename = format!("server/{name}.toml");
    let path = args.config_dir.join(filename);
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let config: Config = args.clone().try_into()?;

    let contents = toml::to_string(&config)?;
    tokio::fs::write(path, contents).await?;

    Ok(())
}

pub async fn load_config(path: impl AsRef<Path>) -> anyhow::Result<Config> {
    let path = path.as_ref();
    tracing::info!(?path, "loading config");
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(toml::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parser_is_valid() {
        ServeArgs::command().debug_assert();
    }

    #[test]
    fn default_config_works() {
        let default_args = ServeArgs::default();
        let _config: Config = default_args
            .try_into()
            .expect("server Config should work with default args");
    }

    #[tokio::test]
    async fn saved_config_loads_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let args = ServeArgs {
            config_dir: dir.path().to_path_buf(),
            save_config: Some("test".to_string()),
            ..ServeArgs::default()
        };

        save_config(args.clone()).await.expect("config should save");

        let path = dir.path().join("server/test.toml");
        let config = load_config(&path).await.expect("config should load");
        assert_eq!(config.socket_addr.port(), DEFAULT_HOST_PORT);

        let contents = tokio::fs::read_to_string(&path).await.expect("read back");
        assert!(
            !contents.contains("api_key"),
            "saved config must never contain the credential"
        );
    }
}
