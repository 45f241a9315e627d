use anyhow::Context;
use clap::{Parser, ValueEnum};
use dyserver::admin_api::AdminApiServer;
use dyserver::config::{ServerConfig, StorageConfig};
use dyserver::{create_store, Dispatcher, MockServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Configurable mock HTTP endpoint server
#[derive(Parser, Debug)]
#[command(name = "dyserver", author, version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "DYSERVER_CONFIG")]
    config: Option<PathBuf>,

    /// Port for mocked endpoints (overrides listen.port)
    #[arg(short, long, env = "DYSERVER_PORT")]
    port: Option<u16>,

    /// Port for the admin API (overrides admin.port)
    #[arg(long, env = "DYSERVER_ADMIN_PORT")]
    admin_port: Option<u16>,

    /// Data directory for the file store (overrides storage.data_dir)
    #[arg(long, env = "DYSERVER_DATA_DIR", conflicts_with = "in_memory")]
    data_dir: Option<PathBuf>,

    /// Keep all state in memory
    #[arg(long)]
    in_memory: bool,

    /// Do not start the admin API
    #[arg(long)]
    no_admin: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(port) = self.port {
            config.listen.port = port;
        }
        if let Some(port) = self.admin_port {
            config.admin.port = port;
        }
        if let Some(data_dir) = &self.data_dir {
            config.storage = StorageConfig::File {
                data_dir: data_dir.clone(),
            };
        }
        if self.in_memory {
            config.storage = StorageConfig::Memory;
        }
        if self.no_admin {
            config.admin.enabled = false;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dyserver=info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let config = args.load_config()?;
    info!("Starting dyserver v{}", env!("CARGO_PKG_VERSION"));

    let store = create_store(&config.storage);
    let dispatcher = match config.random_seed {
        Some(seed) => {
            info!("Random selection seeded with {}", seed);
            Dispatcher::with_seed(Arc::clone(&store), seed)
        }
        None => Dispatcher::new(Arc::clone(&store)),
    };

    let mock = MockServer::bind(
        (config.listen.host.as_str(), config.listen.port),
        Arc::new(dispatcher),
    )
    .await
    .with_context(|| {
        format!(
            "Failed to bind mock listener on {}:{}",
            config.listen.host, config.listen.port
        )
    })?;

    let admin = if config.admin.enabled {
        let server = AdminApiServer::bind(
            (config.admin.host.as_str(), config.admin.port),
            Arc::clone(&store),
        )
        .await
        .with_context(|| {
            format!(
                "Failed to bind admin API on {}:{}",
                config.admin.host, config.admin.port
            )
        })?;
        Some(server)
    } else {
        info!("Admin API disabled");
        None
    };

    let admin_task = async move {
        match admin {
            Some(server) => server.run().await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        result = mock.run() => {
            if let Err(e) = &result {
                error!("Mock server stopped: {}", e);
            }
            result?;
        }
        result = admin_task => {
            if let Err(e) = &result {
                error!("Admin API stopped: {}", e);
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
        }
    }

    Ok(())
}
