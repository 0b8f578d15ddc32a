use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use streamgate::Config;
use streamgate::security::{AesKey, EnvelopeCodec, ThreadRngTokenSource};

fn decrypt_envelope(
    config: &Config,
    ciphertext: &str,
    receive_id: Option<String>,
) -> Result<String> {
    let material = config
        .crypto_material()
        .context("load crypto material from config")?;
    let material = match receive_id {
        Some(receive_id) => material.with_recipient(receive_id),
        None => material,
    };
    let codec = EnvelopeCodec::new(Arc::new(material), Arc::new(ThreadRngTokenSource));
    codec.decrypt(ciphertext).context("decrypt envelope")
}

pub async fn dispatch(cli: Cli, config: Arc<Config>) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            if port == 0 {
                info!("Starting Streamgate on {host} (random port)");
            } else {
                info!("Starting Streamgate on {host}:{port}");
            }
            streamgate::transport::run_gateway(&host, port, Arc::clone(&config)).await
        }

        Commands::Keygen => {
            println!("{}", AesKey::generate().to_encoding_key());
            Ok(())
        }

        Commands::Decrypt {
            ciphertext,
            receive_id,
        } => {
            println!("{}", decrypt_envelope(&config, &ciphertext, receive_id)?);
            Ok(())
        }
    }
}
