use std::sync::Arc;

use anyhow::Result;

use hdfilmizle::AddonConfig;

use super::service_for;

pub async fn cmd_serve(port: Option<u16>) -> Result<()> {
    let mut config = AddonConfig::from_env();
    if let Some(port) = port {
        config = config.with_port(port);
    }
    let port = config.port;
    hdfilmizle::addon::serve(Arc::new(service_for(config)?), port).await
}
