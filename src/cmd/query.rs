use anyhow::Result;
use serde::Serialize;

use hdfilmizle::ContentKind;

use super::live_service;

pub async fn cmd_catalog(kind: ContentKind, search: Option<&str>) -> Result<()> {
    let service = live_service()?;
    print_json(&service.catalog(kind, search).await)
}

pub async fn cmd_meta(kind: ContentKind, id: &str) -> Result<()> {
    let service = live_service()?;
    print_json(&service.meta(kind, id).await)
}

pub async fn cmd_streams(kind: ContentKind, id: &str) -> Result<()> {
    let service = live_service()?;
    print_json(&service.streams(kind, id).await)
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
