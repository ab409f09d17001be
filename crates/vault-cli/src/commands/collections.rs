//! Collection command handlers

use anyhow::Result;

use vault_core::{Config, HttpNotesApi, NotesApi};

use super::with_hint;
use crate::output::Output;

/// List collections
///
/// A fixed collection set in the config is printed as-is, without asking
/// the server.
pub async fn list(config: &Config, output: &Output) -> Result<()> {
    if let Some(names) = &config.collections {
        output.print_collections(names);
        return Ok(());
    }

    let api = HttpNotesApi::from_config(config).map_err(with_hint)?;
    let names = fetch(&api).await?;
    output.print_collections(&names);
    Ok(())
}

async fn fetch<A: NotesApi>(api: &A) -> Result<Vec<String>> {
    api.list_collections().await.map_err(with_hint)
}
