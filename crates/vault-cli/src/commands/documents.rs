//! Document command handlers
//!
//! Each command drives the sync client with a [`ConsoleView`], so the
//! terminal shows the same re-fetched list the TUI would after a change.

use anyhow::{bail, Result};

use vault_core::{
    Config, DocumentId, FetchOutcome, HttpNotesApi, MutationOutcome, NotesApi, SyncClient,
};

use super::with_hint;
use crate::console::ConsoleView;
use crate::editor::{confirm, edit_note_content};
use crate::output::Output;

type ConsoleClient<'a, A> = SyncClient<A, ConsoleView<'a>>;

fn console_client<'a>(
    config: &Config,
    output: &'a Output,
) -> Result<ConsoleClient<'a, HttpNotesApi>> {
    let api = HttpNotesApi::from_config(config).map_err(with_hint)?;
    Ok(SyncClient::new(api, ConsoleView::new(output)))
}

/// List the documents of a collection
pub async fn list(config: &Config, collection: String, output: &Output) -> Result<()> {
    let client = console_client(config, output)?;
    list_with(&client, &collection).await
}

/// Add a document to a collection
///
/// Opens the editor for the content when none is given.
pub async fn add(
    config: &Config,
    collection: String,
    title: String,
    content: Option<String>,
    output: &Output,
) -> Result<()> {
    let content = match content {
        Some(c) => c,
        None => edit_note_content(&collection, &title)?,
    };

    let client = console_client(config, output)?;
    add_with(&client, &collection, &title, &content).await
}

/// Delete a document from a collection
pub async fn delete(
    config: &Config,
    collection: String,
    id: String,
    yes: bool,
    output: &Output,
) -> Result<()> {
    if output.should_prompt()
        && !yes
        && !confirm(&format!("Delete note {} from '{}'?", id, collection))?
    {
        output.message("Cancelled.");
        return Ok(());
    }

    let client = console_client(config, output)?;
    delete_with(&client, &collection, &DocumentId::new(id)).await
}

async fn list_with<A: NotesApi>(client: &ConsoleClient<'_, A>, collection: &str) -> Result<()> {
    match client.list_documents(collection).await {
        FetchOutcome::Loaded(_) => Ok(()),
        FetchOutcome::Failed(message) => {
            bail!("Failed to load notes from '{}': {}", collection, message)
        }
        FetchOutcome::Skipped => bail!("Collection name cannot be empty"),
    }
}

async fn add_with<A: NotesApi>(
    client: &ConsoleClient<'_, A>,
    collection: &str,
    title: &str,
    content: &str,
) -> Result<()> {
    match client.add_document(collection, title, content).await {
        MutationOutcome::Applied => Ok(()),
        MutationOutcome::Rejected(e) => Err(e.into()),
        MutationOutcome::Failed(message) => bail!(message),
    }
}

async fn delete_with<A: NotesApi>(
    client: &ConsoleClient<'_, A>,
    collection: &str,
    id: &DocumentId,
) -> Result<()> {
    match client.delete_document(collection, id).await {
        MutationOutcome::Applied => Ok(()),
        MutationOutcome::Rejected(e) => Err(e.into()),
        MutationOutcome::Failed(message) => bail!(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_core::test_utils::{ApiCall, FakeApi};
    use vault_core::Document;

    use crate::output::OutputFormat;

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[tokio::test]
    async fn test_list_unknown_collection_fails() {
        let output = quiet();
        let client = SyncClient::new(FakeApi::new(), ConsoleView::new(&output));

        let err = list_with(&client, "missing").await.unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn test_list_blank_name_sends_nothing() {
        let output = quiet();
        let client = SyncClient::new(FakeApi::new(), ConsoleView::new(&output));

        assert!(list_with(&client, "  ").await.is_err());
        assert!(client.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_posts_then_refetches() {
        let output = quiet();
        let api = FakeApi::new().with_collection("notes", vec![]);
        let client = SyncClient::new(api, ConsoleView::new(&output));

        add_with(&client, "notes", "Title", "Body").await.unwrap();

        assert_eq!(
            client.api().calls(),
            vec![
                ApiCall::AddDocument {
                    collection: "notes".to_string(),
                    title: "Title".to_string(),
                    content: "Body".to_string(),
                },
                ApiCall::ListDocuments("notes".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_add_blank_content_is_rejected() {
        let output = quiet();
        let api = FakeApi::new().with_collection("notes", vec![]);
        let client = SyncClient::new(api, ConsoleView::new(&output));

        let err = add_with(&client, "notes", "Title", "   ").await.unwrap_err();
        assert_eq!(err.to_string(), "Content cannot be empty");
        assert!(client.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_still_refetches() {
        let output = quiet();
        let api = FakeApi::new().with_collection("notes", vec![Document::with_id("1", "a", "b")]);
        let client = SyncClient::new(api, ConsoleView::new(&output));

        let err = delete_with(&client, "notes", &DocumentId::new("2"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to delete note"));
        assert_eq!(
            client.api().calls().last(),
            Some(&ApiCall::ListDocuments("notes".to_string()))
        );
    }
}
