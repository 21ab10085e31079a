//! Suggestions driven in the background through tickets.

use super::helpers::{StalledGenerator, editor_over, replying_editor, slot};
use rstest::rstest;
use taskdeck::task::{adapters::memory::InMemorySlot, services::SuggestionError};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn background_outcome_is_merged(slot: InMemorySlot) -> Result<(), eyre::Report> {
    let mut editor = replying_editor(&slot, "- a\n- b\n- c");
    editor.set_title("Spawned");

    let ticket = editor.begin_suggestions()?;
    let service = editor.suggestions().clone();
    let request = ticket.request().clone();
    let cancel = ticket.cancellation().clone();
    let handle = tokio::spawn(async move { service.suggest(&request, &cancel).await });

    eyre::ensure!(editor.is_generating(), "request should be in flight");
    let outcome = handle.await?;
    let merged = editor.complete_suggestions(ticket.id(), outcome)?;

    eyre::ensure!(merged == 3, "expected three suggestions, got {merged}");
    eyre::ensure!(!editor.is_generating(), "request should be finished");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resetting_the_draft_abandons_the_call(slot: InMemorySlot) -> Result<(), eyre::Report> {
    let mut editor = editor_over(&slot, StalledGenerator);
    editor.set_title("Abandoned");

    let ticket = editor.begin_suggestions()?;
    let service = editor.suggestions().clone();
    let request = ticket.request().clone();
    let cancel = ticket.cancellation().clone();
    let handle = tokio::spawn(async move { service.suggest(&request, &cancel).await });

    editor.start_create();
    let outcome = handle.await?;
    eyre::ensure!(
        matches!(outcome, Err(SuggestionError::Cancelled)),
        "stalled call should be cancelled, got {outcome:?}"
    );

    let result = editor.complete_suggestions(ticket.id(), outcome);
    eyre::ensure!(
        matches!(result, Err(SuggestionError::Cancelled)),
        "stale outcome should be discarded"
    );
    eyre::ensure!(editor.draft().subtasks().is_empty(), "draft changed");
    eyre::ensure!(editor.notice().is_none(), "cancellation is silent");
    Ok(())
}
