//! In-memory integration tests for editor list operations.

use super::helpers::{replying_editor, slot};
use rstest::rstest;
use std::sync::Arc;
use taskdeck::task::{
    adapters::{SlotTaskStorage, memory::InMemorySlot},
    domain::{Subtask, Task, TaskStatus},
    ports::TaskStorage,
};

fn saved(slot: &InMemorySlot) -> Vec<Task> {
    SlotTaskStorage::with_default_key(Arc::new(slot.clone())).load()
}

#[rstest]
fn every_change_is_written_through(slot: InMemorySlot) -> Result<(), eyre::Report> {
    let mut editor = replying_editor(&slot, "");

    editor.set_title("Write report");
    editor.add_subtask("Outline");
    editor.add_subtask("Draft");
    let task_id = editor.submit()?;
    eyre::ensure!(slot.write_count()? == 1, "create should write once");

    let subtask_id = editor
        .task(task_id)
        .and_then(|task| task.subtasks().iter().next().map(Subtask::id))
        .ok_or_else(|| eyre::eyre!("missing subtask"))?;
    editor.toggle_subtask(task_id, subtask_id)?;
    eyre::ensure!(slot.write_count()? == 2, "toggle should write once");

    editor.start_edit(task_id)?;
    editor.set_status(TaskStatus::Completed);
    editor.submit()?;
    eyre::ensure!(slot.write_count()? == 3, "edit should write once");

    eyre::ensure!(
        saved(&slot).as_slice() == editor.tasks(),
        "stored list diverged from memory"
    );
    Ok(())
}

#[rstest]
fn draft_changes_are_not_persisted(slot: InMemorySlot) -> Result<(), eyre::Report> {
    let mut editor = replying_editor(&slot, "");
    let task_id = {
        editor.set_title("Stable");
        editor.submit()?
    };

    editor.start_edit(task_id)?;
    editor.set_title("Half-typed rename");
    editor.add_subtask("Unsaved step");
    editor.cancel_edit();

    eyre::ensure!(slot.write_count()? == 1, "draft edits must not write");
    let stored = saved(&slot);
    let task = stored
        .first()
        .ok_or_else(|| eyre::eyre!("stored list is empty"))?;
    eyre::ensure!(task.title() == "Stable", "stored title changed");
    eyre::ensure!(task.subtasks().is_empty(), "stored subtasks changed");
    Ok(())
}

#[rstest]
fn recovery_after_a_failed_save(slot: InMemorySlot) -> Result<(), eyre::Report> {
    let mut editor = replying_editor(&slot, "");
    slot.set_fail_writes(true)?;

    editor.set_title("Retry me");
    eyre::ensure!(editor.submit().is_err(), "submit should fail");
    eyre::ensure!(editor.tasks().is_empty(), "memory changed on failure");
    eyre::ensure!(editor.notice().is_some(), "failure should be surfaced");

    slot.set_fail_writes(false)?;
    editor.dismiss_notice();
    let task_id = editor.submit()?;

    eyre::ensure!(editor.task(task_id).is_some(), "retry should save the task");
    eyre::ensure!(saved(&slot).len() == 1, "retry should persist the task");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn suggested_subtasks_are_saved_with_the_task(
    slot: InMemorySlot,
) -> Result<(), eyre::Report> {
    let mut editor = replying_editor(&slot, "- Pick dates\n* Book flights\nEnjoy!");

    editor.set_title("Plan trip");
    editor.set_description("Summer holiday");
    let merged = editor.request_suggestions().await?;
    eyre::ensure!(merged == 2, "expected two suggestions, got {merged}");
    eyre::ensure!(slot.write_count()? == 0, "suggestions must not write");

    let task_id = editor.submit()?;
    let stored = saved(&slot);
    let task = stored
        .iter()
        .find(|task| task.id() == task_id)
        .ok_or_else(|| eyre::eyre!("task not stored"))?;
    let texts: Vec<&str> = task.subtasks().iter().map(Subtask::text).collect();
    eyre::ensure!(
        texts == ["Pick dates", "Book flights"],
        "unexpected stored subtasks {texts:?}"
    );
    Ok(())
}
