//! Then steps for task editor BDD scenarios.

use super::world::{TaskEditorWorld, split_list};
use chrono::NaiveDate;
use eyre::WrapErr;
use rstest_bdd_macros::then;
use taskdeck::task::{domain::TaskStatus, services::EditorMode};

#[then("the task list size is {count:usize}")]
fn task_list_size(world: &TaskEditorWorld, count: usize) -> Result<(), eyre::Report> {
    let actual = world.editor.tasks().len();
    if actual != count {
        return Err(eyre::eyre!("expected {count} tasks, found {actual}"));
    }
    Ok(())
}

#[then(r#"the first task is titled "{title}" with status "{status}" due on "{due_date}""#)]
fn first_task_matches(
    world: &TaskEditorWorld,
    title: String,
    status: String,
    due_date: String,
) -> Result<(), eyre::Report> {
    let expected_status = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let expected_due = NaiveDate::parse_from_str(&due_date, "%Y-%m-%d")
        .wrap_err_with(|| format!("invalid scenario date {due_date}"))?;
    let task = world.first_task()?;

    if task.title() != title {
        return Err(eyre::eyre!(
            "expected title '{title}', found '{}'",
            task.title()
        ));
    }
    if task.status() != expected_status {
        return Err(eyre::eyre!(
            "expected status {expected_status}, found {}",
            task.status()
        ));
    }
    if task.due_date() != expected_due {
        return Err(eyre::eyre!(
            "expected due date {expected_due}, found {}",
            task.due_date()
        ));
    }
    if !task.subtasks().is_empty() {
        return Err(eyre::eyre!("expected no subtasks"));
    }
    Ok(())
}

#[then("the first task keeps its identity and creation time")]
fn first_task_keeps_identity(world: &TaskEditorWorld) -> Result<(), eyre::Report> {
    let original = world
        .edited_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing edited task in scenario world"))?;
    let task = world.first_task()?;

    if task.id() != original.id() || task.created_at() != original.created_at() {
        return Err(eyre::eyre!(
            "edit changed identity: {} at {} became {} at {}",
            original.id(),
            original.created_at(),
            task.id(),
            task.created_at()
        ));
    }
    Ok(())
}

#[then("the editor is back in create mode")]
fn editor_in_create_mode(world: &TaskEditorWorld) -> Result<(), eyre::Report> {
    if world.editor.mode() != EditorMode::Create || !world.editor.draft().title().is_empty() {
        return Err(eyre::eyre!(
            "expected an empty create draft, found {:?} titled '{}'",
            world.editor.mode(),
            world.editor.draft().title()
        ));
    }
    Ok(())
}

#[then("the saved list matches the task list")]
fn saved_list_matches(world: &TaskEditorWorld) -> Result<(), eyre::Report> {
    let saved = world.saved_tasks();
    if saved.as_slice() != world.editor.tasks() {
        return Err(eyre::eyre!(
            "saved list has {} tasks, editor holds {}",
            saved.len(),
            world.editor.tasks().len()
        ));
    }
    Ok(())
}

#[then(r#"the draft subtasks are "{subtasks}""#)]
fn draft_subtasks_are(world: &TaskEditorWorld, subtasks: String) -> Result<(), eyre::Report> {
    let expected = split_list(&subtasks);
    let actual: Vec<String> = world
        .editor
        .draft()
        .subtasks()
        .iter()
        .map(|subtask| subtask.text().to_owned())
        .collect();
    if actual != expected {
        return Err(eyre::eyre!("expected subtasks {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then("the text generator prompt count is {count:usize}")]
fn generator_prompt_count(world: &TaskEditorWorld, count: usize) -> Result<(), eyre::Report> {
    let prompts = world
        .generator
        .prompts()
        .wrap_err("read recorded prompts")?;
    if prompts.len() != count {
        return Err(eyre::eyre!(
            "expected {count} prompts, found {}",
            prompts.len()
        ));
    }
    Ok(())
}

#[then(r#"the editor shows the notice "{message}""#)]
fn editor_shows_notice(world: &TaskEditorWorld, message: String) -> Result<(), eyre::Report> {
    let notice = world
        .editor
        .notice()
        .ok_or_else(|| eyre::eyre!("expected a notice"))?;
    if notice.message() != message {
        return Err(eyre::eyre!(
            "expected notice '{message}', found '{}'",
            notice.message()
        ));
    }
    Ok(())
}

#[then("no further writes happened")]
fn no_further_writes(world: &TaskEditorWorld) -> Result<(), eyre::Report> {
    let writes = world
        .slot
        .write_count()
        .wrap_err("read slot write count")?;
    if writes != world.writes_before {
        return Err(eyre::eyre!(
            "expected {} writes, found {writes}",
            world.writes_before
        ));
    }
    Ok(())
}

#[then("the last action succeeded")]
fn last_action_succeeded(world: &TaskEditorWorld) -> Result<(), eyre::Report> {
    match &world.last_error {
        Some(error) => Err(eyre::eyre!("expected success, got: {error}")),
        None => Ok(()),
    }
}

#[then("the last action failed")]
fn last_action_failed(world: &TaskEditorWorld) -> Result<(), eyre::Report> {
    if world.last_error.is_none() {
        return Err(eyre::eyre!("expected the last action to fail"));
    }
    Ok(())
}
