//! Given steps for task editor BDD scenarios.

use super::world::TaskEditorWorld;
use chrono::NaiveDate;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskdeck::task::ports::TextGeneratorError;

#[given("an empty task list")]
fn empty_task_list(world: &mut TaskEditorWorld) -> Result<(), eyre::Report> {
    if !world.editor.tasks().is_empty() {
        return Err(eyre::eyre!("expected a fresh task list"));
    }
    Ok(())
}

#[given(r#"a saved task titled "{title}""#)]
fn saved_task(world: &mut TaskEditorWorld, title: String) -> Result<(), eyre::Report> {
    let due_date = NaiveDate::from_ymd_opt(2025, 1, 10)
        .ok_or_else(|| eyre::eyre!("invalid scenario due date"))?;
    world.editor.set_title(title);
    world.editor.set_due_date(due_date);
    world
        .editor
        .submit()
        .wrap_err("submit task in scenario setup")?;
    Ok(())
}

#[given("the text generator replies with {count:usize} bullet suggestions")]
fn generator_replies(world: &mut TaskEditorWorld, count: usize) -> Result<(), eyre::Report> {
    let reply = (1..=count)
        .map(|index| format!("- s{index}"))
        .collect::<Vec<_>>()
        .join("\n");
    world
        .generator
        .set_reply(Ok(reply))
        .wrap_err("configure generator reply")?;
    Ok(())
}

#[given("the text generator fails with status {status:u16}")]
fn generator_fails(world: &mut TaskEditorWorld, status: u16) -> Result<(), eyre::Report> {
    world
        .generator
        .set_reply(Err(TextGeneratorError::Status { status }))
        .wrap_err("configure generator failure")?;
    Ok(())
}

#[given("the storage rejects writes")]
fn storage_rejects_writes(world: &mut TaskEditorWorld) -> Result<(), eyre::Report> {
    world
        .slot
        .set_fail_writes(true)
        .wrap_err("configure slot failure")?;
    Ok(())
}
