//! Task editor and list controller.
//!
//! The editor owns the in-memory task list and a single draft. It switches
//! between create and edit modes, gates deletion behind a confirmation step,
//! and writes the full list through to storage after every change. The list
//! held in memory is only replaced once the write has succeeded, so memory
//! and storage never diverge.

use super::suggestion::{SubtaskSuggestionService, SuggestionError, SuggestionRequest};
use crate::task::{
    domain::{Subtask, SubtaskId, Task, TaskDomainError, TaskDraft, TaskId, TaskStatus},
    ports::{TaskStorage, TaskStorageError, TextGenerator},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

const SAVE_FAILED_MESSAGE: &str = "Your changes could not be saved. Please try again.";
const EMPTY_TITLE_MESSAGE: &str = "Please enter a task title";

/// Whether the draft describes a new task or an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Submitting creates a new task.
    Create,
    /// Submitting replaces the task with this identifier.
    Edit(TaskId),
}

/// Category of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The user's input was rejected.
    Validation,
    /// Subtask suggestion failed or produced nothing.
    Suggestion,
    /// Saving the task list failed.
    Storage,
}

/// Dismissible message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorNotice {
    kind: NoticeKind,
    message: String,
}

impl EditorNotice {
    /// Creates a notice.
    #[must_use]
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the notice category.
    #[must_use]
    pub const fn kind(&self) -> NoticeKind {
        self.kind
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Handle for one in-flight suggestion request.
///
/// Produced by [`TaskEditor::begin_suggestions`] and handed back to
/// [`TaskEditor::complete_suggestions`] with the outcome of the call.
#[derive(Debug, Clone)]
pub struct SuggestionTicket {
    id: Uuid,
    request: SuggestionRequest,
    cancel: CancellationToken,
}

impl SuggestionTicket {
    /// Returns the ticket identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the request captured from the draft.
    #[must_use]
    pub const fn request(&self) -> &SuggestionRequest {
        &self.request
    }

    /// Returns the token that fires when the request is abandoned.
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

#[derive(Debug)]
struct InFlightSuggestion {
    id: Uuid,
    cancel: CancellationToken,
}

/// Clears the in-flight slot if dropped before [`PendingSuggestion::settle`].
struct PendingSuggestion<'a> {
    slot: Option<&'a mut Option<InFlightSuggestion>>,
}

impl<'a> PendingSuggestion<'a> {
    const fn new(slot: &'a mut Option<InFlightSuggestion>) -> Self {
        Self { slot: Some(slot) }
    }

    fn settle(mut self) {
        self.slot = None;
    }
}

impl Drop for PendingSuggestion<'_> {
    fn drop(&mut self) {
        if let Some(in_flight) = self.slot.take().and_then(Option::take) {
            in_flight.cancel.cancel();
            debug!(ticket = %in_flight.id, "abandoned subtask suggestions");
        }
    }
}

/// Errors returned by editor list operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Saving the task list failed; nothing was changed.
    #[error(transparent)]
    Storage(#[from] TaskStorageError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    /// Deletion was confirmed without a pending request.
    #[error("no delete is awaiting confirmation")]
    NoPendingDelete,
}

/// Result type for editor list operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Draft state machine over the persisted task list.
pub struct TaskEditor<S, G, C>
where
    S: TaskStorage,
    G: TextGenerator,
    C: Clock + Send + Sync,
{
    storage: Arc<S>,
    suggestions: SubtaskSuggestionService<G>,
    clock: Arc<C>,
    tasks: Vec<Task>,
    draft: TaskDraft,
    use_auto_date: bool,
    in_flight: Option<InFlightSuggestion>,
    pending_delete: Option<TaskId>,
    notice: Option<EditorNotice>,
}

impl<S, G, C> TaskEditor<S, G, C>
where
    S: TaskStorage,
    G: TextGenerator,
    C: Clock + Send + Sync,
{
    /// Opens an editor, loading the saved task list once.
    #[must_use]
    pub fn open(storage: Arc<S>, suggestions: SubtaskSuggestionService<G>, clock: Arc<C>) -> Self {
        let tasks = storage.load();
        info!(count = tasks.len(), "loaded saved tasks");
        let today = clock.local().date_naive();
        Self {
            storage,
            suggestions,
            clock,
            tasks,
            draft: TaskDraft::empty(today),
            use_auto_date: false,
            in_flight: None,
            pending_delete: None,
            notice: None,
        }
    }

    /// Returns the task list, newest first.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the task with the given identifier.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    /// Returns the current draft.
    #[must_use]
    pub const fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    /// Returns the current mode, derived from the draft's identifier.
    #[must_use]
    pub const fn mode(&self) -> EditorMode {
        match self.draft.id() {
            Some(task_id) => EditorMode::Edit(task_id),
            None => EditorMode::Create,
        }
    }

    /// Returns `true` while an existing task is being edited.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.draft.id().is_some()
    }

    /// Returns whether submission replaces the due date with today.
    #[must_use]
    pub const fn uses_auto_date(&self) -> bool {
        self.use_auto_date
    }

    /// Returns `true` while a suggestion request is in flight.
    #[must_use]
    pub const fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Returns the task awaiting delete confirmation, if any.
    #[must_use]
    pub const fn pending_delete(&self) -> Option<TaskId> {
        self.pending_delete
    }

    /// Returns the suggestion client.
    ///
    /// Callers that drive suggestions in the background clone it, run
    /// [`SubtaskSuggestionService::suggest`] with a ticket from
    /// [`TaskEditor::begin_suggestions`], and hand the outcome back to
    /// [`TaskEditor::complete_suggestions`].
    #[must_use]
    pub const fn suggestions(&self) -> &SubtaskSuggestionService<G> {
        &self.suggestions
    }

    /// Returns the current notice, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&EditorNotice> {
        self.notice.as_ref()
    }

    /// Clears the current notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn today(&self) -> NaiveDate {
        self.clock.local().date_naive()
    }

    /// Resets the draft to empty defaults in create mode.
    ///
    /// Any in-flight suggestion is cancelled.
    pub fn start_create(&mut self) {
        self.cancel_suggestions();
        self.draft = TaskDraft::empty(self.today());
    }

    /// Loads a copy of an existing task into the draft for editing.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::TaskNotFound`] when no task has the identifier.
    pub fn start_edit(&mut self, task_id: TaskId) -> EditorResult<()> {
        let draft = self
            .task(task_id)
            .map(TaskDraft::from_task)
            .ok_or(EditorError::TaskNotFound(task_id))?;
        self.cancel_suggestions();
        self.draft = draft;
        debug!(%task_id, "editing task");
        Ok(())
    }

    /// Abandons the current edit and returns to an empty create draft.
    pub fn cancel_edit(&mut self) {
        self.start_create();
    }

    /// Sets the draft title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.set_title(title);
    }

    /// Sets the draft description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.set_description(description);
    }

    /// Sets the draft status.
    pub const fn set_status(&mut self, status: TaskStatus) {
        self.draft.set_status(status);
    }

    /// Sets the draft due date.
    pub const fn set_due_date(&mut self, due_date: NaiveDate) {
        self.draft.set_due_date(due_date);
    }

    /// Enables or disables replacing the due date with today on submit.
    pub const fn set_use_auto_date(&mut self, enabled: bool) {
        self.use_auto_date = enabled;
    }

    /// Flips the auto-date flag.
    pub const fn toggle_use_auto_date(&mut self) {
        self.use_auto_date = !self.use_auto_date;
    }

    /// Adds a manually entered subtask to the draft.
    ///
    /// Blank text and a full draft are ignored. Returns whether a subtask
    /// was added.
    pub fn add_subtask(&mut self, text: impl Into<String>) -> bool {
        self.draft.add_subtask(text).is_some()
    }

    /// Removes a subtask from the draft only.
    ///
    /// Returns whether a subtask was removed.
    pub fn remove_subtask(&mut self, subtask_id: SubtaskId) -> bool {
        self.draft.subtasks_mut().remove(subtask_id).is_some()
    }

    /// Starts a suggestion request for the current draft.
    ///
    /// Sets the generating flag until the ticket is completed or cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError::AlreadyGenerating`] while another request
    /// is in flight, and the validation errors of
    /// [`SuggestionRequest::validate`]. A validation notice is recorded.
    pub fn begin_suggestions(&mut self) -> Result<SuggestionTicket, SuggestionError> {
        if self.in_flight.is_some() {
            return Err(self.record_suggestion_failure(SuggestionError::AlreadyGenerating));
        }
        let request = SuggestionRequest::from_draft(&self.draft);
        if let Err(error) = request.validate() {
            return Err(self.record_suggestion_failure(error));
        }

        let ticket = SuggestionTicket {
            id: Uuid::new_v4(),
            request,
            cancel: CancellationToken::new(),
        };
        self.in_flight = Some(InFlightSuggestion {
            id: ticket.id,
            cancel: ticket.cancel.clone(),
        });
        self.notice = None;
        debug!(ticket = %ticket.id, "requesting subtask suggestions");
        Ok(ticket)
    }

    /// Applies the outcome of a suggestion request to the draft.
    ///
    /// Returns the number of suggestions merged. Outcomes for a ticket that
    /// is no longer in flight are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError::Cancelled`] for a stale ticket, the
    /// outcome's own error, or [`SuggestionError::NoSubtasksGenerated`] when
    /// no usable candidate remains. The draft is unchanged in every error
    /// case.
    pub fn complete_suggestions(
        &mut self,
        ticket_id: Uuid,
        outcome: Result<Vec<String>, SuggestionError>,
    ) -> Result<usize, SuggestionError> {
        let is_current = self
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.id == ticket_id);
        if !is_current {
            debug!(ticket = %ticket_id, "discarding stale suggestion outcome");
            return Err(SuggestionError::Cancelled);
        }
        self.in_flight = None;

        let candidates = match outcome {
            Ok(candidates) => candidates,
            Err(error) => return Err(self.record_suggestion_failure(error)),
        };
        let subtasks: Vec<Subtask> = candidates
            .into_iter()
            .filter_map(|text| Subtask::new(text).ok())
            .collect();
        if subtasks.is_empty() {
            return Err(self.record_suggestion_failure(SuggestionError::NoSubtasksGenerated));
        }

        let merged = subtasks.len();
        self.draft.subtasks_mut().merge_suggestions(subtasks);
        debug!(merged, total = self.draft.subtasks().len(), "merged suggestions");
        Ok(merged)
    }

    /// Requests suggestions for the draft and merges them.
    ///
    /// Dropping the returned future before it resolves cancels the request
    /// and clears the generating flag.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError`] when the request is rejected, fails, or
    /// yields nothing; the draft is unchanged and a notice is recorded.
    pub async fn request_suggestions(&mut self) -> Result<usize, SuggestionError> {
        let ticket = self.begin_suggestions()?;
        let pending = PendingSuggestion::new(&mut self.in_flight);
        let outcome = self
            .suggestions
            .suggest(ticket.request(), ticket.cancellation())
            .await;
        pending.settle();
        self.complete_suggestions(ticket.id(), outcome)
    }

    /// Cancels the in-flight suggestion request, if any.
    pub fn cancel_suggestions(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
            debug!(ticket = %in_flight.id, "cancelled subtask suggestions");
        }
    }

    fn record_suggestion_failure(&mut self, error: SuggestionError) -> SuggestionError {
        let kind = if error.is_validation() {
            NoticeKind::Validation
        } else {
            NoticeKind::Suggestion
        };
        if matches!(error, SuggestionError::Cancelled) {
            debug!("subtask suggestion cancelled");
            return error;
        }
        self.notice = Some(EditorNotice::new(kind, error.user_message()));
        if error.is_validation() {
            debug!(%error, "subtask suggestion rejected");
        } else {
            warn!(%error, "subtask suggestion failed");
        }
        error
    }

    /// Submits the draft.
    ///
    /// In edit mode the matching task is replaced in place, keeping its
    /// identifier and creation time. In create mode a new task is put at
    /// the front of the list. The due date becomes today when auto-date is
    /// enabled. After a successful save the draft resets to create mode.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Domain`] for a blank title,
    /// [`EditorError::TaskNotFound`] when the edited task no longer exists,
    /// and [`EditorError::Storage`] when saving fails. The list and the
    /// draft are unchanged on error.
    pub fn submit(&mut self) -> EditorResult<TaskId> {
        if self.draft.has_blank_title() {
            self.notice = Some(EditorNotice::new(
                NoticeKind::Validation,
                EMPTY_TITLE_MESSAGE,
            ));
            return Err(TaskDomainError::EmptyTitle.into());
        }
        let due_date = if self.use_auto_date {
            self.today()
        } else {
            self.draft.due_date()
        };

        let mut next = self.tasks.clone();
        let mode = self.mode();
        let task_id = match mode {
            EditorMode::Edit(task_id) => {
                let task = next
                    .iter_mut()
                    .find(|task| task.id() == task_id)
                    .ok_or(EditorError::TaskNotFound(task_id))?;
                task.apply_edit(&self.draft, due_date)?;
                task_id
            }
            EditorMode::Create => {
                let task = Task::create(&self.draft, due_date, &*self.clock)?;
                let task_id = task.id();
                next.insert(0, task);
                task_id
            }
        };

        self.commit(next)?;
        info!(%task_id, ?mode, "saved task");
        self.start_create();
        Ok(task_id)
    }

    /// Asks for confirmation before deleting a task.
    ///
    /// Nothing changes until [`TaskEditor::confirm_delete`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::TaskNotFound`] when no task has the identifier.
    pub fn request_delete(&mut self, task_id: TaskId) -> EditorResult<()> {
        if self.task(task_id).is_none() {
            return Err(EditorError::TaskNotFound(task_id));
        }
        self.pending_delete = Some(task_id);
        Ok(())
    }

    /// Deletes the task awaiting confirmation.
    ///
    /// When the deleted task is being edited the draft resets to create
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoPendingDelete`] without a pending request and
    /// [`EditorError::Storage`] when saving fails; the request stays pending
    /// in that case.
    pub fn confirm_delete(&mut self) -> EditorResult<TaskId> {
        let task_id = self.pending_delete.ok_or(EditorError::NoPendingDelete)?;
        let next: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| task.id() != task_id)
            .cloned()
            .collect();
        self.commit(next)?;
        self.pending_delete = None;
        if self.mode() == EditorMode::Edit(task_id) {
            self.start_create();
        }
        info!(%task_id, "deleted task");
        Ok(task_id)
    }

    /// Dismisses the pending delete request without changing anything.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Flips the completion flag of a persisted subtask.
    ///
    /// The task status and list order are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::TaskNotFound`] or [`EditorError::Domain`] when
    /// the task or subtask does not exist, and [`EditorError::Storage`] when
    /// saving fails.
    pub fn toggle_subtask(&mut self, task_id: TaskId, subtask_id: SubtaskId) -> EditorResult<()> {
        let mut next = self.tasks.clone();
        next.iter_mut()
            .find(|task| task.id() == task_id)
            .ok_or(EditorError::TaskNotFound(task_id))?
            .toggle_subtask(subtask_id)?;
        self.commit(next)
    }

    fn commit(&mut self, next: Vec<Task>) -> EditorResult<()> {
        if let Err(error) = self.storage.save(&next) {
            warn!(%error, "failed to save task list");
            self.notice = Some(EditorNotice::new(NoticeKind::Storage, SAVE_FAILED_MESSAGE));
            return Err(error.into());
        }
        self.tasks = next;
        Ok(())
    }
}

impl<S, G, C> Drop for TaskEditor<S, G, C>
where
    S: TaskStorage,
    G: TextGenerator,
    C: Clock + Send + Sync,
{
    fn drop(&mut self) {
        self.cancel_suggestions();
    }
}
