//! Application services for task editing and subtask suggestion.

mod editor;
mod suggestion;

pub use editor::{
    EditorError, EditorMode, EditorNotice, EditorResult, NoticeKind, SuggestionTicket, TaskEditor,
};
pub use suggestion::{
    DEFAULT_SUGGESTION_TIMEOUT, SubtaskSuggestionService, SuggestionError, SuggestionRequest,
    parse_bullet_candidates,
};
