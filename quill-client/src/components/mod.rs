pub mod activity_log;
pub mod delete_post;
pub mod disconnect_survey;
pub mod happychat;
pub mod history_button;
pub mod next_steps;
pub mod notices;
pub mod post_editor;
pub mod revisions;

// Re-export core Component trait
pub use quill::Component;

pub use activity_log::{ActivityLog, ActivityLogProps};
pub use delete_post::{DeletePost, DeletePostProps};
pub use disconnect_survey::{DisconnectSurvey, DisconnectSurveyProps};
pub use happychat::{HappychatPanel, HappychatPanelProps};
pub use history_button::{HistoryButton, HistoryButtonProps};
pub use next_steps::{NextSteps, NextStepsProps};
pub use notices::{NoticesBar, NoticesBarProps};
pub use post_editor::{PostEditor, PostEditorProps};
pub use revisions::{display_date, revision_row, RevisionsDialog, RevisionsDialogProps};
