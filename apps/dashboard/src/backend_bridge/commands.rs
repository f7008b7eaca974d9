//! Backend commands queued from the input loop to the backend worker.

use shared::domain::ActiveView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    SelectLocation { raw: String },
    Refresh,
    SelectView { view: ActiveView },
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SelectLocation { .. } => "select_location",
            BackendCommand::Refresh => "refresh",
            BackendCommand::SelectView { .. } => "select_view",
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
