use std::fmt;

/// Lifecycle state shown in the workspace details panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WorkspaceStatus {
    Running,
    Stopped,
    Starting,
    /// Any other label, kept verbatim
    Unknown(String),
}

impl WorkspaceStatus {
    /// Parse the copied status label; surrounding whitespace is ignored, case is not
    pub(crate) fn parse(label: &str) -> Self {
        match label.trim() {
            "Running" => WorkspaceStatus::Running,
            "Stopped" => WorkspaceStatus::Stopped,
            "Starting" => WorkspaceStatus::Starting,
            other => WorkspaceStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceStatus::Running => write!(f, "Running"),
            WorkspaceStatus::Stopped => write!(f, "Stopped"),
            WorkspaceStatus::Starting => write!(f, "Starting"),
            WorkspaceStatus::Unknown(label) => write!(f, "{label}"),
        }
    }
}
