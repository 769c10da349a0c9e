use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(
        "Either project_id [--project_id <STR>] or project_name [--project_name <STR>] need to be provided"
    )]
    MissingProject,

    #[error("Username password combination is incorrect")]
    InvalidCredentials,

    #[error("Could not find the project: {name}")]
    ProjectNotFound { name: String },

    #[error("Could not get Project URN for project {name}")]
    ProjectUrnUnavailable { name: String },

    #[error("Could not parse a project id from URN \"{urn}\"")]
    MalformedUrn { urn: String },

    #[error("Could not find the workspace: {workspace} in the project {project}")]
    WorkspaceNotFound { workspace: String, project: String },

    #[error("Not sure what to do with workspace {workspace}. It has status of {status}")]
    UnhandledStatus { workspace: String, status: String },

    #[error(
        "Start action did not take effect for workspace {workspace}: expected status Starting, found {status}"
    )]
    StartNotApplied { workspace: String, status: String },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("{0}")]
    Browser(#[from] BrowserError),
}

#[derive(Debug, Error)]
pub(crate) enum BrowserError {
    #[error("WebDriver request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("WebDriver error ({error}): {message}")]
    WebDriver { error: String, message: String },

    #[error("Unexpected WebDriver response: {0}")]
    Protocol(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),
}
