//! Per-run session context
//!
//! Everything the run knows about the user and the target workspace, built
//! once from the command line and mutated in place as the project id is
//! resolved.

use clap::ValueEnum;
use serde::Deserialize;

use crate::browser::{Chord, Modifier};
use crate::consts::{PLATFORM_CLIENT_ID, platform_home_url};
use crate::error::AppError;

/// Host operating system, used only to pick the copy shortcut
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OsTag {
    Macos,
    Windows,
    Linux,
}

impl OsTag {
    pub(crate) fn detect() -> Self {
        match std::env::consts::OS {
            "macos" => OsTag::Macos,
            "windows" => OsTag::Windows,
            _ => OsTag::Linux,
        }
    }

    pub(crate) fn copy_chord(self) -> Chord {
        let modifier = match self {
            OsTag::Macos => Modifier::Meta,
            OsTag::Windows | OsTag::Linux => Modifier::Control,
        };
        Chord::with_modifier(modifier, 'c')
    }
}

/// Roots of the ICA console/REST API and of platform services
#[derive(Debug, Clone)]
pub(crate) struct RootUrls {
    pub(crate) ica_root_url: String,
    pub(crate) platform_root_url: String,
}

impl RootUrls {
    fn ica(&self) -> &str {
        self.ica_root_url.trim_end_matches('/')
    }

    fn platform(&self) -> &str {
        self.platform_root_url.trim_end_matches('/')
    }

    pub(crate) fn tokens_url(&self) -> String {
        format!("{}/ica/rest/api/tokens", self.ica())
    }

    pub(crate) fn platform_session_url(&self) -> String {
        format!("{}/platform-services-manager/session", self.platform())
    }

    /// Platform-services login page that redirects to the tenant's home
    pub(crate) fn login_url(&self, domain: &str) -> String {
        format!(
            "{}/platform-services-manager/?rURL={}&redirectMethod=GET&clientId={PLATFORM_CLIENT_ID}",
            self.platform(),
            platform_home_url(domain)
        )
    }

    pub(crate) fn project_url(&self, project_id: &str) -> String {
        format!("{}/ica/projects/{project_id}", self.ica())
    }

    pub(crate) fn workspaces_url(&self, project_id: &str) -> String {
        format!("{}/workspaces", self.project_url(project_id))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SessionContext {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) domain_name: String,
    pub(crate) project_id: Option<String>,
    pub(crate) project_name: Option<String>,
    pub(crate) workspace_name: String,
    pub(crate) workgroup_name: String,
    pub(crate) os: OsTag,
}

impl SessionContext {
    /// Label used in log lines and errors: the name when known, else the id
    pub(crate) fn project_label(&self) -> &str {
        self.project_name
            .as_deref()
            .or(self.project_id.as_deref())
            .unwrap_or_default()
    }
}

/// Extract the project id from a project URN.
///
/// The id is the last `:`-separated segment, minus any `#fragment`.
pub(crate) fn parse_project_id(urn: &str) -> Result<String, AppError> {
    let last = urn.trim().rsplit(':').next().unwrap_or_default();
    let id = last.split('#').next().unwrap_or_default().trim();
    if id.is_empty() {
        return Err(AppError::MalformedUrn {
            urn: urn.to_string(),
        });
    }
    Ok(id.to_string())
}
