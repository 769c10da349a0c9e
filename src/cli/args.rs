//! CLI argument definitions
//!
//! Flags keep the underscore spelling (`--domain_name`) that existing cron
//! entries use, plus configuration merging logic.

use std::time::Duration;

use clap::Parser;

use crate::browser::BrowserOptions;
use crate::config::Config;
use crate::consts::{
    DEFAULT_ELEMENT_TIMEOUT, DEFAULT_ICA_ROOT_URL, DEFAULT_PLATFORM_ROOT_URL,
    DEFAULT_WEBDRIVER_URL, PERSONAL_WORKGROUP,
};
use crate::session::{OsTag, RootUrls, SessionContext};

#[derive(Parser)]
#[command(name = "ica-keepalive")]
#[command(
    about = "Keep an ICA Bench workspace from auto-suspending by driving its web console",
    version
)]
pub(crate) struct Cli {
    /// Username [email] used to log into Connected Analytics
    #[arg(long)]
    pub(crate) username: String,

    /// Password used to log into Connected Analytics
    #[arg(long)]
    pub(crate) password: String,

    /// Private domain (tenant) name
    #[arg(long = "domain_name", value_name = "DOMAIN")]
    pub(crate) domain_name: String,

    /// ICA workspace name
    #[arg(long = "workspace_name", value_name = "NAME")]
    pub(crate) workspace_name: String,

    /// Workgroup used to filter the project list when looking a project up by name [default: Personal]
    #[arg(long = "workgroup_name", value_name = "NAME")]
    pub(crate) workgroup_name: Option<String>,

    /// Connected Analytics project ID
    #[arg(long = "project_id", value_name = "ID")]
    pub(crate) project_id: Option<String>,

    /// Connected Analytics project name, used to look up the project ID
    #[arg(long = "project_name", value_name = "NAME")]
    pub(crate) project_name: Option<String>,

    /// Platform login root URL. Rarely needs changing [default: https://platform.login.illumina.com]
    #[arg(long = "illumina_platform_root_url", value_name = "URL")]
    pub(crate) illumina_platform_root_url: Option<String>,

    /// ICA root URL. Rarely needs changing [default: https://ica.illumina.com]
    #[arg(long = "ica_root_url", value_name = "URL")]
    pub(crate) ica_root_url: Option<String>,

    /// Show the browser window instead of running headless
    #[arg(long = "interactive_mode")]
    pub(crate) interactive_mode: bool,

    /// WebDriver server (e.g. chromedriver) to drive the browser through [default: http://localhost:9515]
    #[arg(long = "webdriver_url", value_name = "URL")]
    pub(crate) webdriver_url: Option<String>,

    /// Operating system whose copy shortcut the browser expects (default: this host)
    #[arg(long, value_enum)]
    pub(crate) os: Option<OsTag>,

    /// Seconds to wait for a console element to appear
    #[arg(long = "element_timeout_secs", value_name = "SECS")]
    pub(crate) element_timeout_secs: Option<u64>,

    /// Enable debug logging
    #[arg(long)]
    pub(crate) debug: bool,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // Boolean flags: config only applies if CLI left them off
        if !self.interactive_mode && config.interactive_mode {
            self.interactive_mode = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        // Optional values: config only applies if the flag was not given,
        // even when the flag repeats the built-in default
        if self.ica_root_url.is_none() {
            self.ica_root_url = config.ica_root_url.clone();
        }
        if self.illumina_platform_root_url.is_none() {
            self.illumina_platform_root_url = config.illumina_platform_root_url.clone();
        }
        if self.webdriver_url.is_none() {
            self.webdriver_url = config.webdriver_url.clone();
        }
        if self.workgroup_name.is_none() {
            self.workgroup_name = config.workgroup_name.clone();
        }
        if self.os.is_none() {
            self.os = config.os;
        }
        if self.element_timeout_secs.is_none() {
            self.element_timeout_secs = config.element_timeout_secs;
        }

        self
    }

    pub(crate) fn root_urls(&self) -> RootUrls {
        RootUrls {
            ica_root_url: self
                .ica_root_url
                .as_deref()
                .unwrap_or(DEFAULT_ICA_ROOT_URL)
                .to_string(),
            platform_root_url: self
                .illumina_platform_root_url
                .as_deref()
                .unwrap_or(DEFAULT_PLATFORM_ROOT_URL)
                .to_string(),
        }
    }

    pub(crate) fn session_context(&self) -> SessionContext {
        let non_blank = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        SessionContext {
            username: self.username.clone(),
            password: self.password.clone(),
            domain_name: self.domain_name.clone(),
            project_id: non_blank(&self.project_id),
            project_name: non_blank(&self.project_name),
            workspace_name: self.workspace_name.clone(),
            workgroup_name: self
                .workgroup_name
                .as_deref()
                .unwrap_or(PERSONAL_WORKGROUP)
                .to_string(),
            os: self.os.unwrap_or_else(OsTag::detect),
        }
    }

    pub(crate) fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            webdriver_url: self
                .webdriver_url
                .as_deref()
                .unwrap_or(DEFAULT_WEBDRIVER_URL)
                .to_string(),
            headless: !self.interactive_mode,
            element_timeout: self
                .element_timeout_secs
                .map_or(DEFAULT_ELEMENT_TIMEOUT, Duration::from_secs),
        }
    }
}
