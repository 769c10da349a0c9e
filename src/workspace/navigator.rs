//! The console walk: login, project, workspace, status, action, logout

use std::thread;
use std::time::Duration;

use tracing::{info, info_span};

use crate::browser::{Chord, Key, Locator, Page};
use crate::error::AppError;
use crate::session::{RootUrls, SessionContext, parse_project_id};

use super::status::WorkspaceStatus;

/// Fixed delays that let the console finish rendering
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pacing {
    /// After switching a grid to table view, and before starting a workspace
    pub(crate) settle: Duration,
    /// After the start action, before the status is read again
    pub(crate) start_settle: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(1),
            start_settle: Duration::from_secs(3),
        }
    }
}

/// What the run did to the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    KeptRunning,
    Started,
    AlreadyStarting,
}

pub(crate) struct Navigator<'a, P: Page> {
    page: &'a mut P,
    urls: &'a RootUrls,
    pacing: Pacing,
}

impl<'a, P: Page> Navigator<'a, P> {
    pub(crate) fn new(page: &'a mut P, urls: &'a RootUrls, pacing: Pacing) -> Self {
        Self { page, urls, pacing }
    }

    /// Walk the console end to end. Errors abort immediately without logging out.
    pub(crate) fn run(&mut self, ctx: &mut SessionContext) -> Result<Outcome, AppError> {
        let span = info_span!("workspace", name = %ctx.workspace_name);
        let _entered = span.enter();

        self.login(ctx)?;
        self.enter_ica()?;
        let project_id = self.resolve_project(ctx)?;
        self.open_workspace(ctx, &project_id)?;
        let status = self.read_status(ctx)?;
        let outcome = self.act(ctx, status)?;
        self.logout()?;
        info!("Finished work!");
        Ok(outcome)
    }

    fn login(&mut self, ctx: &SessionContext) -> Result<(), AppError> {
        info!(domain = %ctx.domain_name, "Logging into domain");
        self.page.goto(&self.urls.login_url(&ctx.domain_name))?;
        let login = Locator::css("#login");
        self.page.click(&login, 1)?;
        self.page.fill(&login, &ctx.username)?;
        self.page.press(&login, Chord::key(Key::Tab))?;
        self.page
            .fill(&Locator::css("input[name=\"password\"]"), &ctx.password)?;
        self.page.click(&Locator::role("button", "Sign In"), 1)?;
        Ok(())
    }

    fn enter_ica(&mut self) -> Result<(), AppError> {
        info!("Entering into ICA");
        self.page.click(
            &Locator::role_exact("link", "Illumina Connected Analytics"),
            1,
        )?;
        self.page.click(&Locator::text_exact("Cookies"), 1)?;
        self.page
            .click(&Locator::role("button", "Accept and close"), 1)?;
        Ok(())
    }

    /// Open the project and return its id, looking it up by name if needed
    fn resolve_project(&mut self, ctx: &mut SessionContext) -> Result<String, AppError> {
        info!(project = %ctx.project_label(), "Entering into the ICA project");
        if let Some(id) = ctx.project_id.clone() {
            self.page.goto(&self.urls.project_url(&id))?;
            return Ok(id);
        }
        let Some(name) = ctx.project_name.clone() else {
            return Err(AppError::MissingProject);
        };

        self.page.click(&Locator::css("#btn-cardstack-table"), 1)?;
        thread::sleep(self.pacing.settle);
        self.filter_workgroup(&ctx.workgroup_name)?;

        let row = Locator::role_exact("cell", &name).within(Locator::css("div"));
        if self.page.count(&row)? == 0 {
            return Err(AppError::ProjectNotFound { name });
        }
        self.page.click(&row, 2)?;

        info!(project = %name, "Grabbing project URN to get project id");
        self.page
            .click(&Locator::role("button", "Project Settings"), 1)?;
        self.page.click(&Locator::role("link", "Details"), 1)?;
        let urn_field = Locator::label("URN");
        self.page.click(&urn_field, 3)?;
        self.page.press(&urn_field, ctx.os.copy_chord())?;
        let urn = self.page.read_clipboard()?;
        if urn.trim().is_empty() {
            return Err(AppError::ProjectUrnUnavailable { name });
        }
        info!(urn = %urn.trim(), "Found project URN");

        let id = parse_project_id(&urn)?;
        ctx.project_id = Some(id.clone());
        Ok(id)
    }

    fn filter_workgroup(&mut self, workgroup: &str) -> Result<(), AppError> {
        info!(workgroup, "Filtering projects by workgroup");
        self.page
            .click(&Locator::role("combobox", "Workgroup"), 1)?;
        self.page
            .click(&Locator::role_exact("option", workgroup), 1)?;
        thread::sleep(self.pacing.settle);
        Ok(())
    }

    fn open_workspace(&mut self, ctx: &SessionContext, project_id: &str) -> Result<(), AppError> {
        self.page.goto(&self.urls.workspaces_url(project_id))?;
        let table_toggle = Locator::css("#cardstackandmasterdetaillayout-toggle-TABLE")
            .within(Locator::role("button", ""));
        self.page.click(&table_toggle, 1)?;
        thread::sleep(self.pacing.settle);

        let row = Locator::role_exact("cell", &ctx.workspace_name);
        if self.page.count(&row)? == 0 {
            return Err(AppError::WorkspaceNotFound {
                workspace: ctx.workspace_name.clone(),
                project: project_id.to_string(),
            });
        }
        self.page.click(&row, 2)?;
        self.page.click(
            &Locator::label("Details").within(Locator::text_exact("Details")),
            2,
        )?;
        Ok(())
    }

    fn read_status(&mut self, ctx: &SessionContext) -> Result<WorkspaceStatus, AppError> {
        self.page.click(&Locator::label("Status"), 2)?;
        self.page
            .press(&Locator::css(".v-panel-content"), ctx.os.copy_chord())?;
        let status = WorkspaceStatus::parse(&self.page.read_clipboard()?);
        info!(%status, "Workspace status");
        Ok(status)
    }

    fn act(&mut self, ctx: &SessionContext, status: WorkspaceStatus) -> Result<Outcome, AppError> {
        let back = Locator::role("button", "Back");
        match status {
            WorkspaceStatus::Running => {
                self.page.click(&back, 1)?;
                self.page
                    .click(&Locator::role("button", "Keep running"), 1)?;
                info!("Kept running workspace alive");
                Ok(Outcome::KeptRunning)
            }
            WorkspaceStatus::Stopped => {
                thread::sleep(self.pacing.settle);
                self.page
                    .click(&Locator::role("button", "Start Workspace"), 3)?;
                thread::sleep(self.pacing.start_settle);

                let after = self.read_status(ctx)?;
                if after != WorkspaceStatus::Starting {
                    return Err(AppError::StartNotApplied {
                        workspace: ctx.workspace_name.clone(),
                        status: after.to_string(),
                    });
                }
                self.page.click(&back, 1)?;
                info!("Restarted workspace; it may take a few minutes before it can be entered");
                Ok(Outcome::Started)
            }
            WorkspaceStatus::Starting => {
                info!("Workspace is still restarting; it may take a few minutes before it can be entered");
                Ok(Outcome::AlreadyStarting)
            }
            WorkspaceStatus::Unknown(label) => Err(AppError::UnhandledStatus {
                workspace: ctx.workspace_name.clone(),
                status: label,
            }),
        }
    }

    fn logout(&mut self) -> Result<(), AppError> {
        info!("Logging out of ICA");
        self.page.click(&Locator::css("#btn-usermenu"), 1)?;
        self.page.click(&Locator::role("option", "Sign out"), 1)?;
        self.page.clear_cookies()?;
        self.page.close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;
    use crate::browser::Modifier;
    use crate::error::BrowserError;
    use crate::session::OsTag;

    /// Records every interaction and answers counts and clipboard reads from a script
    #[derive(Default)]
    struct ScriptedPage {
        log: Vec<String>,
        clipboard: VecDeque<String>,
        absent: HashSet<String>,
    }

    impl ScriptedPage {
        fn with_clipboard(values: &[&str]) -> Self {
            Self {
                clipboard: values.iter().map(|v| v.to_string()).collect(),
                ..Self::default()
            }
        }

        fn without(mut self, locator: Locator) -> Self {
            self.absent.insert(locator.to_string());
            self
        }

        fn clicked(&self, locator: &Locator) -> bool {
            let prefix = format!("click {locator} x");
            self.log.iter().any(|l| l.starts_with(&prefix))
        }
    }

    impl Page for ScriptedPage {
        fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
            self.log.push(format!("goto {url}"));
            Ok(())
        }

        fn click(&mut self, locator: &Locator, clicks: u32) -> Result<(), BrowserError> {
            self.log.push(format!("click {locator} x{clicks}"));
            Ok(())
        }

        fn fill(&mut self, locator: &Locator, text: &str) -> Result<(), BrowserError> {
            self.log.push(format!("fill {locator} {text}"));
            Ok(())
        }

        fn press(&mut self, locator: &Locator, chord: Chord) -> Result<(), BrowserError> {
            self.log.push(format!("press {locator} {chord}"));
            Ok(())
        }

        fn count(&mut self, locator: &Locator) -> Result<usize, BrowserError> {
            Ok(usize::from(!self.absent.contains(&locator.to_string())))
        }

        fn read_clipboard(&mut self) -> Result<String, BrowserError> {
            Ok(self.clipboard.pop_front().unwrap_or_default())
        }

        fn clear_cookies(&mut self) -> Result<(), BrowserError> {
            self.log.push("clear cookies".to_string());
            Ok(())
        }

        fn close(&mut self) -> Result<(), BrowserError> {
            self.log.push("close".to_string());
            Ok(())
        }
    }

    fn urls() -> RootUrls {
        RootUrls {
            ica_root_url: "https://ica.test".to_string(),
            platform_root_url: "https://platform.test".to_string(),
        }
    }

    fn context(project_id: Option<&str>) -> SessionContext {
        SessionContext {
            username: "alice@example.com".to_string(),
            password: "secret".to_string(),
            domain_name: "acme".to_string(),
            project_id: project_id.map(str::to_string),
            project_name: Some("genomes".to_string()),
            workspace_name: "bench-1".to_string(),
            workgroup_name: "Personal".to_string(),
            os: OsTag::Linux,
        }
    }

    fn no_wait() -> Pacing {
        Pacing {
            settle: Duration::ZERO,
            start_settle: Duration::ZERO,
        }
    }

    fn run(page: &mut ScriptedPage, ctx: &mut SessionContext) -> Result<Outcome, AppError> {
        let urls = urls();
        Navigator::new(page, &urls, no_wait()).run(ctx)
    }

    fn start_button() -> Locator {
        Locator::role("button", "Start Workspace")
    }

    fn keep_running_button() -> Locator {
        Locator::role("button", "Keep running")
    }

    fn logged_out(page: &ScriptedPage) -> bool {
        page.clicked(&Locator::role("option", "Sign out"))
            && page.log.ends_with(&["clear cookies".to_string(), "close".to_string()])
    }

    #[test]
    fn running_workspace_is_kept_running() {
        let mut page = ScriptedPage::with_clipboard(&["Running"]);
        let mut ctx = context(Some("123456"));
        assert_eq!(run(&mut page, &mut ctx).unwrap(), Outcome::KeptRunning);

        assert!(page.clicked(&keep_running_button()));
        assert!(!page.clicked(&start_button()));
        assert!(logged_out(&page));
    }

    #[test]
    fn stopped_workspace_is_started() {
        let mut page = ScriptedPage::with_clipboard(&["Stopped", "Starting"]);
        let mut ctx = context(Some("123456"));
        assert_eq!(run(&mut page, &mut ctx).unwrap(), Outcome::Started);

        assert!(page.log.contains(&format!("click {} x3", start_button())));
        assert!(!page.clicked(&keep_running_button()));
        assert!(logged_out(&page));
    }

    #[test]
    fn start_that_does_not_take_effect_aborts() {
        let mut page = ScriptedPage::with_clipboard(&["Stopped", "Stopped"]);
        let mut ctx = context(Some("123456"));
        let err = run(&mut page, &mut ctx).unwrap_err();

        assert!(matches!(err, AppError::StartNotApplied { .. }));
        assert!(err.to_string().contains("bench-1"));
        assert!(!logged_out(&page));
    }

    #[test]
    fn starting_workspace_is_left_alone() {
        let mut page = ScriptedPage::with_clipboard(&["Starting"]);
        let mut ctx = context(Some("123456"));
        assert_eq!(run(&mut page, &mut ctx).unwrap(), Outcome::AlreadyStarting);

        assert!(!page.clicked(&start_button()));
        assert!(!page.clicked(&keep_running_button()));
        assert!(logged_out(&page));
    }

    #[test]
    fn unknown_status_aborts() {
        let mut page = ScriptedPage::with_clipboard(&["Stopping"]);
        let mut ctx = context(Some("123456"));
        let err = run(&mut page, &mut ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not sure what to do with workspace bench-1. It has status of Stopping"
        );
    }

    #[test]
    fn login_fills_credentials() {
        let mut page = ScriptedPage::with_clipboard(&["Running"]);
        let mut ctx = context(Some("123456"));
        run(&mut page, &mut ctx).unwrap();

        assert_eq!(
            page.log[0],
            "goto https://platform.test/platform-services-manager/?rURL=https://acme.login.illumina.com/platform-home/&redirectMethod=GET&clientId=ps-home"
        );
        assert!(page.log.contains(&"fill #login alice@example.com".to_string()));
        assert!(page.log.contains(&"press #login Tab".to_string()));
        assert!(
            page.log
                .contains(&"fill input[name=\"password\"] secret".to_string())
        );
    }

    #[test]
    fn project_id_navigates_directly() {
        let mut page = ScriptedPage::with_clipboard(&["Running"]);
        let mut ctx = context(Some("123456"));
        run(&mut page, &mut ctx).unwrap();

        assert!(page.log.contains(&"goto https://ica.test/ica/projects/123456".to_string()));
        assert!(
            page.log
                .contains(&"goto https://ica.test/ica/projects/123456/workspaces".to_string())
        );
        assert!(!page.clicked(&Locator::label("URN")));
    }

    #[test]
    fn project_name_is_resolved_from_urn() {
        let mut page =
            ScriptedPage::with_clipboard(&["urn:ica:region:987654#details", "Running"]);
        let mut ctx = context(None);
        ctx.os = OsTag::Macos;
        run(&mut page, &mut ctx).unwrap();

        assert_eq!(ctx.project_id.as_deref(), Some("987654"));
        assert!(page.clicked(&Locator::role_exact("option", "Personal")));
        assert!(page.log.contains(&format!(
            "press {} {}",
            Locator::label("URN"),
            Chord::with_modifier(Modifier::Meta, 'c')
        )));
        assert!(
            page.log
                .contains(&"goto https://ica.test/ica/projects/987654/workspaces".to_string())
        );
    }

    #[test]
    fn missing_project_name_aborts() {
        let row = Locator::role_exact("cell", "genomes").within(Locator::css("div"));
        let mut page = ScriptedPage::default().without(row);
        let mut ctx = context(None);
        let err = run(&mut page, &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "Could not find the project: genomes");
    }

    #[test]
    fn empty_urn_aborts() {
        let mut page = ScriptedPage::with_clipboard(&[""]);
        let mut ctx = context(None);
        let err = run(&mut page, &mut ctx).unwrap_err();
        assert!(matches!(err, AppError::ProjectUrnUnavailable { .. }));
    }

    #[test]
    fn missing_workspace_aborts() {
        let mut page =
            ScriptedPage::with_clipboard(&["Running"]).without(Locator::role_exact("cell", "bench-1"));
        let mut ctx = context(Some("123456"));
        let err = run(&mut page, &mut ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find the workspace: bench-1 in the project 123456"
        );
    }

    #[test]
    fn neither_project_id_nor_name_aborts() {
        let mut page = ScriptedPage::default();
        let mut ctx = context(None);
        ctx.project_name = None;
        let err = run(&mut page, &mut ctx).unwrap_err();
        assert!(matches!(err, AppError::MissingProject));
    }
}
