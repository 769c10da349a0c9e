use tracing::info;

use crate::auth::validate_credentials;
use crate::browser::WebDriverPage;
use crate::cli::Cli;
use crate::error::AppError;
use crate::workspace::{Navigator, Outcome, Pacing};

/// Validate the arguments and credentials, then walk the console
pub(crate) fn run(cli: &Cli) -> Result<Outcome, AppError> {
    let mut ctx = cli.session_context();
    if ctx.project_id.is_none() && ctx.project_name.is_none() {
        return Err(AppError::MissingProject);
    }

    let urls = cli.root_urls();
    info!(domain = %ctx.domain_name, "Validating credentials");
    if validate_credentials(&urls, &ctx.username, &ctx.password, &ctx.domain_name).is_none() {
        return Err(AppError::InvalidCredentials);
    }

    let mut page = WebDriverPage::launch(&cli.browser_options())?;
    Navigator::new(&mut page, &urls, Pacing::default()).run(&mut ctx)
}
