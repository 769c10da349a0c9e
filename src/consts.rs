use std::time::Duration;

/// Production ICA console and REST root
pub(crate) const DEFAULT_ICA_ROOT_URL: &str = "https://ica.illumina.com";

/// Production platform-services (login) root
pub(crate) const DEFAULT_PLATFORM_ROOT_URL: &str = "https://platform.login.illumina.com";

/// chromedriver's default listen address
pub(crate) const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Workgroup filter value that selects the user's personal projects
pub(crate) const PERSONAL_WORKGROUP: &str = "Personal";

/// Media type the ICA v3 REST API expects on both Accept and Content-Type
pub(crate) const ICA_V3_MEDIA_TYPE: &str = "application/vnd.illumina.v3+json";

/// Client id of the platform home application
pub(crate) const PLATFORM_CLIENT_ID: &str = "ps-home";

pub(crate) const TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) const DEFAULT_ELEMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Landing page of a tenant's platform home, used as the login redirect target
pub(crate) fn platform_home_url(domain: &str) -> String {
    format!("https://{domain}.login.illumina.com/platform-home/")
}
