use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::consts::{ICA_V3_MEDIA_TYPE, PLATFORM_CLIENT_ID, TOKEN_TIMEOUT, platform_home_url};
use crate::session::RootUrls;

#[derive(Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

#[derive(Deserialize)]
struct SessionResponse {
    access_token: Option<String>,
}

pub(crate) fn basic_credential(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(TOKEN_TIMEOUT))
        .build()
        .into()
}

/// Ask the ICA REST API for a bearer token
pub(crate) fn request_ica_token(
    urls: &RootUrls,
    username: &str,
    password: &str,
    domain: &str,
) -> Option<String> {
    let url = urls.tokens_url();
    debug!(%url, tenant = domain, "Requesting ICA token");
    let result = agent()
        .post(&url)
        .query("tenant", domain)
        .header("Accept", ICA_V3_MEDIA_TYPE)
        .header("Content-Type", ICA_V3_MEDIA_TYPE)
        .header("Authorization", basic_credential(username, password))
        .send_empty();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "ICA token request failed");
            return None;
        }
    };
    let mut body = response.into_body();
    match serde_json::from_reader::<_, TokenResponse>(body.as_reader()) {
        Ok(TokenResponse { token: Some(token) }) if !token.is_empty() => Some(token),
        Ok(_) => {
            warn!("ICA token response had no token");
            None
        }
        Err(e) => {
            warn!(error = %e, "ICA token response was not JSON");
            None
        }
    }
}

/// Ask platform services for a session token on behalf of the platform home client
pub(crate) fn request_platform_session(
    urls: &RootUrls,
    username: &str,
    password: &str,
    domain: &str,
) -> Option<String> {
    let url = urls.platform_session_url();
    debug!(%url, tenant = domain, "Requesting platform session token");
    let result = agent()
        .post(&url)
        .query("clientId", PLATFORM_CLIENT_ID)
        .query("rURL", platform_home_url(domain))
        .header("Accept", "application/json")
        .header("Authorization", basic_credential(username, password))
        .send_empty();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Platform session request failed");
            return None;
        }
    };
    let mut body = response.into_body();
    match serde_json::from_reader::<_, SessionResponse>(body.as_reader()) {
        Ok(SessionResponse {
            access_token: Some(token),
        }) if !token.is_empty() => Some(token),
        Ok(_) => {
            warn!("Platform session response had no access_token");
            None
        }
        Err(e) => {
            warn!(error = %e, "Platform session response was not JSON");
            None
        }
    }
}

/// Check the credentials by obtaining a token, trying ICA first and
/// platform services second. `None` means neither accepted them.
pub(crate) fn validate_credentials(
    urls: &RootUrls,
    username: &str,
    password: &str,
    domain: &str,
) -> Option<String> {
    if let Some(token) = request_ica_token(urls, username, password, domain) {
        info!("Credentials accepted by ICA");
        return Some(token);
    }
    info!("Falling back to platform services for a session token");
    let token = request_platform_session(urls, username, password, domain)?;
    info!("Credentials accepted by platform services");
    Some(token)
}
