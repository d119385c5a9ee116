use std::{env, net::SocketAddr, time::Duration};

use url::Url;

use crate::{error::AppError, format::DateLocale};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_ID: &str = "demo";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub user_id: String,
    pub date_locale: DateLocale,
    pub listen_addr: SocketAddr,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let api_base_url = parse_base_url(
            &env::var("DASHBOARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        )?;

        let user_id = env::var("DASHBOARD_USER_ID")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

        let date_locale = match env::var("DASHBOARD_DATE_LOCALE") {
            Ok(raw) => raw
                .parse()
                .map_err(|err| AppError::Config(format!("invalid DASHBOARD_DATE_LOCALE: {err}")))?,
            Err(_) => DateLocale::default(),
        };

        let listen_addr: SocketAddr = env::var("DASHBOARD_LISTEN_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid DASHBOARD_LISTEN_ADDR: {err}")))?;

        Ok(Self {
            api_base_url,
            user_id,
            date_locale,
            listen_addr,
            request_timeout: REQUEST_TIMEOUT,
        })
    }

    pub fn for_base_url(base_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            api_base_url: parse_base_url(base_url)?,
            user_id: DEFAULT_USER_ID.to_string(),
            date_locale: DateLocale::default(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            request_timeout: REQUEST_TIMEOUT,
        })
    }
}

/// Parses the API base and makes sure it ends with `/` so endpoint paths
/// join underneath any prefix instead of replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|err| AppError::Config(format!("invalid DASHBOARD_API_URL: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(AppError::Config(format!(
            "DASHBOARD_API_URL cannot be used as a base: {raw}"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
