use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Which of the two dashboard endpoints a load concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Stats,
    Trips,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Stats => "stats",
            Resource::Trips => "get_trips",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Stats => "stats",
            Resource::Trips => "trips",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadError {
    #[error("network error loading {resource} for user {user_id} from {endpoint}: {reason}")]
    Network {
        resource: Resource,
        endpoint: String,
        user_id: String,
        status: Option<u16>,
        reason: String,
    },
    #[error("timed out loading {resource} for user {user_id} from {endpoint}")]
    Timeout {
        resource: Resource,
        endpoint: String,
        user_id: String,
    },
    #[error("malformed {resource} payload for user {user_id} from {endpoint}: {reason}")]
    Parse {
        resource: Resource,
        endpoint: String,
        user_id: String,
        reason: String,
    },
}

impl LoadError {
    pub fn resource(&self) -> Resource {
        match self {
            LoadError::Network { resource, .. }
            | LoadError::Timeout { resource, .. }
            | LoadError::Parse { resource, .. } => *resource,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            LoadError::Network { user_id, .. }
            | LoadError::Timeout { user_id, .. }
            | LoadError::Parse { user_id, .. } => user_id,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::Network { status, .. } => *status,
            _ => None,
        }
    }

    /// The coarse message shown on screen.
    pub fn user_message(&self) -> &'static str {
        match self.resource() {
            Resource::Stats => "Failed to load user stats",
            Resource::Trips => "Failed to load user trips",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Template(#[from] askama::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Load(err) => err
                .status()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            AppError::Config(_) | AppError::Io(_) | AppError::Template(_) | AppError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
        };

        (status, self.to_string()).into_response()
    }
}
