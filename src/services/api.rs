use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    config::AppConfig,
    error::{AppError, LoadError, Resource},
    models::{trip::validate_trips, Trip, UserStats},
    services::store::TripStore,
};

/// Thin HTTP client for the dashboard backend (`/stats`, `/get_trips`).
#[derive(Debug, Clone)]
pub struct HttpTripStore {
    client: Client,
    base_url: Url,
}

/// Endpoint and user a failing request was made for.
struct RequestContext<'a> {
    resource: Resource,
    endpoint: String,
    user_id: &'a str,
}

impl RequestContext<'_> {
    fn network(&self, status: Option<u16>, reason: impl Into<String>) -> LoadError {
        LoadError::Network {
            resource: self.resource,
            endpoint: self.endpoint.clone(),
            user_id: self.user_id.to_string(),
            status,
            reason: reason.into(),
        }
    }

    fn parse(&self, reason: impl Into<String>) -> LoadError {
        LoadError::Parse {
            resource: self.resource,
            endpoint: self.endpoint.clone(),
            user_id: self.user_id.to_string(),
            reason: reason.into(),
        }
    }

    fn transport(&self, err: reqwest::Error) -> LoadError {
        if err.is_timeout() {
            LoadError::Timeout {
                resource: self.resource,
                endpoint: self.endpoint.clone(),
                user_id: self.user_id.to_string(),
            }
        } else if err.is_decode() {
            self.parse(err.to_string())
        } else {
            self.network(err.status().map(|status| status.as_u16()), err.to_string())
        }
    }
}

impl HttpTripStore {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Other(err.into()))?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(config.api_base_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, resource: Resource, user_id: &str) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join(resource.path())?;
        url.query_pairs_mut().append_pair("userId", user_id);
        Ok(url)
    }

    async fn get_json<'a, T: DeserializeOwned>(
        &self,
        resource: Resource,
        user_id: &'a str,
    ) -> Result<(T, RequestContext<'a>), LoadError> {
        let url = self.endpoint(resource, user_id).map_err(|err| {
            RequestContext {
                resource,
                endpoint: self.base_url.to_string(),
                user_id,
            }
            .network(None, err.to_string())
        })?;
        let ctx = RequestContext {
            resource,
            endpoint: url.to_string(),
            user_id,
        };

        debug!(endpoint = %ctx.endpoint, user = %user_id, "fetching {resource}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ctx.transport(err))?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %ctx.endpoint, %status, "backend answered with an error status");
            return Err(ctx.network(
                Some(status.as_u16()),
                format!("unexpected status {status}"),
            ));
        }

        let body = response.bytes().await.map_err(|err| ctx.transport(err))?;
        let value = serde_json::from_slice(&body).map_err(|err| ctx.parse(err.to_string()))?;
        Ok((value, ctx))
    }
}

#[async_trait]
impl TripStore for HttpTripStore {
    async fn fetch_stats(&self, user_id: &str) -> Result<UserStats, LoadError> {
        let (stats, ctx): (UserStats, _) = self.get_json(Resource::Stats, user_id).await?;
        stats.validate().map_err(|reason| ctx.parse(reason))?;
        Ok(stats)
    }

    async fn fetch_trips(&self, user_id: &str) -> Result<Vec<Trip>, LoadError> {
        let (trips, ctx): (Vec<Trip>, _) = self.get_json(Resource::Trips, user_id).await?;
        validate_trips(&trips).map_err(|reason| ctx.parse(reason))?;
        debug!(user = %user_id, count = trips.len(), "trips loaded");
        Ok(trips)
    }
}
