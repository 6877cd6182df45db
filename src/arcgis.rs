//! ArcGIS network-analysis route service adapter.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::RoutingError;
use crate::request::ProviderRouteRequest;
use crate::response::{ProviderRouteResponse, ServiceDescription};
use crate::traits::RouteProvider;
use crate::travel_mode::TravelMode;

pub const DEFAULT_ROUTE_SERVICE_URL: &str =
    "https://route-api.arcgis.com/arcgis/rest/services/World/Route/NAServer/Route_World";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ARCGIS_API_KEY";

/// Environment variable overriding the route service URL.
pub const ROUTE_URL_ENV: &str = "ARCGIS_ROUTE_URL";

#[derive(Debug, Clone)]
pub struct ArcGisConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ArcGisConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ROUTE_SERVICE_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl ArcGisConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var(ROUTE_URL_ENV).unwrap_or(defaults.base_url),
            api_key: std::env::var(API_KEY_ENV).ok(),
            ..defaults
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The API key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ArcGisClient {
    config: ArcGisConfig,
    client: reqwest::blocking::Client,
}

impl ArcGisClient {
    pub fn new(config: ArcGisConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ArcGisConfig {
        &self.config
    }

    fn service_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn solve_url(&self) -> String {
        format!("{}/solve", self.service_url())
    }

    fn token(&self) -> Result<&str, RoutingError> {
        self.config.api_key().ok_or(RoutingError::Configuration)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoutingError {
        if let Some(status) = error.status() {
            return RoutingError::ProviderRejected {
                code: i64::from(status.as_u16()),
                message: error.to_string(),
            };
        }
        RoutingError::ProviderUnavailable {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    fn read_json<T: DeserializeOwned>(
        &self,
        response: Result<reqwest::blocking::Response, reqwest::Error>,
        url: &str,
    ) -> Result<T, RoutingError> {
        let body = response
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        serde_json::from_str(&body).map_err(|err| RoutingError::payload(err.to_string()))
    }
}

impl RouteProvider for ArcGisClient {
    fn has_credential(&self) -> bool {
        self.config.api_key().is_some()
    }

    fn fetch_travel_modes(&self) -> Result<Vec<TravelMode>, RoutingError> {
        let token = self.token()?;
        let url = self.service_url();
        debug!(url, "fetching travel mode catalog");

        let response = self
            .client
            .get(url)
            .query(&[("f", "json"), ("token", token)])
            .send();
        let description: ServiceDescription = self.read_json(response, url)?;

        if let Some(fault) = description.error {
            return Err(fault.into());
        }
        Ok(description.supported_travel_modes)
    }

    fn submit(
        &self,
        request: &ProviderRouteRequest,
    ) -> Result<ProviderRouteResponse, RoutingError> {
        let token = self.token()?;
        let url = self.solve_url();

        let mut params = request.to_form_params()?;
        params.push(("token", token.to_string()));

        debug!(
            url = %url,
            polygon_barriers = request.polygon_barriers.len(),
            point_barriers = request.point_barriers.len(),
            "submitting route request"
        );
        let response = self.client.post(&url).form(&params).send();
        let body: ProviderRouteResponse = self.read_json(response, &url)?;

        let body = body.into_result()?;
        debug!(routes = body.route_count(), "route response received");
        Ok(body)
    }
}
