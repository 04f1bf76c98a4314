use crate::config::Config;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

const ODDS_API_BASE_URL: &str = "https://api.the-odds-api.com/v4";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// What went wrong with a single request. Logged and collapsed to `None`
/// before it reaches a caller (see [`OddsApiClient::make_request`]).
#[derive(Debug, Error)]
enum RequestError {
    #[error("HTTP error: {status} - {body}")]
    Status { status: StatusCode, body: String },
    #[error("request error: {0}")]
    Transport(reqwest::Error),
    #[error("unexpected error: {0}")]
    Unexpected(#[from] serde_json::Error),
}

/// Ordered query parameters for one request. Values go through reqwest's
/// form encoding, so a comma-joined list ends up as a single parameter
/// with `%2C` separators.
#[derive(Debug, Default)]
pub(crate) struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set(&mut self, key: &'static str, value: &str) {
        self.0.push((key, value.to_string()));
    }

    pub(crate) fn set_opt(&mut self, key: &'static str, value: Option<&str>) {
        if let Some(value) = value {
            self.0.push((key, value.to_string()));
        }
    }

    /// Comma-join before encoding. Empty lists are omitted entirely.
    pub(crate) fn set_list(&mut self, key: &'static str, values: &[String]) {
        if !values.is_empty() {
            self.0.push((key, values.join(",")));
        }
    }

    /// Literal "true" when set, absent otherwise. The API treats a
    /// missing flag as false, so "false" is never serialized.
    pub(crate) fn flag(&mut self, key: &'static str, on: bool) {
        if on {
            self.0.push((key, "true".to_string()));
        }
    }

    pub(crate) fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

/// Optional parameters for [`OddsApiClient::get_odds`]
#[derive(Debug, Clone)]
pub struct OddsRequest {
    /// Markets to fetch (h2h, spreads, totals, outrights, ...)
    pub markets: Vec<String>,
    /// "iso" or "unix"
    pub date_format: String,
    /// "decimal" or "american"
    pub odds_format: String,
    pub event_ids: Vec<String>,
    pub bookmakers: Vec<String>,
    /// Only events starting on/after this ISO timestamp
    pub commence_time_from: Option<String>,
    /// Only events starting on/before this ISO timestamp
    pub commence_time_to: Option<String>,
    pub include_links: bool,
    pub include_sids: bool,
}

impl Default for OddsRequest {
    fn default() -> Self {
        Self {
            markets: Vec::new(),
            date_format: "iso".to_string(),
            odds_format: "decimal".to_string(),
            event_ids: Vec::new(),
            bookmakers: Vec::new(),
            commence_time_from: None,
            commence_time_to: None,
            include_links: false,
            include_sids: false,
        }
    }
}

impl OddsRequest {
    fn params(&self, regions: &[String]) -> QueryParams {
        let mut params = QueryParams::new();
        params.set_list("regions", regions);
        params.set("dateFormat", &self.date_format);
        params.set("oddsFormat", &self.odds_format);
        params.set_list("markets", &self.markets);
        params.set_list("eventIds", &self.event_ids);
        params.set_list("bookmakers", &self.bookmakers);
        params.set_opt("commenceTimeFrom", self.commence_time_from.as_deref());
        params.set_opt("commenceTimeTo", self.commence_time_to.as_deref());
        params.flag("includeLinks", self.include_links);
        params.flag("includeSids", self.include_sids);
        params
    }
}

/// Optional parameters for [`OddsApiClient::get_event_odds`]. Same as
/// [`OddsRequest`] minus the event-id filter, which is meaningless when
/// the event is already named in the path.
#[derive(Debug, Clone)]
pub struct EventOddsRequest {
    pub markets: Vec<String>,
    pub date_format: String,
    pub odds_format: String,
    pub bookmakers: Vec<String>,
    pub commence_time_from: Option<String>,
    pub commence_time_to: Option<String>,
    pub include_links: bool,
    pub include_sids: bool,
}

impl Default for EventOddsRequest {
    fn default() -> Self {
        Self {
            markets: Vec::new(),
            date_format: "iso".to_string(),
            odds_format: "decimal".to_string(),
            bookmakers: Vec::new(),
            commence_time_from: None,
            commence_time_to: None,
            include_links: false,
            include_sids: false,
        }
    }
}

impl EventOddsRequest {
    fn params(&self, regions: &[String]) -> QueryParams {
        let mut params = QueryParams::new();
        params.set_list("regions", regions);
        params.set("dateFormat", &self.date_format);
        params.set("oddsFormat", &self.odds_format);
        params.set_list("markets", &self.markets);
        params.set_list("bookmakers", &self.bookmakers);
        params.set_opt("commenceTimeFrom", self.commence_time_from.as_deref());
        params.set_opt("commenceTimeTo", self.commence_time_to.as_deref());
        params.flag("includeLinks", self.include_links);
        params.flag("includeSids", self.include_sids);
        params
    }
}

/// Optional parameters for [`OddsApiClient::get_events`]
#[derive(Debug, Clone)]
pub struct EventsRequest {
    pub date_format: String,
    pub event_ids: Vec<String>,
    pub commence_time_from: Option<String>,
    pub commence_time_to: Option<String>,
}

impl Default for EventsRequest {
    fn default() -> Self {
        Self {
            date_format: "iso".to_string(),
            event_ids: Vec::new(),
            commence_time_from: None,
            commence_time_to: None,
        }
    }
}

impl EventsRequest {
    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.set("dateFormat", &self.date_format);
        params.set_list("eventIds", &self.event_ids);
        params.set_opt("commenceTimeFrom", self.commence_time_from.as_deref());
        params.set_opt("commenceTimeTo", self.commence_time_to.as_deref());
        params
    }
}

/// Async client for The Odds API v4.
///
/// Every operation performs a single GET and returns the parsed JSON
/// body, or `None` when anything went wrong. Failures are logged with
/// their cause but are not distinguishable through the return value.
pub struct OddsApiClient {
    api_key: String,
    regions: Vec<String>,
    base_url: String,
    client: reqwest::Client,
}

impl OddsApiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            regions: config.regions.clone(),
            base_url: ODDS_API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a different host. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Get all available sports.
    ///
    /// `include_all` also returns out-of-season sports. `filter_group`
    /// keeps only sports whose `group` matches exactly; the filter runs
    /// client-side and is never sent upstream.
    pub async fn get_sports(&self, include_all: bool, filter_group: Option<&str>) -> Option<Value> {
        let mut params = QueryParams::new();
        params.flag("all", include_all);

        let response = self.make_request("sports", params).await?;

        match (filter_group, response) {
            (Some(group), Value::Array(sports)) => {
                let filtered: Vec<Value> = sports
                    .into_iter()
                    .filter(|sport| sport.get("group").and_then(Value::as_str) == Some(group))
                    .collect();
                Some(Value::Array(filtered))
            }
            (_, response) => Some(response),
        }
    }

    /// Get odds for all upcoming events of a sport.
    pub async fn get_odds(&self, sport: &str, request: &OddsRequest) -> Option<Value> {
        let endpoint = format!("sports/{}/odds", sport);
        self.make_request(&endpoint, request.params(&self.regions))
            .await
    }

    /// Get upcoming events for a sport, without odds.
    pub async fn get_events(&self, sport: &str, request: &EventsRequest) -> Option<Value> {
        let endpoint = format!("sports/{}/events", sport);
        self.make_request(&endpoint, request.params()).await
    }

    /// Get odds for one event. Unlike the bulk odds endpoint this one
    /// accepts any market the bookmakers carry, including player props.
    pub async fn get_event_odds(
        &self,
        sport: &str,
        event_id: &str,
        request: &EventOddsRequest,
    ) -> Option<Value> {
        let endpoint = format!("sports/{}/events/{}/odds", sport, event_id);
        self.make_request(&endpoint, request.params(&self.regions))
            .await
    }

    /// Get participants (teams or players) for a sport.
    pub async fn get_participants(&self, sport: &str) -> Option<Value> {
        let endpoint = format!("sports/{}/participants", sport);
        self.make_request(&endpoint, QueryParams::new()).await
    }

    /// Perform one GET against `{base_url}/{endpoint}`, injecting the
    /// API key. HTTP errors, transport errors and undecodable bodies
    /// are all logged and normalized to `None`.
    async fn make_request(&self, endpoint: &str, mut params: QueryParams) -> Option<Value> {
        params.set("apiKey", &self.api_key);

        match self.execute(endpoint, &params).await {
            Ok(body) => Some(body),
            Err(err) => {
                error!("{}", err);
                None
            }
        }
    }

    async fn execute(&self, endpoint: &str, params: &QueryParams) -> Result<Value, RequestError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(params.pairs())
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::Status { status, body });
        }

        // Monitoring aid only; the key itself is never logged
        if let Some(remaining) = header_value(&response, "x-requests-remaining") {
            info!("Remaining API requests: {}", remaining);
        }
        if let Some(used) = header_value(&response, "x-requests-used") {
            info!("API requests used: {}", used);
        }

        let bytes = response.bytes().await.map_err(transport)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// A reqwest error carries the full request URL, query string and key
/// included, so the URL is dropped before the error can be logged.
fn transport(err: reqwest::Error) -> RequestError {
    RequestError::Transport(err.without_url())
}

fn header_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(params: &QueryParams) -> Vec<(&'static str, &str)> {
        params
            .pairs()
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect()
    }

    #[test]
    fn lists_are_comma_joined() {
        let request = OddsRequest {
            markets: vec!["h2h".to_string(), "totals".to_string()],
            ..Default::default()
        };
        let params = request.params(&["us".to_string(), "uk".to_string()]);

        let pairs = values(&params);
        assert!(pairs.contains(&("regions", "us,uk")));
        assert!(pairs.contains(&("markets", "h2h,totals")));
    }

    #[test]
    fn empty_lists_are_omitted() {
        let request = OddsRequest::default();
        let params = request.params(&["us".to_string()]);

        let keys: Vec<&str> = params.pairs().iter().map(|(k, _)| *k).collect();
        assert!(!keys.contains(&"markets"));
        assert!(!keys.contains(&"eventIds"));
        assert!(!keys.contains(&"bookmakers"));
    }

    #[test]
    fn flags_serialize_as_true_or_not_at_all() {
        let request = OddsRequest {
            include_links: true,
            include_sids: false,
            ..Default::default()
        };
        let params = request.params(&["us".to_string()]);

        let pairs = values(&params);
        assert!(pairs.contains(&("includeLinks", "true")));
        assert!(!pairs.iter().any(|(k, _)| *k == "includeSids"));
    }

    #[test]
    fn date_and_odds_format_default_to_iso_decimal() {
        let request = OddsRequest::default();
        let params = request.params(&["us".to_string()]);

        let pairs = values(&params);
        assert!(pairs.contains(&("dateFormat", "iso")));
        assert!(pairs.contains(&("oddsFormat", "decimal")));
    }

    #[test]
    fn events_request_carries_time_window() {
        let request = EventsRequest {
            event_ids: vec!["e1".to_string(), "e2".to_string()],
            commence_time_from: Some("2025-03-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        let params = request.params();

        let pairs = values(&params);
        assert!(pairs.contains(&("eventIds", "e1,e2")));
        assert!(pairs.contains(&("commenceTimeFrom", "2025-03-01T00:00:00Z")));
        assert!(!pairs.iter().any(|(k, _)| *k == "commenceTimeTo"));
    }

    #[test]
    fn event_odds_request_has_no_event_ids() {
        let request = EventOddsRequest {
            bookmakers: vec!["draftkings".to_string()],
            ..Default::default()
        };
        let params = request.params(&["us".to_string()]);

        let pairs = values(&params);
        assert!(pairs.contains(&("bookmakers", "draftkings")));
        assert!(!pairs.iter().any(|(k, _)| *k == "eventIds"));
    }
}
