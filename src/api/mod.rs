pub mod odds_api;

pub use odds_api::{EventOddsRequest, EventsRequest, OddsApiClient, OddsRequest};
