use serde::{Deserialize, Serialize};
use std::fmt;

/// A sport or league from the /sports endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sport {
    pub key: String,
    pub group: String,
    pub title: String,
    pub description: String,
    pub active: bool,
}

/// An upcoming or live event for a sport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub sport_key: String,
    pub commence_time: CommenceTime,
    pub home_team: String,
    pub away_team: String,
}

/// Event start time as returned by the API. A string with
/// `dateFormat=iso`, an epoch integer with `dateFormat=unix`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommenceTime {
    Iso(String),
    Unix(i64),
}

impl fmt::Display for CommenceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommenceTime::Iso(s) => write!(f, "{}", s),
            CommenceTime::Unix(ts) => write!(f, "{}", ts),
        }
    }
}

/// An event together with the bookmaker odds attached to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsEvent {
    pub id: String,
    pub sport_key: String,
    pub commence_time: CommenceTime,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

/// Odds from a single bookmaker. The link is only present when the
/// request asked for `includeLinks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmaker {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub markets: Vec<Market>,
}

/// A bet category (h2h, spreads, totals, ...) under a bookmaker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

/// One selectable result within a market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub point: Option<f64>,
    #[serde(default)]
    pub link: Option<String>,
}

/// A team or player from the /participants endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub full_name: String,
}
