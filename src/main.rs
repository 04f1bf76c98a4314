use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use odds_api_mcp::api::{EventOddsRequest, EventsRequest, OddsApiClient, OddsRequest};
use odds_api_mcp::config::Config;
use odds_api_mcp::models::{CommenceTime, Event, OddsEvent, Participant, Sport};
use odds_api_mcp::utils::format_odds;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "odds", about = "Query The Odds API v4")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available sports
    Sports {
        /// Include out-of-season sports
        #[arg(long)]
        all: bool,
        /// Keep only sports in this group (e.g. Soccer)
        #[arg(long)]
        group: Option<String>,
    },
    /// Odds for all upcoming events of a sport
    Odds {
        /// Sport key from the sports listing
        sport: String,
        #[arg(long, value_delimiter = ',')]
        markets: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        bookmakers: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        event_ids: Vec<String>,
        /// Include bookmaker and outcome deep links
        #[arg(long)]
        links: bool,
        /// Print readable text instead of JSON
        #[arg(long)]
        formatted: bool,
    },
    /// Upcoming events for a sport, without odds
    Events {
        sport: String,
        #[arg(long, value_delimiter = ',')]
        event_ids: Vec<String>,
    },
    /// Odds for a single event, any available market
    EventOdds {
        sport: String,
        event_id: String,
        #[arg(long, value_delimiter = ',')]
        markets: Vec<String>,
        #[arg(long)]
        links: bool,
        #[arg(long)]
        formatted: bool,
    },
    /// Participants (teams or players) for a sport
    Participants { sport: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = OddsApiClient::new(&config);

    match cli.command {
        Command::Sports { all, group } => {
            let body = fetch(client.get_sports(all, group.as_deref()).await)?;
            let sports: Vec<Sport> =
                serde_json::from_value(body).context("Failed to decode sports listing")?;
            println!("Found {} sports", sports.len());
            for sport in sports {
                println!("{} - {} - {}", sport.key, sport.title, sport.description);
            }
        }
        Command::Odds {
            sport,
            markets,
            bookmakers,
            event_ids,
            links,
            formatted,
        } => {
            let request = OddsRequest {
                markets,
                bookmakers,
                event_ids,
                include_links: links,
                ..Default::default()
            };
            let body = fetch(client.get_odds(&sport, &request).await)?;
            if formatted {
                let events: Vec<OddsEvent> =
                    serde_json::from_value(body).context("Failed to decode odds data")?;
                println!("{}", format_odds(&events, &config.default_state));
            } else {
                print_json(&body)?;
            }
        }
        Command::Events { sport, event_ids } => {
            let request = EventsRequest {
                event_ids,
                ..Default::default()
            };
            let body = fetch(client.get_events(&sport, &request).await)?;
            let events: Vec<Event> =
                serde_json::from_value(body).context("Failed to decode events listing")?;
            println!("Found {} events", events.len());
            for event in events {
                println!(
                    "{} @ {} - {}",
                    event.away_team,
                    event.home_team,
                    kickoff(&event.commence_time)
                );
            }
        }
        Command::EventOdds {
            sport,
            event_id,
            markets,
            links,
            formatted,
        } => {
            let request = EventOddsRequest {
                markets,
                include_links: links,
                ..Default::default()
            };
            let body = fetch(client.get_event_odds(&sport, &event_id, &request).await)?;
            if formatted {
                let event: OddsEvent =
                    serde_json::from_value(body).context("Failed to decode event odds")?;
                println!("{}", format_odds(&[event], &config.default_state));
            } else {
                print_json(&body)?;
            }
        }
        Command::Participants { sport } => {
            let body = fetch(client.get_participants(&sport).await)?;
            let participants: Vec<Participant> =
                serde_json::from_value(body).context("Failed to decode participants listing")?;
            println!("Found {} participants", participants.len());
            for participant in participants {
                println!("{} - {}", participant.id, participant.full_name);
            }
        }
    }

    Ok(())
}

/// The client collapses every failure to `None` after logging it; at
/// the CLI boundary that becomes a nonzero exit.
fn fetch(result: Option<Value>) -> Result<Value> {
    result.context("Request failed, see log output for details")
}

fn print_json(body: &Value) -> Result<()> {
    let pretty = serde_json::to_string_pretty(body).context("Failed to render response")?;
    println!("{}", pretty);
    Ok(())
}

/// Kickoff times come back as RFC 3339 strings by default; print those
/// in a compact form and fall back to the raw value otherwise.
fn kickoff(commence_time: &CommenceTime) -> String {
    if let CommenceTime::Iso(raw) = commence_time {
        if let Ok(parsed) = raw.parse::<DateTime<Utc>>() {
            return parsed.format("%Y-%m-%d %H:%M UTC").to_string();
        }
    }
    commence_time.to_string()
}
