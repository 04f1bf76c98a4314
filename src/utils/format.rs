use crate::models::OddsEvent;
use std::fmt::Write;

/// Literal placeholder some bookmakers embed in their deep links
const STATE_PLACEHOLDER: &str = "{state}";

/// Render odds data for readability, with all available links.
///
/// `default_state` is the jurisdiction code substituted for `{state}`
/// in bookmaker and outcome links. Pure function, deterministic; events
/// without optional fields simply lose the matching decoration.
pub fn format_odds(events: &[OddsEvent], default_state: &str) -> String {
    if events.is_empty() {
        return "No odds data available".to_string();
    }

    let mut sections = Vec::with_capacity(events.len());

    for event in events {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "\n=== MATCH: {} @ {} ===",
            event.away_team, event.home_team
        );
        let _ = writeln!(out, "Time: {}", event.commence_time);

        for bookmaker in &event.bookmakers {
            let _ = write!(out, "\n  {}:", bookmaker.title);
            if let Some(link) = non_empty(&bookmaker.link) {
                let fixed = link.replace(STATE_PLACEHOLDER, default_state);
                let _ = write!(out, " [SITE: {}]", fixed);
            }
            out.push('\n');

            for market in &bookmaker.markets {
                let _ = writeln!(out, "    {}", market.key.to_uppercase());

                for outcome in &market.outcomes {
                    let _ = write!(out, "      {}: {}", outcome.name, outcome.price);
                    if let Some(point) = outcome.point {
                        let _ = write!(out, " ({})", point);
                    }
                    if let Some(link) = non_empty(&outcome.link) {
                        let fixed = link.replace(STATE_PLACEHOLDER, default_state);
                        let _ = write!(out, " [BET: {}]", fixed);
                    }
                    out.push('\n');
                }
            }
        }

        sections.push(out);
    }

    sections.join("\n")
}

fn non_empty(link: &Option<String>) -> Option<&str> {
    link.as_deref().filter(|l| !l.is_empty())
}
