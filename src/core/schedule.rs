//! Venue-independent steps that turn parsed rows into [`Match`]es.

use crate::core::fields::{parse_datetime, DateTimeFormat};
use crate::domain::model::{League, Match, ParsedMatch, Team, TeamConfig, TeamRecord};
use crate::utils::error::{AlertError, Result};

/// A schedule row with every field parsed except the datetime, whose date
/// fragment may still be blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMatch {
    pub date: String,
    pub time: String,
    pub court: u32,
    pub teams: (TeamRecord, TeamRecord),
}

/// Fills blank date fragments with the last non-blank one seen earlier in
/// the same sequence. A blank before any explicit date is an error.
pub fn carry_forward_dates<'a, I>(fragments: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a str>,
{
    fragments
        .into_iter()
        .try_fold(
            (None, Vec::new()),
            |(last_seen, mut resolved), fragment| -> Result<(Option<&'a str>, Vec<String>)> {
                let date = if fragment.trim().is_empty() {
                    last_seen.ok_or_else(|| {
                        AlertError::field_parse(
                            "date",
                            fragment,
                            "blank date with no earlier date to reuse",
                        )
                    })?
                } else {
                    fragment
                };
                resolved.push(date.to_string());
                Ok((Some(date), resolved))
            },
        )
        .map(|(_, resolved)| resolved)
}

/// Resolves every row's datetime in document order.
pub fn resolve_dates(rows: Vec<PendingMatch>, format: DateTimeFormat) -> Result<Vec<ParsedMatch>> {
    let dates = carry_forward_dates(rows.iter().map(|row| row.date.as_str()))?;

    rows.into_iter()
        .zip(dates)
        .map(|(row, date)| {
            Ok(ParsedMatch {
                court: row.court,
                datetime: parse_datetime(&date, &row.time, format)?,
                teams: row.teams,
            })
        })
        .collect()
}

/// Picks the configured team out of the parsed pair. Exactly one side must
/// carry the configured name.
pub fn reconcile(
    parsed: ParsedMatch,
    team_config: &TeamConfig,
    league: &League,
    source_url: &str,
) -> Result<Match> {
    let (first, second) = parsed.teams;
    let name = team_config.name.as_str();

    let (ours, opponent) = match (first.name == name, second.name == name) {
        (true, false) => (first, second),
        (false, true) => (second, first),
        (first_matches, second_matches) => {
            return Err(AlertError::TeamReconciliationError {
                team_name: name.to_string(),
                pair: format!("{} / {}", first, second),
                matches: usize::from(first_matches) + usize::from(second_matches),
            });
        }
    };

    Ok(Match {
        court: parsed.court,
        datetime: parsed.datetime,
        league: league.clone(),
        team: Team {
            record: ours,
            members: team_config.members.clone(),
            additional_contacts: team_config.additional_contacts.clone(),
            url: source_url.to_string(),
        },
        opponent_team: opponent,
    })
}

pub fn reconcile_all(
    parsed: Vec<ParsedMatch>,
    team_config: &TeamConfig,
    league: &League,
    source_url: &str,
) -> Result<Vec<Match>> {
    parsed
        .into_iter()
        .map(|parsed| reconcile(parsed, team_config, league, source_url))
        .collect()
}
