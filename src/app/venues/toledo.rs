use super::{bye_row, require};
use crate::core::fetch::{DocumentFetcher, FetchedDocument};
use crate::core::fields::{is_bye, parse_court, parse_team_pair, CourtFormat, DateTimeFormat};
use crate::core::schedule::{reconcile_all, resolve_dates, PendingMatch};
use crate::core::xpath::{all_values, first_value, select_one, text_of};
use crate::domain::model::{League, Match, TeamConfig, TeamRecord, VenueDescriptor};
use crate::utils::error::{AlertError, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

const SCHEDULE_HOLDER: &str = "#ctl00_ContentPlaceHolder1_ScheduleHolder";
const LEAGUE_HEADER: &str = "table[1]/tbody[1]/tr[1]/td[1]/h1";
const SCHEDULE_GRID: &str = "#ctl00_ContentPlaceHolder1_gvSchedule";
const SCHEDULE_ROWS: &str = "tbody/tr";
const ROW_CELLS: &str = "td";
const BYE_TIME: &str = "12:00pm";

static LEAGUE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.+:\s+(?P<league>.+)\s+@.+$").expect("league header pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Toledo Sport & Social Club (Skyway Recreation Center). One page per
/// team; each row lists both teams with their records.
#[derive(Debug, Clone)]
pub struct ToledoSportAndSocialClubParser {
    fetcher: DocumentFetcher,
    venue: VenueDescriptor,
}

impl ToledoSportAndSocialClubParser {
    pub fn new(fetcher: DocumentFetcher, venue: VenueDescriptor) -> Self {
        Self { fetcher, venue }
    }

    pub fn schedule_url(&self, team: &TeamConfig) -> Result<String> {
        let params = [
            ("ID", team.league.id.as_str()),
            ("TeamName", team.name.as_str()),
        ];
        Url::parse_with_params(&self.venue.base_url, &params)
            .map(String::from)
            .map_err(|e| AlertError::InvalidConfigValueError {
                field: "venues.base_url".to_string(),
                value: self.venue.base_url.clone(),
                reason: e.to_string(),
            })
    }

    pub async fn parse_league(&self, team: &TeamConfig) -> Result<Vec<Match>> {
        let url = self.schedule_url(team)?;
        let document = self.fetcher.fetch(&url).await?;
        self.parse_document(&document, team)
    }

    pub fn parse_document(&self, document: &FetchedDocument, team: &TeamConfig) -> Result<Vec<Match>> {
        let league = League {
            id: team.league.id.clone(),
            name: league_name(document)?,
            venue: self.venue.clone(),
        };

        let rows = schedule_rows(document, team)?;
        tracing::debug!("{}: {} schedule rows in {}", team.name, rows.len(), league.name);

        let parsed = resolve_dates(rows, DateTimeFormat::UsDateClockMeridiem)?;
        reconcile_all(parsed, team, &league, &document.url)
    }
}

fn league_name(document: &FetchedDocument) -> Result<String> {
    let html = &document.html;
    let holder = require(select_one(html, SCHEDULE_HOLDER), "schedule holder", &document.url)?;
    let header = require(
        first_value(html, LEAGUE_HEADER, Some(holder)),
        "league header",
        &document.url,
    )?;

    let header = WHITESPACE.replace_all(&header, " ");
    LEAGUE_NAME
        .captures(&header)
        .map(|caps| caps["league"].trim().to_string())
        .ok_or_else(|| AlertError::field_parse("league name", &header, "expected '<club>: <league> @ <venue>'"))
}

fn schedule_rows(document: &FetchedDocument, team: &TeamConfig) -> Result<Vec<PendingMatch>> {
    let html = &document.html;
    let grid = require(select_one(html, SCHEDULE_GRID), "schedule grid", &document.url)?;

    all_values(html, SCHEDULE_ROWS, grid)?
        .skip(1)
        .map(|row| {
            let cells: Vec<String> = all_values(html, ROW_CELLS, row)?.map(text_of).collect();
            pending_match(&cells, team)
        })
        .collect()
}

fn pending_match(cells: &[String], team: &TeamConfig) -> Result<PendingMatch> {
    let malformed = |expected: &str| AlertError::field_parse("schedule row", &cells.join(" | "), expected);

    let [datetime, teams, rest @ ..] = cells else {
        return Err(malformed("expected date/time and teams cells"));
    };

    let (date, time) = match datetime.split_once(',') {
        Some((date, time)) => (date.trim().to_string(), time.trim().to_string()),
        None => (datetime.clone(), String::new()),
    };

    if is_bye(teams) {
        return Ok(bye_row(date, BYE_TIME, TeamRecord::new(team.name.as_str(), 0, 0)));
    }

    let location = rest
        .first()
        .ok_or_else(|| malformed("expected a location cell"))?;

    Ok(PendingMatch {
        date,
        time,
        court: parse_court(location, CourtFormat::SrcLabel)?,
        teams: parse_team_pair(teams)?,
    })
}
