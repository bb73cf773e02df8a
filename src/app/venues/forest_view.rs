use super::{bye_row, require};
use crate::core::fetch::{DocumentFetcher, FetchedDocument};
use crate::core::fields::{is_bye, parse_court, parse_record, CourtFormat, DateTimeFormat, RecordLabel};
use crate::core::schedule::{reconcile_all, resolve_dates, PendingMatch};
use crate::core::xpath::{all_values, first_value};
use crate::domain::model::{League, Match, TeamConfig, TeamRecord, VenueDescriptor};
use crate::utils::error::{AlertError, Result};
use scraper::ElementRef;
use url::Url;

const LEAGUE_NAME: &str = "/html/body/div[1]/div[3]/div/div/div[5]/table/tbody/tr/td[1]/div/a";
const TEAM_RECORD: &str =
    "/html/body/div[1]/div[3]/div/div/table/tbody/tr/td[2]/div[2]/table/tbody/tr/td[1]";
const SCHEDULE_ROWS: &str =
    "/html/body/div[1]/div[3]/div/div/table/tbody/tr/td[2]/div[4]/table/tbody/tr";

const DATE_CELL: &str = "td[1]";
const TIME_CELL: &str = "td[2]";
const COURT_CELL: &str = "td[3]";
const OPPONENT_CELL: &str = "td[4]";
const OPPONENT_NAME: &str = "td[4]/a[1]";
const OPPONENT_RECORD: &str = "td[4]/span[1]";

const BYE_TIME: &str = "12pm";

/// Forest View Lanes (BracketPal). The team page lists only opponents, so
/// our own record comes from the team summary box.
#[derive(Debug, Clone)]
pub struct ForestViewLanesParser {
    fetcher: DocumentFetcher,
    venue: VenueDescriptor,
}

impl ForestViewLanesParser {
    pub fn new(fetcher: DocumentFetcher, venue: VenueDescriptor) -> Self {
        Self { fetcher, venue }
    }

    pub fn schedule_url(&self, team: &TeamConfig) -> Result<String> {
        let raw = format!(
            "{}/teaminfo/{}",
            self.venue.base_url.trim_end_matches('/'),
            team.league.id
        );
        Url::parse(&raw)
            .map(String::from)
            .map_err(|e| AlertError::InvalidConfigValueError {
                field: "venues.base_url".to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })
    }

    pub async fn parse_league(&self, team: &TeamConfig) -> Result<Vec<Match>> {
        let url = self.schedule_url(team)?;
        let document = self.fetcher.fetch(&url).await?;
        self.parse_document(&document, team)
    }

    pub fn parse_document(&self, document: &FetchedDocument, team: &TeamConfig) -> Result<Vec<Match>> {
        let html = &document.html;

        let name = require(first_value(html, LEAGUE_NAME, None), "league name", &document.url)?;
        let league = League {
            id: team.league.id.clone(),
            name,
            venue: self.venue.clone(),
        };

        let record_raw = require(first_value(html, TEAM_RECORD, None), "team record", &document.url)?;
        let (wins, losses) = parse_record(&record_raw, RecordLabel::Games)?;
        let ours = TeamRecord::new(team.name.as_str(), wins, losses);

        let rows = all_values(html, SCHEDULE_ROWS, html.root_element())?
            .skip(1)
            .map(|row| pending_match(document, row, &ours))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("{}: {} schedule rows in {}", team.name, rows.len(), league.name);

        let parsed = resolve_dates(rows, DateTimeFormat::IsoDateHourMeridiem)?;
        reconcile_all(parsed, team, &league, &document.url)
    }
}

fn cell(document: &FetchedDocument, row: ElementRef<'_>, path: &str) -> Result<String> {
    require(first_value(&document.html, path, Some(row)), "schedule cell", &document.url)
}

fn pending_match(document: &FetchedDocument, row: ElementRef<'_>, ours: &TeamRecord) -> Result<PendingMatch> {
    let date = cell(document, row, DATE_CELL)?;

    if is_bye(&cell(document, row, OPPONENT_CELL)?) {
        return Ok(bye_row(date, BYE_TIME, ours.clone()));
    }

    let court = parse_court(&cell(document, row, COURT_CELL)?, CourtFormat::Bare)?;
    let time = cell(document, row, TIME_CELL)?;
    let opponent_name = cell(document, row, OPPONENT_NAME)?;
    let (wins, losses) = parse_record(&cell(document, row, OPPONENT_RECORD)?, RecordLabel::CurrentRecord)?;

    Ok(PendingMatch {
        date,
        time,
        court,
        teams: (ours.clone(), TeamRecord::new(opponent_name, wins, losses)),
    })
}
