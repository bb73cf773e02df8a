//! Parsers for the raw text of schedule cells.

use crate::domain::model::{TeamRecord, BYE_MARKER};
use crate::utils::error::{AlertError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

static SRC_COURT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SRC\s*#\s*(?P<court>\d+)").expect("court pattern is valid"));

static BARE_COURT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?P<court>\d+)\s*$").expect("court pattern is valid"));

static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?(?P<meridiem>[ap]m)$")
        .expect("time pattern is valid")
});

static TEAM_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)^\s*(?P<away>\S.*?)\s*\(\s*(?P<away_record>[^()]*?)\s*\)\s*@\s*(?P<home>\S.*?)\s*\(\s*(?P<home_record>[^()]*?)\s*\)\s*$",
    )
    .expect("team pair pattern is valid")
});

static WIN_LOSS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<wins>\d+)\s*-\s*(?P<losses>\d+)$").expect("record pattern is valid")
});

static GAMES_RECORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Games\s*:\s*(?P<wins>\d+)\s*-\s*(?P<losses>\d+)").expect("record pattern is valid")
});

static CURRENT_RECORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Current\s*Record\s*:\s*(?P<wins>\d+)\s*-\s*(?P<losses>\d+)")
        .expect("record pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// How a venue prints the court a match is played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourtFormat {
    /// `SRC #3`, possibly surrounded by other location text.
    SrcLabel,
    /// A cell holding only the number.
    Bare,
}

pub fn parse_court(raw: &str, format: CourtFormat) -> Result<u32> {
    let pattern = match format {
        CourtFormat::SrcLabel => &*SRC_COURT,
        CourtFormat::Bare => &*BARE_COURT,
    };

    let court = pattern
        .captures(raw)
        .and_then(|caps| caps.name("court"))
        .ok_or_else(|| AlertError::field_parse("court", raw, "no court number found"))?;

    court
        .as_str()
        .parse()
        .map_err(|_| AlertError::field_parse("court", raw, "court number out of range"))
}

/// Date and time layouts used by the venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeFormat {
    /// `2024-05-01` + `7pm`
    IsoDateHourMeridiem,
    /// `5/1/2024` + `6:00pm`
    UsDateClockMeridiem,
}

impl DateTimeFormat {
    fn date_format(&self) -> &'static str {
        match self {
            DateTimeFormat::IsoDateHourMeridiem => "%Y-%m-%d",
            DateTimeFormat::UsDateClockMeridiem => "%m/%d/%Y",
        }
    }

    fn requires_minutes(&self) -> bool {
        matches!(self, DateTimeFormat::UsDateClockMeridiem)
    }
}

/// Combines a date fragment and a time fragment. Whitespace anywhere in
/// either fragment is ignored.
pub fn parse_datetime(date: &str, time: &str, format: DateTimeFormat) -> Result<NaiveDateTime> {
    let date = WHITESPACE.replace_all(date, "");
    let time = WHITESPACE.replace_all(time, "");
    let raw = format!("{} {}", date, time);

    let date = NaiveDate::parse_from_str(&date, format.date_format())
        .map_err(|e| AlertError::field_parse("date", &raw, e.to_string()))?;
    let time = parse_clock_time(&time, format.requires_minutes())
        .ok_or_else(|| AlertError::field_parse("time", &raw, "invalid time of day"))?;

    Ok(date.and_time(time))
}

fn parse_clock_time(time: &str, requires_minutes: bool) -> Option<NaiveTime> {
    let caps = CLOCK_TIME.captures(time)?;
    let hour: u32 = caps["hour"].parse().ok()?;
    let minute: u32 = match caps.name("minute") {
        Some(m) => m.as_str().parse().ok()?,
        None if requires_minutes => return None,
        None => 0,
    };
    if !(1..=12).contains(&hour) {
        return None;
    }

    let pm = caps["meridiem"].eq_ignore_ascii_case("pm");
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Label printed in front of a win-loss record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLabel {
    /// `Games: 7 - 5 (58%)` in a team summary.
    Games,
    /// `Current Record: 3-2` under an opponent's name.
    CurrentRecord,
}

impl RecordLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordLabel::Games => "Games",
            RecordLabel::CurrentRecord => "Current Record",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            RecordLabel::Games => &GAMES_RECORD,
            RecordLabel::CurrentRecord => &CURRENT_RECORD,
        }
    }
}

/// Extracts `(wins, losses)` from text like `Current Record: 3-2`. Any
/// whitespace inside the label is optional.
pub fn parse_record(raw: &str, label: RecordLabel) -> Result<(u32, u32)> {
    let caps = label
        .pattern()
        .captures(raw)
        .ok_or_else(|| AlertError::field_parse("record", raw, format!("expected '{}: W-L'", label.as_str())))?;

    parse_win_loss_groups(raw, &caps["wins"], &caps["losses"])
}

fn parse_win_loss_groups(raw: &str, wins: &str, losses: &str) -> Result<(u32, u32)> {
    let wins = wins
        .parse()
        .map_err(|_| AlertError::field_parse("record", raw, "wins out of range"))?;
    let losses = losses
        .parse()
        .map_err(|_| AlertError::field_parse("record", raw, "losses out of range"))?;
    Ok((wins, losses))
}

fn parse_win_loss(raw: &str, record: &str) -> Result<(u32, u32)> {
    let caps = WIN_LOSS
        .captures(record)
        .ok_or_else(|| AlertError::field_parse("record", raw, format!("'{}' is not W-L", record)))?;
    parse_win_loss_groups(raw, &caps["wins"], &caps["losses"])
}

fn collapse_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Splits `Away (3-2) @ Home (4-1)` into away-then-home records.
pub fn parse_team_pair(raw: &str) -> Result<(TeamRecord, TeamRecord)> {
    let caps = TEAM_PAIR.captures(raw).ok_or_else(|| {
        AlertError::field_parse("teams", raw, "expected 'Away (W-L) @ Home (W-L)'")
    })?;

    let (away_wins, away_losses) = parse_win_loss(raw, &caps["away_record"])?;
    let (home_wins, home_losses) = parse_win_loss(raw, &caps["home_record"])?;

    Ok((
        TeamRecord::new(collapse_whitespace(&caps["away"]), away_wins, away_losses),
        TeamRecord::new(collapse_whitespace(&caps["home"]), home_wins, home_losses),
    ))
}

pub fn is_bye(opponent_cell: &str) -> bool {
    opponent_cell == BYE_MARKER
}
