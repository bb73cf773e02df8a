use crate::domain::model::Match;
use chrono::{Datelike, NaiveDateTime};

const HEADER: &str = "🏐 Volleyball Alert 🏐";

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// `May 1st, 2024`
pub fn long_date(datetime: &NaiveDateTime) -> String {
    format!(
        "{} {}{}, {}",
        datetime.format("%B"),
        datetime.day(),
        ordinal_suffix(datetime.day()),
        datetime.year()
    )
}

/// `6:00 PM`
pub fn clock_time(datetime: &NaiveDateTime) -> String {
    datetime.format("%-I:%M %p").to_string()
}

pub fn render_message(game: &Match) -> String {
    let date = long_date(&game.datetime);
    let team = &game.team;
    let league = &game.league;

    if game.is_bye() {
        return format!(
            "{HEADER}\nBYE - no match this week\n\n{}\n{}\n\n{}\n{}\n{}\n\n{}",
            team.name(),
            team.record.record(),
            league.name,
            league.venue.display_name,
            date,
            team.url,
        );
    }

    format!(
        "{HEADER}\n{} - Court {}\n\n{}\n{}\n\n{}\n{}\n{}\n\n{}\n{}\n\n{}",
        clock_time(&game.datetime),
        game.court,
        team.name(),
        team.record.record(),
        league.name,
        league.venue.display_name,
        date,
        game.opponent_team.name,
        game.opponent_team.record(),
        team.url,
    )
}
