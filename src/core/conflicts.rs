use crate::domain::model::Match;
use crate::notify::message::{clock_time, long_date};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// One member booked into more than one game at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleConflict {
    pub datetime: NaiveDateTime,
    pub member: String,
    pub games: Vec<String>,
}

fn describe(game: &Match, member: &str) -> String {
    format!(
        "{} - Court {} - {} {} - {} - {}",
        game.league.name,
        game.court,
        long_date(&game.datetime),
        clock_time(&game.datetime),
        game.team.name(),
        member
    )
}

/// Groups every member's games by start time, keeping only the slots with
/// more than one game. Ordered by time, then member name.
pub fn find_schedule_conflicts(matches: &[Match]) -> Vec<ScheduleConflict> {
    let mut slots: BTreeMap<(NaiveDateTime, &str), Vec<String>> = BTreeMap::new();

    for game in matches.iter().filter(|game| !game.is_bye()) {
        for member in &game.team.members {
            slots
                .entry((game.datetime, member.name()))
                .or_default()
                .push(describe(game, member.name()));
        }
    }

    slots
        .into_iter()
        .filter(|(_, games)| games.len() > 1)
        .map(|((datetime, member), games)| ScheduleConflict {
            datetime,
            member: member.to_string(),
            games,
        })
        .collect()
}
