// One adapter per venue schedule page layout.

pub mod forest_view;
pub mod toledo;

pub use forest_view::ForestViewLanesParser;
pub use toledo::ToledoSportAndSocialClubParser;

use crate::core::schedule::PendingMatch;
use crate::domain::model::TeamRecord;
use crate::utils::error::{AlertError, Result};

/// Turns a missing anchor into a page structure error naming what was
/// expected; any other failure passes through untouched.
pub(crate) fn require<T>(result: Result<T>, anchor: &str, url: &str) -> Result<T> {
    result.map_err(|e| match e {
        AlertError::ValueNotFound { path } => AlertError::PageStructureError {
            anchor: format!("{} at {}", anchor, path),
            url: url.to_string(),
        },
        other => other,
    })
}

/// Placeholder for a week without an opponent, so a bye never aborts the
/// rest of the page.
pub(crate) fn bye_row(date: String, time: &str, ours: TeamRecord) -> PendingMatch {
    PendingMatch {
        date,
        time: time.to_string(),
        court: 0,
        teams: (ours, TeamRecord::bye()),
    }
}
