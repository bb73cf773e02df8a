use crate::app::venues::{ForestViewLanesParser, ToledoSportAndSocialClubParser};
use crate::core::fetch::DocumentFetcher;
use crate::domain::model::{Match, TeamConfig, Venue, VenueDescriptor};
use crate::utils::error::{AlertError, Result};
use std::collections::BTreeMap;

/// Descriptor for every known venue. Built-in base URLs can be overridden
/// from configuration, but the set of venues is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueDirectory {
    descriptors: BTreeMap<Venue, VenueDescriptor>,
}

impl Default for VenueDirectory {
    fn default() -> Self {
        let descriptors = Venue::ALL
            .into_iter()
            .map(|venue| (venue, venue.default_descriptor()))
            .collect();
        Self { descriptors }
    }
}

impl VenueDirectory {
    pub fn with_base_url(mut self, venue: Venue, base_url: impl Into<String>) -> Self {
        let descriptor = self
            .descriptors
            .entry(venue)
            .or_insert_with(|| venue.default_descriptor());
        descriptor.base_url = base_url.into();
        self
    }

    pub fn descriptor(&self, venue: Venue) -> Result<&VenueDescriptor> {
        self.descriptors
            .get(&venue)
            .ok_or_else(|| AlertError::UnknownVenueError {
                venue: venue.to_string(),
                reason: "no descriptor registered".to_string(),
            })
    }

    /// Closed dispatch table from venue to schedule adapter.
    pub fn resolve_parser(&self, venue: Venue, fetcher: &DocumentFetcher) -> Result<VenueParser> {
        let descriptor = self.descriptor(venue)?.clone();
        match venue {
            Venue::ToledoSportAndSocialClub => Ok(VenueParser::ToledoSportAndSocialClub(
                ToledoSportAndSocialClubParser::new(fetcher.clone(), descriptor),
            )),
            Venue::ForestViewLanes => Ok(VenueParser::ForestViewLanes(ForestViewLanesParser::new(
                fetcher.clone(),
                descriptor,
            ))),
            Venue::PremierAcademy => Err(AlertError::UnknownVenueError {
                venue: venue.to_string(),
                reason: "no schedule parser for this venue".to_string(),
            }),
        }
    }

    /// Resolves the team's venue and parses its full season.
    pub async fn matches_for_team(&self, fetcher: &DocumentFetcher, team: &TeamConfig) -> Result<Vec<Match>> {
        let parser = self.resolve_parser(team.league.venue, fetcher)?;
        parser.parse_league(team).await
    }
}

#[derive(Debug, Clone)]
pub enum VenueParser {
    ToledoSportAndSocialClub(ToledoSportAndSocialClubParser),
    ForestViewLanes(ForestViewLanesParser),
}

impl VenueParser {
    pub async fn parse_league(&self, team: &TeamConfig) -> Result<Vec<Match>> {
        match self {
            VenueParser::ToledoSportAndSocialClub(parser) => parser.parse_league(team).await,
            VenueParser::ForestViewLanes(parser) => parser.parse_league(team).await,
        }
    }
}
