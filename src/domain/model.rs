use chrono::{NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::AlertError;

pub const BYE_MARKER: &str = "BYE";

/// Venues with a published schedule page. Adding one means adding a variant,
/// a descriptor, and a dispatch arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Venue {
    ForestViewLanes,
    PremierAcademy,
    ToledoSportAndSocialClub,
}

impl Venue {
    pub const ALL: [Venue; 3] = [
        Venue::ForestViewLanes,
        Venue::PremierAcademy,
        Venue::ToledoSportAndSocialClub,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::ForestViewLanes => "ForestViewLanes",
            Venue::PremierAcademy => "PremierAcademy",
            Venue::ToledoSportAndSocialClub => "ToledoSportAndSocialClub",
        }
    }

    pub fn default_descriptor(&self) -> VenueDescriptor {
        let (base_url, display_name) = match self {
            Venue::ForestViewLanes => (
                "https://forestviewlanes.bracketpal.com/",
                "Forest View Lanes",
            ),
            Venue::PremierAcademy => ("https://www.premiervolleyball.com/", "Premier Academy"),
            Venue::ToledoSportAndSocialClub => (
                "http://www.toledosportandsocialclub.com/LeagueSchedule.aspx",
                "Skyway Recreation Center",
            ),
        };
        VenueDescriptor {
            base_url: base_url.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Venue {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Venue::ALL
            .into_iter()
            .find(|venue| venue.as_str() == s.trim())
            .ok_or_else(|| AlertError::UnknownVenueError {
                venue: s.to_string(),
                reason: "not one of the known venues".to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDescriptor {
    pub base_url: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Carrier {
    Att,
    Sprint,
    Verizon,
    Tmobile,
}

impl Carrier {
    pub fn email_suffix(&self) -> &'static str {
        match self {
            Carrier::Att => "@mms.att.net",
            Carrier::Sprint => "@pm.sprint.com",
            Carrier::Verizon => "@vzwpix.com",
            Carrier::Tmobile => "@tmomail.net",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailContact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MobileContact {
    pub name: String,
    pub carrier: Carrier,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contact {
    Mobile(MobileContact),
    Email(EmailContact),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailAddress {
    pub name: String,
    pub address: String,
}

impl Contact {
    pub fn name(&self) -> &str {
        match self {
            Contact::Mobile(contact) => &contact.name,
            Contact::Email(contact) => &contact.name,
        }
    }

    /// Mobile contacts are reached through their carrier's SMS gateway.
    pub fn mail_address(&self) -> MailAddress {
        match self {
            Contact::Mobile(contact) => MailAddress {
                name: contact.name.clone(),
                address: format!("{}{}", contact.number, contact.carrier.email_suffix()),
            },
            Contact::Email(contact) => MailAddress {
                name: contact.name.clone(),
                address: contact.email.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueConfig {
    pub id: String,
    pub venue: Venue,
    pub day_of_the_week: Weekday,
}

/// A team as configured: who we are, where we play, and who to tell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamConfig {
    pub name: String,
    pub league: LeagueConfig,
    pub members: Vec<Contact>,
    pub additional_contacts: Vec<Contact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
}

impl TeamRecord {
    pub fn new(name: impl Into<String>, wins: u32, losses: u32) -> Self {
        Self {
            name: name.into(),
            wins,
            losses,
        }
    }

    pub fn bye() -> Self {
        Self::new(BYE_MARKER, 0, 0)
    }

    pub fn is_bye(&self) -> bool {
        self.name == BYE_MARKER
    }

    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

impl fmt::Display for TeamRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}-{})", self.name, self.wins, self.losses)
    }
}

/// One schedule row after field parsing. The pair is unordered until
/// reconciled against the configured team name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMatch {
    pub court: u32,
    pub datetime: NaiveDateTime,
    pub teams: (TeamRecord, TeamRecord),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct League {
    pub id: String,
    pub name: String,
    pub venue: VenueDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    #[serde(flatten)]
    pub record: TeamRecord,
    pub members: Vec<Contact>,
    pub additional_contacts: Vec<Contact>,
    pub url: String,
}

impl Team {
    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn contacts(&self) -> impl Iterator<Item = &Contact> {
        self.members.iter().chain(self.additional_contacts.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub court: u32,
    pub datetime: NaiveDateTime,
    pub league: League,
    pub team: Team,
    pub opponent_team: TeamRecord,
}

impl Match {
    pub fn is_bye(&self) -> bool {
        self.opponent_team.is_bye()
    }
}
