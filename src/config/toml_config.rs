use crate::core::dispatch::VenueDirectory;
use crate::domain::model::{Contact, LeagueConfig, MailAddress, TeamConfig, Venue};
use crate::utils::error::{AlertError, Result};
use crate::utils::validation::{
    validate_digits, validate_email, validate_non_empty_string, validate_url, Validate,
};
use chrono::Weekday;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

const DEFAULT_FROM_NAME: &str = "Volleyball Alerts";
const DEFAULT_FROM_ADDRESS: &str = "volleyball-alerts@localhost";

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// The team file: contacts keyed by a short name, teams referring to those
/// keys, plus optional venue and mail settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamsFile {
    pub mail: Option<MailSection>,
    #[serde(default)]
    pub venues: BTreeMap<String, VenueOverride>,
    #[serde(default)]
    pub contacts: BTreeMap<String, Contact>,
    #[serde(default)]
    pub teams: Vec<TeamEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MailSection {
    pub from_address: Option<String>,
    pub from_name: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VenueOverride {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamEntry {
    pub name: String,
    pub league: LeagueEntry,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub additional_contacts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeagueEntry {
    pub id: String,
    pub venue: String,
    pub day_of_the_week: String,
}

impl TeamsFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AlertError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AlertError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.teams.is_empty() {
            return Err(AlertError::MissingConfigError {
                field: "teams".to_string(),
            });
        }

        for (key, contact) in &self.contacts {
            let field = format!("contacts.{}", key);
            validate_non_empty_string(&format!("{}.name", field), contact.name())?;
            match contact {
                Contact::Mobile(mobile) => validate_digits(&format!("{}.number", field), &mobile.number)?,
                Contact::Email(email) => validate_email(&format!("{}.email", field), &email.email)?,
            }
        }

        for (venue, venue_override) in &self.venues {
            venue.parse::<Venue>()?;
            validate_url(&format!("venues.{}.base_url", venue), &venue_override.base_url)?;
        }

        if let Some(mail) = &self.mail {
            if let Some(endpoint) = &mail.endpoint {
                validate_url("mail.endpoint", endpoint)?;
            }
            if let Some(address) = &mail.from_address {
                validate_email("mail.from_address", address)?;
            }
        }

        self.team_configs().map(|_| ())
    }

    /// Resolves contact keys and parses venue and weekday names.
    pub fn team_configs(&self) -> Result<Vec<TeamConfig>> {
        self.teams.iter().map(|team| self.resolve_team(team)).collect()
    }

    fn resolve_team(&self, team: &TeamEntry) -> Result<TeamConfig> {
        validate_non_empty_string("teams.name", &team.name)?;
        validate_non_empty_string("teams.league.id", &team.league.id)?;

        let venue = team.league.venue.parse::<Venue>()?;
        let day_of_the_week = team.league.day_of_the_week.parse::<Weekday>().map_err(|_| {
            AlertError::InvalidConfigValueError {
                field: "teams.league.day_of_the_week".to_string(),
                value: team.league.day_of_the_week.clone(),
                reason: "expected a weekday such as Wednesday or Wed".to_string(),
            }
        })?;

        Ok(TeamConfig {
            name: team.name.clone(),
            league: LeagueConfig {
                id: team.league.id.clone(),
                venue,
                day_of_the_week,
            },
            members: self.resolve_contacts("members", &team.members)?,
            additional_contacts: self.resolve_contacts("additional_contacts", &team.additional_contacts)?,
        })
    }

    fn resolve_contacts(&self, field: &str, keys: &[String]) -> Result<Vec<Contact>> {
        keys.iter()
            .map(|key| {
                self.contacts
                    .get(key)
                    .cloned()
                    .ok_or_else(|| AlertError::UnknownFieldError {
                        field: format!("contact in teams.{}", field),
                        value: key.clone(),
                    })
            })
            .collect()
    }

    pub fn venue_directory(&self) -> Result<VenueDirectory> {
        self.venues
            .iter()
            .try_fold(VenueDirectory::default(), |directory, (venue, venue_override)| {
                Ok(directory.with_base_url(venue.parse::<Venue>()?, venue_override.base_url.as_str()))
            })
    }

    pub fn sender(&self) -> MailAddress {
        let mail = self.mail.clone().unwrap_or_default();
        MailAddress {
            name: mail.from_name.unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            address: mail
                .from_address
                .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
        }
    }

    /// The relay endpoint, required only when actually sending.
    pub fn mail_endpoint(&self) -> Result<&str> {
        let mail = self.mail.as_ref();
        if mail.and_then(|m| m.from_address.as_deref()).is_none() {
            return Err(AlertError::MissingConfigError {
                field: "mail.from_address".to_string(),
            });
        }
        mail.and_then(|m| m.endpoint.as_deref())
            .ok_or_else(|| AlertError::MissingConfigError {
                field: "mail.endpoint".to_string(),
            })
    }
}

impl Validate for TeamsFile {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
