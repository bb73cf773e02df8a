use crate::core::dispatch::VenueDirectory;
use crate::core::fetch::DocumentFetcher;
use crate::domain::model::{MailAddress, Match, TeamConfig};
use crate::domain::ports::{Envelope, MailTransport};
use crate::notify::message::render_message;
use crate::utils::error::Result;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub teams_checked: usize,
    pub teams_failed: usize,
    pub matches_today: usize,
    pub messages_sent: usize,
    pub messages_failed: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.teams_failed > 0 || self.messages_failed > 0
    }
}

/// Every configured team's full season, plus how many teams could not be read.
#[derive(Debug, Clone, Default)]
pub struct SeasonReport {
    pub matches: Vec<Match>,
    pub teams_failed: usize,
}

/// Drives one alert run: pick the teams playing today, scrape their venue,
/// and hand one message per contact to the transport.
pub struct AlertEngine<T: MailTransport> {
    teams: Vec<TeamConfig>,
    directory: VenueDirectory,
    fetcher: DocumentFetcher,
    transport: T,
    from: MailAddress,
    only_to: Option<String>,
}

impl<T: MailTransport> AlertEngine<T> {
    pub fn new(teams: Vec<TeamConfig>, directory: VenueDirectory, transport: T, from: MailAddress) -> Self {
        Self {
            teams,
            directory,
            fetcher: DocumentFetcher::new(),
            transport,
            from,
            only_to: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: DocumentFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Restrict delivery to contacts with this name.
    pub fn with_only_to(mut self, name: Option<String>) -> Self {
        self.only_to = name;
        self
    }

    pub fn teams_playing_on(&self, date: NaiveDate) -> impl Iterator<Item = &TeamConfig> {
        self.teams
            .iter()
            .filter(move |team| team.league.day_of_the_week == date.weekday())
    }

    pub async fn matches_on(&self, team: &TeamConfig, date: NaiveDate) -> Result<Vec<Match>> {
        let season = self.directory.matches_for_team(&self.fetcher, team).await?;
        Ok(season
            .into_iter()
            .filter(|game| game.datetime.date() == date)
            .collect())
    }

    pub async fn run(&self, date: NaiveDate) -> RunSummary {
        tracing::info!("Checking schedules for {} ({})", date, date.weekday());
        let mut summary = RunSummary::default();

        for team in self.teams_playing_on(date) {
            summary.teams_checked += 1;

            let matches = match self.matches_on(team, date).await {
                Ok(matches) => matches,
                Err(e) => {
                    summary.teams_failed += 1;
                    tracing::error!(
                        "❌ {}: {} (Category: {:?}, Severity: {:?})",
                        team.name,
                        e,
                        e.category(),
                        e.severity()
                    );
                    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
                    continue;
                }
            };

            tracing::info!("{}: {} match(es) on {}", team.name, matches.len(), date);
            summary.matches_today += matches.len();

            for game in &matches {
                let (sent, failed) = self.notify(game).await;
                summary.messages_sent += sent;
                summary.messages_failed += failed;
            }
        }

        tracing::info!(
            "Run complete: {} team(s) checked, {} failed, {} match(es), {} message(s) sent, {} failed",
            summary.teams_checked,
            summary.teams_failed,
            summary.matches_today,
            summary.messages_sent,
            summary.messages_failed
        );
        summary
    }

    /// Sends the rendered match to each contact. Returns (sent, failed).
    pub async fn notify(&self, game: &Match) -> (usize, usize) {
        let text = render_message(game);
        let mut sent = 0;
        let mut failed = 0;

        let recipients = game
            .team
            .contacts()
            .filter(|contact| self.only_to.as_deref().map_or(true, |name| contact.name() == name));

        for contact in recipients {
            let envelope = Envelope {
                from: self.from.clone(),
                to: contact.mail_address(),
                text: text.clone(),
            };

            match self.transport.send(&envelope).await {
                Ok(delivery) => {
                    tracing::debug!("Delivered to {}: {:?}", delivery.recipient, delivery.message_id);
                    sent += 1;
                }
                Err(e) => {
                    tracing::error!("❌ {} (Category: {:?})", e, e.category());
                    failed += 1;
                }
            }
        }

        (sent, failed)
    }

    /// Reads every configured team's full season regardless of weekday.
    pub async fn season(&self) -> SeasonReport {
        let mut report = SeasonReport::default();

        for team in &self.teams {
            match self.directory.matches_for_team(&self.fetcher, team).await {
                Ok(matches) => {
                    tracing::info!("{}: {} scheduled match(es)", team.name, matches.len());
                    report.matches.extend(matches);
                }
                Err(e) => {
                    report.teams_failed += 1;
                    tracing::error!("❌ {}: {} (Category: {:?})", team.name, e, e.category());
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Carrier, Contact, EmailContact, LeagueConfig, MobileContact, Venue};
    use crate::domain::ports::Delivery;
    use crate::utils::error::AlertError;
    use async_trait::async_trait;
    use chrono::Weekday;
    use httpmock::prelude::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<Envelope>>,
        reject: Option<String>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, envelope: &Envelope) -> Result<Delivery> {
            if self.reject.as_deref() == Some(envelope.to.address.as_str()) {
                return Err(AlertError::DeliveryError {
                    recipient: envelope.to.address.clone(),
                    message: "mailbox full".to_string(),
                });
            }
            self.sent.lock().unwrap().push(envelope.clone());
            Ok(Delivery {
                recipient: envelope.to.address.clone(),
                message_id: None,
                accepted: true,
            })
        }
    }

    const SCHEDULE: &str = r#"<html><body>
        <div id="ctl00_ContentPlaceHolder1_ScheduleHolder">
          <table><tbody><tr><td><h1>Toledo Sport and Social Club : Spring League @ Skyway</h1></td></tr></tbody></table>
          <table id="ctl00_ContentPlaceHolder1_gvSchedule"><tbody>
            <tr><th>Date / Time</th><th>Teams</th><th>Location</th></tr>
            <tr><td>5/1/2024, 6:00pm</td><td>6 Pack (3-2) @ Net Gains (4-1)</td><td>SRC #3</td></tr>
            <tr><td>5/8/2024, 7:00pm</td><td>Dig Dug (1-4) @ 6 Pack (3-2)</td><td>SRC #1</td></tr>
          </tbody></table>
        </div>
        </body></html>"#;

    fn team(name: &str, id: &str, day: Weekday) -> TeamConfig {
        TeamConfig {
            name: name.to_string(),
            league: LeagueConfig {
                id: id.to_string(),
                venue: Venue::ToledoSportAndSocialClub,
                day_of_the_week: day,
            },
            members: vec![Contact::Mobile(MobileContact {
                name: "Sam".to_string(),
                carrier: Carrier::Verizon,
                number: "4195550100".to_string(),
            })],
            additional_contacts: vec![Contact::Email(EmailContact {
                name: "Coach".to_string(),
                email: "coach@example.com".to_string(),
            })],
        }
    }

    fn from() -> MailAddress {
        MailAddress {
            name: "Volleyball Alerts".to_string(),
            address: "alerts@example.com".to_string(),
        }
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn engine(server: &MockServer, teams: Vec<TeamConfig>, transport: RecordingTransport) -> AlertEngine<RecordingTransport> {
        let directory = VenueDirectory::default()
            .with_base_url(Venue::ToledoSportAndSocialClub, server.url("/LeagueSchedule.aspx"));
        AlertEngine::new(teams, directory, transport, from())
    }

    #[tokio::test]
    async fn test_run_sends_todays_match_to_every_contact() {
        let server = MockServer::start();
        let page = server.mock(|when, then| {
            when.method(GET).path("/LeagueSchedule.aspx").query_param("ID", "100");
            then.status(200).body(SCHEDULE);
        });

        let engine = engine(
            &server,
            vec![team("6 Pack", "100", Weekday::Wed), team("6 Pack", "200", Weekday::Thu)],
            RecordingTransport::default(),
        );
        let summary = engine.run(wednesday()).await;

        page.assert_hits(1);
        assert_eq!(
            summary,
            RunSummary {
                teams_checked: 1,
                teams_failed: 0,
                matches_today: 1,
                messages_sent: 2,
                messages_failed: 0,
            }
        );

        let sent = engine.transport.sent.lock().unwrap();
        let recipients: Vec<&str> = sent.iter().map(|e| e.to.address.as_str()).collect();
        assert_eq!(recipients, vec!["4195550100@vzwpix.com", "coach@example.com"]);
        assert!(sent[0].text.contains("6:00 PM - Court 3"));
        assert_eq!(sent[0].from, from());
    }

    #[tokio::test]
    async fn test_failed_team_does_not_stop_the_run() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/LeagueSchedule.aspx").query_param("ID", "100");
            then.status(503);
        });
        server.mock(|when, then| {
            when.method(GET).path("/LeagueSchedule.aspx").query_param("ID", "300");
            then.status(200).body(SCHEDULE);
        });

        let engine = engine(
            &server,
            vec![team("6 Pack", "100", Weekday::Wed), team("6 Pack", "300", Weekday::Wed)],
            RecordingTransport::default(),
        );
        let summary = engine.run(wednesday()).await;

        assert_eq!(summary.teams_checked, 2);
        assert_eq!(summary.teams_failed, 1);
        assert_eq!(summary.messages_sent, 2);
        assert!(summary.has_failures());
    }

    #[tokio::test]
    async fn test_only_to_and_delivery_failures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/LeagueSchedule.aspx");
            then.status(200).body(SCHEDULE);
        });

        let only_sam = engine(&server, vec![team("6 Pack", "100", Weekday::Wed)], RecordingTransport::default())
            .with_only_to(Some("Sam".to_string()));
        let summary = only_sam.run(wednesday()).await;
        assert_eq!(summary.messages_sent, 1);
        assert_eq!(only_sam.transport.sent.lock().unwrap()[0].to.name, "Sam");

        let rejecting = RecordingTransport {
            reject: Some("coach@example.com".to_string()),
            ..Default::default()
        };
        let summary = engine(&server, vec![team("6 Pack", "100", Weekday::Wed)], rejecting)
            .run(wednesday())
            .await;
        assert_eq!(summary.messages_sent, 1);
        assert_eq!(summary.messages_failed, 1);
    }

    #[tokio::test]
    async fn test_no_match_today_sends_nothing() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/LeagueSchedule.aspx");
            then.status(200).body(SCHEDULE);
        });

        let engine = engine(&server, vec![team("6 Pack", "100", Weekday::Wed)], RecordingTransport::default());
        let summary = engine.run(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()).await;

        assert_eq!(summary.teams_checked, 1);
        assert_eq!(summary.matches_today, 0);
        assert_eq!(summary.messages_sent, 0);
    }

    #[tokio::test]
    async fn test_season_collects_every_team() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/LeagueSchedule.aspx");
            then.status(200).body(SCHEDULE);
        });

        let engine = engine(
            &server,
            vec![team("6 Pack", "100", Weekday::Wed), team("6 Pack", "200", Weekday::Thu)],
            RecordingTransport::default(),
        );
        let report = engine.season().await;

        assert_eq!(report.matches.len(), 4);
        assert_eq!(report.teams_failed, 0);
    }
}
