use chrono::NaiveDate;
use httpmock::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;
use volleyball_alerts::utils::validation::Validate;
use volleyball_alerts::{find_schedule_conflicts, AlertEngine, LogTransport, TeamsFile, WebhookTransport};

fn schedule(league: &str, rows: &str) -> String {
    format!(
        r#"<html><body>
        <div id="ctl00_ContentPlaceHolder1_ScheduleHolder">
          <table><tbody><tr><td><h1>Toledo Sport and Social Club : {} @ Skyway</h1></td></tr></tbody></table>
          <table id="ctl00_ContentPlaceHolder1_gvSchedule"><tbody>
            <tr><th>Date / Time</th><th>Teams</th><th>Location</th></tr>
            {}
          </tbody></table>
        </div>
        </body></html>"#,
        league, rows
    )
}

fn teams_file(server: &MockServer) -> NamedTempFile {
    let content = format!(
        r#"
[mail]
from_address = "alerts@example.com"
endpoint = "{relay}"

[venues.ToledoSportAndSocialClub]
base_url = "{schedule}"

[contacts.sam]
name = "Sam"
carrier = "Tmobile"
number = "4195550100"

[contacts.alex]
name = "Alex"
email = "alex@example.com"

[[teams]]
name = "6 Pack"
members = ["sam", "alex"]

[teams.league]
id = "100"
venue = "ToledoSportAndSocialClub"
day_of_the_week = "Wednesday"

[[teams]]
name = "Dig Dug"
members = ["sam"]

[teams.league]
id = "200"
venue = "ToledoSportAndSocialClub"
day_of_the_week = "Wed"
"#,
        relay = server.url("/send"),
        schedule = server.url("/LeagueSchedule.aspx"),
    );

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn mock_schedules(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/LeagueSchedule.aspx").query_param("ID", "100");
        then.status(200).body(schedule(
            "Spring League",
            r#"<tr><td>5/1/2024, 6:00pm</td><td>6 Pack (3-2) @ Net Gains (4-1)</td><td>SRC #3</td></tr>
               <tr><td>5/8/2024, 7:00pm</td><td>Spikers (2-3) @ 6 Pack (3-2)</td><td>SRC #2</td></tr>"#,
        ));
    });
    server.mock(|when, then| {
        when.method(GET).path("/LeagueSchedule.aspx").query_param("ID", "200");
        then.status(200).body(schedule(
            "Wednesday Coed",
            r#"<tr><td>5/1/2024, 6:00pm</td><td>Dig Dug (0-5) @ Setters (1-4)</td><td>SRC #1</td></tr>"#,
        ));
    });
}

#[tokio::test]
async fn test_notify_run_delivers_through_relay() {
    let server = MockServer::start();
    mock_schedules(&server);
    let relay = server.mock(|when, then| {
        when.method(POST)
            .path("/send")
            .body_contains("Volleyball Alert")
            .body_contains("alerts@example.com");
        then.status(200).json_body(serde_json::json!({"id": "queued"}));
    });

    let file = TeamsFile::from_file(teams_file(&server).path()).unwrap();
    file.validate().unwrap();

    let transport = WebhookTransport::new(file.mail_endpoint().unwrap());
    let engine = AlertEngine::new(
        file.team_configs().unwrap(),
        file.venue_directory().unwrap(),
        transport,
        file.sender(),
    );

    let summary = engine.run(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).await;

    assert_eq!(summary.teams_checked, 2);
    assert_eq!(summary.teams_failed, 0);
    assert_eq!(summary.matches_today, 2);
    // 6 Pack has two members, Dig Dug has one
    assert_eq!(summary.messages_sent, 3);
    relay.assert_hits(3);
}

#[tokio::test]
async fn test_only_to_dry_run() {
    let server = MockServer::start();
    mock_schedules(&server);

    let file = TeamsFile::from_file(teams_file(&server).path()).unwrap();
    let engine = AlertEngine::new(
        file.team_configs().unwrap(),
        file.venue_directory().unwrap(),
        LogTransport,
        file.sender(),
    )
    .with_only_to(Some("Alex".to_string()));

    let summary = engine.run(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).await;

    assert_eq!(summary.matches_today, 2);
    assert_eq!(summary.messages_sent, 1);
    assert!(!summary.has_failures());
}

#[tokio::test]
async fn test_conflicts_across_teams() {
    let server = MockServer::start();
    mock_schedules(&server);

    let file = TeamsFile::from_file(teams_file(&server).path()).unwrap();
    let engine = AlertEngine::new(
        file.team_configs().unwrap(),
        file.venue_directory().unwrap(),
        LogTransport,
        file.sender(),
    );

    let report = engine.season().await;
    assert_eq!(report.matches.len(), 3);

    let conflicts = find_schedule_conflicts(&report.matches);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].member, "Sam");
    assert_eq!(
        conflicts[0].games,
        vec![
            "Spring League - Court 3 - May 1st, 2024 6:00 PM - 6 Pack - Sam",
            "Wednesday Coed - Court 1 - May 1st, 2024 6:00 PM - Dig Dug - Sam",
        ]
    );
}
