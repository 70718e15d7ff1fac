//! Command client behaviour against a mock `httpapi.asp` endpoint

use linkplay_api::{Command, CommandClient, Reply, RAW_KEY};
use mockito::{Matcher, Server, ServerGuard};
use rstest::rstest;
use serde_json::json;
use std::time::Duration;

fn client_for(server: &ServerGuard) -> CommandClient {
    let port = server
        .host_with_port()
        .rsplit(':')
        .next()
        .and_then(|p| p.parse().ok())
        .expect("mock server port");

    CommandClient::new()
        .with_port(port)
        .with_timeout(Duration::from_secs(2))
}

fn command(value: &str) -> Matcher {
    Matcher::UrlEncoded("command".into(), value.into())
}

#[test]
fn test_status_reply_is_parsed() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/httpapi.asp")
        .match_query(command("getStatus"))
        .with_status(200)
        .with_body(r#"{"DeviceName":"Kitchen","hardware":"A31","MAC":"00:22:6C:11:22:33"}"#)
        .create();

    let reply = client_for(&server).get_status("127.0.0.1").expect("reply");

    mock.assert();
    assert!(reply.has_fields());
    assert_eq!(reply.get_str("DeviceName"), Some("Kitchen"));
    assert_eq!(reply.get_str("hardware"), Some("A31"));
}

#[test]
fn test_plain_text_reply_falls_back_to_raw() {
    let mut server = Server::new();
    server
        .mock("GET", "/httpapi.asp")
        .match_query(command("setPlayerCmd:pause"))
        .with_status(200)
        .with_body("OK")
        .create();

    let reply = client_for(&server).pause("127.0.0.1").expect("reply");

    assert_eq!(reply, Reply::Text("OK".to_string()));
    assert_eq!(reply.to_map().get(RAW_KEY), Some(&json!("OK")));
}

#[test]
fn test_empty_body_is_empty_structure() {
    let mut server = Server::new();
    server
        .mock("GET", "/httpapi.asp")
        .match_query(command("getPlayerStatus"))
        .with_status(200)
        .with_body("")
        .create();

    let reply = client_for(&server).get_player_status("127.0.0.1").expect("reply");

    assert!(reply.is_structured());
    assert!(!reply.has_fields());
}

#[rstest]
#[case(404)]
#[case(500)]
#[case(204)]
fn test_non_200_status_is_absent(#[case] status: usize) {
    let mut server = Server::new();
    server
        .mock("GET", "/httpapi.asp")
        .match_query(Matcher::Any)
        .with_status(status)
        .with_body(r#"{"DeviceName":"Kitchen"}"#)
        .create();

    assert!(client_for(&server).get_status("127.0.0.1").is_none());
}

#[rstest]
#[case(-10, "setPlayerCmd:vol:0")]
#[case(150, "setPlayerCmd:vol:100")]
#[case(50, "setPlayerCmd:vol:50")]
fn test_set_volume_sends_clamped_level(#[case] level: i32, #[case] expected: &str) {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/httpapi.asp")
        .match_query(command(expected))
        .with_status(200)
        .with_body("OK")
        .create();

    assert!(client_for(&server).set_volume("127.0.0.1", level).is_some());
    mock.assert();
}

#[test]
fn test_send_raw_passes_command_through() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/httpapi.asp")
        .match_query(command("setPlayerCmd:next"))
        .with_status(200)
        .with_body("OK")
        .create();

    assert!(client_for(&server).send_raw("127.0.0.1", "setPlayerCmd:next").is_some());
    mock.assert();
}

#[test]
fn test_set_device_name_stops_at_first_ok() {
    let mut server = Server::new();
    let first = server
        .mock("GET", "/httpapi.asp")
        .match_query(command("setDeviceName:Den"))
        .with_status(200)
        .with_body("unknown command")
        .create();
    let second = server
        .mock("GET", "/httpapi.asp")
        .match_query(command("DeviceName:Den"))
        .with_status(200)
        .with_body("OK")
        .create();
    let third = server
        .mock("GET", "/httpapi.asp")
        .match_query(command("setName:Den"))
        .expect(0)
        .create();

    let outcome = client_for(&server)
        .set_device_name("127.0.0.1", "Den")
        .expect("rename accepted");

    assert_eq!(outcome.command, "DeviceName:Den");
    first.assert();
    second.assert();
    third.assert();
}

#[test]
fn test_set_device_name_none_when_all_rejected() {
    let mut server = Server::new();
    server
        .mock("GET", "/httpapi.asp")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("unknown command")
        .expect(4)
        .create();

    assert!(client_for(&server).set_device_name("127.0.0.1", "Den").is_none());
}

#[rstest]
#[case("Rock & Roll")]
#[case("Room #2")]
#[case("A+B")]
#[case("Café ?")]
fn test_set_device_name_sends_name_intact(#[case] name: &str) {
    let expected = format!("setDeviceName:{}", name);
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/httpapi.asp")
        .match_query(command(&expected))
        .with_status(200)
        .with_body("OK")
        .create();

    let outcome = client_for(&server)
        .set_device_name("127.0.0.1", name)
        .expect("rename accepted");

    mock.assert();
    assert_eq!(outcome.command, expected);
}

#[test]
fn test_try_fetch_returns_body_verbatim() {
    let body = r#"{"uuid":"FF31F09E","DeviceName":"Kitchen"}"#;
    let mut server = Server::new();
    server
        .mock("GET", "/httpapi.asp")
        .match_query(command("getStatus"))
        .with_status(200)
        .with_body(body)
        .create();

    let fetched = client_for(&server)
        .try_fetch("127.0.0.1", &Command::get_status())
        .expect("body");

    assert_eq!(fetched, body);
}
