//! REST client integration tests against an in-process mock server.

mod integration;
use integration::common::mock_api::{MockApiServer, VALID_PASSWORD, VALID_TOKEN};

use gk_api::{ApiConfig, ApiError, GatekeeperClient};
use gk_core::PlayerId;
use gk_session::{AuthToken, Session, SessionHandle};

fn http_config() -> ApiConfig {
    ApiConfig {
        scheme: "http".to_string(),
    }
}

fn client(server: &MockApiServer, token: Option<&str>) -> GatekeeperClient {
    let session = SessionHandle::detached(Session {
        token: token.map(|t| AuthToken::new(t).unwrap()),
        server_address: server.address(),
    });
    GatekeeperClient::new(session, http_config()).unwrap()
}

#[tokio::test]
async fn test_login_returns_token_without_auth_header() {
    let server = MockApiServer::start().await;
    let client = client(&server, None);

    let token = client.login("admin", VALID_PASSWORD).await.unwrap();
    assert_eq!(token, VALID_TOKEN);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/auth/login");
    assert!(requests[0].authorization.is_none());
    let body = requests[0].body.as_ref().unwrap();
    assert_eq!(body["username"], "admin");

    server.shutdown();
}

#[tokio::test]
async fn test_login_rejected_is_http_error() {
    let server = MockApiServer::start().await;
    let client = client(&server, None);

    let err = client.login("admin", "wrong").await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 401, .. }));

    server.shutdown();
}

#[tokio::test]
async fn test_execute_command_attaches_bearer() {
    let server = MockApiServer::start().await;
    let client = client(&server, Some(VALID_TOKEN));

    let result = client.execute_command("time set day").await.unwrap();
    assert!(result.success);
    assert_eq!(result.message, "Executed: time set day");

    let requests = server.requests();
    assert_eq!(requests[0].path, "/api/gatekeeper/execute-command");
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer tok-123")
    );
    assert_eq!(requests[0].body.as_ref().unwrap()["command"], "time set day");

    server.shutdown();
}

#[tokio::test]
async fn test_missing_token_sends_nothing() {
    let server = MockApiServer::start().await;
    let client = client(&server, None);

    assert!(matches!(
        client.execute_command("stop").await,
        Err(ApiError::NotAuthenticated)
    ));
    assert!(matches!(
        client.list_players().await,
        Err(ApiError::NotAuthenticated)
    ));
    assert!(matches!(
        client.server_health().await,
        Err(ApiError::NotAuthenticated)
    ));
    assert!(server.requests().is_empty());

    server.shutdown();
}

#[tokio::test]
async fn test_stale_token_is_unauthorized() {
    let server = MockApiServer::start().await;
    let client = client(&server, Some("expired"));

    let err = client.list_players().await.unwrap_err();
    assert!(err.is_unauthorized());

    server.shutdown();
}

#[tokio::test]
async fn test_list_players_and_details() {
    let server = MockApiServer::start().await;
    let client = client(&server, Some(VALID_TOKEN));

    let roster = client.list_players().await.unwrap();
    let names: Vec<&str> = roster.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Alex", "Steve"]);

    let id = PlayerId::new("p-1").unwrap();
    let details = client.player_details(&id).await.unwrap();
    assert_eq!(details.id, id);
    assert_eq!(details.game_mode, "CREATIVE");
    assert_eq!(details.location.display(), "world_nether (1, 71, -13)");

    server.shutdown();
}

#[tokio::test]
async fn test_player_not_found_is_http_404() {
    let server = MockApiServer::start().await;
    let client = client(&server, Some(VALID_TOKEN));

    let err = client
        .player_details(&PlayerId::new("missing").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));

    server.shutdown();
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let server = MockApiServer::start().await;
    let client = client(&server, Some(VALID_TOKEN));

    let err = client
        .player_details(&PlayerId::new("garbled").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));

    server.shutdown();
}

#[tokio::test]
async fn test_kick_and_message_bodies() {
    let server = MockApiServer::start().await;
    let client = client(&server, Some(VALID_TOKEN));
    let id = PlayerId::new("p-2").unwrap();

    let kicked = client.kick_player(&id, "griefing").await.unwrap();
    assert!(kicked.success);
    let sent = client.send_private_message(&id, "hello").await.unwrap();
    assert_eq!(sent.message, "Message sent");

    let requests = server.requests();
    assert_eq!(requests[0].path, "/api/gatekeeper/player/p-2/kick");
    assert_eq!(requests[0].body.as_ref().unwrap()["reason"], "griefing");
    assert_eq!(requests[1].path, "/api/gatekeeper/player/p-2/message");
    assert_eq!(requests[1].body.as_ref().unwrap()["message"], "hello");

    server.shutdown();
}

#[tokio::test]
async fn test_server_health() {
    let server = MockApiServer::start().await;
    let client = client(&server, Some(VALID_TOKEN));

    let health = client.server_health().await.unwrap();
    assert_eq!(health.uptime_secs(), 90061);

    server.shutdown();
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let session = SessionHandle::detached(Session {
        token: Some(AuthToken::new(VALID_TOKEN).unwrap()),
        server_address: address,
    });
    let client = GatekeeperClient::new(session, http_config()).unwrap();

    assert!(matches!(
        client.server_health().await,
        Err(ApiError::Transport(_))
    ));
}
