// BitqueryDiscovery against a local mock HTTP server

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use solana_pool_sniper::config::Config;
use solana_pool_sniper::discovery::{BitqueryDiscovery, DiscoveryError, PoolDiscovery};
use std::time::Duration;

fn discovery(server: &ServerGuard, rate_limit_retries: u32) -> BitqueryDiscovery {
    let mut config = Config::default().discovery;
    config.api_url = format!("{}/eap", server.url());
    config.oauth_token = Some("test-token".to_string());
    config.rate_limit_retries = rate_limit_retries;
    BitqueryDiscovery::new(&config, Duration::ZERO, Duration::from_secs(5)).unwrap()
}

fn instruction(accounts: usize, tag: &str) -> serde_json::Value {
    let accounts: Vec<_> = (0..accounts)
        .map(|i| json!({ "Address": format!("{}{}", tag, i) }))
        .collect();
    json!({ "Instruction": { "Accounts": accounts } })
}

#[tokio::test]
async fn test_discovery_reads_pool_and_mints() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/eap")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::Regex("initializeUserWithNonce".to_string()))
        .with_status(200)
        .with_body(
            json!({ "data": { "Solana": { "Instructions": [
                instruction(18, "a"),
                instruction(5, "short"),
                instruction(10, "b"),
            ] } } })
            .to_string(),
        )
        .create_async()
        .await;

    let candidates = discovery(&server, 3).discover().await.unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].address, "a4");
    assert_eq!(candidates[0].token_a, "a8");
    assert_eq!(candidates[0].token_b, "a9");
    assert_eq!(candidates[1].address, "b4");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_retries_are_bounded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/eap")
        .with_status(429)
        .expect(3)
        .create_async()
        .await;

    let result = discovery(&server, 2).discover().await;
    assert!(matches!(result, Err(DiscoveryError::RateLimited(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_graphql_errors_fail_the_round() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/eap")
        .with_status(200)
        .with_body(r#"{"errors":[{"message":"Access denied"}]}"#)
        .create_async()
        .await;

    assert_eq!(
        discovery(&server, 0).discover().await,
        Err(DiscoveryError::Query("Access denied".to_string()))
    );
}

#[tokio::test]
async fn test_http_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/eap")
        .with_status(401)
        .with_body("unauthorized")
        .expect(1)
        .create_async()
        .await;

    assert!(matches!(
        discovery(&server, 5).discover().await,
        Err(DiscoveryError::Http { status: 401, .. })
    ));
    mock.assert_async().await;
}
