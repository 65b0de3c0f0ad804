//! Tests for pattern-based pool routing, base-URL resolution, and eager
//! configuration validation.

use httptest::{matchers::*, responders::*, Expectation, Server};
use rest_relay::{ConfigError, PoolConfig, RestClient};

#[tokio::test]
async fn relative_calls_route_through_the_matching_pool_base_url() {
    let items = Server::run();
    items.expect(
        Expectation::matching(request::method_path("GET", "/items/MLA1"))
            .respond_with(status_code(200).body("{\"id\":\"MLA1\"}")),
    );
    let users = Server::run();
    users.expect(
        Expectation::matching(request::method_path("GET", "/users/1"))
            .respond_with(status_code(200).body("{\"id\":1}")),
    );

    let client = RestClient::with_mocking(false);
    client
        .register_pool(
            "/items/.*",
            PoolConfig {
                base_url: Some(format!("http://{}", items.addr())),
                ..Default::default()
            },
        )
        .unwrap();
    client
        .register_pool(
            "/users/.*",
            PoolConfig {
                base_url: Some(format!("http://{}", users.addr())),
                ..Default::default()
            },
        )
        .unwrap();

    let item = client.get("/items/MLA1", &[]).await.unwrap();
    assert_eq!(item.body, "{\"id\":\"MLA1\"}");

    let user = client.get("/users/1", &[]).await.unwrap();
    assert_eq!(user.body, "{\"id\":1}");
}

#[tokio::test]
async fn absolute_urls_containing_the_base_are_not_prefixed_again() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/testing"))
            .respond_with(status_code(200).body("{\"id\":\"MLA\"}")),
    );

    let base = format!("http://{}", server.addr());
    let client = RestClient::with_mocking(false);
    client
        .register_pool(
            "/testing.*",
            PoolConfig {
                base_url: Some(base.clone()),
                ..Default::default()
            },
        )
        .unwrap();

    // The full URL already contains the base; it must go out unchanged
    let response = client
        .get(&format!("{}/testing", base), &[])
        .await
        .unwrap();
    assert_eq!(response.code, 200);
}

#[tokio::test]
async fn unmatched_urls_use_the_default_pool() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/anywhere"))
            .respond_with(status_code(200).body("default")),
    );

    let client = RestClient::with_mocking(false);
    client
        .register_pool(
            "/items/.*",
            PoolConfig {
                base_url: Some("http://items.invalid".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    // No pattern matches; the default pool (no base URL) serves the call
    let response = client
        .get(&server.url("/anywhere").to_string(), &[])
        .await
        .unwrap();
    assert_eq!(response.body, "default");
}

#[tokio::test]
async fn custom_pool_settings_apply_to_matched_calls() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/testing"))
            .respond_with(status_code(200).body("{\"id\":\"MLA\"}")),
    );

    let client = RestClient::with_mocking(false);
    client
        .register_pool(
            &regex::escape(&server.url("/").to_string()),
            PoolConfig {
                max_idle_per_host: 20,
                ..Default::default()
            },
        )
        .unwrap();

    let response = client
        .get(&server.url("/testing").to_string(), &[])
        .await
        .unwrap();
    assert_eq!(response.code, 200);
    assert_eq!(response.body, "{\"id\":\"MLA\"}");
}

#[test]
fn invalid_routing_pattern_fails_registration() {
    let client = RestClient::with_mocking(false);
    let result = client.register_pool("(unclosed", PoolConfig::default());
    assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
}

#[test]
fn invalid_proxy_url_fails_registration() {
    let client = RestClient::with_mocking(false);
    let result = client.register_pool(
        "/items/.*",
        PoolConfig {
            proxy_url: Some("::not a proxy::".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(ConfigError::InvalidProxy { .. })));
}
