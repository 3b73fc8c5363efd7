mod helpers;

use estate_client::api_client::ApiClient;
use estate_client::error::{ApiError, FORBIDDEN, GENERIC_FAILURE, SESSION_EXPIRED};
use estate_client::events::AppEvent;
use estate_client::gateway::ListSource;
use estate_client::shell::Route;
use estate_common::api::RENEW_TOKEN_HEADER;
use estate_common::domain::Role;
use helpers::{fail, fee, ok, page, TestApp, TOKEN};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn renewed_token_is_sent_on_the_next_call() {
    let mut app = TestApp::build().await.unwrap();
    app.login_as(Role::Admin, None);

    Mock::given(method("GET"))
        .and(path("/api/fee/admin/all"))
        .and(header("Authorization", TOKEN))
        .respond_with(
            ok(page(vec![fee(1, "A101"), fee(2, "A102")], 1, 2, 2, 3))
                .insert_header(RENEW_TOKEN_HEADER, "token-2"),
        )
        .expect(1)
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/fee/admin/all"))
        .and(header("Authorization", "token-2"))
        .and(query_param("pageNum", "2"))
        .respond_with(ok(page(vec![fee(3, "A103")], 2, 2, 2, 3)))
        .expect(1)
        .mount(&app.server)
        .await;

    let fees = app.api.fees();
    let first = fees.fetch_all(&app.api.session(), 1, 2).await.unwrap();
    assert_eq!(first.records.len(), 2);
    assert_eq!(app.store().token().as_deref(), Some("token-2"));

    let second = fees.fetch_all(&app.api.session(), 2, 2).await.unwrap();
    assert!(second.is_last());
    assert!(app.notices().is_empty());
}

#[tokio::test]
async fn unauthorized_logs_out_and_notifies_once() {
    let mut app = TestApp::build().await.unwrap();
    app.login_as(Role::Resident, Some("A101"));

    Mock::given(method("GET"))
        .and(path("/api/fee/my"))
        .respond_with(ResponseTemplate::new(401).insert_header(RENEW_TOKEN_HEADER, "token-2"))
        .expect(2)
        .mount(&app.server)
        .await;

    let session = app.api.session();
    let fees = app.api.fees();
    let err = fees.fetch_mine(&session, "A101", 1, 20).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);

    // The renewal on a 401 is ignored.
    assert!(!app.store().is_logged_in());
    assert_eq!(app.store().token(), None);

    // A second request that was already in flight.
    let err = fees.fetch_mine(&session, "A101", 1, 20).await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);

    let events = app.drain();
    let expired = events
        .iter()
        .filter(|e| matches!(e, AppEvent::Notice(n) if n.message == SESSION_EXPIRED))
        .count();
    assert_eq!(expired, 1);
    assert!(events.contains(&AppEvent::Navigate(Route::Login)));
}

#[tokio::test]
async fn forbidden_keeps_the_session() {
    let mut app = TestApp::build().await.unwrap();
    app.login_as(Role::Resident, Some("A101"));

    Mock::given(method("GET"))
        .and(path("/api/fee/my"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&app.server)
        .await;

    let err = app
        .api
        .fees()
        .fetch_mine(&app.api.session(), "A101", 1, 20)
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Forbidden);
    assert!(app.store().is_logged_in());
    assert_eq!(app.errors(), vec![FORBIDDEN.to_string()]);
}

#[tokio::test]
async fn logical_failures_carry_the_backend_message() {
    let app = TestApp::build().await.unwrap();
    app.login_as(Role::Admin, None);

    Mock::given(method("DELETE"))
        .and(path("/api/building/admin/delete/4"))
        .respond_with(fail(500, "Building still has houses"))
        .mount(&app.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/building/admin/delete/5"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.server)
        .await;

    let session = app.api.session();
    let buildings = app.api.buildings();

    let err = buildings.delete(&session, 4).await.unwrap_err();
    assert_eq!(err, ApiError::Logical("Building still has houses".into()));
    assert_eq!(err.notice().as_deref(), Some("Building still has houses"));

    let err = buildings.delete(&session, 5).await.unwrap_err();
    assert_eq!(err, ApiError::Logical(GENERIC_FAILURE.into()));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let mut app = TestApp::build().await.unwrap();
    app.login_as(Role::Admin, None);

    let api = ApiClient::new(
        "http://127.0.0.1:1",
        Duration::from_secs(1),
        app.store().clone(),
        app.api.notifier().clone(),
    );
    let err = api.fees().fetch_all(&api.session(), 1, 20).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)));
    assert!(app.store().is_logged_in());
    // Reporting is left to whoever made the call.
    assert!(app.notices().is_empty());
}
