//! Dashboard fetchers against a local mock of the Torn API, through the real
//! HTTP client and request queue.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server, ServerGuard};
use tornboard::cache::{company_types, item_catalog};
use tornboard::client::{Credential, QueueSettings, RequestQueue, TornApi, TornClient};
use tornboard::dashboard::Dashboard;
use tornboard::error::{ApiError, Error};
use tornboard::models::KeyStatus;

fn dashboard(server: &ServerGuard) -> Dashboard {
    let queue = RequestQueue::new(QueueSettings::per_minute(600).inter_call_delay(Duration::ZERO));
    let client = TornClient::with_host(queue, Some(&server.url()), Duration::from_secs(5))
        .expect("client");
    let api: Arc<dyn TornApi> = Arc::new(client);
    Dashboard::new(
        api.clone(),
        Arc::new(item_catalog(api.clone(), None)),
        Arc::new(company_types(api, None)),
    )
}

fn selections(value: &str) -> Matcher {
    Matcher::UrlEncoded("selections".into(), value.into())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[tokio::test]
async fn rejected_key_is_reported_and_rechecked() {
    let mut server = Server::new_async().await;
    let basic = server
        .mock("GET", "/user/")
        .match_query(selections("basic"))
        .with_status(200)
        .with_body(r#"{"error": {"code": 2, "error": "Incorrect key"}}"#)
        .expect(2)
        .create_async()
        .await;

    let dashboard = dashboard(&server);
    let bad = Credential::new("bad-key");
    for _ in 0..2 {
        let check = dashboard.check_api_key(&bad).await.unwrap();
        assert_eq!(check.status, KeyStatus::Invalid);
        assert_eq!(check.error.as_deref(), Some("Incorrect key"));
    }
    basic.assert_async().await;
}

/// Concurrent callers with different keys each get their own data.
#[cfg_attr(not(feature = "http-tests"), ignore)]
#[tokio::test]
async fn concurrent_callers_keep_their_own_credentials() {
    let mut server = Server::new_async().await;
    let mut mocks = Vec::new();
    for (key, name) in [("key-a", "Alice"), ("key-b", "Bob")] {
        let mock = server
            .mock("GET", "/user/")
            .match_query(Matcher::AllOf(vec![
                selections("profile,battlestats,bars,money"),
                Matcher::UrlEncoded("key".into(), key.into()),
            ]))
            .with_status(200)
            .with_body(format!(r#"{{"player_id": 1, "name": "{name}"}}"#))
            .create_async()
            .await;
        mocks.push(mock);
    }

    let dashboard = dashboard(&server);
    let a = Credential::new("key-a");
    let b = Credential::new("key-b");
    let (alice, bob) = futures::join!(dashboard.get_player_stats(&a), dashboard.get_player_stats(&b));

    assert_eq!(alice.unwrap().name, "Alice");
    assert_eq!(bob.unwrap().name, "Bob");
    for mock in &mocks {
        mock.assert_async().await;
    }
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[tokio::test]
async fn server_error_surfaces_as_http_error() {
    let mut server = Server::new_async().await;
    let _user = server
        .mock("GET", "/user/")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let err = dashboard(&server)
        .get_player_stats(&Credential::new("k"))
        .await
        .unwrap_err();
    match err {
        Error::Api(ApiError::Http { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

/// A response that stalls past the client timeout is a timeout, not a
/// transport or parse failure, and the key stays out of the message.
#[cfg_attr(not(feature = "http-tests"), ignore)]
#[tokio::test]
async fn stalled_response_is_a_timeout() {
    let mut server = Server::new_async().await;
    let _slow = server
        .mock("GET", "/user/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_secs(1));
            w.write_all(br#"{"player_id": 1}"#)
        })
        .create_async()
        .await;

    let queue = RequestQueue::new(QueueSettings::per_minute(600).inter_call_delay(Duration::ZERO));
    let client = TornClient::with_host(queue, Some(&server.url()), Duration::from_millis(200))
        .expect("client");

    let err = client
        .request("/user/?selections=basic", &Credential::new("stall-secret-key"))
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::Api(ApiError::Timeout)),
        "expected a timeout, got {:?}",
        err
    );
    assert!(!err.to_string().contains("stall-secret-key"));
}

/// The item catalog is fetched once and reused by later listings.
#[cfg_attr(not(feature = "http-tests"), ignore)]
#[tokio::test]
async fn bazaar_listings_reuse_the_item_catalog() {
    let mut server = Server::new_async().await;
    let items = server
        .mock("GET", "/torn/")
        .match_query(selections("items"))
        .with_status(200)
        .with_body(r#"{"items": {"206": {"name": "Xanax", "type": "Drug", "market_value": 1000000}}}"#)
        .expect(1)
        .create_async()
        .await;
    let _bazaar = server
        .mock("GET", "/user/")
        .match_query(selections("profile,bazaar"))
        .with_status(200)
        .with_body(r#"{"player_id": 4, "name": "Duke", "bazaar": [{"ID": 206, "quantity": 3, "price": 800000}]}"#)
        .create_async()
        .await;

    let dashboard = dashboard(&server);
    let key = Credential::new("k");
    for _ in 0..2 {
        let result = dashboard.get_bazaar_items(&key, Some("Drugs")).await.unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].item_name, "Xanax");
        assert_eq!(result.items[0].percent_below_market, 20.0);
        assert_eq!(result.categories, vec!["All", "Drugs"]);
    }
    items.assert_async().await;
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[tokio::test]
async fn factionless_player_gets_the_sentinel() {
    let mut server = Server::new_async().await;
    let _profile = server
        .mock("GET", "/user/")
        .match_query(selections("profile"))
        .with_status(200)
        .with_body(r#"{"player_id": 4, "name": "Duke", "faction": {"faction_id": 0}}"#)
        .create_async()
        .await;
    let faction = server
        .mock("GET", Matcher::Regex("^/faction/".into()))
        .expect(0)
        .create_async()
        .await;

    let record = dashboard(&server)
        .get_faction_data(&Credential::new("k"))
        .await
        .unwrap();
    assert!(record.is_none());
    assert_eq!(record.name, "Not in a Faction");
    faction.assert_async().await;
}
