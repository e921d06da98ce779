//! Tests for the booking service mock.

use super::*;
use booker_client::BookingDates;
use reqwest::Client;

fn sample_booking() -> BookingRequest {
    BookingRequest {
        firstname: "Furkan".to_string(),
        lastname: "Uzum".to_string(),
        totalprice: 111,
        depositpaid: true,
        bookingdates: BookingDates::new("2024-01-01", "2024-01-05"),
        additionalneeds: Some("Breakfast".to_string()),
    }
}

async fn issue_token(booker: &MockBooker, client: &Client) -> String {
    let response: serde_json::Value = client
        .post(format!("{}/auth", booker.uri()))
        .json(&default_credentials())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    response["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_auth_with_bad_credentials_returns_reason() {
    let booker = MockBooker::start().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/auth", booker.uri()))
        .json(&Credentials::new("admin", "wrong"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["reason"], "Bad credentials");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let booker = MockBooker::start().await;
    let client = Client::new();

    let created: serde_json::Value = client
        .post(format!("{}/booking", booker.uri()))
        .json(&sample_booking())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let id = created["bookingid"].as_u64().unwrap();
    let fetched: BookingRequest = client
        .get(format!("{}/booking/{}", booker.uri(), id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(fetched, sample_booking());
    assert_eq!(booker.booking(BookingId::new(id)), Some(sample_booking()));
}

#[tokio::test]
async fn test_list_contains_seeded_bookings() {
    let booker = MockBooker::start().await;
    let first = booker.seed_booking(sample_booking());
    let second = booker.seed_booking(sample_booking());

    let ids: Vec<serde_json::Value> = Client::new()
        .get(format!("{}/booking", booker.uri()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0]["bookingid"], second.value());
    assert_eq!(ids[1]["bookingid"], first.value());
    assert_eq!(booker.booking_ids(), vec![first, second]);
}

#[tokio::test]
async fn test_mutations_require_token_cookie() {
    let booker = MockBooker::start().await;
    let id = booker.seed_booking(sample_booking());
    let client = Client::new();
    let url = format!("{}/booking/{}", booker.uri(), id);

    let without_cookie = client.delete(&url).send().await.unwrap();
    assert_eq!(without_cookie.status().as_u16(), 403);

    let bad_cookie = client
        .delete(&url)
        .header("Cookie", "token=nope")
        .send()
        .await
        .unwrap();
    assert_eq!(bad_cookie.status().as_u16(), 403);
    assert!(booker.booking(id).is_some());
}

#[tokio::test]
async fn test_patch_merges_fields() {
    let booker = MockBooker::start().await;
    let id = booker.seed_booking(sample_booking());
    let client = Client::new();
    let token = issue_token(&booker, &client).await;

    let response = client
        .patch(format!("{}/booking/{}", booker.uri(), id))
        .header("Cookie", format!("token={}", token))
        .json(&BookingPatch::firstname("UpdatedName"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let stored = booker.booking(id).unwrap();
    assert_eq!(stored.firstname, "UpdatedName");
    assert_eq!(stored.lastname, "Uzum");
    assert_eq!(stored.totalprice, 111);
}

#[tokio::test]
async fn test_delete_answers_created_then_not_found() {
    let booker = MockBooker::start().await;
    let id = booker.seed_booking(sample_booking());
    let client = Client::new();
    let token = issue_token(&booker, &client).await;
    let url = format!("{}/booking/{}", booker.uri(), id);

    let deleted = client
        .delete(&url)
        .header("Cookie", format!("token={}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 201);
    assert_eq!(deleted.text().await.unwrap(), "Created");

    let fetched = client.get(&url).send().await.unwrap();
    assert_eq!(fetched.status().as_u16(), 404);

    let deleted_again = client
        .delete(&url)
        .header("Cookie", format!("token={}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted_again.status().as_u16(), 405);
}

#[tokio::test]
async fn test_override_takes_precedence() {
    let booker = MockBooker::start().await;
    booker
        .override_response("GET", "^/ping$", ResponseTemplate::new(503))
        .await;

    let response = Client::new()
        .get(format!("{}/ping", booker.uri()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 503);
    assert_eq!(booker.request_count().await, 1);
}
