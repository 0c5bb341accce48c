//! Flashcard API tests.
//!
//! Most of these tests require a running PostgreSQL database.
//! Set DATABASE_URL before running them with `--ignored`.

mod common;

use std::future::IntoFuture;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{unique_user, TestContext};

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_review_rejects_unknown_difficulty() {
    let ctx = TestContext::without_database();
    let server = ctx.server();
    let (name, value) = TestContext::user_header("user-1");

    let response = server
        .post("/api/flashcards/c1/review")
        .add_header(name, value)
        .json(&json!({"difficulty": "impossible"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn test_due_requires_identity() {
    let ctx = TestContext::without_database();
    let server = ctx.server();

    let response = server.get("/api/flashcards/due").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_due_cards_ordering() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let user = unique_user();
    let now = Utc::now();

    ctx.create_flashcard(&user, &format!("{user}-later"), 1, Some(now + Duration::days(2)))
        .await;
    ctx.create_flashcard(&user, &format!("{user}-overdue"), 3, Some(now - Duration::days(1)))
        .await;
    ctx.create_flashcard(&user, &format!("{user}-new"), 0, None).await;

    let (name, value) = TestContext::user_header(&user);
    let response = server.get("/api/flashcards/due").add_header(name, value).await;

    response.assert_status_ok();
    let body: Value = response.json();
    let ids: Vec<&str> = body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();

    let expected_new = format!("{user}-new");
    let expected_overdue = format!("{user}-overdue");
    assert_eq!(ids, vec![expected_new.as_str(), expected_overdue.as_str()]);

    ctx.cleanup_user(&user).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_review_schedules_and_persists() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let user = unique_user();
    let card_id = format!("{user}-card");
    ctx.create_flashcard(&user, &card_id, 0, None).await;

    let (name, value) = TestContext::user_header(&user);
    let before = Utc::now();
    let response = server
        .post(&format!("/api/flashcards/{card_id}/review"))
        .add_header(name.clone(), value.clone())
        .json(&json!({"difficulty": "easy"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["intervalDays"], 3);
    assert_eq!(body["card"]["timesReviewed"], 1);
    assert_eq!(body["card"]["difficulty"], "easy");

    let next_review = timestamp(&body["nextReview"]);
    let last_reviewed = timestamp(&body["card"]["lastReviewed"]);
    assert!(last_reviewed >= before);
    assert_eq!(next_review - last_reviewed, Duration::days(3));

    let stored = ctx.db.get_flashcard(&user, &card_id).await.unwrap().unwrap();
    assert_eq!(stored.times_reviewed, 1);
    assert!(stored.next_review.unwrap() > stored.last_reviewed.unwrap());

    // The second easy rating grows the interval.
    let response = server
        .post(&format!("/api/flashcards/{card_id}/review"))
        .add_header(name, value)
        .json(&json!({"difficulty": "easy"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["intervalDays"], 5);
    assert_eq!(body["card"]["timesReviewed"], 2);

    ctx.cleanup_user(&user).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_concurrent_reviews_both_count() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let user = unique_user();
    let card_id = format!("{user}-card");
    ctx.create_flashcard(&user, &card_id, 0, None).await;

    let (name, value) = TestContext::user_header(&user);
    let path = format!("/api/flashcards/{card_id}/review");
    let (first, second) = tokio::join!(
        server
            .post(&path)
            .add_header(name.clone(), value.clone())
            .json(&json!({"difficulty": "medium"}))
            .into_future(),
        server
            .post(&path)
            .add_header(name, value)
            .json(&json!({"difficulty": "medium"}))
            .into_future(),
    );
    first.assert_status_ok();
    second.assert_status_ok();

    // Each review saw the other's write, so the counts are 1 and 2.
    let mut counts = vec![
        first.json::<Value>()["card"]["timesReviewed"].as_u64().unwrap(),
        second.json::<Value>()["card"]["timesReviewed"].as_u64().unwrap(),
    ];
    counts.sort_unstable();
    assert_eq!(counts, vec![1, 2]);

    let stored = ctx.db.get_flashcard(&user, &card_id).await.unwrap().unwrap();
    assert_eq!(stored.times_reviewed, 2);

    ctx.cleanup_user(&user).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_review_unknown_card() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let user = unique_user();

    let (name, value) = TestContext::user_header(&user);
    let response = server
        .post("/api/flashcards/missing/review")
        .add_header(name, value)
        .json(&json!({"difficulty": "hard"}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_cards_are_scoped_to_their_owner() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let owner = unique_user();
    let other = unique_user();
    let card_id = format!("{owner}-card");
    ctx.create_flashcard(&owner, &card_id, 0, None).await;

    let (name, value) = TestContext::user_header(&other);
    let response = server
        .get(&format!("/api/flashcards/{card_id}/preview"))
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(&owner).await;
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_preview_intervals() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let user = unique_user();
    let card_id = format!("{user}-card");
    ctx.create_flashcard(&user, &card_id, 2, None).await;

    let (name, value) = TestContext::user_header(&user);
    let response = server
        .get(&format!("/api/flashcards/{card_id}/preview"))
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["timesReviewed"], 2);
    assert_eq!(body["scheduler"], "ladder");
    assert_eq!(body["intervals"], json!({"easy": 7, "medium": 3, "hard": 1}));

    // Previewing does not change the card.
    let stored = ctx.db.get_flashcard(&user, &card_id).await.unwrap().unwrap();
    assert_eq!(stored.times_reviewed, 2);
    assert_eq!(stored.next_review, None);

    ctx.cleanup_user(&user).await;
}
