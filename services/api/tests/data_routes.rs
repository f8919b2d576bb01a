mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{app, app_with, header_str, FailingStore};
use std::{sync::Arc, time::Duration};

#[tokio::test]
async fn questions_page_reports_ceiling_of_total_over_limit() {
    let app = app();
    for n in 0..12 {
        app.create_question("technical", "medium", &format!("Medium question {n}"))
            .await;
    }
    for n in 0..3 {
        app.create_question("technical", "hard", &format!("Hard question {n}"))
            .await;
    }
    app.create_question("behavioral", "medium", "Tell me about a conflict")
        .await;

    let reply = app
        .get("/data?type=questions&category=technical&difficulty=medium&limit=5&page=1")
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], true);
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 5);
    assert_eq!(
        reply.body["pagination"],
        serde_json::json!({"page": 1, "limit": 5, "total": 12, "pages": 3})
    );

    let last = app
        .get("/data?type=questions&category=technical&difficulty=medium&limit=5&page=3")
        .await;
    assert_eq!(last.body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn page_size_never_exceeds_limit() {
    let app = app();
    for n in 0..7 {
        app.create_user(n).await;
    }

    for limit in 1..=8u64 {
        for page in 1..=3u64 {
            let reply = app
                .get(&format!("/data?type=users&limit={limit}&page={page}"))
                .await;
            let data = reply.body["data"].as_array().unwrap();
            let pagination = &reply.body["pagination"];
            assert!(data.len() as u64 <= limit);
            assert_eq!(pagination["total"], 7);
            assert_eq!(pagination["pages"], 7u64.div_ceil(limit));
        }
    }
}

#[tokio::test]
async fn lists_are_newest_first() {
    let app = app();
    app.create_question("algorithms", "easy", "First question").await;
    app.create_question("algorithms", "easy", "Second question").await;

    let reply = app.get("/data?type=questions").await;
    let data = reply.body["data"].as_array().unwrap();
    assert_eq!(data[0]["text"], "Second question");
    assert_eq!(data[1]["text"], "First question");
}

#[tokio::test]
async fn question_search_matches_any_term() {
    let app = app();
    app.create_question("backend", "easy", "Explain database indexing")
        .await;
    app.create_question("frontend", "easy", "What is the virtual DOM?")
        .await;
    app.create_question("devops", "easy", "How do containers work?")
        .await;

    let reply = app.get("/data?type=questions&search=indexing%20dom").await;
    assert_eq!(reply.body["pagination"]["total"], 2);

    let reply = app.get("/data?type=questions&technologies=go,python").await;
    assert_eq!(reply.body["pagination"]["total"], 0);
    let reply = app.get("/data?type=questions&technologies=go,rust").await;
    assert_eq!(reply.body["pagination"]["total"], 3);
}

#[tokio::test]
async fn summary_returns_counts_and_at_most_five_recent_items() {
    let app = app();
    for n in 0..7 {
        app.create_user(n).await;
        app.create_question("technical", "easy", &format!("Question {n}"))
            .await;
    }
    let interview = app.create_interview("u1", "completed", Some(75)).await;
    let feedback = app
        .create_feedback(interview["id"].as_str().unwrap(), "u1", 75)
        .await;
    assert_eq!(feedback.status, StatusCode::CREATED);

    for uri in ["/data", "/data?type=unknown", "/data?limit=1&page=4"] {
        let reply = app.get(uri).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.body.get("pagination").is_none());

        let data = &reply.body["data"];
        assert_eq!(data["summary"]["users"], 7);
        assert_eq!(data["summary"]["questions"], 7);
        assert_eq!(data["summary"]["interviews"], 1);
        assert_eq!(data["summary"]["feedback"], 1);
        assert_eq!(data["recent"]["users"].as_array().unwrap().len(), 5);
        assert_eq!(data["recent"]["questions"].as_array().unwrap().len(), 5);
        assert_eq!(data["recent"]["feedback"][0]["interview"]["title"], "completed mock");

        assert_eq!(
            header_str(&reply.headers, header::CACHE_CONTROL),
            "public, max-age=180, s-maxage=360"
        );
    }
}

#[tokio::test]
async fn interviews_and_feedback_carry_shallow_joins() {
    let app = app();
    let interview = app.create_interview("u1", "completed", Some(88)).await;
    let interview_id = interview["id"].as_str().unwrap().to_string();
    let created = app.create_feedback(&interview_id, "u1", 91).await;
    assert_eq!(created.status, StatusCode::CREATED);
    app.create_interview("u1", "pending", None).await;

    let reply = app.get("/data?type=interviews&userId=u1").await;
    assert_eq!(
        header_str(&reply.headers, header::CACHE_CONTROL),
        "private, max-age=120, s-maxage=240"
    );
    let data = reply.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data[0]["feedback"].is_null());
    assert_eq!(data[1]["feedback"]["overallScore"], 91);
    assert_eq!(data[1]["feedbackId"], created.body["feedback"]["id"]);

    let reply = app.get("/data?type=feedback&clerkId=clerk_u1").await;
    let data = reply.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["interview"]["id"], interview_id.as_str());
    assert_eq!(data[0]["interview"]["score"], 88);
    assert_eq!(data[0]["interview"]["type"], "technical");
}

#[tokio::test]
async fn dashboard_aggregates_one_owner() {
    let app = app();
    let user = app.create_user(1).await;
    let user_id = user["id"].as_str().unwrap().to_string();

    let first = app.create_interview(&user_id, "completed", Some(70)).await;
    app.create_interview(&user_id, "completed", Some(90)).await;
    app.create_interview(&user_id, "completed", None).await;
    app.create_interview(&user_id, "in-progress", None).await;
    app.create_interview("someone-else", "completed", Some(10))
        .await;
    app.create_feedback(first["id"].as_str().unwrap(), &user_id, 72)
        .await;

    let reply = app.get(&format!("/data?type=dashboard&userId={user_id}")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        header_str(&reply.headers, header::CACHE_CONTROL),
        "private, max-age=30, s-maxage=60"
    );

    let data = &reply.body["data"];
    assert_eq!(data["user"]["id"], user_id.as_str());
    assert_eq!(data["statistics"]["totalInterviews"], 4);
    assert_eq!(data["statistics"]["completedInterviews"], 3);
    assert_eq!(data["statistics"]["inProgressInterviews"], 1);
    assert_eq!(data["statistics"]["averageScore"], 80.0);
    assert_eq!(data["recentInterviews"].as_array().unwrap().len(), 4);
    assert_eq!(data["recentFeedback"][0]["overallScore"], 72);
    assert_eq!(data["recentFeedback"][0]["interview"]["title"], "completed mock");

    let linked = data["recentInterviews"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == first["id"])
        .unwrap();
    assert_eq!(linked["feedback"]["overallScore"], 72);
}

#[tokio::test]
async fn dashboard_without_scores_averages_zero() {
    let app = app();
    let reply = app.get("/data?type=dashboard&clerkId=nobody").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["data"]["user"].is_null());
    assert_eq!(reply.body["data"]["statistics"]["averageScore"], 0.0);
    assert_eq!(reply.body["data"]["statistics"]["totalInterviews"], 0);
}

#[tokio::test]
async fn invalid_filters_are_rejected() {
    let app = app();
    let reply = app.get("/data?type=questions&category=cooking").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["success"], false);

    let reply = app.get("/data?type=users&userId=42").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        header_str(&reply.headers, header::CACHE_CONTROL),
        "no-cache, no-store, must-revalidate"
    );
}

#[tokio::test]
async fn matching_etag_yields_not_modified() {
    let app = app();
    app.create_question("technical", "easy", "What is a closure?")
        .await;

    let first = app.get("/data?type=questions").await;
    let etag = header_str(&first.headers, header::ETAG).to_string();
    assert!(!etag.is_empty());
    assert!(first.headers.contains_key(header::LAST_MODIFIED));

    let again = app.get("/data?type=questions").await;
    assert_eq!(header_str(&again.headers, header::ETAG), etag);

    let conditional = Request::builder()
        .uri("/data?type=questions")
        .header(header::IF_NONE_MATCH, etag.as_str())
        .body(Body::empty())
        .unwrap();
    let reply = app.send(conditional).await;
    assert_eq!(reply.status, StatusCode::NOT_MODIFIED);
    assert!(reply.body.is_null());

    let stale = Request::builder()
        .uri("/data?type=questions")
        .header(header::IF_NONE_MATCH, "\"something-else\"")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(stale).await.status, StatusCode::OK);
}

fn if_modified_since(uri: &str, date: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::IF_MODIFIED_SINCE, date)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn unchanged_collection_is_not_modified_since_its_last_change() {
    let app = app();
    app.create_question("technical", "easy", "What is a trait object?")
        .await;
    // Let the change fall into a completed second so its date is exact.
    tokio::time::sleep(Duration::from_millis(1100)).await;

    let first = app.get("/data?type=questions").await;
    let last_modified = header_str(&first.headers, header::LAST_MODIFIED).to_string();
    assert!(!last_modified.is_empty());

    let reply = app
        .send(if_modified_since("/data?type=questions", &last_modified))
        .await;
    assert_eq!(reply.status, StatusCode::NOT_MODIFIED);

    let reply = app
        .send(if_modified_since(
            "/data?type=questions",
            "Mon, 01 Jan 2024 00:00:00 GMT",
        ))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn insert_outside_the_page_still_invalidates_it() {
    let app = app();
    let first = app.create_interview("u1", "completed", Some(60)).await;
    app.create_interview("u1", "pending", None).await;
    let linked = app
        .create_feedback(first["id"].as_str().unwrap(), "u1", 60)
        .await;
    assert_eq!(linked.status, StatusCode::CREATED);

    let uri = "/data?type=interviews&limit=1&page=2";
    let before = app.get(uri).await;
    assert_eq!(before.body["data"][0]["id"], first["id"]);
    assert_eq!(before.body["pagination"]["total"], 2);
    let last_modified = header_str(&before.headers, header::LAST_MODIFIED).to_string();

    app.create_interview("u1", "pending", None).await;

    let reply = app.send(if_modified_since(uri, &last_modified)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["pagination"]["total"], 3);
    assert_ne!(reply.body["data"][0]["id"], first["id"]);
}

#[tokio::test]
async fn store_failure_is_reported_uncached() {
    let app = app_with(Arc::new(FailingStore));

    for (uri, message) in [
        ("/data?type=users", "Failed to fetch users"),
        ("/data?type=interviews", "Failed to fetch interviews"),
        ("/data?type=questions", "Failed to fetch questions"),
        ("/data?type=feedback", "Failed to fetch feedback"),
        ("/data?type=dashboard", "Failed to fetch dashboard data"),
        ("/data", "Failed to fetch data"),
    ] {
        let reply = app.get(uri).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(reply.body["success"], false);
        assert_eq!(reply.body["message"], message);
        assert!(reply.body["error"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
        assert_eq!(
            header_str(&reply.headers, header::CACHE_CONTROL),
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(header_str(&reply.headers, header::PRAGMA), "no-cache");
    }
}
