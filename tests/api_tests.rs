// tests/api_tests.rs

use std::sync::Arc;

use edugamify::{
    config::Config, routes, seed::seed_quizzes, services::badges::BadgeCatalog, state::AppState,
    store::MemoryStore,
};

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // 1. In-memory store with the sample quizzes
    let store = Arc::new(MemoryStore::new());
    seed_quizzes(store.as_ref())
        .await
        .expect("Failed to seed quizzes");

    // 2. Create test configuration and state
    let config = Config {
        database_url: None,
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        port: 0,
        submission_timeout_secs: 5,
        history_badges: false,
        badge_catalog_path: None,
        seed_quizzes: true,
    };

    let state = AppState::new(store, config, BadgeCatalog::standard());

    // 3. Create the router with the app state
    let app = routes::create_router(state);

    // 4. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 5. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Registers a fresh user and returns (token, user id).
async fn register_user(client: &reqwest::Client, address: &str) -> (String, i64) {
    let email = format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8]);

    let body = client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": "Test Learner",
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Register failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse register json");

    let token = body["token"].as_str().expect("Token not found").to_string();
    let id = body["user"]["id"].as_i64().expect("User id not found");
    (token, id)
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn register_works() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": "Ada",
            "email": "Ada@Example.com",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["points"], 0);
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn register_fails_validation() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act: Send an email that is not an email
    let response = client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": "Ada",
            "email": "not-an-email",
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn register_duplicate_email_conflicts() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let payload = serde_json::json!({
        "name": "Ada",
        "email": "ada@example.com",
        "password": "password123"
    });

    let first = client
        .post(&format!("{}/api/auth/register", address))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 201);

    let second = client
        .post(&format!("{}/api/auth/register", address))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 409);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "name": "Grace",
            "email": "grace@example.com",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();

    let ok = client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": "grace@example.com",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status().as_u16(), 200);
    let body: serde_json::Value = ok.json().await.unwrap();
    assert!(body["token"].as_str().is_some());

    let wrong = client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": "grace@example.com",
            "password": "wrong-password"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status().as_u16(), 401);

    let unknown = client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({
            "email": "nobody@example.com",
            "password": "password123"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 401);
}

#[tokio::test]
async fn quiz_listing_hides_answer_key() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let quizzes: Vec<serde_json::Value> = client
        .get(&format!("{}/api/quiz", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(quizzes.len(), 3);
    for quiz in &quizzes {
        for question in quiz["questions"].as_array().unwrap() {
            assert!(question.get("correct_answer").is_none());
        }
    }

    let single = client
        .get(&format!("{}/api/quiz/1", address))
        .send()
        .await
        .unwrap();
    assert_eq!(single.status().as_u16(), 200);
    let single: serde_json::Value = single.json().await.unwrap();
    assert_eq!(single["title"], "JavaScript Fundamentals");
    assert!(single["questions"][0].get("correct_answer").is_none());

    let missing = client
        .get(&format!("{}/api/quiz/999", address))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn submit_requires_token() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(&format!("{}/api/quiz/1/submit", address))
        .json(&serde_json::json!({ "answers": [0, 1, 2, 0], "time_spent": 60 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let bad_token = client
        .post(&format!("{}/api/quiz/1/submit", address))
        .header("Authorization", "Bearer not.a.token")
        .json(&serde_json::json!({ "answers": [0, 1, 2, 0], "time_spent": 60 }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_token.status().as_u16(), 401);
}

#[tokio::test]
async fn perfect_fast_submission_awards_points_and_badges() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register_user(&client, &address).await;

    // Act
    let response = client
        .post(&format!("{}/api/quiz/1/submit", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "answers": [0, 1, 2, 0], "time_spent": 60 }))
        .send()
        .await
        .expect("Submit failed");

    // Assert
    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let result = &body["result"];
    assert_eq!(result["score"], 4);
    assert_eq!(result["percentage"], 100);
    assert_eq!(result["points_earned"], 100);
    assert_eq!(result["replayed"], false);

    let names: Vec<&str> = result["new_badges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["First Steps", "Perfect Score", "Speed Demon", "JavaScript Ninja"]
    );

    let me: serde_json::Value = client
        .get(&format!("{}/api/user/me", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["points"], 100);
    assert_eq!(me["badges"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn invalid_submission_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register_user(&client, &address).await;

    // Option index out of range
    let out_of_range = client
        .post(&format!("{}/api/quiz/1/submit", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "answers": [0, 1, 9, 0], "time_spent": 60 }))
        .send()
        .await
        .unwrap();
    assert_eq!(out_of_range.status().as_u16(), 400);

    // Negative time
    let negative_time = client
        .post(&format!("{}/api/quiz/1/submit", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "answers": [0, 1, 2, 0], "time_spent": -5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(negative_time.status().as_u16(), 400);

    // Unknown quiz
    let unknown = client
        .post(&format!("{}/api/quiz/999/submit", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "answers": [0], "time_spent": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 404);

    // Nothing was recorded
    let me: serde_json::Value = client
        .get(&format!("{}/api/user/me", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["points"], 0);
    assert!(me["badges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn resubmitting_same_key_does_not_double_count() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register_user(&client, &address).await;
    let submission_id = uuid::Uuid::new_v4();
    let payload = serde_json::json!({
        "answers": [0, 1, 0, 0],
        "time_spent": 200,
        "submission_id": submission_id
    });

    let first: serde_json::Value = client
        .post(&format!("{}/api/quiz/1/submit", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let second: serde_json::Value = client
        .post(&format!("{}/api/quiz/1/submit", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&payload)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(first["result"]["result_id"], second["result"]["result_id"]);
    assert_eq!(first["result"]["replayed"], false);
    assert_eq!(second["result"]["replayed"], true);

    let me: serde_json::Value = client
        .get(&format!("{}/api/user/me", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["points"], 75);
}

#[tokio::test]
async fn reusing_submission_id_for_another_quiz_conflicts() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register_user(&client, &address).await;
    let submission_id = uuid::Uuid::new_v4();

    let first = client
        .post(&format!("{}/api/quiz/1/submit", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "answers": [0, 1, 2, 0],
            "time_spent": 200,
            "submission_id": submission_id
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status().as_u16(), 200);

    let second = client
        .post(&format!("{}/api/quiz/2/submit", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "answers": [0, 1, 1, 1, 1],
            "time_spent": 200,
            "submission_id": submission_id
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status().as_u16(), 409);

    let me: serde_json::Value = client
        .get(&format!("{}/api/user/me", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["points"], 100);
}

#[tokio::test]
async fn leaderboard_orders_by_points() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (low_token, _) = register_user(&client, &address).await;
    let (high_token, _) = register_user(&client, &address).await;

    for (token, answers) in [(&low_token, [0, 0, 0, 0]), (&high_token, [0, 1, 2, 0])] {
        let response = client
            .post(&format!("{}/api/quiz/1/submit", address))
            .header("Authorization", format!("Bearer {}", token))
            .json(&serde_json::json!({ "answers": answers, "time_spent": 200 }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    let board: Vec<serde_json::Value> = client
        .get(&format!("{}/api/quiz/leaderboard", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[0]["points"], 100);
    assert_eq!(board[1]["rank"], 2);
    assert_eq!(board[1]["points"], 50);
}

#[tokio::test]
async fn badge_catalog_is_listed() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let badges: Vec<serde_json::Value> = client
        .get(&format!("{}/api/quiz/badges", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(badges.len(), 10);
    assert_eq!(badges[0]["name"], "First Steps");
    assert_eq!(badges[0]["requirement"]["type"], "quizzes_completed");
}
