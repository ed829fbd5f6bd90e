//! API integration tests
//!
//! These run against a live server started with `RUN_MODE=development`
//! (OTPs echoed in the registration response).

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3333/api/v1";

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@mail.co", prefix, uuid::Uuid::new_v4().simple())
}

/// Register, verify and log in an account; returns its bearer token
async fn verified_token(client: &Client, role: &str) -> String {
    let email = unique_email(role);

    let response = client
        .post(format!("{}/auth/register/{}", BASE_URL, role))
        .json(&json!({ "nama": "Tester", "email": email, "password": "rahasia123" }))
        .send()
        .await
        .expect("Failed to send register request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse register response");
    let otp = body["data"]["otp"].as_i64().expect("No otp in response, is otp exposure on?");

    let response = client
        .post(format!("{}/auth/otp-confirmation", BASE_URL))
        .json(&json!({ "email": email, "otp": otp }))
        .send()
        .await
        .expect("Failed to send otp request");
    assert!(response.status().is_success());

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "rahasia123" }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["data"]["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_rejects_duplicate_email() {
    let client = Client::new();
    let email = unique_email("dup");
    let payload = json!({ "nama": "Budi", "email": email, "password": "rahasia123" });

    let first = client
        .post(format!("{}/auth/register/user", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), 200);

    let body: Value = first.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["role"], "user");
    let otp = body["data"]["otp"].as_i64().unwrap();
    assert!((100_000..=999_999).contains(&otp));

    let second = client
        .post(format!("{}/auth/register/petugas", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), 422);

    let body: Value = second.json().await.expect("Failed to parse response");
    assert!(body["errors"]["email"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_wrong_otp_is_rejected() {
    let client = Client::new();
    let email = unique_email("otp");

    let response = client
        .post(format!("{}/auth/register/user", BASE_URL))
        .json(&json!({ "nama": "Sari", "email": email, "password": "rahasia123" }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    let otp = body["data"]["otp"].as_i64().unwrap();
    let wrong = if otp == 999_999 { 100_000 } else { otp + 1 };

    let response = client
        .post(format!("{}/auth/otp-confirmation", BASE_URL))
        .json(&json!({ "email": email, "otp": wrong }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/auth/otp-confirmation", BASE_URL))
        .json(&json!({ "email": unique_email("nobody"), "otp": otp }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 502);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": unique_email("ghost"), "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_nonexistent_category() {
    let client = Client::new();

    let response = client
        .get(format!("{}/kategori/999999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_user_cannot_create_category() {
    let client = Client::new();
    let token = verified_token(&client, "user").await;

    let response = client
        .post(format!("{}/kategori", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "nama": "Fiksi" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "user tidak memiliki akses untuk membuat kategori");
}

#[tokio::test]
#[ignore]
async fn test_petugas_catalog_lifecycle() {
    let client = Client::new();
    let token = verified_token(&client, "petugas").await;

    // Create category
    let response = client
        .post(format!("{}/kategori", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "nama": "Sejarah" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let kategori_id = body["data"]["id"].as_i64().unwrap();

    // Book with unknown category
    let response = client
        .post(format!("{}/buku", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "judul": "Nusantara",
            "ringkasan": "Sejarah kepulauan",
            "tahun_terbit": "2009",
            "halaman": 420,
            "kategori_id": 999_999_999
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // Create book
    let response = client
        .post(format!("{}/buku", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "judul": "Nusantara",
            "ringkasan": "Sejarah kepulauan",
            "tahun_terbit": "2009",
            "halaman": 420,
            "kategori_id": kategori_id
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let buku_id = body["data"]["id"].as_i64().unwrap();

    // Category detail lists its books
    let response = client
        .get(format!("{}/kategori/{}", BASE_URL, kategori_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["nama"], "Sejarah");
    assert_eq!(body["data"]["books"][0]["id"].as_i64(), Some(buku_id));

    // Borrow it without a body: both dates take their defaults
    let response = client
        .post(format!("{}/buku/{}/peminjaman", BASE_URL, buku_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Deleting the category cascades to its books
    let response = client
        .delete(format!("{}/kategori/{}", BASE_URL, kategori_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/buku/{}", BASE_URL, buku_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_logout_revokes_token() {
    let client = Client::new();
    let token = verified_token(&client, "user").await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/auth/logout", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}
