//! API integration tests
//!
//! Require a running server with a migrated database, an `admin` superuser
//! (password `admin-password`, see the `create_superuser` binary) and Redis.
//! `DATABASE_URL` must point at the server's database.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

async fn login(client: &Client, username: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    login(client, "admin", "admin-password").await
}

/// Register a fresh member and return (username, token)
async fn register_member(client: &Client) -> (String, String) {
    let (username, _, token) = register_member_with_id(client).await;
    (username, token)
}

async fn register_member_with_id(client: &Client) -> (String, i64, String) {
    let username = format!("member_{}", &Uuid::new_v4().simple().to_string()[..8]);
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "email": format!("{}@Example.COM", username),
            "password": "member-password",
            "password_confirm": "member-password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["user"]["role"], "Member");
    assert_eq!(body["user"]["email"], format!("{}@example.com", username));
    let id = body["user"]["id"].as_i64().unwrap();
    (username, id, body["token"].as_str().unwrap().to_string())
}

async fn set_role(client: &Client, admin: &str, user_id: i64, role: &str) {
    let response = client
        .put(format!("{}/users/{}/role", BASE_URL, user_id))
        .bearer_auth(admin)
        .json(&json!({ "role": role }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
}

async fn get_status(client: &Client, path: &str, token: Option<&str>) -> StatusCode {
    let mut request = client.get(format!("{}{}", BASE_URL, path));
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    request.send().await.expect("Failed to send request").status()
}

async fn create_named(client: &Client, admin: &str, collection: &str, name: &str) -> Value {
    let response = client
        .post(format!("{}/{}", BASE_URL, collection))
        .bearer_auth(admin)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

fn unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, &Uuid::new_v4().simple().to_string()[..8])
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
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_register_me_and_logout() {
    let client = Client::new();
    let (username, token) = register_member(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["username"], username.as_str());
    assert_eq!(body["permissions"], json!([]));

    let response = client
        .post(format!("{}/auth/logout", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_username_conflicts() {
    let client = Client::new();
    let (username, _) = register_member(&client).await;

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "email": "other@example.com",
            "password": "member-password",
            "password_confirm": "member-password"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_role_pages() {
    let client = Client::new();
    let (_, member) = register_member(&client).await;
    let admin = admin_token(&client).await;

    let status = |token: String, page: &'static str| {
        let client = client.clone();
        async move {
            client
                .get(format!("{}/{}", BASE_URL, page))
                .bearer_auth(token)
                .send()
                .await
                .expect("Failed to send request")
                .status()
        }
    };

    assert_eq!(status(member.clone(), "member").await, 200);
    assert_eq!(status(member.clone(), "admin").await, 403);
    assert_eq!(status(member, "librarian").await, 403);
    assert_eq!(status(admin.clone(), "admin").await, 200);
    assert_eq!(status(admin, "member").await, 403);
}

#[tokio::test]
#[ignore]
async fn test_catalog_relations() {
    let client = Client::new();
    let token = admin_token(&client).await;
    let suffix = Uuid::new_v4().simple().to_string();
    let author_name = format!("Author {}", &suffix[..8]);
    let library_name = format!("Library {}", &suffix[..8]);

    let author: Value = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": author_name }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "title": "First Book", "author_id": author["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.unwrap();

    let books: Value = client
        .get(format!("{}/authors/{}/books", BASE_URL, author_name))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(books.as_array().unwrap().len(), 1);

    let library: Value = client
        .post(format!("{}/libraries", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": library_name }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let library_id = library["id"].as_i64().unwrap();

    let response = client
        .post(format!("{}/libraries/{}/books", BASE_URL, library_id))
        .bearer_auth(&token)
        .json(&json!({ "book_id": book["id"] }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let response = client
        .put(format!("{}/libraries/{}/librarian", BASE_URL, library_id))
        .bearer_auth(&token)
        .json(&json!({ "name": "Ms. Pince" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let detail: Value = client
        .get(format!("{}/library/{}", BASE_URL, library_name))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["books"][0]["title"], "First Book");
    assert_eq!(detail["librarian"]["name"], "Ms. Pince");

    let response = client
        .delete(format!("{}/books/{}", BASE_URL, book["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_member_cannot_add_book() {
    let client = Client::new();
    let (_, token) = register_member(&client).await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "title": "Nope", "author_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_unknown_library_is_not_found() {
    let client = Client::new();

    let response = client
        .get(format!("{}/library/{}", BASE_URL, Uuid::new_v4()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_role_change_applies_to_issued_token() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, user_id, token) = register_member_with_id(&client).await;

    set_role(&client, &admin, user_id, "Admin").await;
    assert_eq!(get_status(&client, "/admin", Some(&token)).await, 200);

    set_role(&client, &admin, user_id, "Member").await;
    assert_eq!(get_status(&client, "/admin", Some(&token)).await, 403);
    assert_eq!(get_status(&client, "/member", Some(&token)).await, 200);
}

#[tokio::test]
#[ignore]
async fn test_book_permissions_by_role() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let author = create_named(&client, &admin, "authors", &unique_name("Author")).await;
    let (_, member) = register_member(&client).await;
    let (_, librarian_id, librarian) = register_member_with_id(&client).await;
    set_role(&client, &admin, librarian_id, "Librarian").await;

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&librarian)
        .json(&json!({ "title": "Shelved", "author_id": author["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.unwrap();
    let book_url = format!("{}/books/{}", BASE_URL, book["id"]);

    let response = client
        .put(&book_url)
        .bearer_auth(&member)
        .json(&json!({ "title": "Renamed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = client.delete(&book_url).bearer_auth(&member).send().await.unwrap();
    assert_eq!(response.status(), 403);

    let response = client
        .put(&book_url)
        .bearer_auth(&librarian)
        .json(&json!({ "title": "Renamed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let changed: Value = response.json().await.unwrap();
    assert_eq!(changed["title"], "Renamed");

    let response = client.delete(&book_url).bearer_auth(&librarian).send().await.unwrap();
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_missing_anchor_versus_empty_relation() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let author_name = unique_name("Author");
    let author = create_named(&client, &admin, "authors", &author_name).await;
    let library = create_named(&client, &admin, "libraries", &unique_name("Library")).await;
    let library_id = library["id"].as_i64().unwrap();

    // Existing anchors without related rows
    let books: Value = client
        .get(format!("{}/authors/{}/books", BASE_URL, author_name))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(books, json!([]));

    let books: Value = client
        .get(format!("{}/books?author_id={}", BASE_URL, author["id"]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(books, json!([]));

    let books: Value = client
        .get(format!("{}/libraries/{}/books", BASE_URL, library_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(books, json!([]));

    let path = format!("/libraries/{}/librarian", library_id);
    assert_eq!(get_status(&client, &path, None).await, 404);

    // Missing anchors
    let missing = i32::MAX;
    assert_eq!(
        get_status(&client, &format!("/authors/{}/books", Uuid::new_v4()), None).await,
        404
    );
    assert_eq!(
        get_status(&client, &format!("/libraries/{}/books", missing), None).await,
        404
    );
    assert_eq!(
        get_status(&client, &format!("/libraries/{}/librarian", missing), None).await,
        404
    );

    // An unknown author id filters down to nothing rather than failing
    let books: Value = client
        .get(format!("{}/books?author_id={}", BASE_URL, missing))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(books, json!([]));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_names_conflict_on_lookup() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let library_name = unique_name("Twin Library");
    create_named(&client, &admin, "libraries", &library_name).await;
    create_named(&client, &admin, "libraries", &library_name).await;
    let path = format!("/library/{}", library_name);
    assert_eq!(get_status(&client, &path, None).await, 409);

    let author_name = unique_name("Twin Author");
    create_named(&client, &admin, "authors", &author_name).await;
    create_named(&client, &admin, "authors", &author_name).await;
    let path = format!("/authors/{}/books", author_name);
    assert_eq!(get_status(&client, &path, None).await, 409);
}

#[tokio::test]
#[ignore]
async fn test_inactive_account_gets_no_token() {
    dotenvy::dotenv().ok();
    let client = Client::new();
    let (username, _) = register_member(&client).await;

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");
    sqlx::query("UPDATE users SET is_active = FALSE WHERE username = $1")
        .bind(&username)
        .execute(&pool)
        .await
        .unwrap();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "member-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert!(body.get("token").is_none());
    assert_eq!(body["error"], "NotAuthorized");
}
