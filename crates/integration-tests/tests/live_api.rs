//! Live API tests against a running server.
//!
//! These are `#[ignore]`d because they need a migrated database and a
//! server listening on `COMPTOIR_TEST_BASE_URL` (default
//! `http://127.0.0.1:5000`). Run with `cargo test -- --ignored`.

use comptoir_integration_tests::{test_base_url, test_client};

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_health_endpoints() {
    let client = test_client();
    let base = test_base_url();

    let resp = client
        .get(format!("{base}/health"))
        .send()
        .await
        .expect("health request");
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.expect("body"), "ok");

    let resp = client
        .get(format!("{base}/health/ready"))
        .send()
        .await
        .expect("readiness request");
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
#[ignore = "requires a running server"]
async fn test_cart_requires_authentication() {
    let client = test_client();
    let base = test_base_url();

    let resp = client
        .get(format!("{base}/api/cart"))
        .send()
        .await
        .expect("cart request");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "requires a running server and a migrated database"]
async fn test_register_login_me_flow() {
    let client = test_client();
    let base = test_base_url();

    // Unique email per run so reruns do not collide on the unique index.
    let email = format!(
        "it-{}@example.com",
        std::time::UNIX_EPOCH
            .elapsed()
            .expect("clock")
            .as_nanos()
    );
    let credentials = serde_json::json!({
        "email": email,
        "password": "correct horse battery staple",
    });

    let resp = client
        .post(format!("{base}/api/register"))
        .json(&credentials)
        .send()
        .await
        .expect("register request");
    assert_eq!(resp.status(), 201);

    let resp = client
        .post(format!("{base}/api/login"))
        .json(&credentials)
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), 200);

    // The session cookie from login authenticates /api/me.
    let resp = client
        .get(format!("{base}/api/me"))
        .send()
        .await
        .expect("me request");
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.expect("me body");
    assert_eq!(body["user"]["email"], email.as_str());

    // A fresh account starts with an empty cart, not a 404.
    let resp = client
        .get(format!("{base}/api/cart"))
        .send()
        .await
        .expect("cart request");
    assert_eq!(resp.status(), 200);
}
