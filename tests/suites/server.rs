use crate::common::{ClientJar, http_get, manager, spawn_server};

#[tokio::test]
async fn test_login_whoami_logout() {
    let port = spawn_server(manager(1, 1)).await;
    let mut jar = ClientJar::default();

    let resp = http_get(port, "/whoami", &jar).await;
    assert_eq!(resp.status, 401);

    let resp = http_get(port, "/login?user=alice", &jar).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.set_cookies.len(), 1);
    assert!(resp.set_cookies[0].contains("HttpOnly"));
    assert!(resp.set_cookies[0].contains("Secure"));
    for header in &resp.set_cookies {
        jar.apply_header(header);
    }

    let resp = http_get(port, "/whoami", &jar).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "alice\n");

    let resp = http_get(port, "/logout", &jar).await;
    assert_eq!(resp.status, 200);
    for header in &resp.set_cookies {
        jar.apply_header(header);
    }
    assert!(jar.get("session").is_none());

    let resp = http_get(port, "/whoami", &jar).await;
    assert_eq!(resp.status, 401);
}

#[tokio::test]
async fn test_session_survives_one_rotation() {
    let before = spawn_server(manager(1, 1)).await;
    let after = spawn_server(manager(2, 1)).await;
    let twice = spawn_server(manager(3, 2)).await;
    let mut jar = ClientJar::default();

    let resp = http_get(before, "/login?user=bob", &jar).await;
    for header in &resp.set_cookies {
        jar.apply_header(header);
    }

    let resp = http_get(after, "/whoami", &jar).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "bob\n");

    let resp = http_get(twice, "/whoami", &jar).await;
    assert_eq!(resp.status, 401);
}

#[tokio::test]
async fn test_forged_session_rejected() {
    let port = spawn_server(manager(1, 1)).await;
    let mut jar = ClientJar::default();
    jar.apply_header("session=Zm9yZ2Vk");

    let resp = http_get(port, "/whoami", &jar).await;
    assert_eq!(resp.status, 401);
}

#[tokio::test]
async fn test_unknown_route() {
    let port = spawn_server(manager(1, 1)).await;
    let resp = http_get(port, "/nope", &ClientJar::default()).await;
    assert_eq!(resp.status, 404);
}
