use crate::common::{ClientJar, manager};
use hyper::Response;
use rotating_cookies::{CookieError, SameSite};

#[test]
fn test_set_then_get() {
    let manager = manager(1, 1);
    let mut jar = ClientJar::default();

    let mut response = Response::new(());
    manager.set_cookie(&mut response, "session", "alice").unwrap();
    jar.apply(&response);

    let request = jar.request("/");
    assert_eq!(manager.get_cookie_value(&request, "session").unwrap(), "alice");
}

#[test]
fn test_delete_then_get() {
    let manager = manager(1, 1);
    let mut jar = ClientJar::default();

    let mut response = Response::new(());
    manager.set_cookie(&mut response, "session", "alice").unwrap();
    manager.set_cookie(&mut response, "theme", "dark").unwrap();
    jar.apply(&response);

    let mut response = Response::new(());
    manager.delete_cookie(&mut response, "session");
    jar.apply(&response);

    assert!(jar.get("session").is_none());
    let request = jar.request("/");
    assert!(matches!(
        manager.get_cookie_value(&request, "session"),
        Err(CookieError::CookieNotFound { .. })
    ));
    assert_eq!(manager.get_cookie_value(&request, "theme").unwrap(), "dark");
}

#[test]
fn test_get_after_rotation() {
    let mut jar = ClientJar::default();

    let mut response = Response::new(());
    manager(1, 1)
        .set_cookie(&mut response, "session", "alice")
        .unwrap();
    jar.apply(&response);

    let request = jar.request("/");
    assert_eq!(
        manager(2, 1).get_cookie_value(&request, "session").unwrap(),
        "alice"
    );
    assert!(matches!(
        manager(3, 2).get_cookie_value(&request, "session"),
        Err(CookieError::Verification(_))
    ));
}

#[test]
fn test_cookie_moved_between_names_rejected() {
    let manager = manager(1, 1);
    let mut jar = ClientJar::default();

    let mut response = Response::new(());
    manager.set_cookie(&mut response, "session", "alice").unwrap();
    jar.apply(&response);

    let token = jar.get("session").unwrap().to_string();
    jar.apply_header(&format!("admin={token}"));

    let request = jar.request("/");
    assert!(matches!(
        manager.get_cookie_value(&request, "admin"),
        Err(CookieError::Verification(_))
    ));
}

#[test]
fn test_deletion_matches_written_attributes() {
    let options = rotating_cookies::ManagerOptions::new(
        crate::common::secret_b64(1, 32),
        crate::common::secret_b64(1, 32),
    )
    .with_path("/account")
    .with_same_site(SameSite::None);
    let manager = rotating_cookies::CookieManager::new(&options).unwrap();

    let mut set = Response::new(());
    manager.set_cookie(&mut set, "session", "alice").unwrap();
    let mut delete = Response::new(());
    manager.delete_cookie(&mut delete, "session");

    let attrs = |response: &Response<()>| -> Vec<String> {
        let header = response.headers()["set-cookie"].to_str().unwrap();
        header
            .split(';')
            .skip(1)
            .map(|a| a.trim().to_string())
            .filter(|a| a.starts_with("Path=") || a.starts_with("SameSite="))
            .collect()
    };
    assert_eq!(attrs(&set), attrs(&delete));
    assert_eq!(attrs(&set), vec!["Path=/account", "SameSite=None"]);
}
