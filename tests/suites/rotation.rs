use crate::common::{manager, manager_sized, secret_b64};
use rotating_cookies::{CookieError, CookieManager, ManagerOptions, SecretSlot, SignerError};
use std::sync::Arc;
use std::thread;

const A: u8 = 0xA1;
const B: u8 = 0xB2;
const C: u8 = 0xC3;

fn flip(token: &str, index: usize) -> String {
    let mut bytes = token.as_bytes().to_vec();
    bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_roundtrip_under_current_key() {
    let manager = manager(A, A);
    let values = ["alice", "", "with spaces; and=signs", "J\u{fc}rgen \u{1f36a}", "x|y|z"];
    for name in ["session", "csrf", "__Host-pref"] {
        for value in values {
            let token = manager.sign(name, value).unwrap();
            assert_eq!(manager.read(name, &token).unwrap(), value);
        }
    }
}

#[test]
fn test_roundtrip_encrypted_key() {
    let manager = manager_sized(A, 64, A, 64);
    let token = manager.sign("session", "alice").unwrap();
    assert_eq!(manager.read("session", &token).unwrap(), "alice");
}

#[test]
fn test_rotation_fallback() {
    let m1 = manager(A, A);
    let token = m1.sign("session", "alice").unwrap();

    let m2 = manager(B, A);
    assert_eq!(m2.read("session", &token).unwrap(), "alice");

    let reissued = m2.sign("session", "alice").unwrap();
    assert!(m1.read("session", &reissued).is_err());
}

#[test]
fn test_rotation_across_strengths() {
    let token = manager_sized(A, 32, A, 32).sign("session", "alice").unwrap();
    let upgraded = manager_sized(B, 64, A, 32);
    assert_eq!(upgraded.read("session", &token).unwrap(), "alice");

    let encrypted = upgraded.sign("session", "bob").unwrap();
    let next = manager_sized(C, 32, B, 64);
    assert_eq!(next.read("session", &encrypted).unwrap(), "bob");
}

#[test]
fn test_double_rotation_expires_token() {
    let token = manager(A, A).sign("session", "alice").unwrap();
    let m3 = manager(C, B);
    assert!(matches!(
        m3.read("session", &token),
        Err(CookieError::Verification(SignerError::InvalidMac))
    ));
}

#[test]
fn test_name_binding() {
    let manager = manager(A, A);
    let token = manager.sign("session", "alice").unwrap();
    assert!(manager.read("csrf", &token).is_err());

    let rotated = manager_sized(B, 32, A, 32);
    assert!(rotated.read("csrf", &token).is_err());
}

#[test]
fn test_tamper_detection_every_position() {
    for len in [32, 64] {
        let issuer = manager_sized(A, len, A, len);
        let token = issuer.sign("session", "alice").unwrap();
        let rotated = manager_sized(B, len, A, len);

        for i in 0..token.len() {
            let tampered = flip(&token, i);
            assert!(
                issuer.read("session", &tampered).is_err(),
                "current key accepted token tampered at {i}"
            );
            assert!(
                rotated.read("session", &tampered).is_err(),
                "previous key accepted token tampered at {i}"
            );
        }
    }
}

#[test]
fn test_construction_validation() {
    for len in [0usize, 31, 33] {
        let options = ManagerOptions::new(secret_b64(A, len), secret_b64(A, 32));
        assert!(matches!(
            CookieManager::new(&options),
            Err(CookieError::InvalidSecretLength {
                slot: SecretSlot::Current,
                ..
            })
        ));

        let options = ManagerOptions::new(secret_b64(A, 32), secret_b64(A, len));
        assert!(matches!(
            CookieManager::new(&options),
            Err(CookieError::InvalidSecretLength {
                slot: SecretSlot::Previous,
                ..
            })
        ));
    }

    let options = ManagerOptions::new("not*base64", secret_b64(A, 32));
    assert!(matches!(
        CookieManager::new(&options),
        Err(CookieError::Decoding { .. })
    ));
}

#[test]
fn test_concurrent_sign_and_read() {
    let manager = Arc::new(manager(B, A));
    let legacy = crate::common::manager(A, A).sign("session", "legacy").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let manager = Arc::clone(&manager);
            let legacy = legacy.clone();
            thread::spawn(move || {
                for j in 0..50 {
                    let value = format!("user-{i}-{j}");
                    let token = manager.sign("session", &value).unwrap();
                    assert_eq!(manager.read("session", &token).unwrap(), value);
                    assert_eq!(manager.read("session", &legacy).unwrap(), "legacy");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
