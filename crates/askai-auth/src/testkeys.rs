// SPDX-FileCopyrightText: 2026 Askai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! RSA key pair used to mint ID tokens in tests.

use jsonwebtoken::{Algorithm, EncodingKey, Header};

pub const TEST_KID: &str = "test-kid";
pub const TEST_CLIENT_ID: &str = "client-123.apps.googleusercontent.com";

const PRIVATE_KEY_PEM: &str = include_str!("testdata/test_rsa.pem");
const MODULUS: &str = "sgO9DlaPDmmKH5DQKXU8Ur1XsUGALBiwgLRbC-DifIdCkmObIW8oFY0pK6LPlEFhtf6Kr_QDOnZPce8QJUTMli9ZBrZo6OsWBB8Kg2BK8giUsSMbJaVMJ7fnBtp7niaaz3hs3LLFTlnIjJRGyp_PyY2lF5Lkxxu6dtHmu178X304nl-6e5uOv4Z_Zu2mkJvO0mfUlH5aA5Jy64-IIGPlcRIcoCZ0GebmJjE4FD6ydy2HxEQJrdbEskVgAFgZGurXR8iD7fikeZLmdRitwCXQmoHZYoHoswRjpt5ZVxTPf3tscAhYVw51141n684dCa9RUyTeigWKTA03Dy2pyJ-Anw";

pub fn jwks_body() -> serde_json::Value {
    serde_json::json!({
        "keys": [{
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": TEST_KID,
            "n": MODULUS,
            "e": "AQAB"
        }]
    })
}

pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Signs `claims` with the test key under `kid`.
pub fn mint(kid: &str, claims: &serde_json::Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes()).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

/// Claims of a valid token for `email`, expiring in an hour.
pub fn valid_claims(email: &str) -> serde_json::Value {
    let now = now_secs();
    serde_json::json!({
        "iss": "https://accounts.google.com",
        "aud": TEST_CLIENT_ID,
        "sub": "1234567890",
        "email": email,
        "email_verified": true,
        "name": "Alice Example",
        "iat": now,
        "exp": now + 3600
    })
}
