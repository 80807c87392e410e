use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a, 0xff]), "0aff");
}

// =============================================================================
// generate_token / hash_token
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

#[test]
fn hash_token_known_digest() {
    assert_eq!(
        hash_token("abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn hash_token_differs_from_token_and_is_stable() {
    let token = generate_token();
    let hashed = hash_token(&token);
    assert_ne!(hashed, token);
    assert_eq!(hashed, hash_token(&token));
    assert_eq!(hashed.len(), 64);
}

// =============================================================================
// SessionUser
// =============================================================================

#[test]
fn session_user_serializes_null_email() {
    let user = SessionUser { id: Uuid::nil(), name: "dana".into(), email: None };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["name"], "dana");
    assert!(json["email"].is_null());
}

#[test]
fn dev_user_id_is_stable() {
    assert_eq!(DEV_USER_ID.to_string(), "00000000-0000-0000-0000-00000000de01");
}

// =============================================================================
// live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
async fn dev_session_validates_then_deletes() {
    let pool = crate::db::test_helpers::integration_pool().await;

    let (user, token) = create_dev_session(&pool).await.unwrap();
    let found = validate_session(&pool, &token).await.unwrap().expect("session should validate");
    assert_eq!(found.id, user.id);

    let stored: String = sqlx::query_scalar("SELECT token_hash FROM sessions WHERE user_id = $1 LIMIT 1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, hash_token(&token));

    delete_session(&pool, &token).await.unwrap();
    assert!(validate_session(&pool, &token).await.unwrap().is_none());
}
