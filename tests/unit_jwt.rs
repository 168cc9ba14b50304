use gradeport::config::jwt::JwtConfig;
use gradeport::utils::jwt::{create_access_token, verify_token};
use gradeport_models::ids::UserId;

fn config(secret: &str, expiry: i64) -> JwtConfig {
    JwtConfig {
        secret: secret.to_string(),
        access_token_expiry: expiry,
    }
}

#[test]
fn token_round_trips_claims() {
    let jwt_config = config("unit-test-secret", 3600);
    let user_id = UserId::new();

    let token = create_access_token(user_id, "ada@unn.edu.ng", "lecturer", &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.email, "ada@unn.edu.ng");
    assert_eq!(claims.role, "lecturer");
    assert!(claims.exp > claims.iat);
}

#[test]
fn wrong_secret_is_rejected() {
    let token = create_access_token(
        UserId::new(),
        "ada@unn.edu.ng",
        "admin",
        &config("secret-a", 3600),
    )
    .unwrap();

    assert!(verify_token(&token, &config("secret-b", 3600)).is_err());
}

#[test]
fn expired_token_is_rejected() {
    let jwt_config = config("unit-test-secret", -120);
    let token =
        create_access_token(UserId::new(), "ada@unn.edu.ng", "admin", &jwt_config).unwrap();

    assert!(verify_token(&token, &jwt_config).is_err());
}

#[test]
fn garbage_is_rejected() {
    assert!(verify_token("not-a-token", &config("unit-test-secret", 3600)).is_err());
}
