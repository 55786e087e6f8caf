use super::*;

#[test]
fn identity_error_messages_are_user_facing() {
    assert_eq!(IdentityError::InvalidCredentials.to_string(), "Invalid email or password.");
    assert_eq!(
        IdentityError::Validation("Password is too short.".to_owned()).to_string(),
        "Password is too short."
    );
    assert_eq!(
        IdentityError::Network("timeout".to_owned()).to_string(),
        "Network error: timeout"
    );
}

#[test]
fn session_error_is_transparent_over_identity_error() {
    let err = SessionError::from(IdentityError::DuplicateAccount);
    assert_eq!(err.to_string(), "An account with this email already exists.");
}

#[test]
fn config_error_wraps_json_parse_failures() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
    let err = ConfigError::from(parse_err);
    assert!(err.to_string().starts_with("config parse error:"));
}
