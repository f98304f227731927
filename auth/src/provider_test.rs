use super::*;

#[test]
fn token_request_serializes_provider_shape() {
    let request = TokenRequest::new(["User.Read", "openid"]).with_prompt(Prompt::SelectAccount);
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        serde_json::json!({ "scopes": ["User.Read", "openid"], "prompt": "select_account" })
    );
}

#[test]
fn token_request_for_account_embeds_account() {
    let account = Account { home_account_id: "h".to_owned(), ..Account::default() };
    let value = serde_json::to_value(TokenRequest::new(["x/.default"]).for_account(account)).unwrap();
    assert_eq!(value["account"]["homeAccountId"], "h");
    assert!(value.get("prompt").is_none());
}

#[test]
fn logout_request_uses_camel_case() {
    let request = LogoutRequest { post_logout_redirect_uri: Some("https://dash.example".to_owned()) };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        serde_json::json!({ "postLogoutRedirectUri": "https://dash.example" })
    );
}

#[test]
fn auth_result_tolerates_missing_fields() {
    let parsed: AuthResult = serde_json::from_value(serde_json::json!({ "accessToken": "tok" })).unwrap();
    assert_eq!(parsed.access_token, "tok");
    assert!(parsed.account.is_none());
}

#[test]
fn interaction_status_parse() {
    assert_eq!(InteractionStatus::parse("none"), InteractionStatus::None);
    assert_eq!(InteractionStatus::parse("login"), InteractionStatus::Login);
    assert_eq!(InteractionStatus::parse("handleRedirect"), InteractionStatus::HandleRedirect);
    assert_eq!(InteractionStatus::parse("somethingNew"), InteractionStatus::Other);
    assert!(!InteractionStatus::None.in_progress());
    assert!(InteractionStatus::AcquireToken.in_progress());
}
