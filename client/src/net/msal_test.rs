use super::*;

#[test]
fn start_events_enter_their_interaction() {
    let none = InteractionStatus::None;
    assert_eq!(next_interaction_status("msal:initializeStart", None, none), InteractionStatus::Startup);
    assert_eq!(next_interaction_status("msal:loginStart", Some("redirect"), none), InteractionStatus::Login);
    assert_eq!(next_interaction_status("msal:logoutStart", Some("redirect"), none), InteractionStatus::Logout);
    assert_eq!(
        next_interaction_status("msal:handleRedirectStart", Some("redirect"), none),
        InteractionStatus::HandleRedirect
    );
    assert_eq!(next_interaction_status("msal:ssoSilentStart", Some("silent"), none), InteractionStatus::SsoSilent);
}

#[test]
fn silent_token_start_does_not_block() {
    let status = next_interaction_status("msal:acquireTokenStart", Some("silent"), InteractionStatus::None);
    assert_eq!(status, InteractionStatus::None);
}

#[test]
fn popup_token_start_is_an_interaction() {
    let status = next_interaction_status("msal:acquireTokenStart", Some("popup"), InteractionStatus::None);
    assert_eq!(status, InteractionStatus::AcquireToken);
    let done = next_interaction_status("msal:acquireTokenSuccess", Some("popup"), status);
    assert_eq!(done, InteractionStatus::None);
}

#[test]
fn end_events_only_clear_matching_interaction() {
    assert_eq!(
        next_interaction_status("msal:handleRedirectEnd", None, InteractionStatus::HandleRedirect),
        InteractionStatus::None
    );
    assert_eq!(
        next_interaction_status("msal:handleRedirectEnd", None, InteractionStatus::Login),
        InteractionStatus::Login
    );
    assert_eq!(next_interaction_status("msal:logoutEnd", None, InteractionStatus::Logout), InteractionStatus::None);
    assert_eq!(
        next_interaction_status("msal:initializeEnd", None, InteractionStatus::Startup),
        InteractionStatus::None
    );
}

#[test]
fn login_failure_ends_popup_login() {
    let status = next_interaction_status("msal:loginFailure", Some("popup"), InteractionStatus::Login);
    assert_eq!(status, InteractionStatus::None);
}

#[test]
fn unknown_events_keep_status() {
    let status = next_interaction_status("msal:popupOpened", Some("popup"), InteractionStatus::Login);
    assert_eq!(status, InteractionStatus::Login);
}

#[test]
fn account_events_are_recognized() {
    assert!(is_account_event("msal:accountAdded"));
    assert!(is_account_event("msal:accountRemoved"));
    assert!(is_account_event("msal:loginSuccess"));
    assert!(is_account_event("msal:logoutSuccess"));
    assert!(!is_account_event("msal:acquireTokenSuccess"));
    assert!(!is_account_event("msal:activeAccountChanged"));
}
