use super::*;
use crate::account::Identity;
use crate::error::ProviderError;
use crate::provider::InteractionStatus;
use crate::test_helpers::{MockIdentityClient, account, coordinator};

fn settled_signed_out() -> AuthState {
    AuthState { initializing: false, loading: false, ..AuthState::default() }
}

fn signed_in() -> AuthState {
    let mut state = AuthState {
        identity: Some(Identity::from(account("ada"))),
        provider_authenticated: true,
        has_cached_identity: true,
        ..settled_signed_out()
    };
    state.settle();
    state
}

// =========================================================================
// pure decisions
// =========================================================================

#[test]
fn needs_auth_only_when_nothing_known() {
    assert!(RouteGuard::needs_auth(&settled_signed_out()));
    assert!(!RouteGuard::needs_auth(&signed_in()));
    let cached = AuthState { has_cached_identity: true, ..settled_signed_out() };
    assert!(!RouteGuard::needs_auth(&cached));
}

#[test]
fn should_redirect_waits_for_settled_state() {
    assert!(RouteGuard::should_redirect(&settled_signed_out(), false));
    assert!(!RouteGuard::should_redirect(&AuthState::default(), false));
    assert!(!RouteGuard::should_redirect(&AuthState { loading: true, ..settled_signed_out() }, false));
    assert!(!RouteGuard::should_redirect(&settled_signed_out(), true));
    let errored = AuthState { auth_error: Some("boom".to_owned()), ..settled_signed_out() };
    assert!(!RouteGuard::should_redirect(&errored, false));
}

#[test]
fn view_loading_while_initializing_or_loading() {
    assert_eq!(RouteGuard::view(&AuthState::default()), GuardView::Loading);
    assert_eq!(RouteGuard::view(&AuthState { loading: true, ..signed_in() }), GuardView::Loading);
}

#[test]
fn view_loading_while_cached_identity_not_reconciled() {
    let cached = AuthState { has_cached_identity: true, ..settled_signed_out() };
    assert_eq!(RouteGuard::view(&cached), GuardView::Loading);
}

#[test]
fn view_error_takes_precedence_over_loading() {
    let state = AuthState { auth_error: Some("denied".to_owned()), ..AuthState::default() };
    assert_eq!(RouteGuard::view(&state), GuardView::Failed("denied".to_owned()));
}

#[test]
fn view_content_when_signed_in() {
    assert_eq!(RouteGuard::view(&signed_in()), GuardView::Content);
}

#[test]
fn view_redirecting_when_signed_out() {
    assert_eq!(RouteGuard::view(&settled_signed_out()), GuardView::Redirecting);
}

#[test]
fn prefetch_only_when_settled_and_authenticated() {
    assert!(RouteGuard::should_prefetch_home(&signed_in()));
    assert!(!RouteGuard::should_prefetch_home(&AuthState { loading: true, ..signed_in() }));
    assert!(!RouteGuard::should_prefetch_home(&settled_signed_out()));
}

// =========================================================================
// redirect lifecycle
// =========================================================================

#[tokio::test]
async fn fresh_load_redirects_exactly_once() {
    let mock = MockIdentityClient::new();
    let coordinator = coordinator(&mock);
    let guard = RouteGuard::new(Rc::clone(&coordinator));

    guard.sync().await;
    assert_eq!(mock.count("login_redirect"), 0, "no redirect while initializing");

    coordinator.bootstrap().await;
    assert!(RouteGuard::needs_auth(&coordinator.state()));
    guard.sync().await;
    guard.sync().await;

    assert_eq!(mock.count("login_redirect"), 1);
    assert!(guard.is_redirecting());
}

#[tokio::test]
async fn second_redirect_request_is_noop_while_outstanding() {
    let mock = MockIdentityClient::new();
    let coordinator = coordinator(&mock);
    coordinator.bootstrap().await;
    let guard = RouteGuard::new(coordinator);

    guard.start_redirect().await;
    guard.start_redirect().await;

    assert_eq!(mock.count("login_redirect"), 1);
}

#[tokio::test]
async fn cached_session_renders_content_without_redirect() {
    let mock = MockIdentityClient::with_cached(vec![account("ada")]);
    let coordinator = coordinator(&mock);
    let guard = RouteGuard::new(Rc::clone(&coordinator));

    coordinator.bootstrap().await;
    guard.sync().await;

    assert_eq!(RouteGuard::view(&coordinator.state()), GuardView::Content);
    assert_eq!(mock.count("login_redirect"), 0);
}

#[tokio::test]
async fn no_redirect_during_interaction() {
    let mock = MockIdentityClient::new();
    mock.status.set(InteractionStatus::HandleRedirect);
    let coordinator = coordinator(&mock);
    coordinator.bootstrap().await;
    let guard = RouteGuard::new(coordinator);

    guard.sync().await;

    assert_eq!(mock.count("login_redirect"), 0);
}

#[tokio::test]
async fn redirect_follows_once_interaction_settles() {
    let mock = MockIdentityClient::new();
    mock.status.set(InteractionStatus::HandleRedirect);
    let coordinator = coordinator(&mock);
    coordinator.bootstrap().await;
    let guard = RouteGuard::new(Rc::clone(&coordinator));

    guard.sync().await;
    assert_eq!(mock.count("login_redirect"), 0);

    mock.status.set(InteractionStatus::None);
    coordinator.reconcile();
    guard.sync().await;
    guard.sync().await;

    assert_eq!(mock.count("login_redirect"), 1);
}

#[tokio::test]
async fn failed_redirect_shows_error_and_rearms() {
    let mock = MockIdentityClient::new();
    mock.login_redirect_error.replace(Some(ProviderError::new("popup_window_error")));
    let coordinator = coordinator(&mock);
    coordinator.bootstrap().await;
    let guard = RouteGuard::new(Rc::clone(&coordinator));

    guard.sync().await;
    assert_eq!(mock.count("login_redirect"), 1);
    assert_eq!(RouteGuard::view(&coordinator.state()), GuardView::Failed("popup_window_error".to_owned()));

    // The error re-arms the guard but never triggers an automatic retry.
    guard.sync().await;
    assert!(!guard.is_redirecting());
    assert_eq!(mock.count("login_redirect"), 1);
}

#[tokio::test]
async fn retry_clears_error_and_redirects_again() {
    let mock = MockIdentityClient::new();
    mock.login_redirect_error.replace(Some(ProviderError::new("popup_window_error")));
    let coordinator = coordinator(&mock);
    coordinator.bootstrap().await;
    let guard = RouteGuard::new(Rc::clone(&coordinator));
    guard.sync().await;

    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    coordinator.subscribe(move |s: &AuthState| sink.borrow_mut().push(s.auth_error.clone()));

    guard.retry().await;

    assert_eq!(mock.count("login_redirect"), 2);
    assert!(guard.is_redirecting());
    assert_eq!(seen.borrow().first().cloned(), Some(None), "error cleared before re-attempt");
    assert!(coordinator.state().auth_error.is_none());
    assert_eq!(RouteGuard::view(&coordinator.state()), GuardView::Loading);
}

#[tokio::test]
async fn successful_sign_in_rearms_flag() {
    let mock = MockIdentityClient::new();
    let coordinator = coordinator(&mock);
    coordinator.bootstrap().await;
    let guard = RouteGuard::new(Rc::clone(&coordinator));
    guard.sync().await;
    assert!(guard.is_redirecting());

    mock.push_account(account("ada"));
    guard.sync().await;

    assert!(!guard.is_redirecting());
    assert_eq!(RouteGuard::view(&coordinator.state()), GuardView::Content);
}
