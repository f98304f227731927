#![cfg(not(feature = "hydrate"))]

use super::*;

#[test]
fn origin_is_none_outside_browser() {
    assert_eq!(origin(), None);
}

#[test]
fn user_agent_is_none_outside_browser() {
    assert_eq!(user_agent(), None);
}
