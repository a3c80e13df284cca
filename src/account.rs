//
// account.rs
// Distributed under terms of the MIT license.
//

use crate::error::NofanError;
use crate::store::{AccountMap, Config, Credential};

// Account keys are stored case-sensitively but matched case-insensitively.
pub fn find<'a>(accounts: &'a AccountMap, name: &str) -> Option<(&'a str, &'a Credential)> {
    accounts
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(key, credential)| (key.as_str(), credential))
}

// Picks the credential for the configured active user, falling back to the
// first stored account (and repointing config.user at it) when the pointer is
// unset or stale. The caller persists the updated config.
pub fn resolve_active(
    config: &mut Config,
    accounts: &AccountMap,
) -> Result<(String, Credential), NofanError> {
    if let Some(active) = &config.user {
        if let Some((name, credential)) = find(accounts, active) {
            return Ok((name.to_string(), credential.clone()));
        }
    }

    match accounts.iter().next() {
        Some((name, credential)) => {
            config.user = Some(name.clone());
            Ok((name.clone(), credential.clone()))
        }
        None => Err(NofanError::Unauthenticated),
    }
}

pub fn switch_to(
    config: &mut Config,
    accounts: &AccountMap,
    name: &str,
) -> Result<String, NofanError> {
    match find(accounts, name) {
        Some((stored, _)) => {
            config.user = Some(stored.to_string());
            Ok(stored.to_string())
        }
        None => Err(NofanError::AccountNotFound(name.to_string())),
    }
}

// Logout: drop the active entry and activate the first remaining account, or
// unset the pointer when none is left. Without an active user this is a no-op.
pub fn remove_active(config: &mut Config, accounts: &mut AccountMap) -> bool {
    let active = match &config.user {
        Some(active) => active.clone(),
        None => return false,
    };

    if let Some(key) = find(accounts, &active).map(|(key, _)| key.to_string()) {
        accounts.remove(&key);
    }
    config.user = accounts.keys().next().cloned();
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(token: &str) -> Credential {
        Credential {
            consumer_key: "ck".to_string(),
            consumer_secret: "cs".to_string(),
            oauth_token: token.to_string(),
            oauth_token_secret: "ts".to_string(),
        }
    }

    fn accounts(names: &[&str]) -> AccountMap {
        names
            .iter()
            .map(|name| (name.to_string(), credential(name)))
            .collect()
    }

    #[test]
    fn empty_store_is_unauthenticated() {
        let mut config = Config::default();
        match resolve_active(&mut config, &AccountMap::new()) {
            Err(NofanError::Unauthenticated) => {}
            other => panic!("expected Unauthenticated, got {:?}", other),
        }
    }

    #[test]
    fn stale_pointer_falls_back_to_first_account() {
        let mut config = Config::default();
        config.user = Some("alice".to_string());
        let store = accounts(&["bob"]);

        let (name, cred) = resolve_active(&mut config, &store).unwrap();
        assert_eq!(name, "bob");
        assert_eq!(cred.oauth_token, "bob");
        assert_eq!(config.user.as_deref(), Some("bob"));
    }

    #[test]
    fn matching_pointer_is_left_unchanged() {
        let mut config = Config::default();
        config.user = Some("Bob".to_string());
        let store = accounts(&["alice", "bob"]);

        let (name, _) = resolve_active(&mut config, &store).unwrap();
        assert_eq!(name, "bob");
        assert_eq!(config.user.as_deref(), Some("Bob"));
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut config = Config::default();
        let store = accounts(&["carol", "dave"]);

        let first = resolve_active(&mut config, &store).unwrap();
        let second = resolve_active(&mut config, &store).unwrap();
        assert_eq!(first, second);
        assert_eq!(config.user.as_deref(), Some("carol"));
    }

    #[test]
    fn switch_matches_case_insensitively() {
        let mut config = Config::default();
        let store = accounts(&["alice"]);

        assert_eq!(switch_to(&mut config, &store, "Alice").unwrap(), "alice");
        assert_eq!(config.user.as_deref(), Some("alice"));
    }

    #[test]
    fn switch_to_unknown_account_needs_login() {
        let mut config = Config::default();
        let store = accounts(&["alice"]);

        match switch_to(&mut config, &store, "mallory") {
            Err(NofanError::AccountNotFound(name)) => assert_eq!(name, "mallory"),
            other => panic!("expected AccountNotFound, got {:?}", other),
        }
    }

    #[test]
    fn logout_of_last_account_unsets_the_pointer() {
        let mut config = Config::default();
        config.user = Some("bob".to_string());
        let mut store = accounts(&["bob"]);

        assert!(remove_active(&mut config, &mut store));
        assert!(store.is_empty());
        assert_eq!(config.user, None);
    }

    #[test]
    fn logout_activates_the_first_remaining_account() {
        let mut config = Config::default();
        config.user = Some("bob".to_string());
        let mut store = accounts(&["alice", "bob"]);

        assert!(remove_active(&mut config, &mut store));
        assert_eq!(store.len(), 1);
        assert_eq!(config.user.as_deref(), Some("alice"));
    }

    #[test]
    fn logout_without_active_user_is_a_noop() {
        let mut config = Config::default();
        let mut store = accounts(&["alice"]);

        assert!(!remove_active(&mut config, &mut store));
        assert_eq!(store.len(), 1);
        assert_eq!(config.user, None);
    }
}
