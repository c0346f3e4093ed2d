// ============================
// crates/backend-lib/src/oauth2.rs
// ============================
//! Registry of configured federated identity providers.
//!
//! The OAuth2 protocol itself is handled by an external integration which
//! redirects the browser through `{base}/{registration_id}` and, after the
//! callback, places an authenticated [`Principal`](crate::auth::Principal)
//! in the request extensions.
//!
//! Nothing in this crate or the bundled binary serves those paths; this
//! module only advertises them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::OAuth2Settings;

/// Path under which the identity integration starts an authorization request
pub const DEFAULT_AUTHORIZATION_REQUEST_BASE_URI: &str = "/oauth2/authorization";

/// Where the browser lands after a federated login completes
pub const POST_LOGIN_REDIRECT: &str = "/";

/// One configured identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRegistration {
    /// Identifier used in the authorization path, e.g. `github`
    pub registration_id: String,
    /// Name shown to users, e.g. `GitHub`
    pub client_name: String,
}

/// Read-only set of providers, shared across requests
#[derive(Debug, Clone)]
pub struct ClientRegistry {
    base_uri: String,
    registrations: Vec<ClientRegistration>,
}

impl ClientRegistry {
    pub fn new(base_uri: impl Into<String>, registrations: Vec<ClientRegistration>) -> Self {
        Self {
            base_uri: base_uri.into(),
            registrations,
        }
    }

    pub fn from_settings(settings: &OAuth2Settings) -> Self {
        Self::new(
            settings.authorization_base_uri.clone(),
            settings.clients.clone(),
        )
    }

    pub fn registrations(&self) -> &[ClientRegistration] {
        &self.registrations
    }

    /// Authorization redirect URL for one provider
    pub fn authorization_url(&self, registration: &ClientRegistration) -> String {
        format!(
            "{}/{}?redirect_url={}",
            self.base_uri.trim_end_matches('/'),
            registration.registration_id,
            POST_LOGIN_REDIRECT
        )
    }

    /// One `{display name: redirect url}` map per provider, in configured order
    pub fn authorization_links(&self) -> Vec<BTreeMap<String, String>> {
        self.registrations
            .iter()
            .map(|registration| {
                BTreeMap::from([(
                    registration.client_name.clone(),
                    self.authorization_url(registration),
                )])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(id: &str, name: &str) -> ClientRegistration {
        ClientRegistration {
            registration_id: id.to_string(),
            client_name: name.to_string(),
        }
    }

    #[test]
    fn test_authorization_links_follow_configured_order() {
        let registry = ClientRegistry::new(
            DEFAULT_AUTHORIZATION_REQUEST_BASE_URI,
            vec![registration("github", "GitHub"), registration("cas", "CAS")],
        );

        let links = registry.authorization_links();
        assert_eq!(links.len(), 2);
        assert_eq!(
            links[0]["GitHub"],
            "/oauth2/authorization/github?redirect_url=/"
        );
        assert_eq!(links[1]["CAS"], "/oauth2/authorization/cas?redirect_url=/");
    }

    #[test]
    fn test_trailing_slash_in_base_uri() {
        let registry = ClientRegistry::new("/sso/", vec![registration("gitlab", "GitLab")]);
        assert_eq!(
            registry.authorization_url(&registry.registrations()[0]),
            "/sso/gitlab?redirect_url=/"
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = ClientRegistry::from_settings(&OAuth2Settings::default());
        assert!(registry.authorization_links().is_empty());
    }
}
