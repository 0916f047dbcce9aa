//! Configuration types.

use std::sync::Arc;

use reqwest::Url;
use secrecy::SecretString;

use crate::error::ConfigError;
use crate::transport::{DeliveryTransport, DisabledTransport, WebhookRelay};
use crate::wizard::answers::ContactDetails;
use crate::wizard::catalog::HostContext;
use crate::wizard::manager::SURVEY_SUBMIT_EVENT;
use crate::wizard::policy::RedirectTargets;

/// Webhook relay endpoint and credentials.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub endpoint: String,
    pub api_key: Option<SecretString>,
}

/// Funnel configuration.
#[derive(Debug, Clone)]
pub struct FunnelConfig {
    /// Relay to deliver submissions to. `None` disables delivery.
    pub relay: Option<RelayConfig>,
    /// Event name handed to the relay.
    pub event_name: String,
    pub redirects: RedirectTargets,
    /// Path of the hosting page. Decides standalone vs embedded.
    pub host_path: String,
    /// Identity carried over from the opt-in form.
    pub identity: Option<ContactDetails>,
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            relay: None,
            event_name: SURVEY_SUBMIT_EVENT.to_string(),
            redirects: RedirectTargets::default(),
            host_path: "/".to_string(),
            identity: None,
        }
    }
}

impl FunnelConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let relay = match get("FUNNEL_RELAY_URL") {
            Some(endpoint) => Some(RelayConfig {
                endpoint: validated_url("FUNNEL_RELAY_URL", endpoint)?,
                api_key: get("FUNNEL_RELAY_API_KEY").map(SecretString::from),
            }),
            None => None,
        };

        let redirects = RedirectTargets {
            booking: get("FUNNEL_BOOKING_URL")
                .map(|url| validated_url("FUNNEL_BOOKING_URL", url))
                .transpose()?
                .unwrap_or(defaults.redirects.booking),
            soft_landing: get("FUNNEL_SOFT_LANDING_URL")
                .map(|url| validated_url("FUNNEL_SOFT_LANDING_URL", url))
                .transpose()?
                .unwrap_or(defaults.redirects.soft_landing),
        };

        let identity = match (get("FUNNEL_FIRST_NAME"), get("FUNNEL_EMAIL")) {
            (None, None) => None,
            (first_name, email) => Some(ContactDetails {
                first_name: first_name.unwrap_or_default(),
                email: email.unwrap_or_default(),
            }),
        };

        Ok(Self {
            relay,
            event_name: get("FUNNEL_EVENT_NAME").unwrap_or(defaults.event_name),
            redirects,
            host_path: get("FUNNEL_HOST_PATH").unwrap_or(defaults.host_path),
            identity,
        })
    }

    pub fn host_context(&self) -> HostContext {
        HostContext::from_path(&self.host_path)
    }

    /// The relay client, or a transport that always fails when none is set.
    pub fn build_transport(&self) -> Arc<dyn DeliveryTransport> {
        match &self.relay {
            Some(relay) => Arc::new(WebhookRelay::new(
                relay.endpoint.clone(),
                relay.api_key.clone(),
            )),
            None => Arc::new(DisabledTransport),
        }
    }
}

fn validated_url(key: &str, value: String) -> Result<String, ConfigError> {
    Url::parse(&value).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{value:?} is not a valid URL: {e}"),
    })?;
    Ok(value)
}
