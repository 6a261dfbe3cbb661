//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use crate::clients::{incident_notifier, SlackClient};
use crate::config::Config;
use crate::dispatch::Dispatcher;
use shared::format::Formatter;
use shared::resolver::{DnsCache, PtrResolver};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Carries the formatter and the dispatcher; the DNS cache lives inside
/// the formatter and is the only state that outlives a single request.
#[derive(Clone)]
pub struct AppState {
    formatter: Arc<Formatter>,
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Creates a new application state from its parts.
    pub fn new(formatter: Arc<Formatter>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            formatter,
            dispatcher,
        }
    }

    /// Assembles production state from configuration: system-resolver
    /// DNS cache, Slack client, and the configured incident client.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let resolver = Arc::new(DnsCache::new(Arc::new(PtrResolver::from_system())));
        let formatter = Formatter::new(
            config.slack_channel.clone(),
            config.kube_project_ids.clone(),
            resolver,
        );
        let chat = Arc::new(SlackClient::new(
            &config.slack_api_url,
            config.slack_api_key.clone(),
        )?);
        let incident = incident_notifier(&config.incident)?;

        Ok(Self::new(
            Arc::new(formatter),
            Arc::new(Dispatcher::new(chat, incident)),
        ))
    }

    /// Returns the notification formatter.
    #[must_use]
    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Returns the notification dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
