// Core moderation module - quarantine of suspected spam and the moderator review loop.
// Following the same pattern as the other core modules: models, ports, service.

pub mod classification;
pub mod dispatcher;
pub mod event_pipeline;
pub mod moderation_config;
pub mod moderation_models;
pub mod moderation_service;
pub mod review_registry;
pub mod whitelist;

#[cfg(test)]
pub mod test_support;

pub use classification::*;
pub use dispatcher::*;
pub use event_pipeline::*;
pub use moderation_config::*;
pub use moderation_models::*;
pub use moderation_service::*;
pub use review_registry::*;
pub use whitelist::*;
