//! Forwards approved drafts to the external publish webhook.

pub mod error;
pub mod webhook;

pub use error::DeliveryError;
pub use webhook::{PublishMetadata, PublishPayload, WebhookPublisher};
