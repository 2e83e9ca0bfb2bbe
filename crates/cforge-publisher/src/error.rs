use thiserror::Error;

/// Why a webhook delivery did not succeed.
///
/// Never leaves the crate as an `Err`; [`crate::WebhookPublisher::publish`]
/// folds it into a failed `PublishResult`.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Connect failure, timeout, or other transport error.
    #[error("Error posting to webhook: {0}")]
    Transport(#[from] reqwest::Error),

    /// The webhook answered with a non-2xx status.
    #[error("Failed to post to {platform}: {body}")]
    Rejected {
        platform: String,
        status: u16,
        body: String,
    },
}
