//! Error types used by the notifier and its subscribers.
//!
//! This module defines three error enums:
//!
//! - [`SubscriberError`] - precondition violations surfaced to the immediate caller
//!   (bad construction arguments, unsubscribing without a subscription).
//! - [`DeliveryError`] - a subscriber could not process a delivered item.
//! - [`ConfigError`] - a notifier could not be built from its [`Config`](crate::Config).
//!
//! All types provide `as_label` (stable snake_case, for logs) and `as_message`.

use std::sync::Arc;
use thiserror::Error;

/// # Errors raised synchronously by subscriber operations.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubscriberError {
    /// A constructor argument was empty or otherwise unusable.
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        field: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The operation is not valid in the subscriber's current state.
    #[error("invalid state: {reason}")]
    InvalidState {
        /// What was wrong with the state.
        reason: &'static str,
    },
}

impl SubscriberError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use herald::SubscriberError;
    ///
    /// let err = SubscriberError::InvalidState { reason: "not subscribed" };
    /// assert_eq!(err.as_label(), "subscriber_invalid_state");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscriberError::InvalidArgument { .. } => "subscriber_invalid_argument",
            SubscriberError::InvalidState { .. } => "subscriber_invalid_state",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SubscriberError::InvalidArgument { field, reason } => {
                format!("argument {field}: {reason}")
            }
            SubscriberError::InvalidState { reason } => format!("state: {reason}"),
        }
    }
}

/// # Errors raised while delivering an item to a subscriber.
///
/// A delivery error is terminal for the failing subscriber: the notifier passes it
/// to [`Subscribe::on_error`](crate::Subscribe::on_error) and evicts the subscriber.
/// Other subscribers of the same post are unaffected.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The subscriber refused or failed to process the item.
    #[error("subscriber {subscriber} rejected item {item_id}: {reason}")]
    Rejected {
        /// Subscriber name.
        subscriber: Arc<str>,
        /// Id of the item being delivered.
        item_id: i64,
        /// Failure message.
        reason: String,
    },

    /// The subscriber panicked while handling the item.
    #[error("subscriber {subscriber} panicked on item {item_id}: {info}")]
    Panicked {
        /// Subscriber name.
        subscriber: Arc<str>,
        /// Id of the item being delivered.
        item_id: i64,
        /// Panic payload, if it was a string.
        info: String,
    },
}

impl DeliveryError {
    /// Shorthand for [`DeliveryError::Rejected`].
    pub fn rejected(subscriber: &str, item_id: i64, reason: impl Into<String>) -> Self {
        DeliveryError::Rejected {
            subscriber: Arc::from(subscriber),
            item_id,
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            DeliveryError::Rejected { .. } => "delivery_rejected",
            DeliveryError::Panicked { .. } => "delivery_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DeliveryError::Rejected { reason, .. } => format!("rejected: {reason}"),
            DeliveryError::Panicked { info, .. } => format!("panicked: {info}"),
        }
    }

    /// Id of the item whose delivery failed.
    pub fn item_id(&self) -> i64 {
        match self {
            DeliveryError::Rejected { item_id, .. } | DeliveryError::Panicked { item_id, .. } => {
                *item_id
            }
        }
    }
}

/// # Errors produced when building a notifier.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Worker delivery was requested but no tokio runtime is available.
    #[error("worker delivery requires a tokio runtime: {0}")]
    RuntimeUnavailable(#[from] tokio::runtime::TryCurrentError),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::RuntimeUnavailable(_) => "config_runtime_unavailable",
        }
    }
}

/// Extracts a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
