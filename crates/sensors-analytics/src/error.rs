// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the analytics SDK.

use sensors_analytics_core::ValidationError;
use thiserror::Error;

/// Analytics SDK errors.
#[derive(Debug, Error)]
pub enum AnalyticsError {
	/// The record failed structural validation.
	#[error("record validation failed: {0}")]
	Validation(#[from] ValidationError),

	/// The client was built without a consumer.
	#[error("no consumer configured")]
	MissingConsumer,

	/// Client or consumer has been shut down.
	#[error("client has been shut down")]
	ClientShutdown,

	/// The consumer's queue is full.
	#[error("consumer queue is full")]
	QueueFull,

	/// Serialization error.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// Delivery failure reported by a consumer implementation.
	#[error("consumer error: {0}")]
	Consumer(String),
}

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validation_error_is_wrapped_verbatim() {
		let inner = ValidationError::Empty {
			field: "distinct_id",
		};
		let err = AnalyticsError::from(inner.clone());
		match err {
			AnalyticsError::Validation(e) => assert_eq!(e, inner),
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn test_display_messages() {
		assert_eq!(
			AnalyticsError::ClientShutdown.to_string(),
			"client has been shut down"
		);
		assert_eq!(
			AnalyticsError::Consumer("connection reset".to_string()).to_string(),
			"consumer error: connection reset"
		);
	}
}
