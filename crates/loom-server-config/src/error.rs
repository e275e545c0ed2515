// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration error types.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("Failed to parse TOML config at {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Validation error: {0}")]
	Validation(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_invalid_value_display() {
		let err = ConfigError::InvalidValue {
			key: "LOOM_SERVER_PORT".to_string(),
			message: "invalid u16 value 'abc'".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"Invalid value for LOOM_SERVER_PORT: invalid u16 value 'abc'"
		);
	}
}
