//! Error handling module for the reposter application

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Process exit status for a run that published a clip
pub const EXIT_PUBLISHED: i32 = 0;

/// Process exit status for an unexpected failure
pub const EXIT_FAILURE: i32 = 1;

/// Process exit status for missing or invalid configuration
pub const EXIT_CONFIG: i32 = 2;

/// Process exit status for a run that completed without publishing
pub const EXIT_NOTHING_PUBLISHED: i32 = 3;

/// Main error type for application operations
#[derive(Error, Debug)]
pub enum ReposterError {
    /// Required setting or credential is absent
    #[error("Missing configuration: {}", .names.join(", "))]
    MissingConfiguration { names: Vec<String> },

    /// A setting is present but unusable
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Configuration file could not be read or parsed
    #[error("Failed to load config file {path}: {message}")]
    ConfigFile { path: String, message: String },

    /// Required external executable is not installed
    #[error("Required tool not found on PATH: {tool}")]
    MissingTool { tool: String },

    /// Pipeline aborted on a defect
    #[error("Run failed: {0}")]
    Pipeline(#[from] DomainError),
}

impl ReposterError {
    /// Exit status reported to the shell
    pub fn exit_code(&self) -> i32 {
        match self {
            ReposterError::MissingConfiguration { .. }
            | ReposterError::InvalidConfiguration { .. }
            | ReposterError::ConfigFile { .. }
            | ReposterError::MissingTool { .. } => EXIT_CONFIG,
            ReposterError::Pipeline(_) => EXIT_FAILURE,
        }
    }
}

/// Result type alias for application operations
pub type ReposterResult<T> = std::result::Result<T, ReposterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let missing = ReposterError::MissingConfiguration {
            names: vec!["YT_API_KEY".to_string(), "FB_PAGE_ID".to_string()],
        };
        assert_eq!(missing.exit_code(), EXIT_CONFIG);
        assert_eq!(missing.to_string(), "Missing configuration: YT_API_KEY, FB_PAGE_ID");

        let defect = ReposterError::from(DomainError::FsFail("disk full".to_string()));
        assert_eq!(defect.exit_code(), EXIT_FAILURE);

        let codes = [EXIT_PUBLISHED, EXIT_FAILURE, EXIT_CONFIG, EXIT_NOTHING_PUBLISHED];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
