//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of the plugin environment (the loader handles syntax)
//! - Validate value ranges (ports > 0, min <= max)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PluginEnvironment → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::PluginEnvironment;

/// A single semantic problem with the plugin environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{present} is set but {missing} is not")]
    IncompletePortRange {
        present: &'static str,
        missing: &'static str,
    },

    #[error("{0} must be greater than zero")]
    ZeroPort(&'static str),

    #[error("port range is empty: min {min} > max {max}")]
    InvertedPortRange { min: u16, max: u16 },
}

/// Validate a loaded plugin environment.
pub fn validate_environment(env: &PluginEnvironment) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match (env.min_port, env.max_port) {
        (Some(_), None) => errors.push(ValidationError::IncompletePortRange {
            present: "PLUGIN_MIN_PORT",
            missing: "PLUGIN_MAX_PORT",
        }),
        (None, Some(_)) => errors.push(ValidationError::IncompletePortRange {
            present: "PLUGIN_MAX_PORT",
            missing: "PLUGIN_MIN_PORT",
        }),
        (Some(min), Some(max)) => {
            if min == 0 {
                errors.push(ValidationError::ZeroPort("PLUGIN_MIN_PORT"));
            }
            if max == 0 {
                errors.push(ValidationError::ZeroPort("PLUGIN_MAX_PORT"));
            }
            if min > max {
                errors.push(ValidationError::InvertedPortRange { min, max });
            }
        }
        (None, None) => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
