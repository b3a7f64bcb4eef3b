//! Error types for sampling, scoring, and recipe translation

use thiserror::Error;

/// Error category, used by transports to pick a status class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed request, rejected before any geometric work
    Validation,
    /// Geometrically valid request that cannot satisfy its constraints
    Constraint,
    /// Unexpected failure during strategy execution
    Internal,
}

impl ErrorCategory {
    /// Stable wire identifier for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "VALIDATION_ERROR",
            ErrorCategory::Constraint => "CONSTRAINT_ERROR",
            ErrorCategory::Internal => "INTERNAL_ERROR",
        }
    }
}

/// Stable error codes for sampling failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UnknownStrategy,
    DisallowedStrategy,
    InvalidWaferSpec,
    InvalidConstraints,
    InvalidStrategyConfig,
    CannotMeetMinPoints,
    StrategyExecutionFailed,
}

impl ErrorCode {
    /// Stable wire identifier for this code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownStrategy => "UNKNOWN_STRATEGY",
            ErrorCode::DisallowedStrategy => "DISALLOWED_STRATEGY",
            ErrorCode::InvalidWaferSpec => "INVALID_WAFER_SPEC",
            ErrorCode::InvalidConstraints => "INVALID_CONSTRAINTS",
            ErrorCode::InvalidStrategyConfig => "INVALID_STRATEGY_CONFIG",
            ErrorCode::CannotMeetMinPoints => "CANNOT_MEET_MIN_POINTS",
            ErrorCode::StrategyExecutionFailed => "STRATEGY_EXECUTION_FAILED",
        }
    }
}

/// Errors that can occur while selecting sampling points
#[derive(Debug, Error)]
pub enum SamplingError {
    /// Strategy identifier is not present in the registry
    #[error("unknown strategy '{id}' (registered strategies: {})", registered.join(", "))]
    UnknownStrategy { id: String, registered: Vec<String> },

    /// Strategy is registered but excluded by the process allow-list
    #[error("strategy '{id}' is not allowed for this process context (allowed strategies: {})", allowed.join(", "))]
    DisallowedStrategy { id: String, allowed: Vec<String> },

    /// Wafer geometry fails positivity checks
    #[error("invalid wafer spec: {reason}")]
    InvalidWaferSpec { reason: String },

    /// Process or tool constraints are out of order
    #[error("invalid constraints: {reason}")]
    InvalidConstraints { reason: String },

    /// Common or advanced strategy configuration fails schema validation
    #[error("invalid strategy config for {strategy_id}: {reason}")]
    InvalidStrategyConfig { strategy_id: String, reason: String },

    /// Too few valid dies remain after masking to satisfy the minimum
    #[error("cannot meet min_sampling_points requirement: need {required} points, but only {available} valid dies available after filtering")]
    CannotMeetMinPoints { required: usize, available: usize },

    /// Unexpected failure inside a strategy
    #[error("strategy execution failed: {reason}")]
    StrategyExecutionFailed { reason: String },
}

impl SamplingError {
    /// Create an invalid wafer spec error
    pub fn invalid_wafer_spec(reason: impl Into<String>) -> Self {
        Self::InvalidWaferSpec {
            reason: reason.into(),
        }
    }

    /// Create an invalid constraints error
    pub fn invalid_constraints(reason: impl Into<String>) -> Self {
        Self::InvalidConstraints {
            reason: reason.into(),
        }
    }

    /// Create an invalid strategy config error
    pub fn invalid_config(strategy_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStrategyConfig {
            strategy_id: strategy_id.into(),
            reason: reason.into(),
        }
    }

    /// Stable code for transport mapping
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownStrategy { .. } => ErrorCode::UnknownStrategy,
            Self::DisallowedStrategy { .. } => ErrorCode::DisallowedStrategy,
            Self::InvalidWaferSpec { .. } => ErrorCode::InvalidWaferSpec,
            Self::InvalidConstraints { .. } => ErrorCode::InvalidConstraints,
            Self::InvalidStrategyConfig { .. } => ErrorCode::InvalidStrategyConfig,
            Self::CannotMeetMinPoints { .. } => ErrorCode::CannotMeetMinPoints,
            Self::StrategyExecutionFailed { .. } => ErrorCode::StrategyExecutionFailed,
        }
    }

    /// Category for status-class mapping
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownStrategy { .. }
            | Self::DisallowedStrategy { .. }
            | Self::InvalidWaferSpec { .. }
            | Self::InvalidConstraints { .. }
            | Self::InvalidStrategyConfig { .. } => ErrorCategory::Validation,
            Self::CannotMeetMinPoints { .. } => ErrorCategory::Constraint,
            Self::StrategyExecutionFailed { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cannot_meet_min_points_message_names_both_counts() {
        let err = SamplingError::CannotMeetMinPoints {
            required: 5,
            available: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("need 5 points"));
        assert!(msg.contains("only 2 valid dies"));
    }

    #[test]
    fn test_categories() {
        let err = SamplingError::invalid_wafer_spec("wafer_size_mm must be positive");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.code(), ErrorCode::InvalidWaferSpec);

        let err = SamplingError::CannotMeetMinPoints {
            required: 3,
            available: 0,
        };
        assert_eq!(err.category(), ErrorCategory::Constraint);
        assert_eq!(err.code().as_str(), "CANNOT_MEET_MIN_POINTS");
    }

    #[test]
    fn test_unknown_strategy_lists_registered() {
        let err = SamplingError::UnknownStrategy {
            id: "SPIRAL".to_string(),
            registered: vec!["CENTER_EDGE".to_string(), "EDGE_ONLY".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("SPIRAL"));
        assert!(msg.contains("CENTER_EDGE"));
    }
}
