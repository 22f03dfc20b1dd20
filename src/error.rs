//! Engine error types.
//!
//! Both variants are fatal setup errors surfaced before any generation runs.
//! An infeasible search result is deliberately NOT an error: the engine
//! reports it through the `feasible` flag on the run result instead.

use std::fmt;

use crate::validation::ValidationError;

/// A fatal setup error.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The domain description is unsatisfiable or structurally broken
    /// (dangling references, empty eligible sets, duplicate ids).
    InvalidDomainData(Vec<ValidationError>),
    /// A configuration option is out of its valid range.
    InvalidConfiguration(String),
}

impl EngineError {
    /// Convenience constructor for a single unsatisfiable-section error.
    pub fn unsatisfiable(message: impl Into<String>) -> Self {
        Self::InvalidDomainData(vec![ValidationError {
            kind: crate::validation::ValidationErrorKind::UnsatisfiableSection,
            message: message.into(),
        }])
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidDomainData(errors) => {
                write!(f, "invalid domain data: ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", e.message)?;
                }
                Ok(())
            }
            EngineError::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {msg}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_display_configuration() {
        let e = EngineError::InvalidConfiguration("population size must be > 0".into());
        assert_eq!(
            e.to_string(),
            "invalid configuration: population size must be > 0"
        );
    }

    #[test]
    fn test_display_domain_joins_messages() {
        let e = EngineError::InvalidDomainData(vec![
            ValidationError {
                kind: ValidationErrorKind::DuplicateId,
                message: "Duplicate room id: R1".into(),
            },
            ValidationError {
                kind: ValidationErrorKind::EmptyInstructorPool,
                message: "Section 'S1' has no eligible instructors".into(),
            },
        ]);
        let s = e.to_string();
        assert!(s.contains("Duplicate room id"));
        assert!(s.contains("; "));
    }
}
