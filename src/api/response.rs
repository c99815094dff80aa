//! Write outcomes

use crate::validation::ValidationDetails;

/// Result of a (batched) field write
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WriteReport {
    /// Paths whose values were forwarded to the store
    pub applied: Vec<String>,
    /// Paths whose values were rejected as a whole and not written
    pub rejected: Vec<String>,
    /// Optional entries dropped from written values
    pub warnings: Vec<ValidationDetails>,
}

impl WriteReport {
    /// True if every value was written without pruning
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty() && self.warnings.is_empty()
    }

    pub fn has_writes(&self) -> bool {
        !self.applied.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness() {
        let mut report = WriteReport::default();
        assert!(report.is_complete());
        assert!(!report.has_writes());

        report.applied.push("name".into());
        assert!(report.is_complete());

        report.warnings.push(ValidationDetails::unknown_field("name.extra"));
        assert!(!report.is_complete());
    }
}
