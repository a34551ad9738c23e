//! Sequential audit step recording shared by the tax calculators.

use crate::models::AuditStep;

/// Collects [`AuditStep`]s, numbering them in the order they are recorded.
#[derive(Debug, Clone)]
pub(crate) struct AuditLog {
    reference: Option<String>,
    steps: Vec<AuditStep>,
}

impl AuditLog {
    /// Creates a log whose steps all cite `reference` (usually the rule-set
    /// label).
    pub(crate) fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            steps: Vec::new(),
        }
    }

    pub(crate) fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            reference: self.reference.clone(),
            input,
            output,
            reasoning,
        });
    }

    pub(crate) fn into_steps(self) -> Vec<AuditStep> {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_numbered_sequentially() {
        let mut log = AuditLog::new("Old Regime");
        log.record(
            "first",
            "First",
            serde_json::json!({}),
            serde_json::json!({}),
            "one".to_string(),
        );
        log.record(
            "second",
            "Second",
            serde_json::json!({}),
            serde_json::json!({}),
            "two".to_string(),
        );

        let steps = log.into_steps();
        let numbers: Vec<u32> = steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(steps[1].reference.as_deref(), Some("Old Regime"));
    }
}
