//! Stage definitions.
//!
//! A stage is one step of a pipeline: a system instruction and a user
//! instruction template, both rendered against the run's current bindings
//! and sent as a single completion request. Definitions are declarative and
//! immutable once constructed; stage behavior never varies beyond
//! instruction text and ordering.

use crate::errors::ValidationError;
use crate::template;

/// A declarative description of one pipeline step.
#[derive(Debug, Clone)]
pub struct StageDefinition {
    id: String,
    system_instruction: String,
    user_template: String,
    expected_output: String,
}

impl StageDefinition {
    /// Creates a new stage definition.
    ///
    /// The id doubles as the binding name later stages use to reference this
    /// stage's output, so it must be identifier-shaped (see
    /// [`StageDefinition::validate`]).
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        system_instruction: impl Into<String>,
        user_template: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            system_instruction: system_instruction.into(),
            user_template: user_template.into(),
            expected_output: String::new(),
        }
    }

    /// Sets the expected-output contract.
    ///
    /// This is documentation for operators and instruction authors; it is
    /// not enforced at runtime.
    #[must_use]
    pub fn with_expected_output(mut self, expected_output: impl Into<String>) -> Self {
        self.expected_output = expected_output.into();
        self
    }

    /// Returns the stage id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the system instruction template.
    #[must_use]
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Returns the user instruction template.
    #[must_use]
    pub fn user_template(&self) -> &str {
        &self.user_template
    }

    /// Returns the expected-output contract.
    #[must_use]
    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    /// Returns the placeholder names referenced by either template, in
    /// order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<String> {
        let mut names = template::placeholders(&self.system_instruction);
        for name in template::placeholders(&self.user_template) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Validates the stage definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or not identifier-shaped.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::new("stage id cannot be empty"));
        }
        if !is_identifier(&self.id) {
            return Err(ValidationError::new(format!(
                "stage id '{}' must be identifier-shaped so later stages can reference it",
                self.id
            ))
            .with_stages(vec![self.id.clone()]));
        }
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_definition_creation() {
        let stage = StageDefinition::new("structure", "You are an editor.", "Improve: {user_prompt}")
            .with_expected_output("A rewritten prompt.");

        assert_eq!(stage.id(), "structure");
        assert_eq!(stage.system_instruction(), "You are an editor.");
        assert_eq!(stage.user_template(), "Improve: {user_prompt}");
        assert_eq!(stage.expected_output(), "A rewritten prompt.");
    }

    #[test]
    fn test_placeholders_cover_both_templates() {
        let stage = StageDefinition::new(
            "optimize",
            "You optimize prompts for {target_model}.",
            "Optimize for {target_model}:\n\n{structure}",
        );

        assert_eq!(
            stage.placeholders(),
            vec!["target_model".to_string(), "structure".to_string()]
        );
    }

    #[test]
    fn test_validate_accepts_identifier_ids() {
        assert!(StageDefinition::new("stage_1", "", "").validate().is_ok());
        assert!(StageDefinition::new("_private", "", "").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_id() {
        assert!(StageDefinition::new("", "", "").validate().is_err());
        assert!(StageDefinition::new("   ", "", "").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_identifier_id() {
        assert!(StageDefinition::new("has space", "", "").validate().is_err());
        assert!(StageDefinition::new("1leading", "", "").validate().is_err());
        assert!(StageDefinition::new("dash-ed", "", "").validate().is_err());
    }
}
