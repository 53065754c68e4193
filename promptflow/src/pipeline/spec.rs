//! Pipeline specification and validation.

use crate::errors::ValidationError;
use crate::stage::StageDefinition;
use std::collections::HashSet;

/// An ordered sequence of stages sharing an accumulating binding set.
///
/// Declared order is execution order; there is no dynamic reordering and no
/// branching. Validation happens once at construction, so a held `Pipeline`
/// is always runnable.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    stages: Vec<StageDefinition>,
}

impl Pipeline {
    /// Creates a validated pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, the stage list is empty, any
    /// stage fails its own validation, two stages share an id, or a stage
    /// template references the id of itself or a later stage (stages may
    /// only consume outputs of strictly earlier stages).
    pub fn new(
        name: impl Into<String>,
        stages: Vec<StageDefinition>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(ValidationError::new(
                "pipeline name cannot be empty or whitespace-only",
            ));
        }
        if stages.is_empty() {
            return Err(ValidationError::new("pipeline must declare at least one stage"));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for stage in &stages {
            stage.validate()?;
            if !seen.insert(stage.id()) {
                return Err(ValidationError::new(format!(
                    "duplicate stage id '{}'",
                    stage.id()
                ))
                .with_stages(vec![stage.id().to_string()]));
            }
        }

        // A placeholder naming a stage id must point strictly backwards.
        let all_ids: HashSet<&str> = stages.iter().map(StageDefinition::id).collect();
        let mut earlier: HashSet<&str> = HashSet::new();
        for stage in &stages {
            for placeholder in stage.placeholders() {
                if all_ids.contains(placeholder.as_str()) && !earlier.contains(placeholder.as_str())
                {
                    return Err(ValidationError::new(format!(
                        "stage '{}' references '{{{placeholder}}}', which is not the output of an earlier stage",
                        stage.id()
                    ))
                    .with_stages(vec![stage.id().to_string(), placeholder]));
                }
            }
            earlier.insert(stage.id());
        }

        Ok(Self { name, stages })
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stages, in declared order.
    #[must_use]
    pub fn stages(&self) -> &[StageDefinition] {
        &self.stages
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns the id of the final stage, whose output is the externally
    /// surfaced answer.
    #[must_use]
    pub fn final_stage_id(&self) -> &str {
        // Non-empty by construction.
        self.stages.last().map(StageDefinition::id).unwrap_or_default()
    }
}
