use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::Schema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GroupAlignmentScore {
    /// Name of the skill group being evaluated
    pub group_name: String,
    /// List of requirements that the resume explicitly meets for this skill group.
    #[serde(default)]
    pub satisfied_requirements: Vec<String>,
    /// List of requirements that the resume does not meet or where evidence is
    /// insufficient for this skill group.
    #[serde(default)]
    pub unsatisfied_requirements: Vec<String>,
}

/// Decode target of the batched alignment call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AlignmentBatch {
    /// List of alignment scores for all skill groups
    pub alignment_scores: Vec<GroupAlignmentScore>,
}

impl Schema for AlignmentBatch {
    const NAME: &'static str = "AlignmentBatch";
}

/// Satisfied/unsatisfied partition of one group's requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GroupAlignment {
    pub satisfied_requirements: Vec<String>,
    pub unsatisfied_requirements: Vec<String>,
}

/// Per-group partitions keyed by `group_name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AlignmentResult(pub BTreeMap<String, GroupAlignment>);

impl AlignmentResult {
    pub fn get(&self, group_name: &str) -> Option<&GroupAlignment> {
        self.0.get(group_name)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&String, &GroupAlignment)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Schema for AlignmentResult {
    const NAME: &'static str = "AlignmentResult";
}
