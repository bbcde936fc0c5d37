//! PlantUML checks.
//!
//! PUML is auxiliary, so a missing diagram is a warning rather than an error.

use crate::result::Findings;
use crate::types::ArtifactKind;

use super::patterns::STARTUML;
use super::RuleCheck;

pub(crate) const NOT_FOUND: &str = "No PUML diagram found: @startuml marker is missing";

#[derive(Debug, Default, Clone, Copy)]
pub struct PumlRules;

impl RuleCheck for PumlRules {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Puml
    }

    fn inspect(&self, content: &str, findings: &mut Findings) {
        if !content.contains(STARTUML) {
            findings.warning(NOT_FOUND);
        }
    }
}
