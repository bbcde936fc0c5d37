//! BPMN structural checks.
//!
//! A textual containment check only: the document must open a BPMN
//! definitions element (`bpmn:`, `bpmn2:`, un-prefixed, or a prefix bound to
//! the BPMN model namespace) and close it with the same prefix. No XML
//! parsing is attempted.

use crate::result::Findings;
use crate::types::ArtifactKind;

use super::patterns::definitions_closing_tags;
use super::RuleCheck;

pub(crate) const INVALID_XML: &str = "BPMN XML is invalid: definitions element is missing or unclosed";

/// Checks that a BPMN model is wrapped in a definitions element.
#[derive(Debug, Default, Clone, Copy)]
pub struct BpmnRules;

impl RuleCheck for BpmnRules {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Bpmn
    }

    fn inspect(&self, content: &str, findings: &mut Findings) {
        let closed = definitions_closing_tags(content)
            .iter()
            .any(|closing| content.contains(closing.as_str()));

        if !closed {
            findings.error(INVALID_XML);
        }
    }
}
