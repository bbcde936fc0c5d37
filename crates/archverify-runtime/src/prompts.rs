//! Prompts for model-assisted analysis.
//!
//! Prompts carry an artifact body between `---` delimiters after a fixed
//! instruction block. Bodies are truncated by the caller, never here.

use archverify_core::ArtifactKind;

/// Instruction appended to every single-artifact prompt.
pub const SINGLE_INSTRUCTIONS: &str = "Return JSON with the keys errors, warnings, suggestions. \
If there are no errors and no warnings, you must add at least 3 practical recommendations.";

/// Instruction block for the joint prompt, including the expected shape.
pub const JOINT_INSTRUCTIONS: &str = r#"Analyze the BPMN, OpenAPI and PUML artifacts together. Identify errors, warnings, recommendations and inconsistencies between the artifacts.
If there are no errors and no warnings, you must return at least 3 meaningful recommendations for improvement.

Return JSON in this format:
{
  "openapi": { "errors": [], "warnings": [], "suggestions": [], "status": "ok|warning|error", "summary": "..." },
  "bpmn": { "errors": [], "warnings": [], "suggestions": [], "status": "ok|warning|error", "summary": "..." }
}
"#;

/// Scope line that opens a single-artifact prompt.
pub fn scope_line(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::OpenApi => "Analyze only the OpenAPI specification.",
        ArtifactKind::Bpmn => "Analyze only the BPMN model.",
        ArtifactKind::Puml => "Analyze only the PUML diagram.",
    }
}

/// Prompt for analyzing one artifact on its own.
pub fn single_artifact_prompt(kind: ArtifactKind, body: &str) -> String {
    format!(
        "{}\n{}\n\n---\n\n{}\n---\n",
        scope_line(kind),
        SINGLE_INSTRUCTIONS,
        body
    )
}

/// Prompt for analyzing all artifacts in one call.
pub fn joint_prompt(bpmn: &str, openapi: &str, puml: &str) -> String {
    let mut prompt = String::with_capacity(
        JOINT_INSTRUCTIONS.len() + bpmn.len() + openapi.len() + puml.len() + 64,
    );
    prompt.push_str(JOINT_INSTRUCTIONS);
    prompt.push('\n');
    for (label, body) in [("BPMN", bpmn), ("OpenAPI", openapi), ("PUML", puml)] {
        prompt.push_str(label);
        prompt.push_str(":\n---\n");
        prompt.push_str(body);
        prompt.push_str("\n---\n\n");
    }
    prompt
}
