//! Core types for artifact verification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of artifact the pipeline knows how to verify.
///
/// Ordering is significant: maps keyed by kind iterate OpenAPI, BPMN, PUML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// OpenAPI specification (JSON)
    OpenApi,

    /// BPMN process model (XML)
    Bpmn,

    /// PlantUML diagram
    Puml,
}

impl ArtifactKind {
    /// All kinds, in report order.
    pub const ALL: [ArtifactKind; 3] = [ArtifactKind::OpenApi, ArtifactKind::Bpmn, ArtifactKind::Puml];

    /// Stable identifier used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::OpenApi => "openapi",
            ArtifactKind::Bpmn => "bpmn",
            ArtifactKind::Puml => "puml",
        }
    }

    /// Human-facing name used in prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            ArtifactKind::OpenApi => "OpenAPI specification",
            ArtifactKind::Bpmn => "BPMN model",
            ArtifactKind::Puml => "PlantUML diagram",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openapi" => Ok(ArtifactKind::OpenApi),
            "bpmn" => Ok(ArtifactKind::Bpmn),
            "puml" | "plantuml" => Ok(ArtifactKind::Puml),
            other => Err(format!("unknown artifact kind: '{}'", other)),
        }
    }
}

/// Analysis strategy selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// One combined judgment across all artifacts, degrading to `Split`.
    #[default]
    Joint,

    /// Each artifact analyzed on its own.
    Split,
}

impl Profile {
    /// Interpret a free-form profile name.
    ///
    /// `joint` and `legacy` select the joint strategy; anything else is split.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "joint" | "legacy" => Profile::Joint,
            _ => Profile::Split,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Joint => f.write_str("joint"),
            Profile::Split => f.write_str("split"),
        }
    }
}

/// The artifact bodies supplied for one analysis request.
///
/// Any artifact may be absent; absent artifacts are analyzed as empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    pub openapi: Option<String>,
    pub bpmn: Option<String>,
    pub puml: Option<String>,
}

impl Artifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_openapi(mut self, content: impl Into<String>) -> Self {
        self.openapi = Some(content.into());
        self
    }

    pub fn with_bpmn(mut self, content: impl Into<String>) -> Self {
        self.bpmn = Some(content.into());
        self
    }

    pub fn with_puml(mut self, content: impl Into<String>) -> Self {
        self.puml = Some(content.into());
        self
    }

    /// Whether an artifact of this kind was supplied at all.
    pub fn has(&self, kind: ArtifactKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Content for a kind, or the empty string when absent.
    pub fn content(&self, kind: ArtifactKind) -> &str {
        self.slot(kind).map(String::as_str).unwrap_or("")
    }

    fn slot(&self, kind: ArtifactKind) -> Option<&String> {
        match kind {
            ArtifactKind::OpenApi => self.openapi.as_ref(),
            ArtifactKind::Bpmn => self.bpmn.as_ref(),
            ArtifactKind::Puml => self.puml.as_ref(),
        }
    }
}

/// Return at most `max_chars` characters from the start of `content`.
///
/// Counts Unicode scalar values, so a multi-byte character is never split.
pub fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ArtifactKind::OpenApi).unwrap(), "\"openapi\"");
        assert_eq!(serde_json::to_string(&ArtifactKind::Puml).unwrap(), "\"puml\"");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("OpenAPI".parse::<ArtifactKind>().unwrap(), ArtifactKind::OpenApi);
        assert_eq!("plantuml".parse::<ArtifactKind>().unwrap(), ArtifactKind::Puml);
        assert!("wsdl".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn test_profile_from_name() {
        assert_eq!(Profile::from_name("legacy"), Profile::Joint);
        assert_eq!(Profile::from_name("JOINT"), Profile::Joint);
        assert_eq!(Profile::from_name("split"), Profile::Split);
        assert_eq!(Profile::from_name("anything"), Profile::Split);
    }

    #[test]
    fn test_absent_artifact_reads_as_empty() {
        let artifacts = Artifacts::new().with_openapi("{}");
        assert!(artifacts.has(ArtifactKind::OpenApi));
        assert!(!artifacts.has(ArtifactKind::Bpmn));
        assert_eq!(artifacts.content(ArtifactKind::Bpmn), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("ошибка", 3), "оши");
        assert_eq!(truncate_chars("", 5), "");
    }
}
