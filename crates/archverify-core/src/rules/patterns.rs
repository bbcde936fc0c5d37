//! Shared detection patterns for rule checks.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Opening tag of any definitions element, with its namespace prefix
    /// captured as `prefix`. See [`is_bpmn_prefix`] for which ones count.
    pub static ref DEFINITIONS_OPEN: Regex = Regex::new(
        r"<(?:(?P<prefix>[A-Za-z_][\w.-]*):)?definitions[\s/>]"
    ).unwrap();
}

/// BPMN 2.0 model namespace.
pub const BPMN_MODEL_NS: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";

/// PlantUML diagram start marker.
pub const STARTUML: &str = "@startuml";

/// `bpmn` and `bpmn2` always count; any other prefix only when `content`
/// binds it to [`BPMN_MODEL_NS`].
pub fn is_bpmn_prefix(content: &str, prefix: &str) -> bool {
    if prefix == "bpmn" || prefix == "bpmn2" {
        return true;
    }
    let binding = format!("xmlns:{}=", prefix);
    content.match_indices(&binding).any(|(at, _)| {
        let value = content[at + binding.len()..].trim_start_matches(['"', '\'']);
        value.starts_with(BPMN_MODEL_NS)
    })
}

/// Closing tags matching every BPMN definitions opening tag in `content`.
/// Definitions elements of other vocabularies (`wsdl:`, ...) are skipped.
pub fn definitions_closing_tags(content: &str) -> Vec<String> {
    DEFINITIONS_OPEN
        .captures_iter(content)
        .filter(|caps| {
            caps.name("prefix")
                .map_or(true, |prefix| is_bpmn_prefix(content, prefix.as_str()))
        })
        .map(|caps| match caps.name("prefix") {
            Some(prefix) => format!("</{}:definitions", prefix.as_str()),
            None => "</definitions".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_definitions() {
        let tags = definitions_closing_tags(r#"<bpmn:definitions xmlns:bpmn="x">"#);
        assert_eq!(tags, vec!["</bpmn:definitions"]);
    }

    #[test]
    fn test_unprefixed_definitions() {
        assert_eq!(definitions_closing_tags("<definitions>"), vec!["</definitions"]);
    }

    #[test]
    fn test_foreign_definitions_skipped() {
        let wsdl = r#"<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"></wsdl:definitions>"#;
        assert!(definitions_closing_tags(wsdl).is_empty());
    }

    #[test]
    fn test_prefix_bound_to_bpmn_namespace() {
        let xml = format!(r#"<semantic:definitions xmlns:semantic="{}">"#, BPMN_MODEL_NS);
        assert_eq!(definitions_closing_tags(&xml), vec!["</semantic:definitions"]);
        assert!(is_bpmn_prefix(&xml, "bpmn2"));
        assert!(!is_bpmn_prefix(&xml, "wsdl"));
    }

    #[test]
    fn test_other_elements_ignored() {
        assert!(definitions_closing_tags("<bpmn:process/>").is_empty());
        assert!(definitions_closing_tags("<bpmn:definitionsX>").is_empty());
    }
}
