// The model is asked for raw JSON but routinely wraps it in markdown code
// fences; those are stripped before decoding. Nothing else is repaired: a
// malformed payload is reported upward with the raw text intact.

use crate::types::{ActionDescriptor, CommandSpec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unrecognized response_type: {0}")]
    UnknownKind(String),
}

// The JSON shape the model produces and the shortcut table mimics.
#[derive(Debug, Default, Serialize, Deserialize)]
struct WireResponse {
    response_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    directory_change_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    commands: Vec<CommandSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clarification_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confirmation_prompt: Option<String>,
}

pub fn strip_fences(raw: &str) -> String {
    raw.trim().replace("```json", "").replace("```", "").trim().to_string()
}

pub fn parse(raw: &str) -> Result<ActionDescriptor, ParseError> {
    let cleaned = strip_fences(raw);
    let wire: WireResponse = serde_json::from_str(&cleaned)?;

    match wire.response_type.as_str() {
        "command" => Ok(ActionDescriptor::Command {
            summary: wire.summary,
            directory_change_path: wire.directory_change_path,
            commands: wire.commands,
        }),
        "clarification" => Ok(ActionDescriptor::Clarification {
            question: wire
                .clarification_question
                .unwrap_or_else(|| "I need more information.".to_string()),
        }),
        "confirmation" => Ok(ActionDescriptor::Confirmation {
            prompt: wire
                .confirmation_prompt
                .unwrap_or_else(|| "Are you sure you want to proceed?".to_string()),
            summary: wire.summary,
            directory_change_path: wire.directory_change_path,
            commands: wire.commands,
        }),
        "data_gathering" => Ok(ActionDescriptor::DataGathering {
            commands: wire.commands,
        }),
        other => Err(ParseError::UnknownKind(other.to_string())),
    }
}

impl ActionDescriptor {
    // Back to the wire shape, so a shortcut-produced descriptor enters the
    // transcript the same way a raw model reply does.
    pub fn to_wire_json(&self) -> String {
        let wire = match self.clone() {
            ActionDescriptor::Command {
                summary,
                directory_change_path,
                commands,
            } => WireResponse {
                response_type: "command".into(),
                summary,
                directory_change_path,
                commands,
                ..Default::default()
            },
            ActionDescriptor::Clarification { question } => WireResponse {
                response_type: "clarification".into(),
                clarification_question: Some(question),
                ..Default::default()
            },
            ActionDescriptor::Confirmation {
                prompt,
                summary,
                directory_change_path,
                commands,
            } => WireResponse {
                response_type: "confirmation".into(),
                confirmation_prompt: Some(prompt),
                summary,
                directory_change_path,
                commands,
                ..Default::default()
            },
            ActionDescriptor::DataGathering { commands } => WireResponse {
                response_type: "data_gathering".into(),
                commands,
                ..Default::default()
            },
        };
        serde_json::to_string(&wire).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMMAND_REPLY: &str = r#"{
        "response_type": "command",
        "summary": "Generates a battery report.",
        "directory_change_path": "%USERPROFILE%\\battery-report.html",
        "commands": [
            {"command": "powercfg /batteryreport", "description": "Battery report.", "is_powershell": false}
        ]
    }"#;

    #[test]
    fn fenced_and_unfenced_parse_identically() {
        let fenced = format!("```json\n{}\n```", COMMAND_REPLY);
        let plain = parse(COMMAND_REPLY).unwrap();
        let stripped = parse(&fenced).unwrap();
        assert_eq!(plain, stripped);
    }

    #[test]
    fn command_fields_round_trip() {
        let descriptor = parse(COMMAND_REPLY).unwrap();
        match &descriptor {
            ActionDescriptor::Command {
                summary,
                directory_change_path,
                commands,
            } => {
                assert_eq!(summary.as_deref(), Some("Generates a battery report."));
                assert!(directory_change_path.is_some());
                assert_eq!(commands.len(), 1);
                assert_eq!(commands[0].command, "powercfg /batteryreport");
                assert!(!commands[0].is_powershell);
            }
            other => panic!("expected command descriptor, got {}", other.kind_name()),
        }

        let reparsed = parse(&descriptor.to_wire_json()).unwrap();
        assert_eq!(reparsed, descriptor);
    }

    #[test]
    fn unknown_kind_is_an_error_not_a_default() {
        let raw = r#"{"response_type": "hallucinated_kind"}"#;
        match parse(raw) {
            Err(ParseError::UnknownKind(kind)) => assert_eq!(kind, "hallucinated_kind"),
            other => panic!("expected UnknownKind, got {:?}", other),
        }
    }

    #[test]
    fn missing_kind_is_a_json_error() {
        assert!(matches!(
            parse(r#"{"summary": "no kind here"}"#),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn non_json_is_rejected() {
        assert!(parse("I'm sorry, I can't help with that.").is_err());
    }

    #[test]
    fn clarification_question_defaults_when_absent() {
        let descriptor = parse(r#"{"response_type": "clarification"}"#).unwrap();
        match descriptor {
            ActionDescriptor::Clarification { question } => {
                assert_eq!(question, "I need more information.");
            }
            _ => panic!("expected clarification"),
        }
    }

    #[test]
    fn confirmation_keeps_embedded_commands() {
        let raw = r#"{
            "response_type": "confirmation",
            "confirmation_prompt": "Proceed?",
            "commands": [{"command": "echo hi", "description": "", "is_powershell": false}]
        }"#;
        match parse(raw).unwrap() {
            ActionDescriptor::Confirmation { prompt, commands, .. } => {
                assert_eq!(prompt, "Proceed?");
                assert_eq!(commands.len(), 1);
            }
            _ => panic!("expected confirmation"),
        }
    }
}
