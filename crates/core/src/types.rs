use serde::{Deserialize, Serialize};

// The is_powershell flag selects the interpreter the runner hands the
// command text to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub command: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_powershell: bool,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
            is_powershell: false,
        }
    }

    pub fn powershell(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
            is_powershell: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    // Stdout followed by stderr, trimmed.
    pub fn combined_output(&self) -> String {
        format!("{}{}", self.stdout, self.stderr).trim().to_string()
    }

    // Manufactured by the runner when a process cannot be spawned or runs
    // past its timeout.
    pub fn synthetic_failure(stderr: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

// Normalized result of interpreting a model reply or a shortcut rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionDescriptor {
    Command {
        summary: Option<String>,
        directory_change_path: Option<String>,
        commands: Vec<CommandSpec>,
    },
    Clarification {
        question: String,
    },
    // Commands here never run without an explicit approve signal through
    // the confirmation gate.
    Confirmation {
        prompt: String,
        summary: Option<String>,
        directory_change_path: Option<String>,
        commands: Vec<CommandSpec>,
    },
    DataGathering {
        commands: Vec<CommandSpec>,
    },
}

impl ActionDescriptor {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ActionDescriptor::Command { .. } => "command",
            ActionDescriptor::Clarification { .. } => "clarification",
            ActionDescriptor::Confirmation { .. } => "confirmation",
            ActionDescriptor::DataGathering { .. } => "data_gathering",
        }
    }
}
