// Per-turn pipeline: shortcut lookup or model call, parse, then dispatch
// by kind. Nothing here is fatal; every failure mode degrades to a
// displayed message and the orchestrator is ready for the next turn.

use crate::channel::{CommandRunner, ModelChannel, DEFAULT_COMMAND_TIMEOUT};
use crate::correction::CorrectionLoop;
use crate::parser;
use crate::shortcuts::ShortcutTable;
use crate::transcript::Transcript;
use crate::types::{ActionDescriptor, CommandSpec};
use flum_policy::{ConfirmationGate, GateOutcome};
use flum_interfaces::Frontend;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

// One orchestrator per conversation. Nothing is shared across
// conversations.
pub struct Orchestrator {
    channel: Arc<dyn ModelChannel>,
    runner: Arc<dyn CommandRunner>,
    frontend: Arc<dyn Frontend>,
    shortcuts: ShortcutTable,
    transcript: Transcript,
    command_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        channel: Arc<dyn ModelChannel>,
        runner: Arc<dyn CommandRunner>,
        frontend: Arc<dyn Frontend>,
    ) -> Self {
        Self::with_shortcuts(channel, runner, frontend, ShortcutTable::with_default_catalog())
    }

    pub fn with_shortcuts(
        channel: Arc<dyn ModelChannel>,
        runner: Arc<dyn CommandRunner>,
        frontend: Arc<dyn Frontend>,
        shortcuts: ShortcutTable,
    ) -> Self {
        Self {
            channel,
            runner,
            frontend,
            shortcuts,
            transcript: Transcript::new(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn set_command_timeout(&mut self, timeout: Duration) {
        self.command_timeout = timeout;
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub async fn handle_turn(&mut self, user_prompt: &str) {
        let raw_reply = if let Some(descriptor) = self.shortcuts.lookup(user_prompt) {
            info!(kind = descriptor.kind_name(), "shortcut match, skipping model call");
            descriptor.to_wire_json()
        } else {
            self.frontend.show_status("Thinking...").await;
            match self.channel.send(user_prompt, self.transcript.turns()).await {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(%err, "model call failed");
                    self.frontend.show_message(&err.to_string()).await;
                    return;
                }
            }
        };

        self.process_reply(user_prompt, raw_reply).await;
    }

    // A data_gathering reply chains into another model round-trip and
    // re-enters here at the parse step.
    async fn process_reply(&mut self, user_prompt: &str, raw_reply: String) {
        let mut prompt = user_prompt.to_string();
        let mut raw = raw_reply;

        loop {
            let descriptor = match parser::parse(&raw) {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    // Shown verbatim so the user (or a developer) can see
                    // exactly what the model produced.
                    warn!(%err, "undecodable reply");
                    self.frontend
                        .show_message(&format!("Failed to decode model response:\n{raw}"))
                        .await;
                    return;
                }
            };

            self.transcript.push_user(prompt.as_str());
            self.transcript.push_model(parser::strip_fences(&raw));
            debug!(kind = descriptor.kind_name(), "dispatching descriptor");

            match descriptor {
                ActionDescriptor::Clarification { question } => {
                    self.frontend.show_message(&question).await;
                    return;
                }
                ActionDescriptor::Confirmation {
                    prompt: confirmation_prompt,
                    summary,
                    directory_change_path,
                    commands,
                } => {
                    self.confirm_and_execute(
                        confirmation_prompt,
                        summary,
                        directory_change_path,
                        commands,
                    )
                    .await;
                    return;
                }
                ActionDescriptor::Command {
                    summary,
                    directory_change_path,
                    commands,
                } => {
                    self.execute_batch(summary, directory_change_path, &commands, &prompt)
                        .await;
                    return;
                }
                ActionDescriptor::DataGathering { commands } => {
                    self.frontend
                        .show_status("Diagnosing issue, please wait...")
                        .await;

                    // Diagnostic commands run immediately: read-only, not
                    // gated, and not worth a correction round-trip.
                    let mut gathered = String::new();
                    for spec in &commands {
                        let result = self.runner.run(spec, self.command_timeout).await;
                        gathered.push_str(&format!(
                            "--- Output of '{}' ---\n{}\n\n",
                            spec.command,
                            result.combined_output()
                        ));
                    }

                    prompt = format!(
                        "My original request was: '{prompt}'.\n\
                         I have run the diagnostic commands. Here is the output:\n{gathered}\
                         Now, analyze this data and provide a final JSON response with a \
                         summary and actionable commands."
                    );
                    raw = match self.channel.send(&prompt, self.transcript.turns()).await {
                        Ok(raw) => raw,
                        Err(err) => {
                            warn!(%err, "follow-up model call failed");
                            self.frontend.show_message(&err.to_string()).await;
                            return;
                        }
                    };
                }
            }
        }
    }

    // Suspends on the frontend until the user decides. The gate is
    // single-use; a stale second resolution releases nothing.
    async fn confirm_and_execute(
        &mut self,
        confirmation_prompt: String,
        summary: Option<String>,
        directory_change_path: Option<String>,
        commands: Vec<CommandSpec>,
    ) {
        let mut gate = ConfirmationGate::new(confirmation_prompt.clone(), commands);
        let approved = self.frontend.request_approval(&confirmation_prompt).await;

        match gate.resolve(approved) {
            GateOutcome::Approved(commands) => {
                if commands.is_empty() {
                    self.frontend
                        .show_message("Confirmation received, but no command was provided.")
                        .await;
                    return;
                }
                self.frontend.show_status("User confirmed. Proceeding...").await;
                // The most recent user turn is the execution context.
                let context_prompt = self
                    .transcript
                    .last_user_content()
                    .unwrap_or("User action after confirmation")
                    .to_string();
                self.execute_batch(summary, directory_change_path, &commands, &context_prompt)
                    .await;
            }
            GateOutcome::Rejected => {
                info!("pending batch cancelled by user");
                self.frontend.show_status("Action cancelled by user.").await;
            }
            GateOutcome::AlreadyResolved => {
                debug!("ignoring resolution of an already-resolved gate");
            }
        }
    }

    // Strictly sequential: later commands may depend on side effects of
    // earlier ones, so each runs to completion before the next starts.
    async fn execute_batch(
        &mut self,
        summary: Option<String>,
        directory_change_path: Option<String>,
        commands: &[CommandSpec],
        original_prompt: &str,
    ) {
        if let Some(summary) = &summary {
            self.frontend.show_message(summary).await;
        }

        let correction = CorrectionLoop::new(
            self.runner.clone(),
            self.channel.clone(),
            self.command_timeout,
        );
        for spec in commands {
            self.frontend.show_status(&spec.description).await;
            let result = correction
                .run(spec, &mut self.transcript, self.frontend.as_ref())
                .await;

            let mut output = result.combined_output();
            if output.is_empty() {
                output = "[Command executed successfully with no output]".to_string();
            }
            self.frontend.show_result(&output).await;
        }

        if let Some(path) = &directory_change_path {
            self.frontend.show_path(path).await;
        }

        if let Some(summary) = summary {
            self.spawn_suggestion_fetch(original_prompt.to_string(), summary);
        }
    }

    // Fire-and-forget; a failed fetch is never user-visible.
    fn spawn_suggestion_fetch(&self, original_prompt: String, summary: String) {
        let channel = self.channel.clone();
        let frontend = self.frontend.clone();
        tokio::spawn(async move {
            match channel.suggest(&original_prompt, &summary).await {
                Ok(suggestions) if !suggestions.is_empty() => {
                    frontend.show_suggestions(&suggestions).await;
                }
                Ok(_) => {}
                Err(err) => debug!(%err, "suggestion fetch failed"),
            }
        });
    }
}
