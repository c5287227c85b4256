// Model-guided retry of a failed command. The retry budget is exactly one
// per original command: at most two executions and one extra model call,
// never an open-ended loop.

use crate::channel::{CommandRunner, ModelChannel};
use crate::parser;
use crate::transcript::Transcript;
use crate::types::{ActionDescriptor, CommandSpec, ExecutionResult};
use flum_interfaces::Frontend;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct CorrectionLoop {
    runner: Arc<dyn CommandRunner>,
    channel: Arc<dyn ModelChannel>,
    timeout: Duration,
}

impl CorrectionLoop {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        channel: Arc<dyn ModelChannel>,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            channel,
            timeout,
        }
    }

    // The returned result is final either way; callers display it as-is.
    pub async fn run(
        &self,
        spec: &CommandSpec,
        transcript: &mut Transcript,
        frontend: &dyn Frontend,
    ) -> ExecutionResult {
        let first = self.runner.run(spec, self.timeout).await;
        if first.succeeded() {
            return first;
        }

        frontend
            .show_status("An error occurred. Attempting to self-correct...")
            .await;

        let fix_prompt = correction_prompt(&spec.command, &first.combined_output());
        let raw_reply = match self.channel.send(&fix_prompt, transcript.turns()).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(%err, command = %spec.command, "correction request failed");
                return first;
            }
        };

        // The failure/fix exchange stays in the transcript so later turns
        // retain that context.
        transcript.push_user(fix_prompt.as_str());
        transcript.push_model(raw_reply.as_str());

        match parser::parse(&raw_reply) {
            Ok(ActionDescriptor::Command { commands, .. }) if !commands.is_empty() => {
                // Only the first corrected command is taken, even if the
                // model returned several.
                let corrected = &commands[0];
                frontend
                    .show_status("Retrying with corrected command...")
                    .await;
                self.runner.run(corrected, self.timeout).await
            }
            Ok(other) => {
                debug!(
                    kind = other.kind_name(),
                    "correction reply carried no usable command"
                );
                first
            }
            Err(err) => {
                debug!(%err, "correction reply did not parse");
                first
            }
        }
    }
}

fn correction_prompt(command: &str, error_output: &str) -> String {
    format!(
        "The following command failed:\n\
         Command: `{command}`\n\
         Error Output: {error_output}\n\
         Please analyze this error and provide a corrected version of the \
         command in a standard JSON object with `response_type: 'command'`."
    )
}
