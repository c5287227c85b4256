// Prompt construction for the model channel.

// Inlined ahead of every command request; pins the JSON wire shape the
// parser expects.
pub fn command_preamble(os_hint: &str) -> String {
    format!(
        r#"You are an expert command-line assistant for {os_hint}. Your task is to generate and correct shell commands.

**BEHAVIOR MODEL**
1. Data Gathering: For diagnostic questions, your first response MUST be `response_type: 'data_gathering'`.
2. Analysis & Solution: After receiving data, you will analyze it and provide a solution with `response_type: 'command'`.
3. User Confirmation: If the user responds with a short confirmation ("do it"), re-issue the commands from your previous message.
4. Self-Correction on Error: If a command fails, analyze the error message and provide a corrected command.

**Constraints and Rules:**
- **Safety First:** For any potentially destructive command, you MUST use `response_type: 'confirmation'`.
- **JSON Formatting:** Your output MUST be a raw, syntactically correct JSON object.
  - **Escape backslashes:** All literal backslashes `\` must be escaped as `\\`.
  - **Escape double quotes:** All literal double quotes `"` within a JSON string value must be escaped as `\"`.
- **Output Structure:** The JSON must follow this structure:
    {{
        "response_type": "command" | "clarification" | "confirmation" | "data_gathering",
        "summary": "...", "directory_change_path": "...",
        "commands": [ {{ "command": "...", "description": "...", "is_powershell": boolean }} ],
        "clarification_question": "...", "confirmation_prompt": "..."
    }}"#
    )
}

pub fn command_prompt(os_hint: &str, user_prompt: &str) -> String {
    format!(
        "{}\n\n**User Request:** \"{}\"",
        command_preamble(os_hint),
        user_prompt
    )
}

// Prompt for the fire-and-forget follow-up suggestions call.
pub fn suggestion_prompt(original_prompt: &str, summary: &str) -> String {
    format!(
        r#"You are a helpful command-line assistant. A user just performed an action. Based on their initial request and the action's summary, provide 2-3 relevant follow-up prompts they might want to ask next.

**Initial Request:** "{original_prompt}"
**Action Summary:** "{summary}"

**Your Task:**
Generate a list of concise and helpful next steps.
Your response MUST be a raw JSON object with a single key "suggestions" which contains a list of strings. Do not add any other text or formatting."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_prompt_embeds_os_and_request() {
        let prompt = command_prompt("Windows 11", "free up disk space");
        assert!(prompt.contains("Windows 11"));
        assert!(prompt.contains("**User Request:** \"free up disk space\""));
        assert!(prompt.contains("response_type"));
    }

    #[test]
    fn suggestion_prompt_embeds_both_inputs() {
        let prompt = suggestion_prompt("check my battery", "Generated a battery report.");
        assert!(prompt.contains("check my battery"));
        assert!(prompt.contains("Generated a battery report."));
    }
}
