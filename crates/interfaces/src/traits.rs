use async_trait::async_trait;

// The presentation seam the orchestration engine talks to. Rendering and
// styling are the implementor's business; the engine only distinguishes
// the kinds of things it has to say.
#[async_trait]
pub trait Frontend: Send + Sync {
    // Next user utterance, or None on end of input.
    async fn receive_input(&self) -> Option<String>;

    async fn show_message(&self, text: &str);

    // Transient progress indicator ("Thinking...", a command description).
    async fn show_status(&self, status: &str);

    // Captured output of an executed command.
    async fn show_result(&self, output: &str);

    async fn show_path(&self, path: &str);

    async fn show_suggestions(&self, suggestions: &[String]);

    // Suspends until the user decides. There is no timeout.
    async fn request_approval(&self, prompt: &str) -> bool;
}
