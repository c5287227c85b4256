use crate::traits::Frontend;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

pub struct TerminalFrontend;

impl TerminalFrontend {
    pub fn new() -> Self {
        Self
    }

    async fn write_line(&self, line: &str) {
        let mut stdout = tokio::io::stdout();
        let _ = stdout.write_all(line.as_bytes()).await;
        let _ = stdout.write_all(b"\n").await;
        let _ = stdout.flush().await;
    }
}

impl Default for TerminalFrontend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Frontend for TerminalFrontend {
    async fn receive_input(&self) -> Option<String> {
        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut line = String::new();

        match reader.read_line(&mut line).await {
            Ok(0) => None, // EOF
            Ok(_) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    }

    async fn show_message(&self, text: &str) {
        self.write_line(text).await;
    }

    async fn show_status(&self, status: &str) {
        self.write_line(&format!("… {}", status)).await;
    }

    async fn show_result(&self, output: &str) {
        self.write_line(output).await;
    }

    async fn show_path(&self, path: &str) {
        self.write_line(&format!("↗ {}", path)).await;
    }

    async fn show_suggestions(&self, suggestions: &[String]) {
        self.write_line("You could ask next:").await;
        for suggestion in suggestions {
            self.write_line(&format!("  • {}", suggestion)).await;
        }
    }

    async fn request_approval(&self, prompt: &str) -> bool {
        self.write_line(&format!("⚠️  High-risk action: {}", prompt)).await;
        self.write_line("Proceed? (y/n): ").await;

        if let Some(response) = self.receive_input().await {
            response.to_lowercase().starts_with('y')
        } else {
            false
        }
    }
}
