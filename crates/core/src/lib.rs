pub mod channel;
pub mod correction;
pub mod engine;
pub mod parser;
pub mod shortcuts;
pub mod transcript;
pub mod types;

pub use channel::{ChannelError, CommandRunner, ModelChannel, DEFAULT_COMMAND_TIMEOUT};
pub use correction::CorrectionLoop;
pub use engine::Orchestrator;
pub use parser::{parse, strip_fences, ParseError};
pub use shortcuts::{ShortcutRule, ShortcutTable};
pub use transcript::{Role, Transcript, Turn};
pub use types::{ActionDescriptor, CommandSpec, ExecutionResult};
