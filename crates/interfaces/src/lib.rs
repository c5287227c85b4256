pub mod terminal;
pub mod traits;

pub use terminal::TerminalFrontend;
pub use traits::Frontend;
