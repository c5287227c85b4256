pub mod runner;

pub use runner::ShellRunner;
