use anyhow::Result;

use crate::ast::Program;

pub mod transpiler;

/// Executable artifact produced by a backend `prepare` step.
///
/// Keeps compilation and execution separated so tests can exercise the
/// prepare and run phases independently.
pub trait PreparedBackend {
    fn run(&self) -> Result<String>;
}

/// Interface implemented by an execution backend.
///
/// `prepare` translates a validated program into backend-owned executable
/// state, while `run` offers the convenience path for one-shot execution.
pub trait Backend {
    fn name(&self) -> &'static str;
    fn prepare(&self, program: &Program) -> Result<Box<dyn PreparedBackend>>;

    fn run(&self, program: &Program) -> Result<String> {
        self.prepare(program)?.run()
    }
}
