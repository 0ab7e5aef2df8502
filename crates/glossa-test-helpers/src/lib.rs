//! Test utilities and fixtures for Glossa

pub mod mock_compiler;
pub mod project;

pub use mock_compiler::MockCompiler;
pub use project::TestProject;
