//! Appender implementations

pub mod console;
pub mod memory;
pub mod null;
pub mod writer;

pub use console::{ConsoleAppender, ConsoleStream};
pub use memory::MemoryAppender;
pub use null::NullAppender;
pub use writer::WriterAppender;

// Re-export trait for convenience
pub use crate::core::Appender;
