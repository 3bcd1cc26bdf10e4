use std::io::{BufRead, Write};
use svcforge_core::collect::PromptSession;
use svcforge_core::error::Result;

/// Prompt session over stdin/stdout.
pub struct StdioSession;

impl StdioSession {
    pub fn new() -> Self {
        Self
    }
}

impl PromptSession for StdioSession {
    fn question(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stdin closed before collection finished",
            )
            .into());
        }
        Ok(line.trim_end().to_string())
    }

    fn close(&mut self) {}
}
