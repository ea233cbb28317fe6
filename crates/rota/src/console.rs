use std::fmt::Display;
use std::io::{BufRead, Write};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("input closed")]
    Closed,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Line-oriented prompt/read over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn println(&mut self, text: impl Display) -> Result<(), ConsoleError> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    pub fn prompt(&mut self, text: impl Display) -> Result<(), ConsoleError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    /// One line without its terminator. End of input is `ConsoleError::Closed`.
    pub fn read_line(&mut self) -> Result<String, ConsoleError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ConsoleError::Closed);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    pub fn ask(&mut self, label: impl Display) -> Result<String, ConsoleError> {
        self.prompt(label)?;
        self.read_line()
    }

    /// First character of the first token; the rest of that line is discarded.
    /// Blank lines are skipped.
    pub fn read_choice(&mut self) -> Result<char, ConsoleError> {
        loop {
            let line = self.read_line()?;
            if let Some(choice) = line.trim_start().chars().next() {
                return Ok(choice);
            }
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
