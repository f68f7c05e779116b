//! Operator confirmation.
//!
//! Business logic only sees the [`Confirm`] trait; [`TerminalPrompt`] is the
//! interactive implementation used by the CLI.

use std::io::{self, BufRead, Write};

/// Yes/no question answered by the operator.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Asks on a writer and reads `y`/`n` answers from a reader, re-asking on
/// anything else. End of input counts as "no".
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalPrompt<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        loop {
            write!(self.output, "{} [y/n]: ", question)?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                return Ok(false);
            }

            match answer.trim() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => writeln!(self.output, "Please select one of the available options")?,
            }
        }
    }
}
