use std::io::{BufRead, Write};

use crossterm::style::Stylize;
use tracing::debug;

use crate::error::InputError;

/// Line-based operator prompts over any buffered reader.
#[derive(Debug)]
pub struct Prompter<R> {
    input: R,
}

impl<R: BufRead> Prompter<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// `None` once the input is exhausted. Invalid UTF-8 is replaced rather
    /// than rejected, so garbage reaches the per-prompt validation.
    fn read_line(&mut self) -> Result<Option<String>, InputError> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Asks for a pattern number until one in `1..=count` or `0` arrives.
    /// Returns the zero-based index, or `None` when the operator quits.
    pub fn select_pattern(
        &mut self,
        out: &mut dyn Write,
        count: usize,
    ) -> Result<Option<usize>, InputError> {
        loop {
            write!(
                out,
                "{}",
                format!("\n📌 Select pattern (1-{count}, 0 to quit): ").yellow()
            )?;
            out.flush()?;

            let line = self.read_line()?.ok_or(InputError::Closed)?;
            match line.trim().parse::<usize>() {
                Ok(0) => return Ok(None),
                Ok(number) if number <= count => return Ok(Some(number - 1)),
                _ => {
                    debug!(input = line.trim(), "rejected pattern selection");
                    writeln!(
                        out,
                        "{}",
                        format!("Invalid selection! Please choose 1-{count} or 0 to quit.").red()
                    )?;
                }
            }
        }
    }

    pub fn series_name(&mut self, out: &mut dyn Write) -> Result<String, InputError> {
        write!(out, "{}", "\n📝 Enter series name: ".yellow())?;
        out.flush()?;

        let line = self.read_line()?.ok_or(InputError::Closed)?;
        let name = line
            .strip_suffix('\n')
            .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
            .unwrap_or(&line);

        if name.is_empty() {
            return Err(InputError::EmptySeriesName);
        }
        Ok(name.to_string())
    }

    /// Only an answer starting with `y` or `Y` confirms.
    pub fn confirm(&mut self, out: &mut dyn Write) -> Result<bool, InputError> {
        write!(out, "{}", "\n⚠️  Proceed with renaming? (y/N): ".yellow().bold())?;
        out.flush()?;

        let answer = self.read_line()?;
        Ok(matches!(
            answer.as_deref().and_then(|line| line.chars().next()),
            Some('y' | 'Y')
        ))
    }
}
