//! Interactive numeric prompt.
//!
//! Reads one answer per line from the user. An empty answer selects the
//! default, `i` shows the info banner, anything outside `1..=max` is rejected
//! and asked again. End of input aborts the whole session.

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use crate::error::ToolError;

/// Name shown in the info banner.
pub const APP_NAME: &str = "ADB Toolbox";

/// Escape answer that prints the info banner.
const INFO_TOKEN: &str = "i";

/// Largest bound that is still answered with a single key.
const SINGLE_KEY_MAX: u32 = 9;

/// How one line of input was understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// Empty line, use the caller's default
    Default,
    /// Info escape
    Info,
    /// Accepted value in `1..=max`
    Value(u32),
    /// Not a number, or out of range
    Invalid,
}

/// Classify a trimmed input line against the bound `1..=max_value`.
///
/// Up to nine options only the first character counts, so `"23"` reads as
/// `2`. Larger menus parse the whole token.
pub fn parse_answer(line: &str, max_value: u32) -> Answer {
    let line = line.trim();
    let token = if max_value <= SINGLE_KEY_MAX {
        match line.char_indices().nth(1) {
            Some((end, _)) => &line[..end],
            None => line,
        }
    } else {
        line
    };

    if token.is_empty() {
        return Answer::Default;
    }
    if token == INFO_TOKEN {
        return Answer::Info;
    }

    match token.parse::<u32>() {
        Ok(value) if (1..=max_value).contains(&value) => Answer::Value(value),
        _ => Answer::Invalid,
    }
}

/// Prompt bound to an input and an output stream.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    /// Non-interactive terminal: never block, always take the default
    dumb_mode: bool,
}

impl Prompter<StdinLock<'static>, Stdout> {
    /// Prompt on the process's stdin/stdout.
    pub fn stdio(dumb_mode: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), dumb_mode)
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, dumb_mode: bool) -> Self {
        Self {
            input,
            output,
            dumb_mode,
        }
    }

    /// Consume the prompter and hand back the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Stream the prompt writes to, for progress lines between questions.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn blank_line(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    /// Ask until a valid answer in `1..=max_value` is given.
    ///
    /// `message` is printed first when `show_message` is set, and again after
    /// the info banner, but not after an invalid answer.
    ///
    /// # Errors
    /// [`ToolError::UserAbort`] on end of input, [`ToolError::Io`] if the
    /// terminal cannot be read or written.
    pub fn ask(
        &mut self,
        message: &str,
        max_value: u32,
        default_value: u32,
        show_message: bool,
    ) -> Result<u32, ToolError> {
        let mut show_message = show_message;

        loop {
            if show_message {
                writeln!(self.output, "{}", message)?;
            }

            let line = self.read_line()?.ok_or(ToolError::UserAbort)?;

            match parse_answer(&line, max_value) {
                Answer::Default => {
                    writeln!(self.output, "Used default value.")?;
                    return Ok(default_value);
                }
                Answer::Value(value) => return Ok(value),
                Answer::Info => {
                    self.display_info()?;
                    show_message = true;
                }
                Answer::Invalid => {
                    writeln!(self.output, "Invalid value, try again...")?;
                    show_message = false;
                }
            }
        }
    }

    /// Print the cursor and read one line. `None` means end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        write!(self.output, "> ")?;
        self.output.flush()?;

        if self.dumb_mode {
            writeln!(self.output)?;
            return Ok(Some(String::new()));
        }

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn display_info(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "-----------------------")?;
        writeln!(self.output, "Name: {} {}", APP_NAME, env!("CARGO_PKG_VERSION"))?;
        writeln!(self.output, "Author: {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(self.output)
    }

    /// Block until Enter is pressed (or input ends). No-op in dumb mode.
    pub fn pause(&mut self, message: &str) -> io::Result<()> {
        if self.dumb_mode {
            return Ok(());
        }
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), false)
    }

    fn output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn test_parse_answer_in_range() {
        assert_eq!(parse_answer("3", 5), Answer::Value(3));
        assert_eq!(parse_answer(" 1 ", 5), Answer::Value(1));
    }

    #[test]
    fn test_parse_answer_out_of_range() {
        assert_eq!(parse_answer("0", 5), Answer::Invalid);
        assert_eq!(parse_answer("6", 5), Answer::Invalid);
        assert_eq!(parse_answer("-1", 5), Answer::Invalid);
        assert_eq!(parse_answer("x", 5), Answer::Invalid);
    }

    #[test]
    fn test_parse_answer_single_key_uses_first_char() {
        assert_eq!(parse_answer("23", 5), Answer::Value(2));
        assert_eq!(parse_answer("99", 5), Answer::Invalid);
        assert_eq!(parse_answer("info", 5), Answer::Info);
    }

    #[test]
    fn test_parse_answer_multi_digit_for_large_menus() {
        assert_eq!(parse_answer("12", 15), Answer::Value(12));
        assert_eq!(parse_answer("16", 15), Answer::Invalid);
        assert_eq!(parse_answer("info", 15), Answer::Invalid);
        assert_eq!(parse_answer("i", 15), Answer::Info);
    }

    #[test]
    fn test_parse_answer_empty_is_default() {
        assert_eq!(parse_answer("", 5), Answer::Default);
        assert_eq!(parse_answer("   ", 5), Answer::Default);
    }

    #[test]
    fn test_ask_returns_value() {
        let mut p = prompter("3\n");
        assert_eq!(p.ask("Pick", 5, 1, true).unwrap(), 3);
        assert_eq!(output(p), "Pick\n> ");
    }

    #[test]
    fn test_ask_empty_returns_default() {
        let mut p = prompter("\n");
        assert_eq!(p.ask("Pick", 5, 2, true).unwrap(), 2);
        assert!(output(p).contains("Used default value."));
    }

    #[test]
    fn test_ask_invalid_retries_without_repeating_message() {
        let mut p = prompter("99\n4\n");
        assert_eq!(p.ask("Pick", 5, 1, true).unwrap(), 4);
        let out = output(p);
        assert_eq!(out.matches("Pick").count(), 1);
        assert_eq!(out.matches("Invalid value, try again...").count(), 1);
    }

    #[test]
    fn test_ask_info_shows_banner_and_message_again() {
        let mut p = prompter("i\n2\n");
        assert_eq!(p.ask("Pick", 5, 1, true).unwrap(), 2);
        let out = output(p);
        assert!(out.contains("Name: ADB Toolbox"));
        assert_eq!(out.matches("Pick").count(), 2);
    }

    #[test]
    fn test_ask_end_of_input_aborts() {
        let mut p = prompter("");
        let err = p.ask("Pick", 5, 1, true).unwrap_err();
        assert!(matches!(err, ToolError::UserAbort));
        assert_eq!(err.exit_code(), 130);
    }

    #[test]
    fn test_ask_dumb_mode_takes_default_without_reading() {
        let mut p = Prompter::new(Cursor::new(b"4\n".to_vec()), Vec::new(), true);
        assert_eq!(p.ask("Pick", 5, 2, true).unwrap(), 2);
    }

    #[test]
    fn test_ask_hidden_message() {
        let mut p = prompter("1\n");
        assert_eq!(p.ask("Pick", 5, 1, false).unwrap(), 1);
        assert!(!output(p).contains("Pick"));
    }
}
