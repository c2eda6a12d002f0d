// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 camcast contributors

//! Line-oriented console prompts.
//!
//! Every prompt shows its default in brackets and accepts a blank line for
//! it. End of input reads as a blank line, so a closed stdin settles every
//! remaining question on its default.

use crate::error::CliError;
use camcast::fraction::Fraction;
use std::io::{BufRead, Write};

/// Console prompter over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

/// Index of the first run of digits in `line`, as typed (1-based).
fn parse_selection(line: &str) -> Option<usize> {
    let digits: String = line
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    /// Give back the writer, e.g. to inspect a transcript.
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String, CliError> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn ask(&mut self, question: &str) -> Result<String, CliError> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        self.read_line()
    }

    fn say(&mut self, message: &str) -> Result<(), CliError> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    /// Print a note that needs no answer.
    pub fn note(&mut self, message: &str) -> Result<(), CliError> {
        self.say(message)
    }

    /// Numbered menu; returns the 0-based index of the chosen option.
    pub fn choose<S: AsRef<str>>(&mut self, title: &str, options: &[S]) -> Result<usize, CliError> {
        if options.is_empty() {
            return Err(CliError::General(format!("{}: no options available", title)));
        }

        loop {
            self.say(&format!("{}:", title))?;
            for (i, option) in options.iter().enumerate() {
                self.say(&format!("  {}) {}", i + 1, option.as_ref()))?;
            }
            let line = self.ask(&format!("Select 1-{} [1]: ", options.len()))?;
            if line.is_empty() {
                return Ok(0);
            }
            match parse_selection(&line) {
                Some(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => self.say("Invalid selection.")?,
            }
        }
    }

    /// Free text with a default.
    pub fn string(&mut self, label: &str, default: &str) -> Result<String, CliError> {
        let line = self.ask(&format!("{} [{}]: ", label, default))?;
        if line.is_empty() {
            return Ok(default.to_string());
        }
        Ok(line)
    }

    pub fn positive(&mut self, label: &str, default: u32) -> Result<u32, CliError> {
        loop {
            let line = self.ask(&format!("{} [{}]: ", label, default))?;
            if line.is_empty() {
                return Ok(default);
            }
            match line.parse::<u32>() {
                Ok(n) if n > 0 => return Ok(n),
                _ => self.say("Enter a positive number.")?,
            }
        }
    }

    pub fn port(&mut self, label: &str, default: u16) -> Result<u16, CliError> {
        loop {
            let line = self.ask(&format!("{} [{}]: ", label, default))?;
            if line.is_empty() {
                return Ok(default);
            }
            match line.parse::<i64>() {
                Ok(n) if n <= 0 => self.say("Enter a positive number.")?,
                Ok(n) => match u16::try_from(n) {
                    Ok(port) => return Ok(port),
                    Err(_) => self.say("Enter a port between 1 and 65535.")?,
                },
                Err(_) => self.say("Enter a positive number.")?,
            }
        }
    }

    /// A `N/D` framerate with a positive denominator, returned in canonical
    /// form.
    pub fn fraction(&mut self, label: &str, default: &str) -> Result<String, CliError> {
        loop {
            let mut line = self.ask(&format!("{} [{}]: ", label, default))?;
            if line.is_empty() {
                line = default.to_string();
            }
            match Fraction::parse(&line) {
                Ok(rate) if rate.denominator() > 0 => return Ok(rate.to_string()),
                _ => self.say("Enter a fraction like 30/1.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn test_choose_layout() {
        let mut p = prompter("2\n");
        assert_eq!(p.choose("Select a codec", &["H264", "H265"]).unwrap(), 1);
        assert_eq!(
            transcript(p),
            "Select a codec:\n  1) H264\n  2) H265\nSelect 1-2 [1]: "
        );
    }

    #[test]
    fn test_choose_blank_and_eof_pick_first() {
        let mut p = prompter("\n");
        assert_eq!(p.choose("Pick", &["a", "b", "c"]).unwrap(), 0);
        let mut p = prompter("");
        assert_eq!(p.choose("Pick", &["a", "b", "c"]).unwrap(), 0);
    }

    #[test]
    fn test_choose_first_digit_run() {
        let mut p = prompter("option 3, please\n");
        assert_eq!(p.choose("Pick", &["a", "b", "c"]).unwrap(), 2);
    }

    #[test]
    fn test_choose_reprompts() {
        let mut p = prompter("9\nabc\n2\n");
        assert_eq!(p.choose("Pick", &["a", "b"]).unwrap(), 1);
        assert_eq!(transcript(p).matches("Invalid selection.").count(), 2);
    }

    #[test]
    fn test_choose_empty_menu() {
        let mut p = prompter("1\n");
        let options: [&str; 0] = [];
        assert!(p.choose("Pick", &options).is_err());
    }

    #[test]
    fn test_string_default() {
        let mut p = prompter("\n  10.0.0.2  \n");
        assert_eq!(p.string("Video UDP host", "127.0.0.1").unwrap(), "127.0.0.1");
        assert_eq!(p.string("Video UDP host", "127.0.0.1").unwrap(), "10.0.0.2");
        assert_eq!(
            transcript(p),
            "Video UDP host [127.0.0.1]: Video UDP host [127.0.0.1]: "
        );
    }

    #[test]
    fn test_positive() {
        let mut p = prompter("-4\nwide\n1280\n");
        assert_eq!(p.positive("Width", 640).unwrap(), 1280);
        assert_eq!(transcript(p).matches("Enter a positive number.").count(), 2);
    }

    #[test]
    fn test_port_range() {
        let mut p = prompter("70000\n0\n6000\n");
        assert_eq!(p.port("Video UDP port", 5000).unwrap(), 6000);
        let out = transcript(p);
        assert!(out.contains("Enter a port between 1 and 65535."));
        assert!(out.contains("Enter a positive number."));

        let mut p = prompter("");
        assert_eq!(p.port("Audio UDP port", 5001).unwrap(), 5001);
    }

    #[test]
    fn test_fraction() {
        let mut p = prompter("30\n30/-1\n 25/1 \n");
        assert_eq!(p.fraction("Framerate (num/den)", "30/1").unwrap(), "25/1");
        assert_eq!(transcript(p).matches("Enter a fraction like 30/1.").count(), 2);

        let mut p = prompter("\n");
        assert_eq!(p.fraction("Framerate (num/den)", "30/1").unwrap(), "30/1");
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("12"), Some(12));
        assert_eq!(parse_selection("#4)"), Some(4));
        assert_eq!(parse_selection("none"), None);
    }
}
