//! Asking the user before installing.
//!

use std::io::{self, BufRead, Write};

/// Decides if an install should go ahead.
pub trait Confirm {
    /// Ask `prompt`, returning if the answer was yes.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Asks on stdout and reads the answer from stdin. An empty answer is yes.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        ask(&mut io::stdin().lock(), &mut io::stdout(), prompt)
    }
}

/// Answers yes to everything.
#[derive(Debug, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Answers no to everything.
#[derive(Debug, Default)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}

/// Write `prompt [Y/n] ` then read one line of answer. Closed or unreadable input counts as no.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> bool {
    if write!(output, "{prompt} [Y/n] ")
        .and_then(|()| output.flush())
        .is_err()
    {
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_yes(&answer),
    }
}

/// If an answer means yes. Empty answers default to yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes")
}
