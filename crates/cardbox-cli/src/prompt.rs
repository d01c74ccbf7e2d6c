//! Terminal implementation of the decision port.

use std::io::{BufRead, Write};

use cardbox_engine::{DecisionProvider, Error, Result};

/// Asks questions on stdout and reads answers from stdin.
///
/// Entering `q` or `quit`, or closing stdin, cancels the enclosing
/// operation. Malformed answers re-prompt.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }

    fn read_answer(&self) -> Result<String> {
        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            // stdin closed
            return Err(Error::Cancelled);
        }
        let answer = line.trim().to_string();
        if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
            return Err(Error::Cancelled);
        }
        Ok(answer)
    }

    fn ask(&self, prompt: &str) -> Result<String> {
        print!("{prompt} ");
        std::io::stdout().flush()?;
        self.read_answer()
    }
}

impl DecisionProvider for TerminalPrompter {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        loop {
            let answer = self.ask(&format!("{prompt} [y/n]"))?;
            match answer.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("please answer y or n (q to cancel)"),
            }
        }
    }

    fn select(&self, prompt: &str, options: &[String]) -> Result<usize> {
        println!("{prompt}");
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {option}", i + 1);
        }
        loop {
            let answer = self.ask(&format!("choice [1-{}]:", options.len()))?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => println!("enter a number between 1 and {} (q to cancel)", options.len()),
            }
        }
    }

    fn prompt_amount(&self, prompt: &str, min: u32, max: u32) -> Result<u32> {
        loop {
            let answer = self.ask(&format!("{prompt} [{min}-{max}]:"))?;
            match answer.parse::<u32>() {
                Ok(n) if (min..=max).contains(&n) => return Ok(n),
                _ => println!("enter a number between {min} and {max} (q to cancel)"),
            }
        }
    }
}
