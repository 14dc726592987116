//! Interactive prompts
//!
//! Line prompts, yes/no confirmation, and masked password entry.

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, Write};

/// Whether stdin is attached to a terminal
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Print a prompt and read one line, without the trailing newline
///
/// Returns `None` at end of input.
pub fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().lock().read_line(&mut input)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(['\n', '\r']).to_string()))
}

/// Prompt until a non-empty value is entered
pub fn prompt_required(prompt: &str) -> Result<String> {
    loop {
        match read_line(&format!("{}: ", prompt))? {
            None => bail!("No input for {}", prompt.to_lowercase()),
            Some(value) if value.trim().is_empty() => println!("{} cannot be empty.", prompt),
            Some(value) => return Ok(value.trim().to_string()),
        }
    }
}

/// Prompt with a default value, returns None if user keeps default
pub fn prompt_with_default(prompt: &str, default: &str) -> Result<Option<String>> {
    let input = read_line(&format!("{} [{}]: ", prompt, default))?.unwrap_or_default();
    Ok(non_empty(&input))
}

/// Prompt for a number until one parses
pub fn prompt_number<T: std::str::FromStr>(prompt: &str, default: Option<T>) -> Result<T>
where
    T: std::fmt::Display + Copy,
{
    loop {
        let label = match default {
            Some(d) => format!("{} [{}]: ", prompt, d),
            None => format!("{}: ", prompt),
        };
        let Some(input) = read_line(&label)? else {
            bail!("No input for {}", prompt.to_lowercase());
        };
        match (non_empty(&input), default) {
            (None, Some(d)) => return Ok(d),
            (None, None) => println!("{} cannot be empty.", prompt),
            (Some(value), _) => match value.parse() {
                Ok(n) => return Ok(n),
                Err(_) => println!("'{}' is not a valid number.", value),
            },
        }
    }
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !is_interactive() {
        return Ok(false);
    }

    let input = read_line(&format!("{} [y/N] ", prompt))?.unwrap_or_default();
    Ok(is_yes(&input))
}

/// Read a password without echoing it
///
/// Each typed character is shown as `*`. Falls back to a plain line read
/// when stdin is not a terminal (e.g. piped input).
pub fn read_password(prompt: &str) -> Result<String> {
    if !is_interactive() {
        return read_line(prompt)?.context("No password provided");
    }

    print!("{}", prompt);
    io::stdout().flush()?;

    terminal::enable_raw_mode().context("Failed to enable raw terminal mode")?;
    let result = read_masked();
    terminal::disable_raw_mode().context("Failed to restore terminal mode")?;
    println!();

    result
}

fn read_masked() -> Result<String> {
    let mut password = String::new();
    let mut stdout = io::stdout();

    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }

        match code {
            KeyCode::Enter => return Ok(password),
            KeyCode::Esc => bail!("Password entry cancelled"),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                bail!("Password entry cancelled")
            }
            KeyCode::Backspace => {
                if password.pop().is_some() {
                    write!(stdout, "\x08 \x08")?;
                    stdout.flush()?;
                }
            }
            KeyCode::Char(c) => {
                password.push(c);
                write!(stdout, "*")?;
                stdout.flush()?;
            }
            _ => {}
        }
    }
}

fn non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}
