//! Password prompts.
//!
//! On a terminal the input is read in raw mode and echoed as `*`. When stdin
//! is not a terminal (piped input) one line is read per prompt.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};

use crate::error::{AppError, Result};

const ATTEMPTS: usize = 3;

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Key {
    Typed,
    Erased,
    Submitted,
    Interrupted,
    Ignored,
}

fn apply_key(buf: &mut String, key: KeyEvent) -> Key {
    // Some platforms report releases too.
    if key.kind == KeyEventKind::Release {
        return Key::Ignored;
    }
    match key.code {
        KeyCode::Enter => Key::Submitted,
        KeyCode::Backspace if buf.pop().is_some() => Key::Erased,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupted,
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            buf.push(ch);
            Key::Typed
        }
        _ => Key::Ignored,
    }
}

fn masked(prompt: &str) -> Result<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;

    let mut buf = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match apply_key(&mut buf, key) {
            Key::Typed => execute!(out, Print("*"))?,
            Key::Erased => execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?,
            Key::Submitted => {
                execute!(out, Print("\r\n"))?;
                return Ok(buf);
            }
            Key::Interrupted => {
                execute!(out, Print("\r\n"))?;
                return Err(AppError::Input("interrupted".to_string()));
            }
            Key::Ignored => {}
        }
    }
}

fn piped(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn terminal_notice(message: &str) -> Result<()> {
    execute!(
        io::stderr(),
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(format!("{message}\r\n"))
    )?;
    Ok(())
}

fn confirmed(
    mut ask: impl FnMut(&str) -> Result<String>,
    mut notice: impl FnMut(&str) -> Result<()>,
) -> Result<String> {
    for _ in 0..ATTEMPTS {
        let first = ask("Password: ")?;
        if first.is_empty() {
            notice("Password must not be empty.")?;
            continue;
        }

        let second = ask("Confirm password: ")?;
        if first == second {
            return Ok(first);
        }
        notice("Passwords do not match. Try again.")?;
    }

    Err(AppError::Input("too many attempts".to_string()))
}

/// Asks for an existing password.
pub fn password() -> Result<String> {
    let password = if io::stdin().is_terminal() {
        masked("Password: ")?
    } else {
        piped(&mut io::stdin().lock())?
    };
    if password.is_empty() {
        return Err(AppError::Input("password must not be empty".to_string()));
    }
    Ok(password)
}

/// Asks for a new password twice, up to three attempts.
pub fn new_password() -> Result<String> {
    if io::stdin().is_terminal() {
        return confirmed(masked, terminal_notice);
    }
    let mut input = io::stdin().lock();
    confirmed(
        |_| piped(&mut input),
        |message| {
            writeln!(io::stderr(), "{message}")?;
            Ok(())
        },
    )
}
