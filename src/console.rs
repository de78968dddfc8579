// Colored, leveled console messages for the operator. Structured events go
// through `tracing`; these lines are what a human watches scroll by.

use std::fmt::Display;
use std::io::IsTerminal;

use crossterm::style::Stylize;

/// Colors are on for terminals unless `NO_COLOR` is set.
fn colorize(stream_is_terminal: bool) -> bool {
    stream_is_terminal && std::env::var_os("NO_COLOR").is_none()
}

pub fn fatal(message: impl Display) {
    let line = format!("[FATAL] {message}");
    if colorize(std::io::stderr().is_terminal()) {
        eprintln!("{}", line.red().bold());
    } else {
        eprintln!("{line}");
    }
}

pub fn error(message: impl Display) {
    let line = message.to_string();
    if colorize(std::io::stderr().is_terminal()) {
        eprintln!("{}", line.red());
    } else {
        eprintln!("{line}");
    }
}

pub fn warn(message: impl Display) {
    let line = message.to_string();
    if colorize(std::io::stdout().is_terminal()) {
        println!("{}", line.yellow());
    } else {
        println!("{line}");
    }
}

pub fn info(message: impl Display) {
    let line = message.to_string();
    if colorize(std::io::stdout().is_terminal()) {
        println!("{}", line.cyan());
    } else {
        println!("{line}");
    }
}

pub fn success(message: impl Display) {
    let line = message.to_string();
    if colorize(std::io::stdout().is_terminal()) {
        println!("{}", line.green());
    } else {
        println!("{line}");
    }
}
