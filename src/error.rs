// One small error enum instead of pulling in a full error-handling crate.
// Each variant names the site that failed.
use std::fmt::{self, Display};

#[derive(Debug)]
pub enum Error {
    WindowInit(String),   // creating the window failed
    WindowUpdate(String), // pushing a frame to the window failed
    Snapshot(String),     // writing a PNG snapshot failed
}

impl Display for Error {
    // How the error reads when it reaches the terminal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowInit(s) => write!(f, "Window init error: {s}"),
            Error::WindowUpdate(s) => write!(f, "Window update error: {s}"),
            Error::Snapshot(s) => write!(f, "Snapshot error: {s}"),
        }
    }
}
