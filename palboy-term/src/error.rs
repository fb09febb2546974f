use std::fmt;
use std::io;

/// Things that can keep the editor from starting.
#[derive(Debug)]
pub enum StartupError {
    /// The terminal reports no color support at all.
    Unsupported,
    /// A save file problem, or the terminal went away.
    Io(io::Error),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StartupError::Unsupported => {
                write!(f, "PalBoy does not run in black & white. Sorry!")
            }
            StartupError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl From<io::Error> for StartupError {
    fn from(err: io::Error) -> StartupError {
        StartupError::Io(err)
    }
}
