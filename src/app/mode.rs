use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Browse,       // Move through entries, copy, delete
    Search,       // Typing into the filter
    ConfirmClear, // Waiting for y/n before clearing everything
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Browse => write!(f, "BROWSE"),
            Mode::Search => write!(f, "SEARCH"),
            Mode::ConfirmClear => write!(f, "CLEAR?"),
        }
    }
}
