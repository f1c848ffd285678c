//! Behavioural switches shared by the parsing and processing entry points.

/// Selects how failures are reported and how non-aligned networks are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Drop invalid input and mask host bits off non-aligned networks.
    #[default]
    Lenient,
    /// Report the specific [`NetError`](crate::NetError) and reject non-aligned networks.
    Strict,
}

impl Mode {
    pub fn is_strict(self) -> bool {
        self == Mode::Strict
    }
}
