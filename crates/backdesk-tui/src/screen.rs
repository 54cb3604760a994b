//! Screen trait and screen identifier enum.

use std::fmt;

/// Identifies each primary TUI screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Compliance, // 1
    Customers, // 2
    Rewards,   // 3
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 3] = [Self::Compliance, Self::Customers, Self::Rewards];

    /// Numeric key (1-3) for this screen.
    pub fn number(self) -> u8 {
        match self {
            Self::Compliance => 1,
            Self::Customers => 2,
            Self::Rewards => 3,
        }
    }

    /// Screen from a numeric key. Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Compliance),
            2 => Some(Self::Customers),
            3 => Some(Self::Rewards),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Compliance => "Compliance",
            Self::Customers => "Customers",
            Self::Rewards => "Rewards",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
