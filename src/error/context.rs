//! Error context types for better error messages.

/// I/O operation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    Create,
    Delete,
}

impl std::fmt::Display for IoOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Delete => write!(f, "delete"),
        }
    }
}
