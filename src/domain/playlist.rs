use std::fmt;

/// Identifier of a playlist created on the destination service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistHandle(String);

impl PlaylistHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
