//! Handle for a text registered in the [`SourceDb`](crate::SourceDb).

use serde::{Deserialize, Serialize};

/// Index of a registered source text.
///
/// Handed out by [`SourceDb`](crate::SourceDb) in registration order, so the
/// first file loaded in a run is `FileId(0)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// Placeholder for locations that do not come from any registered text.
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Wraps a raw index.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}
