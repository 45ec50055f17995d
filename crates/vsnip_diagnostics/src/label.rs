//! Annotated source spans attached to a diagnostic.

use serde::{Deserialize, Serialize};
use vsnip_source::Span;

/// Whether a label marks the main location or extra context.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LabelStyle {
    /// Rendered under the primary location with `^`.
    Primary,
    /// Extra context.
    Secondary,
}

/// A span plus the short message shown next to it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Label {
    /// Annotated location.
    pub span: Span,
    /// Text printed next to the underline.
    pub message: String,
    /// Primary or secondary.
    pub style: LabelStyle,
}

impl Label {
    /// Creates a primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    /// Creates a secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}
