//! Typed errors for the parts of the crate that have a real failure mode.
//!
//! The intersection/shading pipeline itself never returns a `Result` -- a missed ray is
//! black, not an error (see SPEC_FULL.md section 7). This module exists for scene/asset
//! loading, which does have genuine failure modes.

use std::fmt;

#[derive(Debug)]
pub enum RenderError {
    /// A `Light` variant reached a match arm with no defined radiance/direction rule.
    /// The `Light` enum is closed and every arm is handled, so this should be
    /// unreachable in practice; it documents the original's runtime-throw intent.
    UnknownLightType,
    /// OBJ file missing, unreadable, or producing zero triangles.
    AssetError(String),
    Io(std::io::Error),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownLightType => write!(f, "light type not implemented"),
            RenderError::AssetError(msg) => write!(f, "asset error: {msg}"),
            RenderError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
