//! Clipboard access for copying the generated prompt.

use crate::error::AppError;

pub const COPY_FAILED: &str = "Failed to copy to clipboard";

pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), AppError>;
}

/// The operating system clipboard, reached through the platform's
/// clipboard tool (`pbcopy`, `clip`, `wl-copy`, `xclip`, `xsel`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), AppError> {
        crate::utils::process::copy_to_clipboard(text)
            .map_err(|_| AppError::ClientSide(COPY_FAILED.to_string()))
    }
}
