//! Destinations for share text.
use coople_game::{ShareSink, ShareSinkFailure};
use std::io::Write;

/// System clipboard.
pub struct ClipboardSink;

impl ShareSink for ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ShareSinkFailure> {
        arboard::Clipboard::new()
            .and_then(|mut cb| cb.set_text(text.to_string()))
            .map_err(|e| {
                log::warn!("clipboard error: {e}");
                ShareSinkFailure {
                    reason: e.to_string(),
                }
            })
    }
}

/// Any writer, typically stdout.
pub struct WriterSink<W: Write>(pub W);

impl<W: Write> ShareSink for WriterSink<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ShareSinkFailure> {
        writeln!(self.0, "{text}")
            .and_then(|()| self.0.flush())
            .map_err(|e| ShareSinkFailure {
                reason: e.to_string(),
            })
    }
}
