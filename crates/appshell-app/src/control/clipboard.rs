use std::sync::Mutex;

use appshell_common::ShellError;

/// Write-only text clipboard used by the `copy` route.
pub trait TextClipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), ShellError>;
}

/// System clipboard backed by `arboard`. The handle is opened per call so a
/// clipboard that is busy or missing at startup does not stick.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl TextClipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ShellError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ShellError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| ShellError::Clipboard(e.to_string()))
    }
}

/// In-process clipboard for headless runs.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn text(&self) -> Option<String> {
        self.text.lock().ok().and_then(|t| t.clone())
    }
}

impl TextClipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<(), ShellError> {
        let mut slot = self
            .text
            .lock()
            .map_err(|_| ShellError::Clipboard("clipboard lock poisoned".into()))?;
        *slot = Some(text.to_owned());
        Ok(())
    }
}
