/// Payload handed back by a resource fetch. On failure `bytes` is empty and
/// `diagnostic` explains why; the engine silently skips the resource either
/// way (imports and font sources are best-effort).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceData {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub text_encoding: String,
    pub diagnostic: Option<String>,
}

impl ResourceData {
    pub fn new(bytes: Vec<u8>, mime_type: &str, text_encoding: &str) -> Self {
        Self {
            bytes,
            mime_type: mime_type.to_string(),
            text_encoding: text_encoding.to_string(),
            diagnostic: None,
        }
    }

    pub fn failure(diagnostic: &str) -> Self {
        log::warn!("resource fetch failed: {diagnostic}");
        Self {
            diagnostic: Some(diagnostic.to_string()),
            ..Default::default()
        }
    }

    pub fn is_failure(&self) -> bool {
        self.diagnostic.is_some()
    }

    /// The payload as text, decoded lossily as UTF-8.
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// The only I/O seam of the engine. `url` is absolute by the time it gets
/// here; relative URLs are completed against the owning sheet first.
pub trait ResourceFetcher {
    fn fetch_url(&self, url: &str) -> ResourceData;
}
