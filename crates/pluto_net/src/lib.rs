//! Default [`ResourceFetcher`] implementation. Supports `data:` URIs (plain
//! and base64) and `file://` reads; anything else is reported through the
//! diagnostic channel with empty data, which makes the engine skip the
//! resource.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pluto_interface::fetcher::{ResourceData, ResourceFetcher};
use url::Url;

#[derive(Debug, Default)]
pub struct DefaultResourceFetcher;

impl DefaultResourceFetcher {
    pub fn new() -> Self {
        Self
    }

    fn fetch_data_url(&self, url: &str) -> ResourceData {
        // data:[<mediatype>][;base64],<data>
        let Some(rest) = url.strip_prefix("data:") else {
            return ResourceData::failure("malformed data url");
        };
        let Some((header, payload)) = rest.split_once(',') else {
            return ResourceData::failure("data url without a comma");
        };

        let mut mime_type = "text/plain";
        let mut charset = "US-ASCII";
        let mut is_base64 = false;
        for (index, part) in header.split(';').enumerate() {
            let part = part.trim();
            if index == 0 {
                if !part.is_empty() {
                    mime_type = part;
                }
            } else if part.eq_ignore_ascii_case("base64") {
                is_base64 = true;
            } else if let Some(cs) = part.strip_prefix("charset=") {
                charset = cs;
            }
        }

        let bytes = if is_base64 {
            match STANDARD.decode(payload.trim().as_bytes()) {
                Ok(bytes) => bytes,
                Err(e) => return ResourceData::failure(&format!("bad base64 payload: {e}")),
            }
        } else {
            percent_decode(payload)
        };

        ResourceData::new(bytes, mime_type, charset)
    }

    fn fetch_file_url(&self, url: &Url) -> ResourceData {
        let Ok(path) = url.to_file_path() else {
            return ResourceData::failure("file url has no usable path");
        };
        match std::fs::read(&path) {
            Ok(bytes) => ResourceData::new(bytes, "", "UTF-8"),
            Err(e) => ResourceData::failure(&format!("cannot read {}: {e}", path.display())),
        }
    }
}

impl ResourceFetcher for DefaultResourceFetcher {
    fn fetch_url(&self, url: &str) -> ResourceData {
        if url.starts_with("data:") {
            return self.fetch_data_url(url);
        }

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => return ResourceData::failure(&format!("invalid url {url}: {e}")),
        };

        match parsed.scheme() {
            "file" => self.fetch_file_url(&parsed),
            scheme => ResourceData::failure(&format!("unsupported url scheme: {scheme}")),
        }
    }
}

/// Percent-decoding for the non-base64 `data:` form. Malformed escapes pass
/// through literally. The scan stays on bytes: data-url payloads may carry
/// literal multi-byte characters right after a `%`.
fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Some(byte) = hex_pair(bytes[i + 1], bytes[i + 2]) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_plain() {
        let fetcher = DefaultResourceFetcher::new();
        let res = fetcher.fetch_url("data:text/css,p%20%7B%20color%3A%20red%20%7D");
        assert!(!res.is_failure());
        assert_eq!(res.mime_type, "text/css");
        assert_eq!(res.as_text(), "p { color: red }");
    }

    #[test]
    fn data_url_base64() {
        let fetcher = DefaultResourceFetcher::new();
        // "a { color: blue }"
        let res = fetcher.fetch_url("data:text/css;base64,YSB7IGNvbG9yOiBibHVlIH0=");
        assert!(!res.is_failure());
        assert_eq!(res.as_text(), "a { color: blue }");
    }

    #[test]
    fn data_url_defaults() {
        let fetcher = DefaultResourceFetcher::new();
        let res = fetcher.fetch_url("data:,hello");
        assert_eq!(res.mime_type, "text/plain");
        assert_eq!(res.as_text(), "hello");
    }

    #[test]
    fn data_url_literal_multibyte_after_percent() {
        // a bare % followed by a multi-byte character is kept literally
        let fetcher = DefaultResourceFetcher::new();
        let res = fetcher.fetch_url("data:text/css,q::after{content:\"100%€\"}");
        assert!(!res.is_failure());
        assert_eq!(res.as_text(), "q::after{content:\"100%€\"}");
    }

    #[test]
    fn data_url_truncated_escape_is_literal() {
        let fetcher = DefaultResourceFetcher::new();
        let res = fetcher.fetch_url("data:,50%2");
        assert_eq!(res.as_text(), "50%2");
    }

    #[test]
    fn unsupported_scheme_is_reported() {
        let fetcher = DefaultResourceFetcher::new();
        let res = fetcher.fetch_url("gopher://example.com/style.css");
        assert!(res.is_failure());
        assert!(res.bytes.is_empty());
    }

    #[test]
    fn bad_base64_is_reported() {
        let fetcher = DefaultResourceFetcher::new();
        let res = fetcher.fetch_url("data:text/css;base64,!!!");
        assert!(res.is_failure());
    }
}
