//! Response body reading with a size ceiling.

use futures::{Stream, StreamExt};
use log::{debug, warn};

/// A body read from the wire, possibly cut at the size ceiling.
#[derive(Debug)]
pub(crate) struct LimitedBody {
    pub bytes: Vec<u8>,
    pub truncated: bool,
}

/// Collects a chunk stream into at most `max_size` bytes.
///
/// Oversized bodies are cut at the ceiling and marked truncated instead of
/// failing. A stream error after some bytes arrived keeps what was read (also
/// marked truncated); an error before the first byte is returned.
pub(crate) async fn collect_limited<S, B, E>(
    mut stream: S,
    max_size: usize,
    url: &str,
) -> Result<LimitedBody, E>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut buf = Vec::with_capacity(max_size.min(64 * 1024));

    while let Some(chunk_result) = stream.next().await {
        let chunk = match chunk_result {
            Ok(c) => c,
            Err(e) if buf.is_empty() => return Err(e),
            Err(e) => {
                warn!(
                    "Body stream for {} failed after {} bytes, keeping partial body: {}",
                    url,
                    buf.len(),
                    e
                );
                return Ok(LimitedBody {
                    bytes: buf,
                    truncated: true,
                });
            }
        };
        let chunk = chunk.as_ref();

        let remaining = max_size - buf.len();
        if chunk.len() > remaining {
            buf.extend_from_slice(&chunk[..remaining]);
            debug!(
                "Body for {} exceeds {}KB limit, truncating",
                url,
                max_size / 1024
            );
            return Ok(LimitedBody {
                bytes: buf,
                truncated: true,
            });
        }
        buf.extend_from_slice(chunk);
    }

    Ok(LimitedBody {
        bytes: buf,
        truncated: false,
    })
}

/// Decodes body bytes as UTF-8, replacing invalid sequences with U+FFFD.
pub(crate) fn decode_body(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Returns true when a `Content-Type` value looks like an HTML document.
pub(crate) fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
