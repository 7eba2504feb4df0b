use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::UTF_8;
use tracing::{debug, warn};

use crate::error::{EvalError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Reads a prompt file and decodes it to a `String`.
///
/// Files exported from different editors end up in different encodings; a
/// UTF-8 BOM is honoured and stripped, anything else goes through charset
/// detection before decoding.
pub fn decode_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| EvalError::io(path, e))?;
    Ok(decode_bytes(path, &bytes))
}

pub fn decode_bytes(path: &Path, bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&UTF8_BOM) {
        let (text, _, had_errors) = UTF_8.decode(rest);
        if had_errors {
            warn!(path = %path.display(), "invalid UTF-8 after BOM, replaced bad sequences");
        }
        return text.into_owned();
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    debug!(path = %path.display(), encoding = encoding.name(), "decoding prompt file");

    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            path = %path.display(),
            encoding = encoding.name(),
            "decoding produced replacement characters"
        );
    }

    text.into_owned()
}
