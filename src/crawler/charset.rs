//! Character encoding of archived pages
//!
//! Pages are decoded with the charset the server declared, falling back to a
//! `<meta>` declaration near the top of the document and then to UTF-8. A byte
//! order mark overrides both. The rewritten page is encoded back into the same
//! encoding so the stored bytes still agree with the recorded Content-Type and
//! with the document's own declaration.

use encoding_rs::{Encoding, UTF_8};

/// How far into a document a `<meta>` charset declaration is looked for
const META_PRESCAN_LEN: usize = 1024;

/// Picks the encoding a page body is decoded with
pub fn detect_encoding(content_type: Option<&str>, body: &[u8]) -> &'static Encoding {
    content_type
        .and_then(header_charset)
        .or_else(|| meta_charset(body))
        .unwrap_or(UTF_8)
}

/// Decodes a page body; the returned encoding is the one actually used
pub fn decode_page(body: &[u8], encoding: &'static Encoding) -> (String, &'static Encoding) {
    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!("Malformed {} sequences replaced while decoding", used.name());
    }
    (text.into_owned(), used)
}

/// Encodes serialized page text back into `encoding`
///
/// Characters the encoding cannot represent become numeric character
/// references.
pub fn encode_page(text: &str, encoding: &'static Encoding) -> Vec<u8> {
    let (bytes, _, _) = encoding.output_encoding().encode(text);
    bytes.into_owned()
}

fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let label = value.trim().trim_matches(|c| c == '"' || c == '\'');
        Encoding::for_label(label.as_bytes())
    })
}

fn meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = body[..body.len().min(META_PRESCAN_LEN)].to_ascii_lowercase();

    let mut rest = head.as_slice();
    while let Some(start) = find(rest, b"<meta") {
        let tag = &rest[start..];
        let end = tag.iter().position(|&b| b == b'>').unwrap_or(tag.len());
        if let Some(encoding) = charset_in_tag(&tag[..end]) {
            // A meta declaration of UTF-16 means UTF-8
            return Some(encoding.output_encoding());
        }
        rest = &tag[end..];
    }
    None
}

fn charset_in_tag(tag: &[u8]) -> Option<&'static Encoding> {
    let at = find(tag, b"charset")?;
    let value = trim_start(&tag[at + b"charset".len()..], |b| b.is_ascii_whitespace());
    let value = value.strip_prefix(&b"="[..])?;
    let value = trim_start(value, |b| b.is_ascii_whitespace() || b == b'"' || b == b'\'');
    let label_len = value
        .iter()
        .position(|b| matches!(b, b'"' | b'\'' | b';' | b'/' | b' ' | b'\t' | b'\n' | b'\r'))
        .unwrap_or(value.len());
    Encoding::for_label(&value[..label_len])
}

fn trim_start(bytes: &[u8], skip: impl Fn(u8) -> bool) -> &[u8] {
    let start = bytes.iter().position(|&b| !skip(b)).unwrap_or(bytes.len());
    &bytes[start..]
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
