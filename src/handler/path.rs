//! Lookup key helpers

use hyper::http::request::Parts;
use std::borrow::Cow;

/// Default lookup key: the decoded URL path, cleaned, without the leading `/`.
///
/// `/` and anything that cleans to it map to the empty key.
pub fn default_path_extractor(parts: &Parts) -> String {
    let decoded = percent_decode(parts.uri.path());
    let cleaned = clean_path(&decoded);
    if let Some(relative) = cleaned.strip_prefix('/') {
        return relative.to_string();
    }
    cleaned
}

/// Lexically normalise a slash-separated path.
///
/// Collapses repeated separators, drops `.` elements and resolves `..`
/// against the preceding element. `..` cannot climb above a rooted path.
/// An empty result is `/` for rooted input and `.` otherwise.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut elems: Vec<&str> = Vec::new();

    for elem in path.split('/') {
        match elem {
            "" | "." => {}
            ".." => match elems.last() {
                Some(&last) if last != ".." => {
                    elems.pop();
                }
                _ if rooted => {}
                _ => elems.push(".."),
            },
            _ => elems.push(elem),
        }
    }

    let joined = elems.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// File extension of the last path element, including the dot.
///
/// Empty when the last element has no `.`; a trailing dot yields `"."`.
pub fn extension(path: &str) -> &str {
    let last = path.rsplit('/').next().unwrap_or(path);
    last.rfind('.').map_or("", |dot| &last[dot..])
}

/// Decode `%XX` escapes. Malformed escapes are kept as written and decoded
/// bytes that are not UTF-8 are replaced.
fn percent_decode(input: &str) -> Cow<'_, str> {
    if !input.contains('%') {
        return Cow::Borrowed(input);
    }

    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    match String::from_utf8(out) {
        Ok(decoded) => Cow::Owned(decoded),
        Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}

const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
