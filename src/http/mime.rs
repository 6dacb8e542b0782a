//! MIME type detection
//!
//! Extension lookup first, then a look at the leading bytes of the content.

/// Get MIME Content-Type for a known file extension
///
/// # Examples
/// ```
/// use spa_static::http::mime::get_content_type;
/// assert_eq!(get_content_type("html"), Some("text/html; charset=utf-8"));
/// assert_eq!(get_content_type("MP4"), Some("video/mp4"));
/// assert_eq!(get_content_type("xyz"), None);
/// ```
pub fn get_content_type(extension: &str) -> Option<&'static str> {
    let content_type = match extension.to_ascii_lowercase().as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "txt" | "md" => "text/plain; charset=utf-8",
        "xml" => "text/xml; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",

        // Scripts and data
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Video and audio
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",

        _ => return None,
    };
    Some(content_type)
}

/// Guess a Content-Type from the first bytes of the content
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"%PDF-", "application/pdf"),
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"\x00asm", "application/wasm"),
        (b"wOFF", "font/woff"),
        (b"wOF2", "font/woff2"),
        (b"\x1f\x8b\x08", "application/gzip"),
        (b"PK\x03\x04", "application/zip"),
    ];

    if let Some((_, content_type)) = SIGNATURES.iter().find(|(sig, _)| data.starts_with(sig)) {
        return *content_type;
    }

    let head = &data[..data.len().min(512)];
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let text = &head[start..];
    let lower = text
        .iter()
        .take(14)
        .map(u8::to_ascii_lowercase)
        .collect::<Vec<_>>();
    if ["<!doctype html", "<html", "<head", "<body", "<script"]
        .iter()
        .any(|tag| lower.starts_with(tag.as_bytes()))
    {
        return "text/html; charset=utf-8";
    }
    if text.starts_with(b"<?xml") {
        return "text/xml; charset=utf-8";
    }

    let is_binary = head
        .iter()
        .any(|b| matches!(b, 0x00..=0x08 | 0x0b | 0x0e..=0x1a | 0x1c..=0x1f));
    // a cut at 512 bytes may split a UTF-8 sequence
    let invalid_utf8 = std::str::from_utf8(head).is_err() && data.len() <= 512;
    if is_binary || invalid_utf8 {
        "application/octet-stream"
    } else {
        "text/plain; charset=utf-8"
    }
}

/// Content-Type for a file: by extension of `name`, else by sniffing `data`
pub fn detect_content_type(name: &str, data: &[u8]) -> &'static str {
    let base = name.rsplit('/').next().unwrap_or(name);
    base.rfind('.')
        .and_then(|dot| get_content_type(&base[dot + 1..]))
        .unwrap_or_else(|| sniff_content_type(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type("html"), Some("text/html; charset=utf-8"));
        assert_eq!(get_content_type("css"), Some("text/css; charset=utf-8"));
        assert_eq!(get_content_type("js"), Some("text/javascript; charset=utf-8"));
        assert_eq!(get_content_type("json"), Some("application/json"));
        assert_eq!(get_content_type("PNG"), Some("image/png"));
        assert_eq!(get_content_type("xyz"), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(sniff_content_type(b"\x89PNG\r\n\x1a\n...."), "image/png");
        assert_eq!(
            sniff_content_type(b"  <!DOCTYPE html><html>"),
            "text/html; charset=utf-8"
        );
        assert_eq!(sniff_content_type(b"plain words"), "text/plain; charset=utf-8");
        assert_eq!(sniff_content_type(b"\x00\x01\x02"), "application/octet-stream");
    }

    #[test]
    fn test_detect_content_type() {
        assert_eq!(
            detect_content_type("assets/app.js", b"console.log(1)"),
            "text/javascript; charset=utf-8"
        );
        assert_eq!(
            detect_content_type("LICENSE", b"MIT License"),
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            detect_content_type("v1.2/blob", b"\x89PNG\r\n\x1a\n"),
            "image/png"
        );
    }
}
