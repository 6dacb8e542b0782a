//! HTTP Range request parsing
//!
//! Single `bytes` ranges only. Multi-range requests fall back to the full body.

/// Inclusive byte range resolved against a known length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    /// Value for the `Content-Range` header
    pub fn content_range(&self, total: usize) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// Outcome of looking at a `Range` header
#[derive(Debug, PartialEq, Eq)]
pub enum RangeRequest {
    /// Serve this part with 206
    Partial(ByteRange),
    /// Answer 416
    Unsatisfiable,
    /// No usable range, serve everything
    Full,
}

/// Parse a `Range` header against a body of `size` bytes
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
///
/// # Examples
/// ```
/// use spa_static::http::range::{parse_range, ByteRange, RangeRequest};
///
/// assert_eq!(
///     parse_range("bytes=0-99", 1000),
///     RangeRequest::Partial(ByteRange { start: 0, end: 99 })
/// );
/// assert_eq!(parse_range("items=0-1", 1000), RangeRequest::Full);
/// ```
pub fn parse_range(header: &str, size: usize) -> RangeRequest {
    let Some(spec) = header.trim().strip_prefix("bytes=") else {
        return RangeRequest::Full;
    };
    if spec.contains(',') {
        return RangeRequest::Full;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeRequest::Full;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        // suffix: the final N bytes
        return match last.parse::<usize>() {
            Ok(0) => RangeRequest::Unsatisfiable,
            Ok(_) if size == 0 => RangeRequest::Unsatisfiable,
            Ok(n) => RangeRequest::Partial(ByteRange {
                start: size.saturating_sub(n),
                end: size - 1,
            }),
            Err(_) => RangeRequest::Full,
        };
    }

    let Ok(start) = first.parse::<usize>() else {
        return RangeRequest::Full;
    };
    if start >= size {
        return RangeRequest::Unsatisfiable;
    }

    let end = if last.is_empty() {
        size - 1
    } else {
        match last.parse::<usize>() {
            Ok(end) if end < start => return RangeRequest::Full,
            Ok(end) => end.min(size - 1),
            Err(_) => return RangeRequest::Full,
        }
    };

    RangeRequest::Partial(ByteRange { start, end })
}
