//! Byte-level helpers for the HTTP subset spoken between server and page.

use std::{fmt, str::FromStr};

pub const CRLF: &[u8] = b"\r\n";
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

#[inline]
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Offset of the first byte after `\r\n\r\n`, if the head is complete.
pub fn head_end(buf: &[u8]) -> Option<usize> {
    find(buf, HEAD_TERMINATOR).map(|pos| pos + HEAD_TERMINATOR.len())
}

/// First line of a message, without its CRLF.
///
/// A buffer without any CRLF is all request line.
pub fn first_line(buf: &[u8]) -> &[u8] {
    match find(buf, CRLF) {
        Some(pos) => &buf[..pos],
        None => buf,
    }
}

/// Value of the `Content-Length` header in `head`, matched case-insensitively.
pub fn content_length(head: &[u8]) -> Option<usize> {
    head.split(|byte| *byte == b'\n')
        .skip(1)
        .filter_map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let colon = line.iter().position(|byte| *byte == b':')?;
            let (name, value) = line.split_at(colon);
            name.eq_ignore_ascii_case(b"content-length")
                .then_some(&value[1..])
        })
        .find_map(|value| std::str::from_utf8(value).ok()?.trim().parse().ok())
}

/// How a frame travels in a response body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameEncoding {
    /// Pixel bytes verbatim.
    #[default]
    Raw,
    /// `[r,g,b,a,...]` as decimal text.
    Json,
}

impl FrameEncoding {
    pub fn encode(self, pixels: &[u8], out: &mut Vec<u8>) {
        match self {
            Self::Raw => out.extend_from_slice(pixels),
            Self::Json => {
                let mut num_buf = itoa::Buffer::new();
                out.reserve(pixels.len() * 4 + 2);
                out.push(b'[');
                for (idx, byte) in pixels.iter().enumerate() {
                    if idx != 0 {
                        out.push(b',');
                    }
                    out.extend_from_slice(num_buf.format(*byte).as_bytes());
                }
                out.push(b']');
            }
        }
    }

    pub fn decode(self, body: &[u8]) -> anyhow::Result<Vec<u8>> {
        match self {
            Self::Raw => Ok(body.to_vec()),
            Self::Json => {
                let text = std::str::from_utf8(body)?.trim();
                let inner = text
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .ok_or_else(|| anyhow::anyhow!("frame is not a JSON array"))?;

                if inner.trim().is_empty() {
                    return Ok(Vec::new());
                }

                inner
                    .split(',')
                    .map(|num| num.trim().parse::<u8>().map_err(anyhow::Error::from))
                    .collect()
            }
        }
    }
}

impl FromStr for FrameEncoding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Self::Raw),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown frame encoding {other:?} (expected raw or json)"),
        }
    }
}

impl fmt::Display for FrameEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "raw",
            Self::Json => "json",
        })
    }
}
