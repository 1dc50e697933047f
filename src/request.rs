use keepframe_common::wire;

/// One decoded request, borrowing from the bytes it was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Request<'a> {
    pub line: &'a [u8],
    /// Empty unless the method is POST.
    pub body: &'a [u8],
}

impl<'a> Request<'a> {
    /// Split one complete request into line and body.
    ///
    /// Never fails: anything malformed decodes to an empty body, or to a
    /// line nothing routes on.
    pub fn decode(raw: &'a [u8]) -> Self {
        let line = wire::first_line(raw);
        let body = if line.starts_with(b"POST") {
            wire::head_end(raw).map_or(&[][..], |end| &raw[end..])
        } else {
            &[]
        };

        Self { line, body }
    }
}

/// Reassembles requests out of however the peer's bytes happen to arrive.
///
/// A request is complete once its head is terminated and, for POST, once
/// `Content-Length` body bytes are buffered. A POST without that header
/// takes whatever follows its head. Bytes past the end of one request stay
/// queued for the next.
#[derive(Debug)]
pub struct RequestAssembler {
    buf: Vec<u8>,
    max_size: usize,
}

impl RequestAssembler {
    pub fn new(max_size: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_size,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Take the next complete request off the front of the buffer.
    pub fn next_request(&mut self) -> anyhow::Result<Option<Vec<u8>>> {
        let Some(head_end) = wire::head_end(&self.buf) else {
            anyhow::ensure!(
                self.buf.len() <= self.max_size,
                "request head exceeds {} bytes",
                self.max_size
            );
            return Ok(None);
        };

        let head = &self.buf[..head_end];
        let is_post = wire::first_line(head).starts_with(b"POST");
        let body_len = match wire::content_length(head) {
            Some(len) => len,
            None if is_post => self.buf.len() - head_end,
            None => 0,
        };

        let total = head_end.saturating_add(body_len);
        anyhow::ensure!(
            total <= self.max_size,
            "request of {total} bytes exceeds {} bytes",
            self.max_size
        );

        if self.buf.len() < total {
            return Ok(None);
        }

        Ok(Some(self.buf.drain(..total).collect()))
    }
}
