use crate::{page, request::Request, scene::Scene};
use keepframe_common::{FrameEncoding, InputVector, PixelBuffer};

/// What a request line asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// `GET /`, the bootstrap page.
    Page,
    /// `POST /`, one input/update/draw cycle.
    Frame,
    /// Anything else. Answered with an empty body.
    Empty,
}

impl Route {
    pub fn of(line: &[u8]) -> Self {
        if line.starts_with(b"GET / ") {
            Self::Page
        } else if line.starts_with(b"POST / ") {
            Self::Frame
        } else {
            Self::Empty
        }
    }
}

/// Scene, render target and page, driven one request at a time.
pub struct FrameCycle<S> {
    scene: S,
    canvas: PixelBuffer,
    encoding: FrameEncoding,
    page: String,
    frame: Vec<u8>,
}

impl<S: Scene> FrameCycle<S> {
    pub fn new(scene: S, width: usize, height: usize, encoding: FrameEncoding) -> Self {
        Self {
            scene,
            canvas: PixelBuffer::new(width, height),
            encoding,
            page: page::bootstrap_document(width, height, encoding),
            frame: Vec::new(),
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    /// Answer `request`, appending the full response to `out`.
    pub fn respond(&mut self, request: &Request<'_>, out: &mut Vec<u8>) -> Route {
        let route = Route::of(request.line);
        match route {
            Route::Page => write_response(out, self.page.as_bytes()),
            Route::Frame => {
                self.scene.update(&InputVector::new(request.body));
                self.scene.draw(&mut self.canvas);

                self.frame.clear();
                self.encoding.encode(self.canvas.as_bytes(), &mut self.frame);
                write_response(out, &self.frame);
            }
            Route::Empty => write_response(out, &[]),
        }

        route
    }
}

/// Status line, the two headers and `body`.
///
/// Content-Type is `text/html` for every body, pixel frames included; the
/// page reads frames as bytes and never looks at it.
pub fn write_response(out: &mut Vec<u8>, body: &[u8]) {
    let mut num_buf = itoa::Buffer::new();

    out.reserve(body.len() + 80);
    out.extend_from_slice(b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: ");
    out.extend_from_slice(num_buf.format(body.len()).as_bytes());
    out.extend_from_slice(b"\r\n\r\n");
    out.extend_from_slice(body);
}
