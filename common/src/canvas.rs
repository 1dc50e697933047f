/// Bytes per pixel, laid out as R, G, B, A.
pub const DEPTH: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);

    /// Opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; DEPTH] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Fixed-size RGBA raster, row-major.
///
/// The length never changes after construction, every write is clipped to
/// the raster so nothing outside `width * height * DEPTH` is ever touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * DEPTH],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let offset = (y * self.width + x) * DEPTH;
        let [r, g, b, a]: [u8; DEPTH] = self.data[offset..offset + DEPTH].try_into().ok()?;
        Some(Color { r, g, b, a })
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for pixel in self.data.chunks_exact_mut(DEPTH) {
            pixel.copy_from_slice(&bytes);
        }
    }

    /// Fill the rectangle at `(x, y)` sized `w * h`, clipped to the raster.
    ///
    /// Rectangles hanging over any edge draw only their visible part,
    /// rectangles fully outside draw nothing.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let (x0, x1) = clip_span(x, w, self.width);
        let (y0, y1) = clip_span(y, h, self.height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let bytes = color.to_bytes();
        for row in y0..y1 {
            let start = (row * self.width + x0) * DEPTH;
            let end = (row * self.width + x1) * DEPTH;
            for pixel in self.data[start..end].chunks_exact_mut(DEPTH) {
                pixel.copy_from_slice(&bytes);
            }
        }
    }
}

fn clip_span(start: i32, len: i32, limit: usize) -> (usize, usize) {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let start = i64::from(start);
    let end = start + i64::from(len);

    // both ends now lie in 0..=limit
    let lo = start.clamp(0, limit) as usize;
    let hi = end.clamp(0, limit) as usize;
    (lo, hi)
}
