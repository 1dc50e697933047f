use keepframe_common::{Color, InputVector, KeyCode, PixelBuffer};

/// Render callback driven once per POST cycle.
pub trait Scene {
    /// Advance the simulation by one cycle.
    fn update(&mut self, input: &InputVector<'_>);

    /// Redraw the whole frame.
    fn draw(&self, canvas: &mut PixelBuffer);
}

/// A red square steered with the arrow keys.
#[derive(Clone, Debug, PartialEq)]
pub struct Hero {
    x: f32,
    y: f32,
}

impl Hero {
    pub const SPEED: f32 = 8.0;
    pub const HALF_SIZE: f32 = 4.0;
    pub const COLOR: Color = Color::RED;
    pub const BACKGROUND: Color = Color::BLACK;

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn centered(width: usize, height: usize) -> Self {
        Self::new(0.5 * width as f32, 0.5 * height as f32)
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

impl Scene for Hero {
    fn update(&mut self, input: &InputVector<'_>) {
        if input.is_down(KeyCode::ArrowLeft) {
            self.x -= Self::SPEED;
        }
        if input.is_down(KeyCode::ArrowUp) {
            self.y -= Self::SPEED;
        }
        if input.is_down(KeyCode::ArrowRight) {
            self.x += Self::SPEED;
        }
        if input.is_down(KeyCode::ArrowDown) {
            self.y += Self::SPEED;
        }
    }

    fn draw(&self, canvas: &mut PixelBuffer) {
        let size = (2.0 * Self::HALF_SIZE) as i32;
        canvas.clear(Self::BACKGROUND);
        canvas.fill_rect(
            (self.x - Self::HALF_SIZE) as i32,
            (self.y - Self::HALF_SIZE) as i32,
            size,
            size,
            Self::COLOR,
        );
    }
}
