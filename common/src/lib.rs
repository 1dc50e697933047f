mod canvas;
mod input;
pub mod wire;

pub use self::{
    canvas::{Color, DEPTH, PixelBuffer},
    input::{InputVector, KEY_DOWN, KEY_SLOTS, KEY_UP, KeyCode},
    wire::FrameEncoding,
};
