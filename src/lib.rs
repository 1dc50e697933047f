#[macro_use]
extern crate tracing;

macro_rules! attempt {
    ($io:expr) => {{
        let (result, buf) = { $io };
        result?;
        buf
    }};
}

pub mod config;
pub mod handler;
pub mod listener;
pub mod page;
pub mod pacing;
pub mod request;
pub mod scene;
pub mod session;

pub use self::{
    config::ServerConfig,
    handler::{FrameCycle, Route},
    listener::Server,
    scene::{Hero, Scene},
};
