#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, load_config, load_rgba, ring_image, write_frame_png, FrameOutput,
};
