pub mod braille;
pub mod input;
pub mod render;
pub mod sink;

pub use render::render;
pub use sink::{FrameSink, FrameView, HeadlessSink, SinkSignal, TerminalSink};
