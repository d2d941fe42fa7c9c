use crate::canvas::FrameBuffer;

/// Receiver of fully composited frames (the touchpad driver, a file writer,
/// a test recorder).
///
/// The frame is lent for the duration of the call only; a sink that needs
/// the pixels later must copy them.
pub trait DisplaySink: Send + 'static {
    fn push_frame(&mut self, frame: &FrameBuffer) -> anyhow::Result<()>;
}

impl<F> DisplaySink for F
where
    F: FnMut(&FrameBuffer) -> anyhow::Result<()> + Send + 'static,
{
    fn push_frame(&mut self, frame: &FrameBuffer) -> anyhow::Result<()> {
        self(frame)
    }
}

/// Sink that discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn push_frame(&mut self, _frame: &FrameBuffer) -> anyhow::Result<()> {
        Ok(())
    }
}
