//! Frame pacing. The editor thinks in frames of the 59.7 Hz video clock;
//! how a frontend actually spends that time (vsync, sleeping, nothing at
//! all in tests) is its own business.

/// Blocks until the next frame boundary.
pub trait FrameClock {
    fn wait_frame(&mut self);

    fn wait_frames(&mut self, frames: u8) {
        for _ in 0..frames {
            self.wait_frame();
        }
    }
}
