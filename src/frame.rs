use crate::core::clock::Clock;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the frame source started
    pub time: f64,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f64, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// NaN, infinite or negative frame times advance nothing
pub fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() && delta > 0.0 {
        delta
    } else {
        0.0
    }
}

/// Infinite iterator that yields wall-clock frame information
/// Use this in a loop: `for frame in frames { ... }`
#[derive(Debug, Default)]
pub struct FrameIterator {
    frame_number: u64,
    clock: Clock,
}

impl FrameIterator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    pub fn time(&self) -> f64 {
        self.clock.elapsed()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let delta = self.clock.tick();
        let info = FrameInfo::new(self.frame_number, self.clock.last_tick_time(), delta);
        self.frame_number += 1;
        Some(info)
    }
}

/// Infinite iterator with a constant delta, for headless runs and tests
#[derive(Debug, Clone)]
pub struct FixedStepFrames {
    delta: f32,
    frame_number: u64,
}

impl FixedStepFrames {
    pub fn new(delta: f32) -> Self {
        Self {
            delta,
            frame_number: 0,
        }
    }

    /// Frames at `fps` per second
    pub fn at_fps(fps: f32) -> Self {
        Self::new(1.0 / fps)
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }
}

impl Iterator for FixedStepFrames {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        self.frame_number += 1;
        // time from the frame count so it does not drift with accumulated error
        let time = self.frame_number as f64 * f64::from(self.delta);
        Some(FrameInfo::new(self.frame_number, time, self.delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_step_time_is_exact_multiple() {
        let frames: Vec<_> = FixedStepFrames::at_fps(60.0).take(1440).collect();
        let last = frames.last().unwrap();
        assert_eq!(last.number, 1440);
        assert!((last.time - 24.0).abs() < 1e-3);
        assert!(frames.iter().all(|f| f.delta == frames[0].delta));
    }

    #[test]
    fn sanitize_rejects_bad_deltas() {
        assert_eq!(sanitize_delta(0.016), 0.016);
        assert_eq!(sanitize_delta(-0.016), 0.0);
        assert_eq!(sanitize_delta(f32::NAN), 0.0);
        assert_eq!(sanitize_delta(f32::INFINITY), 0.0);
    }

    #[test]
    fn wall_clock_frames_count_up() {
        let mut frames = FrameIterator::new();
        let first = frames.next().unwrap();
        let second = frames.next().unwrap();
        assert_eq!(first.number, 0);
        assert_eq!(second.number, 1);
        assert!(second.time >= first.time);
        assert!(second.delta >= 0.0);
        assert_eq!(frames.frame_number(), 2);
    }
}
