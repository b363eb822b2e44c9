use crate::playback::PLAYBACK_SPEEDS;

/// Virtual ride-time clock
///
/// Owns elapsed ride seconds, play/pause state, the playback speed
/// multiplier and two display toggles. The clock never reads wall-clock
/// time itself: an external frame loop measures real elapsed seconds and
/// feeds them to `tick`, which scales them by the current speed. That keeps
/// the speed multiplier testable without real time and lets one animation
/// loop serve any multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackClock {
    is_playing: bool,
    current_time: f64,
    playback_speed: f64,
    camera_follow: bool,
    skip_idle: bool,
}

impl PlaybackClock {
    /// Initial snapshot restored by `reset`
    const DEFAULT: PlaybackClock = PlaybackClock {
        is_playing: false,
        current_time: 0.0,
        playback_speed: 1.0,
        camera_follow: true,
        skip_idle: false,
    };

    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Start playback. Idempotent.
    pub fn play(&mut self) {
        self.is_playing = true;
    }

    /// Pause playback. Idempotent.
    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    /// Flip between playing and paused
    pub fn toggle(&mut self) {
        self.is_playing = !self.is_playing;
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Elapsed virtual seconds since ride start
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Jump to a virtual time in seconds
    ///
    /// Negative targets clamp to 0. No upper bound is enforced; callers
    /// that want end-of-ride behavior clamp against the track duration
    /// themselves.
    pub fn seek(&mut self, time: f64) {
        self.current_time = time.max(0.0);
    }

    /// Set the speed multiplier verbatim
    ///
    /// Values are expected to come from `PLAYBACK_SPEEDS` but that is a
    /// caller contract; any value is stored as-is.
    pub fn set_playback_speed(&mut self, speed: f64) {
        self.playback_speed = speed;
    }

    pub fn playback_speed(&self) -> f64 {
        self.playback_speed
    }

    /// Advance to the next entry of the speed ladder, wrapping to the
    /// slowest after the fastest. A speed set outside the ladder moves to
    /// the next larger entry.
    pub fn cycle_playback_speed(&mut self) {
        self.playback_speed = PLAYBACK_SPEEDS
            .iter()
            .copied()
            .find(|&s| s > self.playback_speed)
            .unwrap_or(PLAYBACK_SPEEDS[0]);
    }

    pub fn camera_follow(&self) -> bool {
        self.camera_follow
    }

    pub fn set_camera_follow(&mut self, enabled: bool) {
        self.camera_follow = enabled;
    }

    pub fn toggle_camera_follow(&mut self) {
        self.camera_follow = !self.camera_follow;
    }

    pub fn skip_idle(&self) -> bool {
        self.skip_idle
    }

    pub fn set_skip_idle(&mut self, enabled: bool) {
        self.skip_idle = enabled;
    }

    pub fn toggle_skip_idle(&mut self) {
        self.skip_idle = !self.skip_idle;
    }

    /// Advance virtual time by one frame (call each frame)
    ///
    /// `delta_seconds` is the wall-clock time since the previous frame,
    /// assumed non-negative. While paused this is a no-op and returns the
    /// unchanged time. While playing the delta is scaled by the speed
    /// multiplier and accumulated; the new time is returned unclamped, so
    /// the driving loop detects passing the end of the track itself.
    pub fn tick(&mut self, delta_seconds: f64) -> f64 {
        if !self.is_playing {
            return self.current_time;
        }

        self.current_time += delta_seconds * self.playback_speed;
        self.current_time
    }

    /// Pause and nudge forward by a fixed amount
    pub fn step_forward(&mut self, seconds: f64) {
        self.pause();
        let target = self.current_time + seconds;
        self.seek(target);
    }

    /// Pause and nudge backward by a fixed amount, stopping at 0
    pub fn step_back(&mut self, seconds: f64) {
        self.pause();
        let target = self.current_time - seconds;
        self.seek(target);
    }

    /// Restore the initial snapshot, discarding all accumulated state
    pub fn reset(&mut self) {
        *self = Self::DEFAULT;
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}
