pub mod clock;

pub use clock::PlaybackClock;

/// Conventional playback speed steps exposed by the speed selector
///
/// The clock accepts any positive multiplier verbatim; this ladder is a UI
/// convention, not an engine invariant.
pub const PLAYBACK_SPEEDS: [f64; 8] = [0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0];
