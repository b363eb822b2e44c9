mod connectivity;
mod playback;
mod settings;
mod track;

use std::time::{Duration, Instant};

use connectivity::{ConnectivityMonitor, MockReachability};
use playback::PlaybackClock;
use settings::PlayerSettings;
use track::{load_track, RidePoint, RideTrack};
use tracing::{debug, info};

/// Frame cap so a demo run terminates on its own
const MAX_FRAMES: u32 = 600;

/// Target frame pacing for the headless loop
const FRAME: Duration = Duration::from_millis(16);

/// Ground speeds below this count as idle (m/s)
const IDLE_SPEED: f64 = 0.5;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    // Load persisted preferences and push them into the clock
    let settings = PlayerSettings::load();
    let mut clock = PlaybackClock::new();
    settings.apply(&mut clock);

    // Load a recorded ride if a path was given, else ride the demo track
    let track_path = std::env::args().nth(1);
    let demo_mode = track_path.is_none();
    let track = match track_path {
        Some(path) => load_track(&path)?,
        None => {
            clock.set_playback_speed(16.0);
            demo_track()
        }
    };
    info!(
        "Track loaded: {} points, {:.1}s",
        track.len(),
        track.duration()
    );

    let idle_ranges = track.idle_ranges(IDLE_SPEED);

    // Watch connectivity for the map-tile banner
    let (source, reachability) = MockReachability::new(Some(true));
    let mut monitor = rt.block_on(async { ConnectivityMonitor::start(source) });

    clock.play();
    let mut last_frame = Instant::now();

    for frame in 0..MAX_FRAMES {
        std::thread::sleep(FRAME);
        let now = Instant::now();
        let delta = (now - last_frame).as_secs_f64();
        last_frame = now;

        let t = clock.tick(delta);

        // The clock never clamps the upper bound; end-of-ride is handled
        // here, by its driver
        if t >= track.duration() {
            clock.pause();
            clock.seek(track.duration());
            info!("Ride finished at {:.1}s", clock.current_time());
            break;
        }

        // Skip-idle is a display preference honored by the driver, not by
        // the clock's time math
        if clock.skip_idle() {
            if let Some(&(_, end)) = idle_ranges.iter().find(|&&(s, e)| t >= s && t < e) {
                debug!("Skipping idle span, jumping to {:.1}s", end);
                clock.seek(end);
            }
        }

        if frame % 60 == 0 {
            if clock.camera_follow() {
                if let Some(point) = track.point_at(clock.current_time()) {
                    debug!(
                        "t={:.1}s pos=({:.5}, {:.5}) ele={:.0}m",
                        clock.current_time(),
                        point.lat,
                        point.lon,
                        point.elevation
                    );
                }
            }

            let snap = rt.block_on(monitor.snapshot());
            if !snap.is_online {
                info!("Offline - serving cached tiles");
            } else if snap.was_offline {
                info!("Back online");
            }
        }

        // Simulated connectivity blip partway through the demo
        if frame == 120 {
            reachability.go_offline();
        }
        if frame == 180 {
            reachability.go_online();
        }
    }

    info!(
        "Playback stopped at {:.1}s (speed {}x)",
        clock.current_time(),
        clock.playback_speed()
    );

    // Demo mode overrides the speed; don't persist that
    if !demo_mode {
        PlayerSettings::capture(&clock).save();
    }
    monitor.shutdown();

    Ok(())
}

/// Synthetic climb used when no track file is given
fn demo_track() -> RideTrack {
    let points = (0..=120)
        .map(|i| {
            let t = i as f64;
            RidePoint {
                time: t,
                lat: 46.5 + t * 0.0002,
                lon: 7.5 + t * 0.0001,
                elevation: 1200.0 + t * 2.5,
                // A stop at a viewpoint partway up
                speed: if (40.0..50.0).contains(&t) { 0.0 } else { 6.0 },
            }
        })
        .collect();

    RideTrack::new(points)
}
