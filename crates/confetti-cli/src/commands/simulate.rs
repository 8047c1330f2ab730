//! Headless simulation command

use anyhow::{bail, Context, Result};
use confetti_core::Rect;
use confetti_particles::{load_parties, presets, ConfettiDriver, FrameClock, Party};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Frame cap when running until every party ended
const MAX_FRAMES: u32 = 100_000;

pub struct SimulateArgs {
    pub file: Option<String>,
    pub preset: Option<String>,
    pub width: f32,
    pub height: f32,
    pub fps: f32,
    pub frames: Option<u32>,
    pub density: f32,
    pub seed: Option<u64>,
    pub jitter: f32,
    /// Frame index and the extra milliseconds it takes
    pub stall: Option<(u32, f64)>,
    pub format: String,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        bail!("--fps must be a positive number, got {}", args.fps);
    }
    if !(0.0..1.0).contains(&args.jitter) {
        bail!("--jitter must be in [0, 1), got {}", args.jitter);
    }
    let area = Rect::from_size(args.width, args.height);
    if area.is_empty() {
        bail!("draw area must have a positive size");
    }

    let parties = load_input(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("simulating {} parties with seed {seed}", parties.len());

    let mut driver = ConfettiDriver::with_seed(args.density, seed);
    driver.add_parties(parties)?;

    let mut timing = FrameTiming::new(args.fps, args.jitter, args.stall, seed);
    let mut clock = FrameClock::new();
    let frame_limit = args.frames.unwrap_or(MAX_FRAMES);
    let json = args.format == "json";

    let mut peak_drawn = 0;
    let mut frames_run = 0;
    for frame in 0..frame_limit {
        let frame_ms = timing.next_timestamp(frame);
        let delta = clock.tick(frame_ms);
        let drawn = driver.tick(delta, &area).len();
        peak_drawn = peak_drawn.max(drawn);
        frames_run += 1;

        let ended = driver.drain_events();
        if json {
            let line = serde_json::json!({
                "frame": frame,
                "time_ms": frame_ms,
                "delta_ms": delta * 1000.0,
                "alive": driver.total_alive(),
                "ended": ended.iter().map(|e| e.id.raw()).collect::<Vec<_>>(),
                "particles": driver.snapshots(),
            });
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!(
                "frame {:>5}  t={:>9.1}ms  dt={:>6.1}ms  drawn={:>5}  alive={:>5}",
                frame,
                frame_ms,
                delta * 1000.0,
                drawn,
                driver.total_alive()
            );
            for event in &ended {
                println!(
                    "  system {} ended, {} still running",
                    event.id, event.active_systems
                );
            }
        }

        if args.frames.is_none() && driver.is_idle() {
            break;
        }
    }

    if !json {
        println!();
        println!(
            "{} frame(s), {:.1}s simulated, peak {} particle(s) drawn",
            frames_run, clock.total_time, peak_drawn
        );
        if !driver.is_idle() {
            println!("{} system(s) still running", driver.running_count());
        }
    }

    Ok(())
}

fn load_input(args: &SimulateArgs) -> Result<Vec<Party>> {
    match (&args.file, &args.preset) {
        (Some(file), _) => {
            load_parties(file).with_context(|| format!("failed to load party file '{file}'"))
        }
        (None, Some(name)) => Ok(presets::by_name(name)?),
        (None, None) => bail!("give a party file or --preset <NAME>"),
    }
}

/// Synthetic host frame timestamps: a steady rate with optional jitter and
/// one stalled frame.
struct FrameTiming {
    interval_ms: f64,
    jitter: f64,
    stall: Option<(u32, f64)>,
    now_ms: f64,
    rng: StdRng,
}

impl FrameTiming {
    fn new(fps: f32, jitter: f32, stall: Option<(u32, f64)>, seed: u64) -> Self {
        Self {
            interval_ms: 1000.0 / fps as f64,
            jitter: jitter as f64,
            stall,
            now_ms: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn next_timestamp(&mut self, frame: u32) -> f64 {
        if frame > 0 {
            let mut step = self.interval_ms;
            if self.jitter > 0.0 {
                step *= 1.0 + self.jitter * self.rng.random_range(-1.0..1.0);
            }
            if let Some((stall_frame, stall_ms)) = self.stall {
                if frame == stall_frame {
                    step += stall_ms.max(0.0);
                }
            }
            self.now_ms += step;
        }
        self.now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_timestamps() {
        let mut timing = FrameTiming::new(10.0, 0.0, None, 1);
        let stamps: Vec<f64> = (0..4).map(|f| timing.next_timestamp(f)).collect();
        assert_eq!(stamps, vec![0.0, 100.0, 200.0, 300.0]);
    }

    #[test]
    fn stalled_frame_arrives_late() {
        let mut timing = FrameTiming::new(10.0, 0.0, Some((2, 1900.0)), 1);
        let stamps: Vec<f64> = (0..4).map(|f| timing.next_timestamp(f)).collect();
        assert_eq!(stamps, vec![0.0, 100.0, 2100.0, 2200.0]);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let mut timing = FrameTiming::new(60.0, 0.5, None, 7);
        let interval = 1000.0 / 60.0;
        let mut last = timing.next_timestamp(0);
        for frame in 1..200 {
            let now = timing.next_timestamp(frame);
            let step = now - last;
            assert!(step >= interval * 0.5 - 1e-9 && step <= interval * 1.5 + 1e-9);
            last = now;
        }
    }
}
