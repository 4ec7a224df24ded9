use super::{check_range, SimulationError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::VecDeque;

/// Simulated time advanced per step
pub const TIME_STEP: f64 = 0.05;

const MAX_CHANNELS: usize = 16;
const MAX_WINDOW: usize = 10_000;
const MAX_STEPS: usize = 100_000;
const NOISE_AMPLITUDE: f64 = 0.2;

// Controller gains
const INTENTION_GAIN: f64 = 2.0;
const CORRECTION_GAIN: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalPoint {
    pub time: f64,
    pub value: f64,
}

/// Multi-channel EMG signal generator with a bounded history per channel.
///
/// Each channel mixes two slowly modulated sine waves plus uniform noise.
#[derive(Debug, Clone)]
pub struct EmgSimulator {
    window: usize,
    time: f64,
    rng: StdRng,
    channels: Vec<VecDeque<SignalPoint>>,
}

impl EmgSimulator {
    pub fn new(channels: usize, window: usize, seed: u64) -> Result<Self, SimulationError> {
        check_range("channels", channels, 1, MAX_CHANNELS)?;
        check_range("window", window, 1, MAX_WINDOW)?;

        Ok(Self {
            window,
            time: 0.0,
            rng: StdRng::seed_from_u64(seed),
            channels: vec![VecDeque::with_capacity(window); channels],
        })
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Recorded points of one channel, oldest first
    pub fn channel(&self, index: usize) -> Option<&VecDeque<SignalPoint>> {
        self.channels.get(index)
    }

    /// Draw one value per channel at time `t` without recording it.
    pub fn sample(&mut self, t: f64) -> Vec<f64> {
        (0..self.channels.len())
            .map(|i| {
                let i = i as f64;
                let freq1 = 0.5 + (t * 0.1 + i * 0.5).sin() * 0.2;
                let freq2 = 1.2 + (t * 0.2 + i).cos() * 0.5;
                let amp1 = 0.5 + (t * 0.05 + i).sin() * 0.4;
                let amp2 = 0.3 + (t * 0.15 + i * 2.0).cos() * 0.2;
                let noise = (self.rng.gen::<f64>() - 0.5) * NOISE_AMPLITUDE;
                (t * freq1).sin() * amp1 + (t * freq2).sin() * amp2 + noise
            })
            .collect()
    }

    /// Advance time, sample every channel and record the values.
    pub fn step(&mut self) -> Vec<f64> {
        self.time += TIME_STEP;
        let t = self.time;
        let values = self.sample(t);

        for (buffer, value) in self.channels.iter_mut().zip(&values) {
            if buffer.len() == self.window {
                buffer.pop_front();
            }
            buffer.push_back(SignalPoint { time: t, value: *value });
        }
        values
    }
}

/// Smooth a series: point `i` becomes the mean of points `i - size ..= i`
/// (clipped at the start).
pub fn moving_average(points: &[SignalPoint], size: usize) -> Vec<SignalPoint> {
    (0..points.len())
        .map(|i| {
            let window = &points[i.saturating_sub(size)..=i];
            let sum: f64 = window.iter().map(|p| p.value).sum();
            SignalPoint {
                time: points[i].time,
                value: sum / window.len() as f64,
            }
        })
        .collect()
}

/// Proportional controller steering an arm angle from EMG activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArmController {
    pub angle: f64,
    pub target: f64,
}

impl ArmController {
    pub fn new(target: f64) -> Self {
        Self { angle: 0.0, target }
    }

    /// Even channels flex and odd channels extend
    pub fn intention(signals: &[f64]) -> f64 {
        signals
            .iter()
            .enumerate()
            .map(|(i, v)| if i % 2 == 0 { *v } else { -*v })
            .sum()
    }

    /// Fold one sample into the angle and return the new angle.
    pub fn update(&mut self, signals: &[f64]) -> f64 {
        let predicted = self.angle + Self::intention(signals) * INTENTION_GAIN;
        let error = self.target - predicted;
        self.angle = predicted + error * CORRECTION_GAIN;
        self.angle
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmgSettings {
    pub channels: usize,
    pub window: usize,
    pub steps: usize,
    pub smoothing: usize,
    pub seed: u64,
    pub target: f64,
}

impl Default for EmgSettings {
    fn default() -> Self {
        Self {
            channels: 4,
            window: 100,
            steps: 100,
            smoothing: 5,
            seed: 42,
            target: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmgSession {
    pub target: f64,
    pub final_angle: f64,
    pub angles: Vec<f64>,          // Controller angle after each step
    pub channels: Vec<Vec<SignalPoint>>, // Smoothed window per channel
}

/// Run the simulator and controller together for `settings.steps` steps.
pub fn simulate_session(settings: &EmgSettings) -> Result<EmgSession, SimulationError> {
    check_range("steps", settings.steps, 1, MAX_STEPS)?;
    check_range("smoothing", settings.smoothing, 0, settings.window)?;
    if !settings.target.is_finite() || settings.target.abs() > 180.0 {
        return Err(SimulationError::InvalidTarget(settings.target));
    }

    let mut simulator = EmgSimulator::new(settings.channels, settings.window, settings.seed)?;
    let mut controller = ArmController::new(settings.target);

    let angles: Vec<f64> = (0..settings.steps)
        .map(|_| {
            let signals = simulator.step();
            controller.update(&signals)
        })
        .collect();

    let channels = (0..simulator.channel_count())
        .filter_map(|i| simulator.channel(i))
        .map(|buffer| {
            let points: Vec<SignalPoint> = buffer.iter().copied().collect();
            moving_average(&points, settings.smoothing)
        })
        .collect();

    tracing::debug!(
        channels = settings.channels,
        steps = settings.steps,
        final_angle = controller.angle,
        "simulated EMG session"
    );

    Ok(EmgSession {
        target: settings.target,
        final_angle: controller.angle,
        angles,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[f64]) -> Vec<SignalPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SignalPoint {
                time: i as f64,
                value: *v,
            })
            .collect()
    }

    #[test]
    fn test_same_seed_same_signals() {
        let mut a = EmgSimulator::new(4, 100, 7).unwrap();
        let mut b = EmgSimulator::new(4, 100, 7).unwrap();
        for _ in 0..50 {
            assert_eq!(a.step(), b.step());
        }
    }

    #[test]
    fn test_different_seed_different_noise() {
        let mut a = EmgSimulator::new(4, 100, 7).unwrap();
        let mut b = EmgSimulator::new(4, 100, 8).unwrap();
        assert_ne!(a.step(), b.step());
    }

    #[test]
    fn test_signal_amplitude_bounded() {
        let mut sim = EmgSimulator::new(4, 100, 1).unwrap();
        for _ in 0..500 {
            for value in sim.step() {
                // amp1 <= 0.9, amp2 <= 0.5, noise <= 0.1
                assert!(value.abs() <= 1.5, "{}", value);
            }
        }
    }

    #[test]
    fn test_window_caps_history() {
        let mut sim = EmgSimulator::new(2, 10, 1).unwrap();
        for _ in 0..25 {
            sim.step();
        }
        let channel = sim.channel(0).unwrap();
        assert_eq!(channel.len(), 10);
        // Oldest kept point is step 16
        assert!((channel[0].time - 16.0 * TIME_STEP).abs() < 1e-9);
        assert!((sim.time() - 25.0 * TIME_STEP).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(matches!(
            EmgSimulator::new(0, 10, 1),
            Err(SimulationError::TooSmall { name: "channels", .. })
        ));
        assert!(matches!(
            EmgSimulator::new(4, 0, 1),
            Err(SimulationError::TooSmall { name: "window", .. })
        ));
        assert!(EmgSimulator::new(17, 10, 1).is_err());
    }

    #[test]
    fn test_moving_average() {
        let smoothed = moving_average(&points(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2);
        let values: Vec<f64> = smoothed.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 1.5, 2.0, 3.0, 4.0]);
        assert_eq!(smoothed[3].time, 3.0);
    }

    #[test]
    fn test_moving_average_size_zero_is_identity() {
        let input = points(&[3.0, -1.0, 2.0]);
        assert_eq!(moving_average(&input, 0), input);
        assert!(moving_average(&[], 5).is_empty());
    }

    #[test]
    fn test_controller_intention() {
        assert_eq!(ArmController::intention(&[1.0, 0.5, 2.0, 0.5]), 2.0);

        let mut controller = ArmController::new(0.0);
        let angle = controller.update(&[1.0, 0.0, 1.0, 0.0]);
        // predicted 4.0, corrected by 10% toward 0
        assert!((angle - 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_controller_converges_without_activity() {
        let mut controller = ArmController::new(90.0);
        assert!((controller.update(&[0.0; 4]) - 9.0).abs() < 1e-9);
        for _ in 0..200 {
            controller.update(&[0.0; 4]);
        }
        assert!((controller.angle - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_session() {
        let settings = EmgSettings {
            steps: 30,
            window: 20,
            ..EmgSettings::default()
        };
        let session = simulate_session(&settings).unwrap();
        assert_eq!(session.angles.len(), 30);
        assert_eq!(session.channels.len(), 4);
        assert!(session.channels.iter().all(|c| c.len() == 20));
        assert_eq!(session.final_angle, *session.angles.last().unwrap());

        let again = simulate_session(&settings).unwrap();
        assert_eq!(session.angles, again.angles);
    }

    #[test]
    fn test_session_rejects_bad_target() {
        let settings = EmgSettings {
            target: 200.0,
            ..EmgSettings::default()
        };
        assert_eq!(
            simulate_session(&settings).unwrap_err(),
            SimulationError::InvalidTarget(200.0)
        );
    }
}
