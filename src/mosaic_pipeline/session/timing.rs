use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

/// Stages one frame insertion passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Correct,
    Downscale,
    Register,
    Composite,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Correct, Step::Downscale, Step::Register, Step::Composite];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Correct => "correct",
            Step::Downscale => "downscale",
            Step::Register => "register",
            Step::Composite => "composite",
        };
        f.write_str(name)
    }
}

/// Wall-clock cost of each step of one frame insertion. The anchor frame has
/// no `Register` entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepTimings {
    slots: [Option<Duration>; 4],
}

impl StepTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` and stores its duration under `step`.
    pub fn time<T>(&mut self, step: Step, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.slots[step.index()] = Some(start.elapsed());
        out
    }

    pub fn get(&self, step: Step) -> Option<Duration> {
        self.slots[step.index()]
    }

    pub fn total(&self) -> Duration {
        self.slots.iter().flatten().sum()
    }

    pub fn log_summary(&self) {
        let ms = |d: Duration| d.as_secs_f64() * 1000.0;
        let slot = |step| self.get(step).map(ms).unwrap_or(0.0);
        debug!(
            correct_ms = slot(Step::Correct),
            downscale_ms = slot(Step::Downscale),
            register_ms = slot(Step::Register),
            composite_ms = slot(Step::Composite),
            total_ms = ms(self.total()),
            "Frame step timings"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_fills_only_its_slot() {
        let mut timings = StepTimings::new();
        let value = timings.time(Step::Register, || 42);
        assert_eq!(value, 42);
        assert!(timings.get(Step::Register).is_some());
        for step in [Step::Correct, Step::Downscale, Step::Composite] {
            assert_eq!(timings.get(step), None, "{step}");
        }
    }

    #[test]
    fn test_total_sums_recorded_steps() {
        let mut timings = StepTimings::new();
        timings.time(Step::Correct, || std::thread::sleep(Duration::from_millis(2)));
        timings.time(Step::Composite, || std::thread::sleep(Duration::from_millis(3)));
        assert!(timings.total() >= Duration::from_millis(5));
        assert_eq!(
            timings.total(),
            timings.get(Step::Correct).unwrap() + timings.get(Step::Composite).unwrap()
        );
    }

    #[test]
    fn test_steps_listed_in_pipeline_order() {
        let names: Vec<String> = Step::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, ["correct", "downscale", "register", "composite"]);
    }
}
