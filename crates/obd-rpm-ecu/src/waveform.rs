//! Synthetic engine RPM waveform
//!
//! The simulated engine repeats a 90 second cycle made of three 30 second
//! phases. Inside a phase the value climbs linearly with the second index;
//! at each phase edge it jumps straight to the next phase's base value.
//!
//! ```text
//! second  phase    value
//!  0..29  low      4000 + 70 * i
//! 30..59  medium   6000 + 200 * i
//! 60..89  high    12000 + 270 * i
//! ```
//!
//! The returned value is the raw PID 0x0C payload, i.e. what goes on the
//! wire in bytes A/B of the response.

/// Length of a single phase, in seconds
pub const PHASE_LEN_SECS: u64 = 30;

/// Length of the full low/medium/high cycle, in seconds
pub const CYCLE_LEN_SECS: u64 = 3 * PHASE_LEN_SECS;

/// Section of the cycle the simulated engine is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveformPhase {
    Low,
    Medium,
    High,
}

impl WaveformPhase {
    /// Phase and index within that phase for an elapsed time
    pub fn at(elapsed_secs: u64) -> (Self, u32) {
        let second = elapsed_secs % CYCLE_LEN_SECS;
        let phase = match second / PHASE_LEN_SECS {
            0 => Self::Low,
            1 => Self::Medium,
            _ => Self::High,
        };
        (phase, (second % PHASE_LEN_SECS) as u32)
    }

    /// Value at index 0 of the phase
    pub fn base(self) -> u32 {
        match self {
            Self::Low => 4000,
            Self::Medium => 6000,
            Self::High => 12000,
        }
    }

    /// Increment per elapsed second within the phase
    pub fn slope(self) -> u32 {
        match self {
            Self::Low => 70,
            Self::Medium => 200,
            Self::High => 270,
        }
    }
}

/// RPM value for a number of seconds since the simulation started
pub fn rpm_for(elapsed_secs: u64) -> u32 {
    let (phase, index) = WaveformPhase::at(elapsed_secs);
    phase.base() + phase.slope() * index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_boundaries() {
        assert_eq!(rpm_for(0), 4000);
        assert_eq!(rpm_for(29), 6030);
        assert_eq!(rpm_for(30), 6000);
        assert_eq!(rpm_for(59), 11800);
        assert_eq!(rpm_for(60), 12000);
        assert_eq!(rpm_for(89), 19830);
    }

    #[test]
    fn repeats_every_cycle() {
        for elapsed in 0..(4 * CYCLE_LEN_SECS) {
            assert_eq!(rpm_for(elapsed), rpm_for(elapsed + CYCLE_LEN_SECS));
        }
        assert_eq!(rpm_for(90), 4000);
        assert_eq!(rpm_for(u64::MAX - 1), rpm_for((u64::MAX - 1) % CYCLE_LEN_SECS));
    }

    #[test]
    fn drops_at_low_to_medium_edge() {
        // 6030 -> 6000 is a step down, not smoothed
        assert!(rpm_for(30) < rpm_for(29));
        assert!(rpm_for(60) > rpm_for(59));
        assert!(rpm_for(90) < rpm_for(89));
    }

    #[test]
    fn monotonic_within_phase() {
        for start in [0, 30, 60] {
            for i in start..start + PHASE_LEN_SECS - 1 {
                assert!(rpm_for(i + 1) > rpm_for(i), "not increasing at {i}");
            }
        }
    }

    #[test]
    fn phase_lookup() {
        assert_eq!(WaveformPhase::at(0), (WaveformPhase::Low, 0));
        assert_eq!(WaveformPhase::at(45), (WaveformPhase::Medium, 15));
        assert_eq!(WaveformPhase::at(89), (WaveformPhase::High, 29));
        assert_eq!(WaveformPhase::at(181), (WaveformPhase::Low, 1));
    }

    #[test]
    fn fits_in_pid_payload() {
        let max = (0..CYCLE_LEN_SECS).map(rpm_for).max().unwrap();
        assert_eq!(max, 19830);
        assert!(max <= u16::MAX as u32);
    }
}
