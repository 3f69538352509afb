/// Converts between seconds and integer time offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeQuantizer {
    units_per_second: f64,
}

impl TimeQuantizer {
    pub fn new(units_per_second: u32) -> Self {
        Self {
            units_per_second: units_per_second.max(1) as f64,
        }
    }

    /// Negative times clamp to offset zero.
    pub fn to_offset(&self, seconds: f64) -> u64 {
        (seconds.max(0.0) * self.units_per_second) as u64
    }

    pub fn to_seconds(&self, offset: u64) -> f64 {
        offset as f64 / self.units_per_second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantizes_a_tenth_of_a_second() {
        let quantizer = TimeQuantizer::new(44100);
        assert_eq!(quantizer.to_offset(0.1), 4410);
        assert_eq!(quantizer.to_seconds(4410), 0.1);
    }

    #[test]
    fn truncates_and_clamps() {
        let quantizer = TimeQuantizer::new(1000);
        assert_eq!(quantizer.to_offset(0.0019), 1);
        assert_eq!(quantizer.to_offset(-3.0), 0);
    }
}
