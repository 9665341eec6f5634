use std::fmt;

const SECONDS_PER_DAY: u64 = 24 * 3600;

/// Whole days, hours, minutes and seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Elapsed {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Elapsed {
    pub fn from_seconds(total: u64) -> Self {
        let days = total / SECONDS_PER_DAY;
        let rest = total % SECONDS_PER_DAY;
        Self {
            days,
            hours: rest / 3600,
            minutes: (rest % 3600) / 60,
            seconds: rest % 60,
        }
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} DAYS {} HOURS {} MIN {} SEC",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// Counts up from a fixed instant in epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElapsedClock {
    since_ms: f64,
}

impl ElapsedClock {
    pub fn new(since_ms: f64) -> Self {
        Self { since_ms }
    }

    /// Time from the start instant to `now_ms`; instants before the start read as zero
    pub fn breakdown(&self, now_ms: f64) -> Elapsed {
        let diff = ((now_ms - self.since_ms) / 1000.0).floor();
        if !diff.is_finite() || diff <= 0.0 {
            return Elapsed::default();
        }
        Elapsed::from_seconds(diff as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: f64 = 1_735_620_660_000.0;

    #[test]
    fn test_breakdown() {
        let clock = ElapsedClock::new(START);
        let now = START + ((3 * 86_400 + 4 * 3600 + 5 * 60 + 6) as f64) * 1000.0 + 999.0;
        assert_eq!(
            clock.breakdown(now),
            Elapsed { days: 3, hours: 4, minutes: 5, seconds: 6 }
        );
    }

    #[test]
    fn test_before_start_is_zero() {
        let clock = ElapsedClock::new(START);
        assert_eq!(clock.breakdown(START - 50_000.0), Elapsed::default());
        assert_eq!(clock.breakdown(f64::NAN), Elapsed::default());
    }

    #[test]
    fn test_display() {
        let elapsed = Elapsed::from_seconds(86_400 + 61);
        assert_eq!(elapsed.to_string(), "1 DAYS 0 HOURS 1 MIN 1 SEC");
        assert_eq!(Elapsed::default().to_string(), "0 DAYS 0 HOURS 0 MIN 0 SEC");
    }
}
