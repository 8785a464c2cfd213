use serde::{Deserialize, Serialize};

/// Default main countdown: 1:30.
pub const DEFAULT_MAIN_SECS: u64 = 90;
/// Default get-ready offset: 0:05 remaining.
pub const DEFAULT_GET_READY_SECS: u64 = 5;

const MAX_SECONDS_FIELD: i64 = 59;

/// The two configured durations of an interval.
///
/// No ordering is enforced between them. An offset at or above the main
/// duration is legal and simply never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfiguration {
    /// Total countdown length in seconds.
    pub main_duration_secs: u64,
    /// Remaining-time value at which the get-ready cue fires.
    pub get_ready_offset_secs: u64,
}

impl Default for TimerConfiguration {
    fn default() -> Self {
        Self {
            main_duration_secs: DEFAULT_MAIN_SECS,
            get_ready_offset_secs: DEFAULT_GET_READY_SECS,
        }
    }
}

impl TimerConfiguration {
    pub fn new(main_duration_secs: u64, get_ready_offset_secs: u64) -> Self {
        Self {
            main_duration_secs,
            get_ready_offset_secs,
        }
    }
}

/// Values of the edit form: two minutes/seconds pairs.
///
/// Construction through [`EditDraft::clamped`] is the edit boundary. Negative
/// minutes become 0 and seconds are pinned to `0..=59`, so a draft can always
/// be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDraft {
    pub minutes: u64,
    pub seconds: u64,
    pub get_ready_minutes: u64,
    pub get_ready_seconds: u64,
}

impl EditDraft {
    /// Build a draft from raw user input, clamping every field.
    pub fn clamped(minutes: i64, seconds: i64, get_ready_minutes: i64, get_ready_seconds: i64) -> Self {
        Self {
            minutes: clamp_minutes(minutes),
            seconds: clamp_seconds(seconds),
            get_ready_minutes: clamp_minutes(get_ready_minutes),
            get_ready_seconds: clamp_seconds(get_ready_seconds),
        }
    }

    /// Prefill the form from a configuration.
    pub fn from_configuration(config: &TimerConfiguration) -> Self {
        Self {
            minutes: config.main_duration_secs / 60,
            seconds: config.main_duration_secs % 60,
            get_ready_minutes: config.get_ready_offset_secs / 60,
            get_ready_seconds: config.get_ready_offset_secs % 60,
        }
    }

    pub fn to_configuration(&self) -> TimerConfiguration {
        TimerConfiguration {
            main_duration_secs: join(self.minutes, self.seconds),
            get_ready_offset_secs: join(self.get_ready_minutes, self.get_ready_seconds),
        }
    }
}

fn clamp_minutes(value: i64) -> u64 {
    value.max(0) as u64
}

fn clamp_seconds(value: i64) -> u64 {
    value.clamp(0, MAX_SECONDS_FIELD) as u64
}

fn join(minutes: u64, seconds: u64) -> u64 {
    minutes.saturating_mul(60).saturating_add(seconds)
}

/// Format seconds as `M:SS`.
pub fn format_mm_ss(total_secs: u64) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// Parse `M:SS` or a bare number of seconds.
pub fn parse_mm_ss(input: &str) -> Option<u64> {
    let input = input.trim();
    match input.split_once(':') {
        Some((m, s)) => {
            let minutes: u64 = m.trim().parse().ok()?;
            let seconds: u64 = s.trim().parse().ok()?;
            if seconds > MAX_SECONDS_FIELD as u64 {
                return None;
            }
            Some(join(minutes, seconds))
        }
        None => input.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_ninety_and_five() {
        let cfg = TimerConfiguration::default();
        assert_eq!(cfg.main_duration_secs, 90);
        assert_eq!(cfg.get_ready_offset_secs, 5);
    }

    #[test]
    fn clamped_draft_pins_seconds_and_floors_minutes() {
        let draft = EditDraft::clamped(-3, 75, 2, -10);
        assert_eq!(draft.minutes, 0);
        assert_eq!(draft.seconds, 59);
        assert_eq!(draft.get_ready_minutes, 2);
        assert_eq!(draft.get_ready_seconds, 0);
        assert_eq!(draft.to_configuration(), TimerConfiguration::new(59, 120));
    }

    #[test]
    fn draft_prefill_splits_minutes_and_seconds() {
        let draft = EditDraft::from_configuration(&TimerConfiguration::new(125, 65));
        assert_eq!((draft.minutes, draft.seconds), (2, 5));
        assert_eq!((draft.get_ready_minutes, draft.get_ready_seconds), (1, 5));
        assert_eq!(draft.to_configuration(), TimerConfiguration::new(125, 65));
    }

    #[test]
    fn mm_ss_formatting_and_parsing() {
        assert_eq!(format_mm_ss(90), "1:30");
        assert_eq!(format_mm_ss(5), "0:05");
        assert_eq!(parse_mm_ss("1:30"), Some(90));
        assert_eq!(parse_mm_ss("45"), Some(45));
        assert_eq!(parse_mm_ss("1:75"), None);
        assert_eq!(parse_mm_ss("abc"), None);
    }
}
