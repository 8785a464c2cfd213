pub mod config;
pub mod run;
pub mod simulate;

use clap::Args;
use cuetimer_core::timer::parse_mm_ss;
use cuetimer_core::TimerConfiguration;

/// One-off durations that override the stored configuration for this run.
#[derive(Args, Debug, Clone, Default)]
pub struct DurationOverrides {
    /// Main countdown as M:SS or seconds
    #[arg(long, value_parser = parse_duration)]
    pub main: Option<u64>,
    /// Get-ready offset as M:SS or seconds
    #[arg(long, value_parser = parse_duration)]
    pub get_ready: Option<u64>,
}

impl DurationOverrides {
    pub fn apply(&self, mut config: TimerConfiguration) -> TimerConfiguration {
        if let Some(main) = self.main {
            config.main_duration_secs = main;
        }
        if let Some(get_ready) = self.get_ready {
            config.get_ready_offset_secs = get_ready;
        }
        config
    }
}

fn parse_duration(input: &str) -> Result<u64, String> {
    parse_mm_ss(input).ok_or_else(|| format!("'{input}' is not a duration (expected M:SS or seconds)"))
}
