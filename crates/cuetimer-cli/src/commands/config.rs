use clap::Subcommand;
use cuetimer_core::{Config, ManualClock, NullSink, TimerEngine, TomlConfigStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the stored configuration as JSON
    Show,
    /// Commit new durations (out-of-range values are clamped)
    Edit {
        /// Main countdown minutes
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
        /// Main countdown seconds (0-59)
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
        /// Get-ready offset minutes
        #[arg(allow_negative_numbers = true)]
        get_ready_minutes: i64,
        /// Get-ready offset seconds (0-59)
        #[arg(allow_negative_numbers = true)]
        get_ready_seconds: i64,
    },
    /// Reset config to defaults
    Reset,
}

pub fn run(store: TomlConfigStore, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = store.read_config_or_default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Edit {
            minutes,
            seconds,
            get_ready_minutes,
            get_ready_seconds,
        } => {
            let mut engine = TimerEngine::from_store(Box::new(store.clone()), ManualClock::new(), NullSink);
            engine.commit_edit_form(minutes, seconds, get_ready_minutes, get_ready_seconds);
            println!("{}", serde_json::to_string_pretty(engine.config())?);
        }
        ConfigAction::Reset => {
            store.write_config(&Config::default())?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
