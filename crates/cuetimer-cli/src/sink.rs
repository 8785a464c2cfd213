//! Terminal cue output.

use std::io::{self, Write};

use cuetimer_core::{CueError, CueEvent, CueSink};

/// Rings the terminal bell once per repeat and labels the cue.
pub struct BellSink<W: Write> {
    out: W,
}

impl BellSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self { out: io::stderr() }
    }
}

impl<W: Write> BellSink<W> {
    #[cfg(test)]
    fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> CueSink for BellSink<W> {
    fn play(&mut self, cue: &CueEvent, repeats: u32) -> Result<(), CueError> {
        let failed = |e: io::Error| CueError::PlaybackFailed {
            kind: cue.kind.to_string(),
            message: e.to_string(),
        };
        for _ in 0..repeats {
            writeln!(self.out, "\x07[{}]", cue.kind).map_err(failed)?;
        }
        self.out.flush().map_err(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuetimer_core::CueKind;

    #[test]
    fn bell_repeats_per_policy() {
        let mut sink = BellSink::new(Vec::new());
        sink.play(&CueEvent::now(CueKind::Complete), 3).unwrap();
        let written = String::from_utf8(sink.out).unwrap();
        assert_eq!(written.matches("\x07[complete]").count(), 3);
    }

    #[test]
    fn zero_repeats_is_silent() {
        let mut sink = BellSink::new(Vec::new());
        sink.play(&CueEvent::now(CueKind::GetReady), 0).unwrap();
        assert!(sink.out.is_empty());
    }
}
