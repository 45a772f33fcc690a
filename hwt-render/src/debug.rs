//! Text readout of the detector and toggle state

use std::fmt::Write;

use hwt_analysis::BeatSignal;
use hwt_world::Toggles;

/// Multi-line readout: detector values, beat flag and the main toggles
pub fn readout(signal: &BeatSignal, toggles: &Toggles) -> String {
    let mut out = String::with_capacity(128);
    let _ = writeln!(out, "amp {:.3}", signal.amplitude);
    let _ = writeln!(out, "bass {:.3}", signal.bass_instant);
    let _ = writeln!(out, "bassSmooth {:.3}", signal.bass_smoothed);
    let _ = writeln!(out, "bassAvg {:.3}", signal.bass_running_avg);
    let _ = writeln!(out, "beat {}", u8::from(signal.beat_fired));
    let _ = writeln!(out, "steam {}", if toggles.steam_enabled { "on" } else { "off" });
    let _ = writeln!(out, "console {}", if toggles.console_armed { "armed" } else { "off" });
    let _ = write!(out, "gate {}", if toggles.gate_open { "open" } else { "closed" });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_format() {
        let signal = BeatSignal {
            amplitude: 0.25,
            bass_instant: 0.5,
            bass_smoothed: 0.123_456,
            bass_running_avg: 0.08,
            beat_fired: true,
        };
        let toggles = Toggles {
            steam_enabled: true,
            gate_open: true,
            ..Toggles::default()
        };
        let text = readout(&signal, &toggles);
        assert_eq!(
            text,
            "amp 0.250\nbass 0.500\nbassSmooth 0.123\nbassAvg 0.080\nbeat 1\nsteam on\nconsole off\ngate open"
        );
    }
}
