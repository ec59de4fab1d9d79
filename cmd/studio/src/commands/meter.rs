//! Terminal level meter shown while recording.

use std::io::Write;
use std::time::Duration;

use tokio::sync::watch;

use vocalstudio::{SpectrumFrame, Visualizer};

const GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const WIDTH: f64 = 64.0;
const HEIGHT: f64 = 128.0;

/// Draws the spectrum as one line of block glyphs on stderr.
pub struct LevelMeter {
    elapsed: watch::Receiver<u64>,
    limit: Duration,
}

impl LevelMeter {
    pub fn new(elapsed: watch::Receiver<u64>, limit: Duration) -> Self {
        Self { elapsed, limit }
    }
}

impl Visualizer for LevelMeter {
    fn render(&self, frame: &SpectrumFrame) {
        let line = render_line(frame, *self.elapsed.borrow(), self.limit);
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K{}", line);
        let _ = stderr.flush();
    }

    fn clear(&self) {
        eprint!("\r\x1b[2K");
    }
}

/// Formats whole seconds as m:ss.
fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Renders one meter line: a red dot, the bars and the recording clock.
pub(crate) fn render_line(frame: &SpectrumFrame, elapsed: u64, limit: Duration) -> String {
    let bars: String = frame
        .bars(WIDTH, HEIGHT)
        .iter()
        .map(|bar| {
            let level = (bar.height / HEIGHT * GLYPHS.len() as f64) as usize;
            GLYPHS[level.min(GLYPHS.len() - 1)]
        })
        .collect();
    format!(
        "\x1b[31m●\x1b[0m {} {} / {}",
        bars,
        format_clock(elapsed),
        format_clock(limit.as_secs())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(10), "0:10");
        assert_eq!(format_clock(75), "1:15");
    }

    #[test]
    fn test_render_line() {
        let frame = SpectrumFrame::new(vec![0, 255, 128, 0]);
        let line = render_line(&frame, 3, Duration::from_secs(10));
        assert!(line.ends_with("0:03 / 0:10"));
        // 4 bins on 64 columns fit two 40-column bars.
        assert!(line.contains(" ▁█ "));
    }

    #[test]
    fn test_render_line_full_scale() {
        let frame = SpectrumFrame::new(vec![255; 128]);
        let line = render_line(&frame, 0, Duration::from_secs(10));
        let full = line.chars().filter(|c| *c == '█').count();
        assert!(full > 20);
        assert_eq!(line.chars().filter(|c| GLYPHS[..7].contains(c)).count(), 0);
    }
}
