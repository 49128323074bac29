//! Install progress bar
//!
//! Nothing is downloaded; the bar only paces the install report.

use std::io::{self, Write};
use std::time::Duration;

/// Bar width in cells, excluding brackets and percentage.
pub const BAR_WIDTH: usize = 40;

/// Percentage step between frames.
const STEP: usize = 5;

/// Render one frame, e.g. `[==========          ] 50%`.
///
/// `percent` is clamped to 100.
pub fn render_bar(percent: usize, width: usize) -> String {
    let percent = percent.min(100);
    let filled = width * percent / 100;
    format!(
        "[{}{}] {percent}%",
        "=".repeat(filled),
        " ".repeat(width - filled)
    )
}

/// Animate the bar from 0% to 100% over roughly `duration`, redrawing in
/// place, and finish with a newline.
pub fn fake_install_progress<W: Write>(writer: &mut W, duration: Duration) -> io::Result<()> {
    let frames = 100 / STEP;
    let delay = duration / frames as u32;

    for percent in (0..=100).step_by(STEP) {
        write!(writer, "\r{}", render_bar(percent, BAR_WIDTH))?;
        writer.flush()?;
        if percent < 100 && !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bar() {
        assert_eq!(render_bar(0, 10), "[          ] 0%");
        assert_eq!(render_bar(50, 20), "[==========          ] 50%");
        assert_eq!(render_bar(100, 10), "[==========] 100%");
    }

    #[test]
    fn test_render_bar_clamps() {
        assert_eq!(render_bar(250, 4), "[====] 100%");
    }

    #[test]
    fn test_fake_progress_frames() {
        let mut out = Vec::new();
        fake_install_progress(&mut out, Duration::ZERO).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.ends_with('\n'));
        let frames: Vec<&str> = text.trim_end().split('\r').filter(|f| !f.is_empty()).collect();
        assert_eq!(frames.len(), 21);
        assert!(frames[0].ends_with(" 0%"));
        assert_eq!(frames[20], render_bar(100, BAR_WIDTH));
    }
}
