use std::io::Write;
use std::time::Duration;

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use super::ProgressView;
use crate::metrics::Snapshot;
use crate::sinks::format_x100;

/// Character cells used by the progress bar.
const BAR_CELLS: usize = 30;

/// Single-line live status renderer on stderr. Rewrites one line in place
/// on every sampling tick; a render failure permanently disables it so a
/// broken pipe cannot spam errors.
pub struct StatusLine {
    no_color: bool,
    disabled: bool,
}

impl StatusLine {
    #[must_use]
    pub const fn new(no_color: bool) -> Self {
        Self {
            no_color,
            disabled: false,
        }
    }

    fn render(&self, snapshot: &Snapshot, target: Duration) -> Result<(), std::io::Error> {
        let segments = build_segments(snapshot, target, self.no_color);
        let mut out = std::io::stderr();
        queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        for segment in segments {
            if let Some(color) = segment.color {
                queue!(
                    out,
                    SetForegroundColor(color),
                    Print(&segment.text),
                    ResetColor
                )?;
            } else {
                queue!(out, Print(&segment.text))?;
            }
        }
        out.flush()
    }
}

impl ProgressView for StatusLine {
    fn on_snapshot(&mut self, snapshot: &Snapshot, target: Duration) {
        if self.disabled {
            return;
        }
        if self.render(snapshot, target).is_err() {
            self.disabled = true;
        }
    }

    fn finish(&mut self) {
        if self.disabled {
            return;
        }
        let mut out = std::io::stderr();
        if out.write_all(b"\n").is_err() || out.flush().is_err() {
            self.disabled = true;
        }
    }
}

pub(super) struct Segment {
    pub(super) text: String,
    pub(super) color: Option<Color>,
}

impl Segment {
    const fn plain(text: String) -> Self {
        Self { text, color: None }
    }

    const fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }
}

pub(super) fn build_segments(snapshot: &Snapshot, target: Duration, no_color: bool) -> Vec<Segment> {
    let elapsed_ms = snapshot.elapsed.as_millis();
    let target_ms = target.as_millis().max(1);
    let capped_ms = elapsed_ms.min(target_ms);

    let filled_scaled = capped_ms
        .saturating_mul(BAR_CELLS as u128)
        .checked_div(target_ms)
        .unwrap_or(0);
    let filled_cells = usize::try_from(filled_scaled).unwrap_or(BAR_CELLS).min(BAR_CELLS);
    let empty_cells = BAR_CELLS.saturating_sub(filled_cells);
    let bar = format!("[{}{}]", "#".repeat(filled_cells), "-".repeat(empty_cells));

    let percent_x100 = capped_ms
        .saturating_mul(10_000)
        .checked_div(target_ms)
        .unwrap_or(0);
    let percent = format!(
        " {}%",
        format_x100(u64::try_from(percent_x100).unwrap_or(u64::MAX))
    );

    let elapsed_secs = elapsed_ms.checked_div(1_000).unwrap_or(0);
    let time = format!(" {}s/{}s", elapsed_secs, target.as_secs());

    let counts = format!(
        " | total {} ok {} err {}",
        snapshot.total, snapshot.success, snapshot.failed
    );
    let rate = format!(" | {} req/s", format_x100(snapshot.rate_x100()));

    if no_color {
        vec![
            Segment::plain(bar),
            Segment::plain(percent),
            Segment::plain(time),
            Segment::plain(counts),
            Segment::plain(rate),
        ]
    } else {
        vec![
            Segment::plain(bar),
            Segment::colored(percent, Color::Cyan),
            Segment::colored(time, Color::Yellow),
            Segment::plain(counts),
            Segment::colored(rate, Color::Green),
        ]
    }
}
