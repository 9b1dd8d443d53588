//! Folds transcript segments into fixed-duration sections.
//!
//! A section closes on the first segment whose end is at least
//! `section_duration` seconds past the section start. Segments are never
//! split, so a section can run longer than the threshold.

use tracing::debug;

use crate::{
    error::{Result, ensure_positive},
    types::{Segment, SectionDraft},
};

/// In-progress section state carried from one segment to the next.
#[derive(Debug, Clone, Default, PartialEq)]
struct Accumulator {
    start_time: f64,
    text: String,
    last_end: f64,
}

impl Accumulator {
    fn starting_at(start_time: f64) -> Self {
        Self {
            start_time,
            text: String::new(),
            last_end: start_time,
        }
    }

    /// Absorb one segment, returning the next accumulator and the section it
    /// closed, if any.
    fn push(mut self, segment: &Segment, section_duration: f64) -> (Self, Option<SectionDraft>) {
        self.text.push_str(&segment.text);
        self.text.push(' ');
        self.last_end = self.last_end.max(segment.end);

        if segment.end - self.start_time >= section_duration {
            let draft = SectionDraft {
                start_time: self.start_time,
                end_time: segment.end,
                text: self.text,
            };
            return (Self::starting_at(segment.end), Some(draft));
        }

        (self, None)
    }

    fn finish(self, total_duration: Option<f64>) -> Option<SectionDraft> {
        if self.text.is_empty() {
            return None;
        }

        let end_time = total_duration.unwrap_or(self.last_end).max(self.start_time);
        Some(SectionDraft {
            start_time: self.start_time,
            end_time,
            text: self.text,
        })
    }
}

/// Split `segments` into section drafts covering `[0, total_duration]`.
///
/// When `total_duration` is `None` the last section ends at the furthest
/// segment end seen. If the final segment closes a section exactly and the
/// media runs longer, that last section is stretched to `total_duration`
/// instead of emitting a section with no text.
pub fn sectionize(
    segments: &[Segment],
    section_duration: f64,
    total_duration: Option<f64>,
) -> Result<Vec<SectionDraft>> {
    ensure_positive("section_duration", section_duration)?;

    let (acc, mut drafts) = segments.iter().fold(
        (Accumulator::default(), Vec::new()),
        |(acc, mut drafts), segment| {
            let (acc, closed) = acc.push(segment, section_duration);
            drafts.extend(closed);
            (acc, drafts)
        },
    );

    match acc.finish(total_duration) {
        Some(last) => drafts.push(last),
        None => {
            if let (Some(total), Some(last)) = (total_duration, drafts.last_mut())
                && total > last.end_time
            {
                last.end_time = total;
            }
        }
    }

    debug!(
        segments = segments.len(),
        sections = drafts.len(),
        section_duration,
        "sectionized transcript"
    );

    Ok(drafts)
}
