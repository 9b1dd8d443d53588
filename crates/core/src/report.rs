use crate::{
    error::{Result, Vid2DocError},
    types::{FrameRef, Report, Section, SectionDraft},
};

/// Title shown at the top of every generated document.
pub fn report_title(video_title: &str) -> String {
    format!("Vid2Doc: {}", video_title)
}

/// Pair each draft with the frames sampled for it, in order.
pub fn assemble(
    title: impl Into<String>,
    source_url: impl Into<String>,
    drafts: Vec<SectionDraft>,
    frame_lists: Vec<Vec<FrameRef>>,
) -> Result<Report> {
    if drafts.len() != frame_lists.len() {
        return Err(Vid2DocError::Mismatch {
            drafts: drafts.len(),
            frame_lists: frame_lists.len(),
        });
    }

    let sections = drafts
        .into_iter()
        .zip(frame_lists)
        .map(|(draft, frame_refs)| Section {
            start_time: draft.start_time,
            end_time: draft.end_time,
            text: draft.text,
            frame_refs,
        })
        .collect();

    Ok(Report {
        title: title.into(),
        source_url: source_url.into(),
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(start: f64, end: f64, text: &str) -> SectionDraft {
        SectionDraft {
            start_time: start,
            end_time: end,
            text: text.to_string(),
        }
    }

    fn frame(t: f64) -> FrameRef {
        FrameRef {
            timestamp: t,
            path: format!("frames/frame_{t:.2}.jpg"),
        }
    }

    #[test]
    fn test_assemble_pairs_in_order() {
        let report = assemble(
            "Vid2Doc: Talk",
            "https://youtu.be/x",
            vec![draft(0.0, 65.0, "a b "), draft(65.0, 90.0, "c ")],
            vec![vec![frame(0.0), frame(30.0), frame(60.0)], vec![]],
        )
        .unwrap();

        assert_eq!(report.title, "Vid2Doc: Talk");
        assert_eq!(report.source_url, "https://youtu.be/x");
        assert_eq!(report.sections.len(), 2);
        assert_eq!(report.sections[0].text, "a b ");
        assert_eq!(report.sections[0].frame_refs.len(), 3);
        assert_eq!(report.sections[1].start_time, 65.0);
        assert!(report.sections[1].frame_refs.is_empty());
    }

    #[test]
    fn test_assemble_empty_is_empty_report() {
        let report = assemble("t", "u", vec![], vec![]).unwrap();
        assert!(report.sections.is_empty());
    }

    #[test]
    fn test_assemble_count_mismatch() {
        let err = assemble("t", "u", vec![draft(0.0, 1.0, "a ")], vec![]).unwrap_err();
        assert!(matches!(
            err,
            Vid2DocError::Mismatch {
                drafts: 1,
                frame_lists: 0
            }
        ));
    }

    #[test]
    fn test_report_title() {
        assert_eq!(report_title("Rust in 100 Seconds"), "Vid2Doc: Rust in 100 Seconds");
    }
}
