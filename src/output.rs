//! CLI output formatting.
//!
//! Each piece of output has a `format_*` function (returns `Vec<String>` or
//! `Option<String>`) for testability and, where the CLI needs one, a `print_*`
//! wrapper that writes to stdout. Format functions are pure.
//!
//! # Output Format
//!
//! ```text
//! Rating 192 candidates of photo.png (background #ffffffff)
//!     19/192 rated
//!     ...
//!     192/192 rated
//! Best
//!     001 rate 1234  s260 xoff3 yoff0
//!         best/photo.png_best_0_rate1234_s260_xoff3_yoff0.png
//! Worst
//!     001 rate 9876  s256 xoff7 yoff7
//!         best/photo.png_worst_0_rate9876_s256_xoff7_yoff7.png
//! Report: best/photo.png_ratings.json
//! ```

use crate::export::Exported;
use crate::run::RunSummary;
use crate::search::SearchEvent;
use crate::select::SelectionKind;
use image::Rgba;

/// Number of progress lines printed over a whole search.
const PROGRESS_STEPS: usize = 10;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// `#rrggbbaa` hex notation.
pub fn format_color(color: &Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
}

/// Header line for a search start; `None` for every other event.
pub fn format_search_start(event: &SearchEvent, source: &str) -> Option<String> {
    match event {
        SearchEvent::Started {
            candidates,
            background,
            masked,
        } => {
            let mask_note = if *masked { ", masked" } else { "" };
            Some(format!(
                "Rating {} candidates of {} (background {}{})",
                candidates,
                source,
                format_color(background),
                mask_note
            ))
        }
        _ => None,
    }
}

/// Progress line after `done` of `total` candidates, emitted roughly every
/// tenth of the way and always on the last one.
pub fn format_progress(done: usize, total: usize) -> Option<String> {
    if total == 0 || done == 0 {
        return None;
    }
    let step = total.div_ceil(PROGRESS_STEPS);
    if done == total || done % step == 0 {
        Some(format!("    {}/{} rated", done, total))
    } else {
        None
    }
}

fn exported_lines(entry: &Exported) -> Vec<String> {
    let c = &entry.result.candidate;
    let mut lines = vec![format!(
        "    {} rate {}  s{} xoff{} yoff{}",
        format_index(entry.index + 1),
        entry.result.rating,
        c.scale,
        c.x_offset,
        c.y_offset
    )];
    lines.push(format!("        {}", entry.image_path.display()));
    if let Some(mask) = &entry.mask_path {
        lines.push(format!("        {}", mask.display()));
    }
    lines
}

/// Format the selections a run exported, best first.
pub fn format_run_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::new();

    for kind in [SelectionKind::Best, SelectionKind::Worst] {
        let entries: Vec<&Exported> = summary
            .exported
            .iter()
            .filter(|e| e.kind == kind)
            .collect();
        if entries.is_empty() {
            continue;
        }
        lines.push(match kind {
            SelectionKind::Best => "Best".to_string(),
            SelectionKind::Worst => "Worst".to_string(),
        });
        for entry in entries {
            lines.extend(exported_lines(entry));
        }
    }

    if let Some(report) = &summary.report_path {
        lines.push(format!("Report: {}", report.display()));
    }
    lines
}

/// Print the run summary to stdout.
pub fn print_run_summary(summary: &RunSummary) {
    for line in format_run_summary(summary) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MutationResult, TransformCandidate};
    use std::path::PathBuf;

    fn exported(kind: SelectionKind, index: usize, rating: u64, mask: bool) -> Exported {
        let name = format!("out/p.png_{}_{}.png", kind.label(), index);
        Exported {
            kind,
            index,
            result: MutationResult {
                candidate: TransformCandidate::new(260, 3, 1),
                rating,
            },
            image_path: PathBuf::from(&name),
            mask_path: mask.then(|| PathBuf::from(format!("out/mask_{}", &name[4..]))),
        }
    }

    fn summary(exported: Vec<Exported>, report: Option<&str>) -> RunSummary {
        RunSummary {
            image_path: PathBuf::from("p.png"),
            mask_path: None,
            background: Rgba([255, 255, 255, 255]),
            candidates: 10,
            exported,
            report_path: report.map(PathBuf::from),
        }
    }

    #[test]
    fn color_is_lowercase_hex_with_alpha() {
        assert_eq!(format_color(&Rgba([255, 16, 0, 128])), "#ff100080");
    }

    #[test]
    fn start_line_mentions_count_background_and_mask() {
        let event = SearchEvent::Started {
            candidates: 192,
            background: Rgba([0, 0, 0, 255]),
            masked: true,
        };
        assert_eq!(
            format_search_start(&event, "p.png").unwrap(),
            "Rating 192 candidates of p.png (background #000000ff, masked)"
        );
        assert!(format_search_start(&SearchEvent::Finished { candidates: 1 }, "p.png").is_none());
    }

    #[test]
    fn progress_every_tenth_and_at_end() {
        let shown: Vec<usize> = (1..=192)
            .filter(|done| format_progress(*done, 192).is_some())
            .collect();
        assert_eq!(
            shown,
            vec![20, 40, 60, 80, 100, 120, 140, 160, 180, 192]
        );
        assert_eq!(format_progress(1, 1).unwrap(), "    1/1 rated");
        assert!(format_progress(0, 0).is_none());
    }

    #[test]
    fn summary_groups_best_then_worst() {
        let lines = format_run_summary(&summary(
            vec![
                exported(SelectionKind::Best, 0, 5, false),
                exported(SelectionKind::Best, 1, 7, false),
                exported(SelectionKind::Worst, 0, 90, false),
            ],
            Some("out/p.png_ratings.json"),
        ));
        assert_eq!(
            lines,
            vec![
                "Best",
                "    001 rate 5  s260 xoff3 yoff1",
                "        out/p.png_best_0.png",
                "    002 rate 7  s260 xoff3 yoff1",
                "        out/p.png_best_1.png",
                "Worst",
                "    001 rate 90  s260 xoff3 yoff1",
                "        out/p.png_worst_0.png",
                "Report: out/p.png_ratings.json",
            ]
        );
    }

    #[test]
    fn summary_lists_mask_paths_and_skips_empty_worst() {
        let lines = format_run_summary(&summary(
            vec![exported(SelectionKind::Best, 0, 0, true)],
            None,
        ));
        assert_eq!(
            lines,
            vec![
                "Best",
                "    001 rate 0  s260 xoff3 yoff1",
                "        out/p.png_best_0.png",
                "        out/mask_p.png_best_0.png",
            ]
        );
    }
}
