//! The whole pipeline behind the CLI: load → search → rank → export.
//!
//! ```text
//! 1. Decode   source image (+ mask_<name> next to it, per MaskPolicy)
//! 2. Search   every candidate rendered and rated (rayon)
//! 3. Rank     ascending rating; best N + second-highest as worst
//! 4. Export   re-render the selections and encode them to the output dir
//! 5. Report   optional <name>_ratings.json with the full ranking
//! ```
//!
//! Every failure is terminal. A run either writes its complete result set
//! or returns the first error it hit.

use crate::config::{Grid, SearchConfig};
use crate::export::{ExportError, ExportSource, Exported, export, mask_path_for};
use crate::imaging::{BackendError, ImageBackend, can_encode};
use crate::rating::RatingError;
use crate::search::{SearchEvent, SearchParams, search};
use crate::select::Ranking;
use image::{Rgba, RgbaImage};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Rating failed: {0}")]
    Rating(#[from] RatingError),
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
    #[error("Cannot write results with the extension of {0}")]
    UnsupportedFormat(PathBuf),
    #[error("Mask {path} is required but could not be loaded: {source}")]
    MaskRequired {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Mask {path} is {}x{} but the image is {}x{}", mask.0, mask.1, image.0, image.1)]
    MaskSizeMismatch {
        path: PathBuf,
        image: (u32, u32),
        mask: (u32, u32),
    },
}

/// Whether a missing or unreadable mask stops the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskPolicy {
    /// Use the mask when it loads; otherwise continue unmasked.
    #[default]
    Optional,
    /// Abort unless the mask loads.
    Required,
}

/// Inputs for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub image_path: PathBuf,
    pub output_dir: PathBuf,
    pub params: SearchParams,
    pub mask: MaskPolicy,
    pub config: SearchConfig,
    /// Write `<output_dir>/<file>_ratings.json`.
    pub report: bool,
}

/// What a run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub image_path: PathBuf,
    pub mask_path: Option<PathBuf>,
    pub background: Rgba<u8>,
    pub candidates: usize,
    pub exported: Vec<Exported>,
    pub report_path: Option<PathBuf>,
}

/// JSON document written by `--report`.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub source: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<&'a Path>,
    pub background: [u8; 4],
    pub grid: &'a Grid,
    pub candidates: usize,
    pub exported: &'a [Exported],
    pub ranking: &'a Ranking,
}

/// Path of the JSON report for `image_path` inside `output_dir`.
pub fn report_path_for(image_path: &Path, output_dir: &Path) -> PathBuf {
    let file_name = image_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{file_name}_ratings.json"))
}

fn load_mask(
    backend: &impl ImageBackend,
    path: &Path,
    policy: MaskPolicy,
) -> Result<Option<RgbaImage>, RunError> {
    match (backend.decode(path), policy) {
        (Ok(mask), _) => Ok(Some(mask)),
        (Err(source), MaskPolicy::Required) => Err(RunError::MaskRequired {
            path: path.to_path_buf(),
            source,
        }),
        (Err(BackendError::Io(e)), MaskPolicy::Optional)
            if e.kind() == std::io::ErrorKind::NotFound =>
        {
            log::debug!("no mask at {}", path.display());
            Ok(None)
        }
        (Err(e), MaskPolicy::Optional) => {
            log::warn!("ignoring mask {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

/// Run the full pipeline.
///
/// `events` receives search progress; see [`SearchEvent`].
pub fn run(
    options: &RunOptions,
    backend: &impl ImageBackend,
    events: Option<Sender<SearchEvent>>,
) -> Result<RunSummary, RunError> {
    let image_path = options.image_path.as_path();
    if !can_encode(image_path) {
        return Err(RunError::UnsupportedFormat(image_path.to_path_buf()));
    }

    let image = backend.decode(image_path)?;
    let mask_path = mask_path_for(image_path);
    let mask = load_mask(backend, &mask_path, options.mask)?;

    if let Some(mask) = &mask {
        if mask.dimensions() != image.dimensions() {
            return Err(RunError::MaskSizeMismatch {
                path: mask_path,
                image: image.dimensions(),
                mask: mask.dimensions(),
            });
        }
        log::info!("using mask {}", mask_path.display());
    }

    let grid = &options.config.grid;
    let outcome = search(&image, mask.as_ref(), &options.params, grid, events)?;
    let candidates = outcome.results.len();
    let ranking = Ranking::new(outcome.results);

    let mask_path = mask.as_ref().map(|_| mask_path);
    let exported = export(
        backend,
        &ranking,
        options.config.selection.best,
        &ExportSource {
            image_path,
            image: &image,
            mask: mask_path.as_deref().zip(mask.as_ref()),
            background: outcome.background,
            grid,
        },
        &options.output_dir,
    )?;

    let report_path = if options.report {
        let path = report_path_for(image_path, &options.output_dir);
        let report = Report {
            source: image_path,
            mask: mask_path.as_deref(),
            background: outcome.background.0,
            grid,
            candidates,
            exported: &exported,
            ranking: &ranking,
        };
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        Some(path)
    } else {
        None
    };

    Ok(RunSummary {
        image_path: image_path.to_path_buf(),
        mask_path,
        background: outcome.background,
        candidates,
        exported,
        report_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::select::SelectionKind;
    use crate::test_helpers::{gradient, solid};
    use tempfile::TempDir;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn options(tmp: &TempDir, params: SearchParams, mask: MaskPolicy) -> RunOptions {
        RunOptions {
            image_path: PathBuf::from("/in/photo.png"),
            output_dir: tmp.path().join("best"),
            params,
            mask,
            config: SearchConfig::default(),
            report: false,
        }
    }

    fn no_offsets() -> SearchParams {
        SearchParams {
            offsets: false,
            ..SearchParams::default()
        }
    }

    #[test]
    fn solid_red_single_candidate_rates_zero() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new().with_image("/in/photo.png", solid(512, 384, RED));

        let summary = run(&options(&tmp, no_offsets(), MaskPolicy::Optional), &backend, None).unwrap();

        assert_eq!(summary.candidates, 1);
        assert_eq!(summary.background, RED);
        assert!(summary.mask_path.is_none());
        // One best, no worst (needs two candidates)
        assert_eq!(summary.exported.len(), 1);
        assert_eq!(summary.exported[0].result.rating, 0);
        assert_eq!(summary.exported[0].kind, SelectionKind::Best);
    }

    #[test]
    fn missing_optional_mask_runs_unmasked() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new().with_image("/in/photo.png", gradient(512, 384));

        let summary = run(&options(&tmp, no_offsets(), MaskPolicy::Optional), &backend, None).unwrap();
        assert!(summary.mask_path.is_none());

        let decodes: Vec<_> = backend
            .get_operations()
            .into_iter()
            .filter(|op| matches!(op, RecordedOp::Decode(_)))
            .collect();
        assert_eq!(
            decodes,
            vec![
                RecordedOp::Decode("/in/photo.png".into()),
                RecordedOp::Decode("/in/mask_photo.png".into()),
            ]
        );
    }

    #[test]
    fn missing_required_mask_aborts() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new().with_image("/in/photo.png", gradient(512, 384));

        let result = run(&options(&tmp, no_offsets(), MaskPolicy::Required), &backend, None);
        assert!(matches!(result, Err(RunError::MaskRequired { .. })));
        assert!(backend.encoded_paths().is_empty());
    }

    #[test]
    fn present_mask_is_used_and_exported() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new()
            .with_image("/in/photo.png", gradient(512, 384))
            .with_image("/in/mask_photo.png", solid(512, 384, Rgba([0, 0, 0, 255])));

        let params = SearchParams {
            scale_range: 1,
            ..no_offsets()
        };
        let summary = run(&options(&tmp, params, MaskPolicy::Required), &backend, None).unwrap();

        assert_eq!(summary.mask_path, Some(PathBuf::from("/in/mask_photo.png")));
        // 2 candidates → 2 best + 1 worst, each with a mask
        assert_eq!(summary.exported.len(), 3);
        assert!(summary.exported.iter().all(|e| e.mask_path.is_some()));
        assert_eq!(backend.encoded_paths().len(), 6);
    }

    #[test]
    fn mask_size_mismatch_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new()
            .with_image("/in/photo.png", gradient(512, 384))
            .with_image("/in/mask_photo.png", solid(256, 384, RED));

        let result = run(&options(&tmp, no_offsets(), MaskPolicy::Optional), &backend, None);
        assert!(matches!(
            result,
            Err(RunError::MaskSizeMismatch {
                image: (512, 384),
                mask: (256, 384),
                ..
            })
        ));
    }

    #[test]
    fn missing_source_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let result = run(&options(&tmp, no_offsets(), MaskPolicy::Optional), &backend, None);
        assert!(matches!(result, Err(RunError::Imaging(BackendError::Io(_)))));
    }

    #[test]
    fn unwritable_extension_fails_before_decoding() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let mut opts = options(&tmp, no_offsets(), MaskPolicy::Optional);
        opts.image_path = PathBuf::from("/in/photo.xyz");

        let result = run(&opts, &backend, None);
        assert!(matches!(result, Err(RunError::UnsupportedFormat(_))));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn report_lists_full_ranking() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new().with_image("/in/photo.png", gradient(512, 384));
        let params = SearchParams {
            scale_range: 8,
            scale_step: 4,
            offsets: false,
            ..SearchParams::default()
        };
        let mut opts = options(&tmp, params, MaskPolicy::Optional);
        opts.report = true;

        let summary = run(&opts, &backend, None).unwrap();
        let path = summary.report_path.unwrap();
        assert_eq!(path, tmp.path().join("best/photo.png_ratings.json"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["candidates"], 3);
        assert_eq!(json["ranking"].as_array().unwrap().len(), 3);
        assert_eq!(json["grid"]["target_width"], 256);
        assert!(json.get("mask").is_none());
    }
}
