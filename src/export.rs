//! Writing selected candidates to disk.
//!
//! ## File Naming
//!
//! ```text
//! <output_dir>/<file>_<best|worst>_<index>_rate<rating>_s<scale>_xoff<x>_yoff<y><ext>
//! ```
//!
//! `<file>` is the full source file name (extension included) and `<ext>` is
//! the source extension, so `photo.png` yields
//! `photo.png_best_0_rate12_s256_xoff0_yoff0.png`. Masks use the same pattern
//! with their own file name (`mask_photo.png_best_0_...png`).

use crate::config::Grid;
use crate::imaging::{BackendError, ImageBackend};
use crate::search::render;
use crate::select::{Ranking, SelectionKind};
use crate::types::MutationResult;
use image::{Rgba, RgbaImage};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding failed: {0}")]
    Imaging(#[from] BackendError),
}

/// Prefix that turns an image file name into its mask file name.
pub const MASK_PREFIX: &str = "mask_";

/// The conventional mask location for `image_path`: same directory, file name
/// prefixed with `mask_`.
pub fn mask_path_for(image_path: &Path) -> PathBuf {
    let file_name = image_path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    image_path.with_file_name(format!("{MASK_PREFIX}{file_name}"))
}

/// `.ext` of `path`, or an empty string when it has none.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Output file name for one exported candidate.
pub fn output_file_name(
    file_name: &str,
    kind: SelectionKind,
    index: usize,
    result: &MutationResult,
    ext: &str,
) -> String {
    let c = &result.candidate;
    format!(
        "{}_{}_{}_rate{}_s{}_xoff{}_yoff{}{}",
        file_name,
        kind.label(),
        index,
        result.rating,
        c.scale,
        c.x_offset,
        c.y_offset,
        ext
    )
}

/// Everything needed to re-render selected candidates.
pub struct ExportSource<'a> {
    pub image_path: &'a Path,
    pub image: &'a RgbaImage,
    pub mask: Option<(&'a Path, &'a RgbaImage)>,
    pub background: Rgba<u8>,
    pub grid: &'a Grid,
}

/// One written candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exported {
    pub kind: SelectionKind,
    pub index: usize,
    pub result: MutationResult,
    pub image_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_path: Option<PathBuf>,
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Re-render the best `best` and the worst candidate and encode them into
/// `output_dir`, creating it if needed. Stops at the first failure.
pub fn export(
    backend: &impl ImageBackend,
    ranking: &Ranking,
    best: usize,
    source: &ExportSource<'_>,
    output_dir: &Path,
) -> Result<Vec<Exported>, ExportError> {
    std::fs::create_dir_all(output_dir)?;

    let ext = dotted_extension(source.image_path);
    let image_name = file_name_of(source.image_path);
    let mask_name = source.mask.map(|(path, _)| file_name_of(path));
    let mask_image = source.mask.map(|(_, image)| image);

    let mut written = Vec::new();
    for (kind, index, result) in ranking.selections(best) {
        let (rendered, rendered_mask) = render(
            source.image,
            mask_image,
            &result.candidate,
            source.background,
            source.grid,
        );

        let image_path =
            output_dir.join(output_file_name(&image_name, kind, index, result, &ext));
        backend.encode(&rendered, &image_path)?;

        let mask_path = match (rendered_mask, &mask_name) {
            (Some(rendered_mask), Some(name)) => {
                let path = output_dir.join(output_file_name(name, kind, index, result, &ext));
                backend.encode(&rendered_mask, &path)?;
                Some(path)
            }
            _ => None,
        };

        log::debug!("wrote {}", image_path.display());
        written.push(Exported {
            kind,
            index,
            result: *result,
            image_path,
            mask_path,
        });
    }
    Ok(written)
}
