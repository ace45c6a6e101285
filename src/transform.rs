//! Bridge from the CMS's image transforms to the normalized dialect.

use crate::asset::Asset;
use crate::params::ParamSet;

/// Extensions the CMS can manipulate as raster images.
const RASTER_EXTENSIONS: [&str; 10] = ["jpg", "jpeg", "png", "gif", "webp", "avif", "heic", "bmp", "tif", "tiff"];

/// How a CMS transform fits the image into its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    #[default]
    Crop,
    Fit,
    Stretch,
}

/// A CMS image transform.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageTransform {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u32>,
    pub format: Option<String>,
    pub mode: TransformMode,
    /// `<vertical>-<horizontal>`, e.g. `top-left`.
    pub position: Option<String>,
    pub interlace: bool,
}

impl ImageTransform {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// The asset at its own size, interlaced.
    pub fn for_asset(asset: &Asset) -> Self {
        Self::new(Some(asset.width), Some(asset.height)).interlaced(true)
    }

    pub fn with_mode(mut self, mode: TransformMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn interlaced(mut self, interlace: bool) -> Self {
        self.interlace = interlace;
        self
    }

    /// Output format: the explicit one, else the asset's extension.
    pub fn output_format(&self, asset: &Asset) -> Option<String> {
        self.format
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase)
            .or_else(|| asset.extension())
    }
}

/// Whether the CMS can build thumbnails for this extension.
pub fn is_raster_extension(extension: &str) -> bool {
    RASTER_EXTENSIONS.contains(&extension.to_lowercase().as_str())
}

/// Converts a CMS transform into normalized params.
///
/// Without a transform only automatic format and compression are requested.
/// With `upscale_images` disabled, crops and clips become their
/// non-enlarging `min`/`max` variants.
pub fn transform_params(transform: Option<&ImageTransform>, asset: &Asset, upscale_images: bool) -> ParamSet {
    let Some(transform) = transform else {
        return ParamSet::new().with("auto", "format,compress");
    };

    let mut params = ParamSet::new();
    if let Some(width) = transform.width.filter(|w| *w > 0) {
        params.insert("w", width);
    }
    if let Some(height) = transform.height.filter(|h| *h > 0) {
        params.insert("h", height);
    }
    if let Some(quality) = transform.quality.filter(|q| *q > 0) {
        params.insert("q", quality);
    }
    if let Some(format) = transform.format.as_deref().filter(|f| !f.is_empty()) {
        params.insert("fm", format);
    }

    let mut auto = Vec::new();
    if !params.contains_key("q") {
        auto.push("compress");
    }
    if !params.contains_key("fm") {
        auto.push("format");
    }
    if !auto.is_empty() {
        params.insert("auto", auto.join(","));
    }

    if transform.interlace && params.get_string("fm").as_deref() == Some("jpg") {
        params.insert("fm", "pjpg");
    }

    let mut fit = match transform.mode {
        TransformMode::Fit => "clip",
        TransformMode::Stretch => "scale",
        TransformMode::Crop => "crop",
    };

    if fit == "crop" {
        if let Some(fp) = asset.focal_point {
            params.insert("fp-x", fp.x);
            params.insert("fp-y", fp.y);
            params.insert("crop", "focalpoint");
        } else if let Some(edges) = crop_edges(transform.position.as_deref().unwrap_or("center-center")) {
            params.insert("crop", edges);
        }
    }

    if !upscale_images {
        fit = match fit {
            "crop" => "min",
            "clip" => "max",
            other => other,
        };
    }
    params.insert("fit", fit);

    params
}

/// `top-left` becomes `top,left`; `center` parts are dropped since imgix
/// crops to the centre by default.
fn crop_edges(position: &str) -> Option<String> {
    let (vertical, horizontal) = position.split_once('-')?;
    if !matches!(vertical, "top" | "center" | "bottom") || !matches!(horizontal, "left" | "center" | "right") {
        return None;
    }

    let edges: Vec<&str> = [vertical, horizontal].into_iter().filter(|e| *e != "center").collect();
    if edges.is_empty() {
        None
    } else {
        Some(edges.join(","))
    }
}
