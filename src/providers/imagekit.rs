//! ImageKit translation of the normalized dialect.
//!
//! ImageKit has its own transformation vocabulary and supports chained
//! transformations, so parameters are mapped into three ordered stages: a
//! pre-resize stage (used by focal-point crops), the main transform, and a
//! post-processing stage (borders). Stages render as `tr=<pre>:<main>:<post>`.

use super::common::{prepare, resolve_endpoint};
use super::{Provider, ProviderContext};
use crate::asset::{Asset, AssetRef};
use crate::config::Source;
use crate::constants::{IMAGEKIT_DEFAULT_EXPIRY, IMAGEKIT_RENDER_HOST};
use crate::error::ImgixerError;
use crate::params::utils::format_number;
use crate::params::{ParamSet, ParamValue};
use crate::url::encode_path;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::debug;

/// Output formats ImageKit can produce on request.
const SUPPORTED_FORMATS: [&str; 5] = ["jpg", "jpeg", "webp", "avif", "png"];

/// Unsharp-mask preset used to approximate imgix's `auto=enhance`.
const ENHANCE_USM: &str = "2-2-0.8-0.024";

/// `tr` keeps its stage and token separators readable.
const TR_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b',')
    .remove(b':');

/// One step of a chained transformation: ordered `key-value` tokens, where a
/// token without a value renders as the bare key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stage(Vec<(String, Option<String>)>);

impl Stage {
    /// Sets a token, keeping its original position if it already exists.
    pub fn set(&mut self, key: &str, value: Option<String>) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn flag(&mut self, key: &str) {
        self.set(key, None);
    }

    pub fn value(&mut self, key: &str, value: impl ToString) {
        self.set(key, Some(value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| match value {
                Some(value) => format!("{}-{}", key, value),
                None => key.clone(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// The pre, main and post stages of an ImageKit transformation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformStages {
    pub pre: Stage,
    pub main: Stage,
    pub post: Stage,
}

impl TransformStages {
    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.main.is_empty() && self.post.is_empty()
    }

    /// Renders non-empty stages joined by `:`.
    pub fn render(&self) -> String {
        [&self.pre, &self.main, &self.post]
            .iter()
            .filter(|stage| !stage.is_empty())
            .map(|stage| stage.render())
            .collect::<Vec<_>>()
            .join(":")
    }
}

pub struct ImagekitProvider;

impl Provider for ImagekitProvider {
    fn name(&self) -> &'static str {
        "imagekit"
    }

    fn get_url(
        &self,
        ctx: &ProviderContext<'_>,
        source: &Source,
        asset: AssetRef<'_>,
        params: ParamSet,
    ) -> Result<Option<String>, ImgixerError> {
        let endpoint = resolve_endpoint(source, || format!("{}/{}", IMAGEKIT_RENDER_HOST, source.handle));
        let endpoint = normalize_endpoint(&endpoint);

        let private_key = source.private_key.as_deref().or(source.key.as_deref());
        let (Some(_public_key), Some(private_key)) = (source.public_key.as_deref(), private_key) else {
            return Err(ImgixerError::MissingCredentials(source.handle.clone()));
        };

        let prepared = prepare(source, asset, params, true);

        let stages = map_params(&prepared.params, asset.as_asset());
        debug!("ImageKit transformation for {}: {}", prepared.path, stages.render());

        // the asset's `dm` version travels inside `tr` as a sorted token
        let mut relative = encode_path(prepared.path.trim_start_matches('/'));
        if !stages.is_empty() {
            relative.push_str("?tr=");
            relative.push_str(&utf8_percent_encode(&stages.render(), TR_VALUE).to_string());
        }

        if prepared.signed {
            let signature = ctx
                .signer
                .sign(private_key, &format!("{}{}", relative, IMAGEKIT_DEFAULT_EXPIRY));
            relative.push_str(if stages.is_empty() { "?" } else { "&" });
            relative.push_str("ik-s=");
            relative.push_str(&signature);
        }

        Ok(Some(format!("{}/{}", endpoint, relative)))
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint)
    }
}

/// ImageKit tokens cannot contain commas or spaces.
fn token(value: &ParamValue) -> String {
    value.to_string().replace(',', "_").replace(' ', "")
}

/// Translates normalized params (in key order) into ImageKit stages.
pub fn map_params(params: &ParamSet, asset: Option<&Asset>) -> TransformStages {
    let mut stages = TransformStages::default();
    let zoom = params.get_f64("fp-z").unwrap_or(1.0);

    for (key, value) in params {
        match key.as_str() {
            "ar" => stages.main.value("ar", value.to_string().replace(':', "-")),
            "auto" => {
                for auto in value.to_string().split(',').map(str::trim) {
                    match auto {
                        "format" => stages.main.value("f", "auto"),
                        "enhance" => {
                            stages.main.flag("e-contrast");
                            stages.main.value("e-usm", ENHANCE_USM);
                        }
                        _ => {}
                    }
                }
            }
            "blur" => {
                // imgix blurs 0-2000, ImageKit 0-100
                if let Some(blur) = value.as_f64() {
                    stages.main.value("bl", ((blur / 10.0) as i64).min(100));
                }
            }
            "border" => stages.post.value("b", token(value)),
            "con" => {
                if value.as_f64().is_some_and(|con| con > 0.0) {
                    stages.main.flag("e-contrast");
                }
            }
            "crop" => map_crop(&mut stages, params, value, zoom),
            "cs" => {
                // keep the original colour profile
                if value.to_string() == "adobergb1998" {
                    stages.main.value("cp", true);
                }
            }
            "fill-color" => stages.main.value("bg", value),
            "fit" => map_fit(&mut stages, params, value, asset),
            "fm" => {
                if stages.main.get("f") != Some(Some("auto")) {
                    let format = value.to_string();
                    if SUPPORTED_FORMATS.contains(&format.as_str()) {
                        stages.main.value("f", format);
                    } else {
                        stages.main.value("f", "auto");
                    }
                }
            }
            "fp-x" => {
                if let (Some(fx), Some(w)) = (value.as_f64(), params.get_f64("w")) {
                    let image_width = w * zoom;
                    stages.main.value("xc", focal_offset(fx, image_width, w));
                }
            }
            "fp-y" => {
                let dims = (value.as_f64(), params.get_f64("w"), params.get_f64("h"), asset);
                if let (Some(fy), Some(w), Some(h), Some(asset)) = dims {
                    if asset.width > 0 {
                        let image_height = w * (asset.height as f64 / asset.width as f64) * zoom;
                        stages.main.value("yc", focal_offset(fy, image_height, h));
                    }
                }
            }
            // zoom only scales the focal crop
            "fp-z" => {}
            "lossless" => stages.main.value("lo", value),
            "radius" => stages.main.value("r", value),
            "rot" => stages.main.value("rt", value),
            "sat" => {
                // no partial desaturation; only full greyscale is available
                if value.as_f64() == Some(-100.0) {
                    stages.main.flag("e-grayscale");
                }
            }
            "sharp" => stages.main.value("e-sharpen", value),
            "trim" => {
                if value.contains("auto") {
                    stages.main.value("t", true);
                }
            }
            "trim-tol" => stages.main.value("t", value),
            _ => stages.main.value(key, token(value)),
        }
    }

    if params.contains_key("fill-color") && !params.contains_key("fit") {
        stages.main.flag("cm-pad_resize");
    }

    // An explicit ratio plus both dimensions would let the dimensions win,
    // so drop whichever dimension is smaller.
    if stages.main.contains("ar") && stages.main.contains("w") && stages.main.contains("h") {
        let w = params.get_f64("w").unwrap_or(0.0);
        let h = params.get_f64("h").unwrap_or(0.0);
        if w > h {
            stages.main.remove("h");
        } else {
            stages.main.remove("w");
        }
    }

    stages
}

fn map_crop(stages: &mut TransformStages, params: &ParamSet, value: &ParamValue, zoom: f64) {
    if value.contains("faces") {
        stages.main.value("fo", "face");
    } else if value.contains("entropy") {
        stages.main.value("fo", "entropy");
    } else if value.contains("focalpoint") {
        // resize first, then extract around the focal point
        if let Some(w) = params.get_f64("w") {
            stages.pre.value("w", format_number(w * zoom));
        } else if let Some(h) = params.get_f64("h") {
            stages.pre.value("h", format_number(h * zoom));
        }
        stages.main.flag("cm-extract");
    } else {
        stages.main.value("fo", token(value));
    }
}

fn map_fit(stages: &mut TransformStages, params: &ParamSet, value: &ParamValue, asset: Option<&Asset>) {
    match value.to_string().as_str() {
        "clip" | "max" => stages.main.flag("c-at_max"),
        "min" => stages.main.flag("c-at_min"),
        "crop" => stages.main.flag("c-maintain_ratio"),
        "facearea" => {
            stages.main.flag("c-maintain_ratio");
            stages.main.value("fo", "face");
        }
        "fill" => stages.main.flag("cm-pad_resize"),
        "fillmax" => {
            let exceeds = asset.is_some_and(|asset| {
                params.get_f64("w").is_some_and(|w| w > asset.width as f64)
                    || params.get_f64("h").is_some_and(|h| h > asset.height as f64)
            });
            if exceeds {
                stages.main.flag("cm-pad_extract");
            } else {
                stages.main.flag("cm-pad_resize");
            }
        }
        "scale" => stages.main.flag("c-force"),
        other => debug!("ImageKit has no equivalent for fit={}; dropping", other),
    }
}

/// Pixel centre of an extract window of `window` pixels along an axis of
/// `extent` pixels, kept inside the image.
fn focal_offset(fraction: f64, extent: f64, window: f64) -> i64 {
    let mut centre = (fraction * extent) as i64;
    if centre as f64 + window / 2.0 > extent {
        centre = (extent - window / 2.0) as i64;
    }
    if (centre as f64) - window / 2.0 < 0.0 {
        centre = (window / 2.0) as i64;
    }
    centre
}

#[cfg(test)]
mod tests;
