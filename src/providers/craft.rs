//! The host CMS's own image transforms.
//!
//! Only a handful of normalized keys have a native counterpart. They are
//! mapped onto a [`NativeTransform`] and handed to the CMS through
//! [`NativeTransforms`](crate::platform::NativeTransforms).

use super::{Provider, ProviderContext};
use crate::asset::AssetRef;
use crate::config::Source;
use crate::error::ImgixerError;
use crate::params::ParamSet;
use std::fmt;
use tracing::{debug, warn};

const ALLOWED_PARAMS: [&str; 9] = ["w", "h", "q", "fm", "fit", "crop", "fp-x", "fp-y", "fill-color"];

const NATIVE_FORMATS: [&str; 6] = ["auto", "jpg", "gif", "png", "webp", "avif"];

/// Resize modes of the CMS transform service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeMode {
    Crop,
    Fit,
    Stretch,
    Letterbox,
}

impl fmt::Display for NativeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            NativeMode::Crop => "crop",
            NativeMode::Fit => "fit",
            NativeMode::Stretch => "stretch",
            NativeMode::Letterbox => "letterbox",
        };
        write!(f, "{}", mode)
    }
}

/// A transform in the CMS's native vocabulary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NativeTransform {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<u32>,
    pub format: Option<String>,
    pub mode: Option<NativeMode>,
    /// `<vertical>-<horizontal>`, e.g. `top-left` or `center-center`.
    pub position: String,
    /// Letterbox background colour.
    pub fill: Option<String>,
}

impl NativeTransform {
    pub fn from_params(params: &ParamSet) -> Self {
        let dimension = |key: &str| params.get_i64(key).and_then(|v| u32::try_from(v).ok());

        let format = params
            .get_string("fm")
            .filter(|fm| NATIVE_FORMATS.contains(&fm.as_str()));

        let mut mode = params.get_string("fit").and_then(|fit| match fit.as_str() {
            "fill" | "clip" | "min" | "max" | "fillmax" => Some(NativeMode::Fit),
            "crop" | "facearea" => Some(NativeMode::Crop),
            "scale" => Some(NativeMode::Stretch),
            other => {
                debug!("No native resize mode for fit={}", other);
                None
            }
        });

        let fill = params.get_string("fill-color");
        if fill.is_some() {
            mode = Some(NativeMode::Letterbox);
        }

        Self {
            width: dimension("w"),
            height: dimension("h"),
            quality: dimension("q"),
            format,
            mode,
            position: position_from_crop(params.get_string("crop").as_deref()),
            fill,
        }
    }
}

/// Maps imgix crop edges onto a native position.
fn position_from_crop(crop: Option<&str>) -> String {
    let edges: Vec<&str> = crop
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .collect();

    let vertical = if edges.contains(&"top") {
        "top"
    } else if edges.contains(&"bottom") {
        "bottom"
    } else {
        "center"
    };
    let horizontal = if edges.contains(&"left") {
        "left"
    } else if edges.contains(&"right") {
        "right"
    } else {
        "center"
    };

    format!("{}-{}", vertical, horizontal)
}

pub struct CraftProvider;

impl Provider for CraftProvider {
    fn name(&self) -> &'static str {
        "craft"
    }

    fn get_url(
        &self,
        ctx: &ProviderContext<'_>,
        source: &Source,
        asset: AssetRef<'_>,
        mut params: ParamSet,
    ) -> Result<Option<String>, ImgixerError> {
        let Some(asset) = asset.as_asset() else {
            return Err(ImgixerError::InvalidAssetType { provider: self.name() });
        };

        let Some(native) = ctx.native else {
            warn!("CMS transforms are not available; no URL for {}", asset.path);
            return Ok(None);
        };

        params.take_controls();
        let mut params = params.merged_over(&source.default_params);
        params.retain_keys(&ALLOWED_PARAMS);

        let transform = NativeTransform::from_params(&params);
        debug!("Native transform for {}: {:?}", asset.path, transform);

        Ok(native.url_for(asset, &transform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Asset;
    use crate::platform::NativeTransforms;
    use crate::url::HmacSigner;

    struct MockNative;

    impl NativeTransforms for MockNative {
        fn url_for(&self, asset: &Asset, transform: &NativeTransform) -> Option<String> {
            if asset.path.ends_with(".svg") {
                return None;
            }
            Some(format!(
                "/transforms/{}?w={:?}&mode={:?}&position={}",
                asset.path,
                transform.width,
                transform.mode.map(|m| m.to_string()),
                transform.position
            ))
        }
    }

    fn build(asset: AssetRef<'_>, params: ParamSet) -> Result<Option<String>, ImgixerError> {
        let mut ctx = ProviderContext::new(&HmacSigner);
        ctx.native = Some(&MockNative);
        CraftProvider.get_url(&ctx, &Source::new("native"), asset, params)
    }

    #[test]
    fn test_requires_structured_asset() {
        let result = build(AssetRef::Path("a.jpg"), ParamSet::new());
        assert!(matches!(result, Err(ImgixerError::InvalidAssetType { provider: "craft" })));
    }

    #[test]
    fn test_missing_native_service_is_soft() {
        let ctx = ProviderContext::new(&HmacSigner);
        let asset = Asset::new("a.jpg", 10, 10);
        let result = CraftProvider
            .get_url(&ctx, &Source::new("native"), AssetRef::Asset(&asset), ParamSet::new())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_native_service_may_decline() {
        let asset = Asset::new("a.svg", 10, 10);
        assert!(build(AssetRef::Asset(&asset), ParamSet::new()).unwrap().is_none());
    }

    #[test]
    fn test_url_from_native_service() {
        let asset = Asset::new("a.jpg", 10, 10);
        let result = build(
            AssetRef::Asset(&asset),
            ParamSet::new().with("w", 300).with("fit", "crop").with("crop", "top,left"),
        )
        .unwrap()
        .unwrap();
        assert_eq!(result, "/transforms/a.jpg?w=Some(300)&mode=Some(\"crop\")&position=top-left");
    }

    #[test]
    fn test_fit_table() {
        let cases = [
            ("fill", Some(NativeMode::Fit)),
            ("clip", Some(NativeMode::Fit)),
            ("min", Some(NativeMode::Fit)),
            ("max", Some(NativeMode::Fit)),
            ("fillmax", Some(NativeMode::Fit)),
            ("crop", Some(NativeMode::Crop)),
            ("facearea", Some(NativeMode::Crop)),
            ("scale", Some(NativeMode::Stretch)),
            ("letterbox", None),
        ];
        for (fit, expected) in cases {
            let transform = NativeTransform::from_params(&ParamSet::new().with("fit", fit));
            assert_eq!(transform.mode, expected, "fit={}", fit);
        }
    }

    #[test]
    fn test_fill_color_letterboxes() {
        let transform =
            NativeTransform::from_params(&ParamSet::new().with("fit", "clip").with("fill-color", "ff0000"));
        assert_eq!(transform.mode, Some(NativeMode::Letterbox));
        assert_eq!(transform.fill.as_deref(), Some("ff0000"));
    }

    #[test]
    fn test_positions() {
        let cases = [
            (None, "center-center"),
            (Some("top"), "top-center"),
            (Some("bottom,right"), "bottom-right"),
            (Some("left"), "center-left"),
            (Some("focalpoint"), "center-center"),
            (Some("faces,top"), "top-center"),
            (Some("left,top"), "top-left"),
        ];
        for (crop, expected) in cases {
            assert_eq!(position_from_crop(crop), expected);
        }
    }

    #[test]
    fn test_formats_and_quality() {
        let transform = NativeTransform::from_params(&ParamSet::new().with("fm", "webp").with("q", 65));
        assert_eq!(transform.format.as_deref(), Some("webp"));
        assert_eq!(transform.quality, Some(65));

        let transform = NativeTransform::from_params(&ParamSet::new().with("fm", "pjpg"));
        assert_eq!(transform.format, None);
    }

    #[test]
    fn test_defaults_merged_and_focal_dropped() {
        let mut ctx = ProviderContext::new(&HmacSigner);
        ctx.native = Some(&MockNative);
        let mut source = Source::new("native");
        source.default_params = ParamSet::new().with("w", 100).with("blur", 10);
        let asset = Asset::new("a.jpg", 10, 10);
        let result = CraftProvider
            .get_url(&ctx, &source, AssetRef::Asset(&asset), ParamSet::new().with("fp-x", 0.2))
            .unwrap()
            .unwrap();
        assert_eq!(result, "/transforms/a.jpg?w=Some(100)&mode=None&position=center-center");
    }
}
