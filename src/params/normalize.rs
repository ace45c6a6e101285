use super::utils::parse_aspect_ratio;
use super::ParamSet;
use crate::asset::AssetRef;
use tracing::debug;

/// Fills in crop geometry for focal-point crops.
///
/// Only applies when `fit=crop` and `crop=focalpoint` and a structured asset
/// is given. The aspect ratio comes from an explicit `ar` (`"W:H"`) or from
/// the asset's own dimensions. A missing width or height is derived from the
/// other (truncated to an integer); with neither, the width defaults to the
/// asset width. Missing `fp-x`/`fp-y` default to the asset's focal point, or
/// to the centre.
pub fn normalize(mut params: ParamSet, asset: AssetRef<'_>) -> ParamSet {
    let Some(asset) = asset.as_asset() else {
        return params;
    };

    let is_focal_crop = params.get_string("fit").as_deref() == Some("crop")
        && params.get_string("crop").as_deref() == Some("focalpoint");
    if !is_focal_crop {
        return params;
    }

    let ar = params
        .get_string("ar")
        .and_then(|ar| parse_aspect_ratio(&ar))
        .or_else(|| asset.aspect_ratio());

    if let Some(ar) = ar {
        match (params.contains_key("w"), params.contains_key("h")) {
            (true, false) => {
                if let Some(w) = params.get_f64("w") {
                    params.insert("h", (w / ar) as i64);
                }
            }
            (false, true) => {
                if let Some(h) = params.get_f64("h") {
                    params.insert("w", (h * ar) as i64);
                }
            }
            (false, false) => {
                let w = asset.width as i64;
                params.insert("w", w);
                params.insert("h", (w as f64 / ar) as i64);
            }
            (true, true) => {}
        }
        debug!(
            "Normalized focal crop dimensions: w={:?} h={:?} ar={}",
            params.get_i64("w"),
            params.get_i64("h"),
            ar
        );
    }

    let (fx, fy) = asset.focal_point.map(|fp| (fp.x, fp.y)).unwrap_or((0.5, 0.5));
    if !params.contains_key("fp-x") {
        params.insert("fp-x", fx);
    }
    if !params.contains_key("fp-y") {
        params.insert("fp-y", fy);
    }

    params
}
