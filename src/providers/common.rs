use crate::asset::{AssetRef, Filesystem};
use crate::config::Source;
use crate::constants::PARAM_VERSION;
use crate::params::ParamSet;
use tracing::debug;

/// Request state shared by the query-string providers once the source,
/// asset and control keys have been folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    /// Asset path on the CDN, without a leading slash.
    pub path: String,
    pub signed: bool,
    /// Default params overlaid with the request's own, control keys removed.
    pub params: ParamSet,
}

/// Explicit `domain`, then `endpoint`, then the provider default.
pub fn resolve_endpoint(source: &Source, default: impl FnOnce() -> String) -> String {
    source
        .domain
        .clone()
        .or_else(|| source.endpoint.clone())
        .unwrap_or_else(default)
}

/// Resolves the CDN path of an asset.
///
/// A source subfolder takes precedence; otherwise the volume's filesystem
/// subfolder is prepended. With `strip_platform_slug`, assets stored on the
/// hosted platform lose their leading project-slug segment.
pub fn resolve_path(source: &Source, asset: AssetRef<'_>, strip_platform_slug: bool) -> String {
    let img = match asset {
        AssetRef::Asset(asset) => asset.path.clone(),
        AssetRef::Path(path) => path.to_string(),
    };

    if let Some(subfolder) = &source.subfolder {
        return format!("{}/{}", subfolder.trim_end_matches('/'), img);
    }

    let Some(asset) = asset.as_asset() else {
        return img;
    };

    let mut img = match asset.volume_subfolder.as_deref().map(|s| s.trim_matches('/')) {
        Some(subfolder) if !subfolder.is_empty() => format!("{}/{}", subfolder, img)
            .trim_start_matches('/')
            .to_string(),
        _ => img,
    };

    if strip_platform_slug && asset.filesystem == Filesystem::Platform {
        img = match img.split_once('/') {
            Some((slug, rest)) => {
                debug!("Removing platform project slug `{}` from path", slug);
                rest.to_string()
            }
            None => String::new(),
        };
    }

    img
}

/// Folds the source and asset into the request params.
///
/// Adds the cache-busting `dm` timestamp for structured assets, decides the
/// signing flag (`signed` param over the source setting), strips control
/// keys, and merges the source's default params underneath.
pub fn prepare(source: &Source, asset: AssetRef<'_>, mut params: ParamSet, strip_platform_slug: bool) -> Prepared {
    let path = resolve_path(source, asset, strip_platform_slug);

    if let Some(asset) = asset.as_asset() {
        params.insert(PARAM_VERSION, asset.last_modified);
    }

    let controls = params.take_controls();
    let signed = controls.signed.unwrap_or(source.signed);

    let mut params = params.merged_over(&source.default_params);
    params.take_controls();

    Prepared { path, signed, params }
}
