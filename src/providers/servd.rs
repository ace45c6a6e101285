//! Servd asset platform, served through its own optimisation service.
//!
//! The platform accepts a subset of the imgix dialect. Path resolution and
//! signing belong to the platform's plugin, reached through
//! [`PlatformTransforms`](crate::platform::PlatformTransforms).

use super::{Provider, ProviderContext};
use crate::asset::AssetRef;
use crate::config::Source;
use crate::constants::{PARAM_VERSION, SERVD_OPTIMISE_HOST};
use crate::error::ImgixerError;
use crate::params::ParamSet;
use crate::platform::UrlTemplate;
use tracing::{debug, warn};

/// Keys the optimisation service understands.
const ALLOWED_PARAMS: [&str; 13] = [
    "w",
    "h",
    "q",
    "fm",
    "auto",
    "fit",
    "crop",
    "fp-x",
    "fp-y",
    "fill-color",
    "dpr",
    "ar",
    PARAM_VERSION,
];

pub struct ServdProvider;

impl Provider for ServdProvider {
    fn name(&self) -> &'static str {
        "servd"
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

        let Some(platform) = ctx.platform else {
            warn!("Servd assets plugin is not available; no URL for {}", asset.path);
            return Ok(None);
        };

        params.insert(PARAM_VERSION, asset.last_modified);
        params.take_controls();
        let mut params = params.merged_over(&source.default_params);
        params.retain_keys(&ALLOWED_PARAMS);
        degrade_params(&mut params);

        let Some(full_path) = platform.full_path_for_asset_and_transform(asset, &params) else {
            debug!("Servd could not resolve a path for {}", asset.path);
            return Ok(None);
        };
        let key = platform.key_for_path(&full_path);

        if let Some(template) = platform.url_template(asset) {
            params.insert("s", key);
            return Ok(Some(fill_template(&template, &asset.path, &params)));
        }

        Ok(Some(format!("{}/{}&s={}", SERVD_OPTIMISE_HOST, full_path, key)))
    }
}

/// Replaces features the optimisation service lacks with the nearest one.
fn degrade_params(params: &mut ParamSet) {
    let wants_faces = params.get("crop").is_some_and(|crop| crop.contains("faces"))
        || params.get_string("fit").as_deref() == Some("facearea");
    if wants_faces {
        // no face detection; crop around the focal point instead
        params.insert("fit", "crop");
        params.insert("crop", "focalpoint");
    }

    if params.get_string("fit").as_deref() == Some("fillmax") {
        params.insert("fit", "fill");
    }

    if params.contains_key("fill-color") && !params.contains_key("fit") {
        params.insert("fit", "fill");
    }
}

fn fill_template(template: &UrlTemplate, file_path: &str, params: &ParamSet) -> String {
    template
        .pattern
        .replace("{{environment}}", &template.environment)
        .replace("{{projectSlug}}", &template.project_slug)
        .replace("{{subfolder}}", template.subfolder.trim_matches('/'))
        .replace("{{filePath}}", file_path)
        .replace("{{params}}", &format!("?{}", params.to_form_query()))
}
