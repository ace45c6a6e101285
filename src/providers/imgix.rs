use super::common::{prepare, resolve_endpoint};
use super::{Provider, ProviderContext};
use crate::asset::AssetRef;
use crate::config::Source;
use crate::constants::IMGIX_DOMAIN;
use crate::error::ImgixerError;
use crate::params::ParamSet;
use crate::url::UrlBuilder;
use tracing::debug;

/// The primary provider; speaks the normalized dialect natively.
pub struct ImgixProvider;

impl Provider for ImgixProvider {
    fn name(&self) -> &'static str {
        "imgix"
    }

    fn get_url(
        &self,
        ctx: &ProviderContext<'_>,
        source: &Source,
        asset: AssetRef<'_>,
        params: ParamSet,
    ) -> Result<Option<String>, ImgixerError> {
        // Sources without a custom domain live at <handle>.imgix.net
        let endpoint = resolve_endpoint(source, || format!("{}.{}", source.handle, IMGIX_DOMAIN));
        let prepared = prepare(source, asset, params, false);

        let transforms = map_params(prepared.params);

        let key = if prepared.signed {
            source.private_key.as_deref().or(source.key.as_deref())
        } else {
            None
        };
        if prepared.signed && key.is_none() {
            debug!("Source `{}` requests signing but has no key; building unsigned URL", source.handle);
        }

        let url = UrlBuilder::new(&endpoint, ctx.signer)
            .use_https(true)
            .sign_key(key)
            .create_url(&prepared.path, &transforms);

        Ok(Some(url))
    }
}

/// Expands the custom `radius` shorthand into imgix's corner mask; every
/// other key passes through.
fn map_params(params: ParamSet) -> ParamSet {
    let mut transforms = ParamSet::new();
    for (key, value) in &params {
        match key.as_str() {
            "radius" => {
                transforms.insert("mask", "corners");
                transforms.insert("corner-radius", value.clone());
                if !params.contains_key("fm") {
                    // transparent corners need an alpha-capable format
                    transforms.insert("fm", "webp");
                }
            }
            _ => transforms.insert(key.clone(), value.clone()),
        }
    }
    transforms
}
