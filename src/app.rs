use crate::asset::{Asset, AssetRef};
use crate::config::Config;
use crate::constants::PARAM_SOURCE;
use crate::error::ImgixerError;
use crate::monitoring;
use crate::params::normalize::normalize;
use crate::params::ParamSet;
use crate::platform::{NativeTransforms, PlatformTransforms};
use crate::providers::{provider_for, ProviderContext};
use crate::resolver::SourceResolver;
use crate::srcset;
use crate::transform::{is_raster_extension, transform_params, ImageTransform};
use crate::url::{HmacSigner, Signer};
use std::sync::Arc;
use tracing::{debug, info};

/// Entry point for building image URLs.
///
/// Holds the immutable configuration plus the external collaborators some
/// providers delegate to. Cloning is cheap.
#[derive(Clone)]
pub struct Imgixer {
    config: Arc<Config>,
    signer: Arc<dyn Signer>,
    platform: Option<Arc<dyn PlatformTransforms>>,
    native: Option<Arc<dyn NativeTransforms>>,
}

impl Imgixer {
    /// Create a new instance from an explicit configuration.
    pub fn new(config: Config) -> Self {
        monitoring::register_metrics();

        info!("Imgixer configured with {} source(s)", config.sources.len());
        Self {
            config: Arc::new(config),
            signer: Arc::new(HmacSigner),
            platform: None,
            native: None,
        }
    }

    /// Construct using environment-derived configuration.
    pub fn from_env() -> Result<Self, ImgixerError> {
        Ok(Self::new(Config::from_env()?))
    }

    /// Replace the URL signer.
    pub fn with_signer(mut self, signer: impl Signer + 'static) -> Self {
        self.signer = Arc::new(signer);
        self
    }

    /// Register the hosted platform's transform service.
    pub fn with_platform(mut self, platform: Arc<dyn PlatformTransforms>) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Register the CMS's native transform service.
    pub fn with_native_transforms(mut self, native: Arc<dyn NativeTransforms>) -> Self {
        self.native = Some(native);
        self
    }

    /// Access the effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds a URL, or a `srcset` string when `from` and `to` are given.
    pub fn imgix<'a>(&self, asset: impl Into<AssetRef<'a>>, params: &ParamSet) -> Result<String, ImgixerError> {
        let asset = asset.into();
        srcset::srcset(params, |params| self.build_url(asset, params))
    }

    /// The individual srcset candidates for `params`.
    pub fn variants<'a>(
        &self,
        asset: impl Into<AssetRef<'a>>,
        params: &ParamSet,
    ) -> Result<Vec<String>, ImgixerError> {
        let asset = asset.into();
        srcset::expand(params, |params| self.build_url(asset, params))
    }

    /// Builds one URL: normalize, resolve the source, then let its provider
    /// translate.
    ///
    /// `Ok(None)` means the provider's collaborator could not produce a URL.
    pub fn build_url(&self, asset: AssetRef<'_>, params: ParamSet) -> Result<Option<String>, ImgixerError> {
        let params = normalize(params, asset);
        let handle = params.get_string(PARAM_SOURCE);
        let resolved = SourceResolver::new(&self.config.sources).resolve(handle.as_deref())?;
        let provider = provider_for(resolved.provider);

        let ctx = ProviderContext {
            signer: self.signer.as_ref(),
            platform: self.platform.as_deref(),
            native: self.native.as_deref(),
        };

        let url = provider.get_url(&ctx, resolved.source, asset, params)?;
        match &url {
            Some(url) => {
                debug!("Built {} URL: {}", provider.name(), url);
                monitoring::increment_urls_built(provider.name());
            }
            None => {
                debug!("The {} provider produced no URL", provider.name());
                monitoring::increment_urls_unavailable(provider.name());
            }
        }
        Ok(url)
    }

    /// URL for a CMS transform, served from the configured transform source.
    ///
    /// `None` without a transform source, or for SVG output. A missing
    /// transform means the asset at its own size.
    pub fn transform_url(
        &self,
        asset: &Asset,
        transform: Option<&ImageTransform>,
    ) -> Result<Option<String>, ImgixerError> {
        let default_transform;
        let transform = match transform {
            Some(transform) => transform,
            None => {
                default_transform = ImageTransform::for_asset(asset);
                &default_transform
            }
        };

        if transform.output_format(asset).as_deref() == Some("svg") {
            debug!("Not transforming SVG asset {}", asset.path);
            return Ok(None);
        }

        self.cms_url(asset, transform)
    }

    /// Control-panel thumbnail URL; `None` for assets that are not raster
    /// images.
    pub fn thumb_url(&self, asset: &Asset, width: u32, height: u32) -> Result<Option<String>, ImgixerError> {
        if !asset.extension().is_some_and(|ext| is_raster_extension(&ext)) {
            return Ok(None);
        }
        let transform = ImageTransform::new(Some(width), Some(height)).interlaced(true);
        self.cms_url(asset, &transform)
    }

    fn cms_url(&self, asset: &Asset, transform: &ImageTransform) -> Result<Option<String>, ImgixerError> {
        let Some(source) = self.config.transform_source.as_deref() else {
            debug!("No transform source configured");
            return Ok(None);
        };

        let mut params = transform_params(Some(transform), asset, self.config.upscale_images);
        params.insert(PARAM_SOURCE, source);
        self.build_url(AssetRef::Asset(asset), params)
    }
}
