//! Per-provider translation of the normalized dialect into CDN URLs.

pub mod common;
pub mod craft;
pub mod imagekit;
pub mod imgix;
pub mod servd;

use crate::asset::AssetRef;
use crate::config::{ProviderKind, Source};
use crate::error::ImgixerError;
use crate::params::ParamSet;
use crate::platform::{NativeTransforms, PlatformTransforms};
use crate::url::Signer;

/// Collaborators a provider may call into while building a URL.
#[derive(Clone, Copy)]
pub struct ProviderContext<'a> {
    pub signer: &'a dyn Signer,
    pub platform: Option<&'a dyn PlatformTransforms>,
    pub native: Option<&'a dyn NativeTransforms>,
}

impl<'a> ProviderContext<'a> {
    pub fn new(signer: &'a dyn Signer) -> Self {
        Self {
            signer,
            platform: None,
            native: None,
        }
    }
}

/// Common contract of every image backend.
pub trait Provider: Sync {
    fn name(&self) -> &'static str;

    /// Builds the URL for `asset` with the normalized `params`.
    ///
    /// Returns `Ok(None)` when a required collaborator is unavailable;
    /// configuration and asset-type problems are errors.
    fn get_url(
        &self,
        ctx: &ProviderContext<'_>,
        source: &Source,
        asset: AssetRef<'_>,
        params: ParamSet,
    ) -> Result<Option<String>, ImgixerError>;
}

/// Looks up the implementation for a provider kind.
pub fn provider_for(kind: ProviderKind) -> &'static dyn Provider {
    match kind {
        ProviderKind::Imgix => &imgix::ImgixProvider,
        ProviderKind::Imagekit => &imagekit::ImagekitProvider,
        ProviderKind::Servd => &servd::ServdProvider,
        ProviderKind::Craft => &craft::CraftProvider,
    }
}
