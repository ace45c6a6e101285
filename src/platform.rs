//! External services some providers delegate to.
//!
//! These are implemented by the embedding application. When one is not
//! registered, the provider that needs it produces no URL.

use crate::asset::Asset;
use crate::params::ParamSet;
use crate::providers::craft::NativeTransform;

/// Custom URL template configured on a platform filesystem.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UrlTemplate {
    /// Pattern with `{{environment}}`, `{{projectSlug}}`, `{{subfolder}}`,
    /// `{{filePath}}` and `{{params}}` placeholders.
    pub pattern: String,
    pub environment: String,
    pub project_slug: String,
    pub subfolder: String,
}

/// Path resolution and signing service of the hosted asset platform.
pub trait PlatformTransforms: Send + Sync {
    /// Full CDN path (including its query) for the asset and transform, or
    /// `None` when the platform cannot resolve one.
    fn full_path_for_asset_and_transform(&self, asset: &Asset, params: &ParamSet) -> Option<String>;

    /// Signing token for a full path.
    fn key_for_path(&self, path: &str) -> String;

    /// Custom URL template for the asset's filesystem, if configured.
    fn url_template(&self, _asset: &Asset) -> Option<UrlTemplate> {
        None
    }
}

/// The host CMS's own image transform service.
pub trait NativeTransforms: Send + Sync {
    fn url_for(&self, asset: &Asset, transform: &NativeTransform) -> Option<String>;
}
