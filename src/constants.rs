/// Path to a JSON configuration file.
pub const ENV_CONFIG: &str = "IMGIXER_CONFIG";
/// Inline JSON object of sources, used when no config file is given.
pub const ENV_SOURCES: &str = "IMGIXER_SOURCES";
/// Source handle used for CMS transform and thumbnail URLs.
pub const ENV_TRANSFORM_SOURCE: &str = "IMGIXER_TRANSFORM_SOURCE";
/// Whether CMS transforms may upscale images.
pub const ENV_UPSCALE_IMAGES: &str = "IMGIXER_UPSCALE_IMAGES";
/// Tracing filter for the command-line binary.
pub const ENV_LOG_LEVEL: &str = "IMGIXER_LOG_LEVEL";

/// Domain suffix for imgix sources without a custom domain.
pub const IMGIX_DOMAIN: &str = "imgix.net";
/// Render host for ImageKit sources without a custom endpoint.
pub const IMAGEKIT_RENDER_HOST: &str = "https://ik.imagekit.io/render";
/// Expiry ImageKit uses for signed URLs that never expire.
pub const IMAGEKIT_DEFAULT_EXPIRY: &str = "9999999999";
/// Default optimisation host of the Servd asset platform.
pub const SERVD_OPTIMISE_HOST: &str = "https://optimise2.assets-servd.host";

/// Control keys consumed by dispatch and never forwarded to a provider.
pub const PARAM_SIGNED: &str = "signed";
pub const PARAM_SOURCE: &str = "source";
pub const PARAM_FROM: &str = "from";
pub const PARAM_TO: &str = "to";
pub const PARAM_STEP: &str = "step";

/// Cache-busting parameter derived from the asset's modification time.
pub const PARAM_VERSION: &str = "dm";

/// Width increment used by srcset expansion when `step` is not given.
pub const DEFAULT_SRCSET_STEP: i64 = 100;
