pub mod app;
pub mod asset;
pub mod config;
pub mod constants;
pub mod error;
pub mod monitoring;
pub mod params;
pub mod platform;
pub mod providers;
pub mod resolver;
pub mod srcset;
pub mod transform;
pub mod url;

pub use app::Imgixer;
pub use asset::{Asset, AssetRef, Filesystem, FocalPoint};
pub use config::{Config, ProviderKind, Source, Sources};
pub use error::ImgixerError;
pub use params::{ParamSet, ParamValue};
pub use platform::{NativeTransforms, PlatformTransforms, UrlTemplate};
pub use providers::craft::{NativeMode, NativeTransform};
pub use transform::{ImageTransform, TransformMode};
pub use url::{HmacSigner, Signer};
