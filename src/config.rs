use crate::constants::*;
use crate::error::ImgixerError;
use crate::params::utils::parse_boolean;
use crate::params::ParamSet;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The closed set of image backends a source can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Imgix,
    Imagekit,
    Servd,
    Craft,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Imgix => "imgix",
            ProviderKind::Imagekit => "imagekit",
            ProviderKind::Servd => "servd",
            ProviderKind::Craft => "craft",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ImgixerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "imgix" => Ok(ProviderKind::Imgix),
            "imagekit" => Ok(ProviderKind::Imagekit),
            "servd" => Ok(ProviderKind::Servd),
            "craft" => Ok(ProviderKind::Craft),
            other => Err(ImgixerError::Configuration(format!("unknown provider: {}", other))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named CDN configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Filled from the config key when sources are loaded.
    #[serde(skip)]
    pub handle: String,
    #[serde(default)]
    pub provider: Option<ProviderKind>,
    #[serde(default, deserialize_with = "non_empty")]
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub endpoint: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub subfolder: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub key: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub private_key: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub public_key: Option<String>,
    #[serde(default)]
    pub signed: bool,
    #[serde(default)]
    pub default_params: ParamSet,
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

impl Source {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            ..Self::default()
        }
    }

    /// The provider that will serve this source.
    ///
    /// A platform-hosted (`servd`) source configured with its own domain or
    /// endpoint speaks the imgix dialect, so it is served by the imgix
    /// provider instead.
    pub fn effective_provider(&self) -> ProviderKind {
        let provider = self.provider.unwrap_or_default();
        if provider == ProviderKind::Servd && (self.domain.is_some() || self.endpoint.is_some()) {
            return ProviderKind::Imgix;
        }
        provider
    }
}

/// Sources in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sources(Vec<Source>);

impl Sources {
    pub fn new(sources: Vec<Source>) -> Self {
        Self(sources)
    }

    pub fn get(&self, handle: &str) -> Option<&Source> {
        self.0.iter().find(|source| source.handle == handle)
    }

    /// The first declared source.
    pub fn first(&self) -> Option<&Source> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct SourcesVisitor;

impl<'de> Visitor<'de> for SourcesVisitor {
    type Value = Sources;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of source handles to source configs")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut sources = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((handle, mut source)) = access.next_entry::<String, Source>()? {
            source.handle = handle;
            sources.push(source);
        }
        Ok(Sources(sources))
    }
}

impl<'de> Deserialize<'de> for Sources {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SourcesVisitor)
    }
}

/// Immutable configuration shared by every URL built in a process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub sources: Sources,
    /// Source used when generating URLs for CMS image transforms.
    #[serde(default, deserialize_with = "non_empty")]
    pub transform_source: Option<String>,
    /// Whether CMS transforms may upscale beyond the source dimensions.
    #[serde(default = "default_true")]
    pub upscale_images: bool,
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn new(sources: Sources) -> Self {
        Self {
            sources,
            transform_source: None,
            upscale_images: true,
        }
    }

    /// Parses a full config document: `{"sources": {...}, "transformSource": ...}`.
    pub fn from_json_str(json: &str) -> Result<Self, ImgixerError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ImgixerError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Loads configuration from `IMGIXER_CONFIG` (a file) or
    /// `IMGIXER_SOURCES` (inline sources), then applies the remaining
    /// environment overrides.
    pub fn from_env() -> Result<Self, ImgixerError> {
        let mut config = if let Ok(path) = env::var(ENV_CONFIG) {
            Self::from_file(path)?
        } else if let Ok(sources) = env::var(ENV_SOURCES) {
            let sources: Sources = serde_json::from_str(&sources)?;
            let config = Self::new(sources);
            config.validate()?;
            config
        } else {
            return Err(ImgixerError::Configuration(format!(
                "either {} or {} must be set",
                ENV_CONFIG, ENV_SOURCES
            )));
        };

        if let Ok(handle) = env::var(ENV_TRANSFORM_SOURCE) {
            let handle = handle.trim().to_string();
            config.transform_source = if handle.is_empty() { None } else { Some(handle) };
        }
        if let Ok(upscale) = env::var(ENV_UPSCALE_IMAGES) {
            config.upscale_images = parse_boolean(&upscale);
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ImgixerError> {
        if self.sources.is_empty() {
            return Err(ImgixerError::NoSources);
        }
        if let Some(handle) = &self.transform_source {
            if self.sources.get(handle).is_none() {
                return Err(ImgixerError::UnknownSource(handle.clone()));
            }
        }
        Ok(())
    }
}
