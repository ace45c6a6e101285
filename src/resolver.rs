use crate::config::{ProviderKind, Source, Sources};
use crate::error::ImgixerError;
use tracing::{debug, info};

/// A source picked for a request together with the provider that serves it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSource<'a> {
    pub source: &'a Source,
    pub provider: ProviderKind,
}

/// Looks up sources by handle.
pub struct SourceResolver<'a> {
    sources: &'a Sources,
}

impl<'a> SourceResolver<'a> {
    pub fn new(sources: &'a Sources) -> Self {
        Self { sources }
    }

    /// Resolves `handle`, or the first declared source when no handle is
    /// given. An unknown handle is an error; there is no fallback to the
    /// default source.
    pub fn resolve(&self, handle: Option<&str>) -> Result<ResolvedSource<'a>, ImgixerError> {
        let source = match handle {
            Some(handle) => self
                .sources
                .get(handle)
                .ok_or_else(|| ImgixerError::UnknownSource(handle.to_string()))?,
            None => self.sources.first().ok_or(ImgixerError::NoSources)?,
        };

        let provider = source.effective_provider();
        if source.provider.is_some_and(|p| p != provider) {
            info!(
                "Source `{}` has its own domain; serving with the {} provider",
                source.handle, provider
            );
        }
        debug!("Resolved source handle={} provider={}", source.handle, provider);

        Ok(ResolvedSource { source, provider })
    }
}
