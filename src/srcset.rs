//! Responsive variant expansion.
//!
//! `from`, `to` and `step` describe a sweep of widths. Each width yields one
//! `"<url> <width>w"` candidate; the candidates join into a `srcset` value.

use crate::constants::{DEFAULT_SRCSET_STEP, PARAM_FROM, PARAM_STEP, PARAM_TO};
use crate::error::ImgixerError;
use crate::monitoring;
use crate::params::ParamSet;
use tracing::debug;

/// An inclusive width sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantRequest {
    pub from: i64,
    pub to: i64,
    pub step: i64,
}

impl VariantRequest {
    /// Builds a normalized sweep: ascending, stepping by the step's
    /// magnitude. A zero step uses the default.
    pub fn new(from: i64, to: i64, step: i64) -> Self {
        let step = match step.saturating_abs() {
            0 => DEFAULT_SRCSET_STEP,
            step => step,
        };
        Self {
            from: from.min(to),
            to: from.max(to),
            step,
        }
    }

    /// Removes the sweep keys from `params`.
    ///
    /// Returns a request only when both `from` and `to` are present and
    /// non-zero.
    pub fn take(params: &mut ParamSet) -> Option<Self> {
        let from = params.remove(PARAM_FROM).and_then(|v| v.as_i64());
        let to = params.remove(PARAM_TO).and_then(|v| v.as_i64());
        let step = params
            .remove(PARAM_STEP)
            .and_then(|v| v.as_i64())
            .unwrap_or(DEFAULT_SRCSET_STEP);

        match (from, to) {
            (Some(from), Some(to)) if from != 0 && to != 0 => Some(Self::new(from, to, step)),
            _ => None,
        }
    }

    pub fn widths(&self) -> Widths {
        Widths {
            next: self.from,
            to: self.to,
            step: self.step,
        }
    }
}

/// Lazy iterator over the widths of a sweep.
#[derive(Debug, Clone)]
pub struct Widths {
    next: i64,
    to: i64,
    step: i64,
}

impl Iterator for Widths {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.next > self.to {
            return None;
        }
        let width = self.next;
        self.next = self.next.saturating_add(self.step);
        Some(width)
    }
}

/// Expands `params` into srcset candidates using `build` for each URL.
///
/// Without a sweep the result is a single bare URL (empty when `build`
/// produced nothing). Widths whose URL cannot be built are omitted; fatal
/// errors abort the whole expansion.
pub fn expand<F>(params: &ParamSet, mut build: F) -> Result<Vec<String>, ImgixerError>
where
    F: FnMut(ParamSet) -> Result<Option<String>, ImgixerError>,
{
    let mut params = params.clone();
    let Some(request) = VariantRequest::take(&mut params) else {
        return Ok(vec![build(params)?.unwrap_or_default()]);
    };

    let mut candidates = Vec::new();
    for width in request.widths() {
        let mut variant = params.clone();
        variant.insert("w", width);
        match build(variant)? {
            Some(url) if !url.is_empty() => candidates.push(format!("{} {}w", url, width)),
            _ => {
                debug!("No URL for srcset width {}; skipping", width);
                monitoring::increment_srcset_variants_skipped();
            }
        }
    }

    Ok(candidates)
}

/// [`expand`], joined with `,`.
pub fn srcset<F>(params: &ParamSet, build: F) -> Result<String, ImgixerError>
where
    F: FnMut(ParamSet) -> Result<Option<String>, ImgixerError>,
{
    Ok(expand(params, build)?.join(","))
}
