//! Read-only view of a CMS asset.

/// A fractional `(x, y)` coordinate marking the important region of an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

/// Storage backend the asset's volume lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filesystem {
    #[default]
    Standard,
    /// Hosted asset platform; storage paths start with the project slug.
    Platform,
}

/// Snapshot of an asset supplied by the host CMS.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Asset {
    /// Storage path relative to the volume root.
    pub path: String,
    pub width: u32,
    pub height: u32,
    /// Unix timestamp of the last modification.
    pub last_modified: i64,
    pub focal_point: Option<FocalPoint>,
    /// Subfolder configured on the volume's filesystem.
    pub volume_subfolder: Option<String>,
    pub filesystem: Filesystem,
}

impl Asset {
    pub fn new(path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_last_modified(mut self, timestamp: i64) -> Self {
        self.last_modified = timestamp;
        self
    }

    pub fn with_focal_point(mut self, x: f64, y: f64) -> Self {
        self.focal_point = Some(FocalPoint { x, y });
        self
    }

    pub fn with_volume_subfolder(mut self, subfolder: impl Into<String>) -> Self {
        self.volume_subfolder = Some(subfolder.into());
        self
    }

    pub fn on_filesystem(mut self, filesystem: Filesystem) -> Self {
        self.filesystem = filesystem;
        self
    }

    /// Lowercased file extension, if the path has one.
    pub fn extension(&self) -> Option<String> {
        let file_name = self.path.rsplit('/').next()?;
        let (_, ext) = file_name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_lowercase())
        }
    }

    /// Width over height, when both are known.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.width as f64 / self.height as f64)
    }
}

/// What a caller hands in: a structured asset or a bare path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssetRef<'a> {
    Asset(&'a Asset),
    Path(&'a str),
}

impl<'a> AssetRef<'a> {
    pub fn as_asset(&self) -> Option<&'a Asset> {
        match self {
            AssetRef::Asset(asset) => Some(asset),
            AssetRef::Path(_) => None,
        }
    }
}

impl<'a> From<&'a Asset> for AssetRef<'a> {
    fn from(asset: &'a Asset) -> Self {
        AssetRef::Asset(asset)
    }
}

impl<'a> From<&'a str> for AssetRef<'a> {
    fn from(path: &'a str) -> Self {
        AssetRef::Path(path)
    }
}

impl<'a> From<&'a String> for AssetRef<'a> {
    fn from(path: &'a String) -> Self {
        AssetRef::Path(path.as_str())
    }
}
