use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LayoutError, Result};
use crate::tensor::{ElementKind, Space};

/// The persisted form of a layout, *eg.*
/// (dimensions: [3, 4, 5], axis_order: Some([2, 1, 0]), element_kind: Some(F32))
/// Both optional fields may be left out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub dimensions: Vec<usize>,
    #[serde(default)]
    pub axis_order: Option<Vec<usize>>,
    #[serde(default)]
    pub element_kind: Option<ElementKind>,
}

impl LayoutConfig {
    pub fn from_ron(config: &str) -> Result<LayoutConfig> {
        Ok(ron::from_str(config)?)
    }

    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::to_string(self)?)
    }

    pub fn into_space(self) -> Result<Space> {
        Space::try_from(self)
    }
}

impl TryFrom<LayoutConfig> for Space {
    type Error = LayoutError;

    fn try_from(config: LayoutConfig) -> Result<Space> {
        Space::build(&config.dimensions, config.axis_order.as_deref(), config.element_kind)
    }
}

impl From<&Space> for LayoutConfig {
    fn from(space: &Space) -> Self {
        LayoutConfig {
            dimensions: space.dims().to_vec(),
            axis_order: Some(space.axis_order().to_vec()),
            element_kind: Some(space.kind()),
        }
    }
}

impl Serialize for Space {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        LayoutConfig::from(self).serialize(serializer)
    }
}

// deserializing goes through the same validation as Space::build
impl<'de> Deserialize<'de> for Space {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Space, D::Error> {
        let config = LayoutConfig::deserialize(deserializer)?;
        Space::try_from(config).map_err(serde::de::Error::custom)
    }
}

/// Reads a RON layout document from disk and builds the space it describes
pub fn load_space(path: impl AsRef<Path>) -> anyhow::Result<Space> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading layout file {}", path.display()))?;
    let space = LayoutConfig::from_ron(&text)
        .and_then(LayoutConfig::into_space)
        .with_context(|| format!("layout file {}", path.display()))?;
    debug!(path = %path.display(), "loaded layout");
    Ok(space)
}
