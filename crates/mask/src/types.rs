use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A closed contour flattened to `[x0, y0, x1, y1, ...]` pixel coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Polygon(Vec<u32>);

impl Polygon {
    /// Build a polygon from `(x, y)` points, keeping their order
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let coords = points
            .into_iter()
            .flat_map(|(x, y)| [x, y])
            .collect();
        Self(coords)
    }

    /// The flat coordinate sequence
    pub fn coords(&self) -> &[u32] {
        &self.0
    }

    /// Iterate the `(x, y)` points of the contour
    pub fn points(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Number of points (not coordinates)
    pub fn len(&self) -> usize {
        self.0.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that every point lies inside a `width x height` raster
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.points().all(|(x, y)| x < width && y < height)
    }

    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}

impl From<Vec<u32>> for Polygon {
    fn from(coords: Vec<u32>) -> Self {
        Self(coords)
    }
}

/// Area and boundary polygons derived from one binarized mask
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MaskGeometry {
    /// Original mask dimensions
    pub width: u32,
    pub height: u32,
    /// Number of foreground pixels
    pub area: u64,
    /// Traced contours, outer borders and hole borders alike
    pub polygons: Vec<Polygon>,
}

impl MaskGeometry {
    /// True when the mask had no foreground at all
    pub fn is_empty(&self) -> bool {
        self.area == 0 && self.polygons.is_empty()
    }

    /// Total number of contour points across all polygons
    pub fn point_count(&self) -> usize {
        self.polygons.iter().map(Polygon::len).sum()
    }

    /// Serialize to a JSON string
    pub fn to_json(&self, pretty: bool) -> crate::error::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
