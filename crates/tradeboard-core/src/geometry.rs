//! Name-keyed province boundary lookup.
//!
//! Boundaries are resolved outside the core (see `tradeboard-geo`); the map
//! aggregator only needs to know which shape belongs to which region.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::Region;

/// Shape provider consulted by the map aggregator.
pub trait ShapeLookup: Send + Sync {
    /// Identifier of the shape drawn for `region`, if one is known.
    fn shape_id(&self, region: &Region) -> Option<&str>;
}

/// Shape set with no boundaries; every region renders without geometry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShapes;

impl ShapeLookup for NoShapes {
    fn shape_id(&self, _region: &Region) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    pub id: String,
    pub geometry: Value,
}

/// Canadian province/territory boundaries keyed by canonical region name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShapeSet {
    shapes: BTreeMap<Region, Shape>,
}

impl ShapeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the Canadian features of a GeoJSON `FeatureCollection`.
    ///
    /// Features are matched by `properties.name` through [`Region::parse`], so
    /// `Quebec` and `Québec` land on the same key. Features tagged with a
    /// non-Canadian `iso_a2` are ignored, as are unknown names.
    pub fn from_geojson(collection: &Value) -> Self {
        let mut set = Self::new();
        let features = collection
            .get("features")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for feature in features {
            let properties = feature.get("properties");
            let property = |name: &str| {
                properties
                    .and_then(|props| props.get(name))
                    .and_then(Value::as_str)
            };

            if property("iso_a2").is_some_and(|iso| iso != "CA") {
                continue;
            }
            let Some(region) = property("name").and_then(|name| Region::parse(name).ok()) else {
                continue;
            };
            if region.is_canada() {
                continue;
            }

            let id = property("adm1_code")
                .map(str::to_owned)
                .unwrap_or_else(|| region.to_string());
            let geometry = feature.get("geometry").cloned().unwrap_or(Value::Null);
            set.insert(region, Shape { id, geometry });
        }

        set
    }

    pub fn insert(&mut self, region: Region, shape: Shape) {
        self.shapes.insert(region, shape);
    }

    pub fn get(&self, region: &Region) -> Option<&Shape> {
        self.shapes.get(region)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Provinces and territories that have no boundary in this set.
    pub fn missing_regions(&self) -> Vec<Region> {
        Region::provinces()
            .filter(|region| !self.shapes.contains_key(region))
            .collect()
    }
}

impl ShapeLookup for ShapeSet {
    fn shape_id(&self, region: &Region) -> Option<&str> {
        self.get(region).map(|shape| shape.id.as_str())
    }
}
