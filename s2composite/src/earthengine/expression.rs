//! Earth Engine expression graphs.
//!
//! The REST API accepts computations as a serialized graph of function
//! invocations. Only the handful of algorithms needed to pick a scene and
//! cut a band out of it are modelled here.
//!
//! ```text
//! {"result": "0", "values": {"0": {"functionInvocationValue": {
//!     "functionName": "Collection.first",
//!     "arguments": {"collection": {...}}}}}}
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::types::{OutputGrid, SceneQuery};
use crate::aoi::Aoi;

/// A node in an expression graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueNode {
    /// A literal JSON value.
    ConstantValue(Value),
    /// A call to a server-side algorithm.
    FunctionInvocationValue(FunctionInvocation),
}

/// A call to a named Earth Engine algorithm.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInvocation {
    pub function_name: String,
    pub arguments: BTreeMap<String, ValueNode>,
}

/// A complete expression: a value table plus the key of the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub result: String,
    pub values: BTreeMap<String, ValueNode>,
}

impl Expression {
    /// Wrap a single (possibly nested) node as an expression.
    pub fn new(root: ValueNode) -> Self {
        let mut values = BTreeMap::new();
        values.insert("0".to_string(), root);
        Self {
            result: "0".to_string(),
            values,
        }
    }

    /// Serialize to the JSON shape expected by the API.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// A literal value.
pub fn constant(value: impl Into<Value>) -> ValueNode {
    ValueNode::ConstantValue(value.into())
}

/// A call to `function_name` with named arguments.
pub fn invoke<'a>(
    function_name: &str,
    arguments: impl IntoIterator<Item = (&'a str, ValueNode)>,
) -> ValueNode {
    ValueNode::FunctionInvocationValue(FunctionInvocation {
        function_name: function_name.to_string(),
        arguments: arguments
            .into_iter()
            .map(|(name, node)| (name.to_string(), node))
            .collect(),
    })
}

/// The region of interest as a server-side polygon.
pub fn polygon(aoi: &Aoi) -> ValueNode {
    invoke(
        "GeometryConstructors.Polygon",
        [
            ("coordinates", constant(serde_json::json!(aoi.to_coordinates()))),
            ("evenOdd", constant(true)),
        ],
    )
}

/// The collection filtered to the region and date window, sorted by the
/// query's sort property (ascending).
pub fn sorted_collection(query: &SceneQuery, aoi: &Aoi) -> ValueNode {
    let collection = invoke(
        "ImageCollection.load",
        [("id", constant(query.collection.as_str()))],
    );

    let in_bounds = invoke(
        "Collection.filter",
        [
            ("collection", collection),
            (
                "filter",
                invoke(
                    "Filter.intersects",
                    [("leftField", constant(".all")), ("rightValue", polygon(aoi))],
                ),
            ),
        ],
    );

    let date_range = invoke(
        "DateRange",
        [
            ("start", date(&query.start.to_string())),
            ("end", date(&query.end.to_string())),
        ],
    );

    let in_window = invoke(
        "Collection.filter",
        [
            ("collection", in_bounds),
            (
                "filter",
                invoke(
                    "Filter.dateRangeContains",
                    [
                        ("leftValue", date_range),
                        ("rightField", constant("system:time_start")),
                    ],
                ),
            ),
        ],
    );

    invoke(
        "Collection.limit",
        [
            ("collection", in_window),
            ("key", constant(query.sort_property.as_str())),
            ("ascending", constant(true)),
        ],
    )
}

/// Number of images in a collection.
pub fn collection_size(collection: ValueNode) -> ValueNode {
    invoke("Collection.size", [("collection", collection)])
}

/// First image of a collection.
pub fn first(collection: ValueNode) -> ValueNode {
    invoke("Collection.first", [("collection", collection)])
}

/// A metadata property of an image or feature.
pub fn property(object: ValueNode, name: &str) -> ValueNode {
    invoke(
        "Element.get",
        [("object", object), ("property", constant(name))],
    )
}

/// The least-cloudy scene with per-pixel longitude/latitude bands appended.
pub fn scene(query: &SceneQuery, aoi: &Aoi) -> ValueNode {
    invoke(
        "Image.addBands",
        [
            ("dstImg", first(sorted_collection(query, aoi))),
            ("srcImg", invoke("Image.pixelLonLat", std::iter::empty())),
        ],
    )
}

/// A single band of `image`, reprojected to `grid` and clipped to the region.
pub fn band(image: ValueNode, band: &str, grid: &OutputGrid, aoi: &Aoi) -> ValueNode {
    let selected = invoke(
        "Image.select",
        [
            ("input", image),
            ("bandSelectors", constant(serde_json::json!([band]))),
        ],
    );

    let reprojected = invoke(
        "Image.reproject",
        [
            ("image", selected),
            (
                "crs",
                invoke("Projection", [("crs", constant(grid.crs.as_str()))]),
            ),
            ("scale", constant(grid.scale)),
        ],
    );

    invoke(
        "Image.clipToBoundsAndScale",
        [("input", reprojected), ("geometry", polygon(aoi))],
    )
}

fn date(value: &str) -> ValueNode {
    invoke("Date", [("value", constant(value))])
}
