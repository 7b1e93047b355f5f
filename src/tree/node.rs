//! Design node records as delivered by the plugin's extraction step.
//!
//! A `NodeRecord` is an immutable snapshot of one visual node and its descendants.
//! Each synchronization event supplies a fresh tree; nothing here is mutated in place.

use serde::de::{DeserializeOwned, Error as DeError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Marker string the plugin sends for a property that differs across a node's parts.
pub const MIXED_MARKER: &str = "mixed";

/// A style value that is either concrete or reported by the design tool as "mixed".
///
/// On the wire a mixed value is the literal string `"mixed"`; anything else must
/// deserialize as `T`.
#[derive(Debug, Clone, PartialEq)]
pub enum MaybeMixed<T> {
    Concrete(T),
    Mixed,
}

impl<T> MaybeMixed<T> {
    pub fn concrete(&self) -> Option<&T> {
        match self {
            MaybeMixed::Concrete(value) => Some(value),
            MaybeMixed::Mixed => None,
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, MaybeMixed::Mixed)
    }
}

impl<T: Serialize> Serialize for MaybeMixed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MaybeMixed::Concrete(value) => value.serialize(serializer),
            MaybeMixed::Mixed => serializer.serialize_str(MIXED_MARKER),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for MaybeMixed<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.as_str() == Some(MIXED_MARKER) {
            return Ok(MaybeMixed::Mixed);
        }
        T::deserialize(value)
            .map(MaybeMixed::Concrete)
            .map_err(D::Error::custom)
    }
}

/// RGBA color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub position: f64,
    pub color: Color,
}

/// Fill or stroke paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(rename = "type")]
    pub paint_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_stops: Option<Vec<GradientStop>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_handle_positions: Option<Vec<Vector>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_hash: Option<String>,
}

/// Shadow or blur effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(rename = "type")]
    pub effect_type: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Vector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

/// Numeric value with a unit, used for line height and letter spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitValue {
    #[serde(default)]
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub horizontal: String,
    pub vertical: String,
}

/// One visual node and its visible descendants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default = "default_true")]
    pub visible: bool,

    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,

    // Auto layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_wrap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_axis_align_items: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_axis_align_items: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_sizing_horizontal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_sizing_vertical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,

    // Style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Vec<Paint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<Vec<Paint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<MaybeMixed<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_left_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_right_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_right_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_left_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<Effect>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<String>,

    // Text (TEXT nodes only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<MaybeMixed<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<MaybeMixed<FontName>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align_vertical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<UnitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<UnitValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_case: Option<String>,

    // Component instances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_instance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_properties: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,

    /// Free-form note the designer attached for the assistant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
}

fn default_true() -> bool {
    true
}

impl NodeRecord {
    /// Create a bare node with the given identity and size; all style fields unset.
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: impl Into<String>) -> Self {
        NodeRecord {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
            visible: true,
            width: 0.0,
            height: 0.0,
            x: 0.0,
            y: 0.0,
            layout_mode: None,
            layout_wrap: None,
            primary_axis_align_items: None,
            counter_axis_align_items: None,
            layout_sizing_horizontal: None,
            layout_sizing_vertical: None,
            item_spacing: None,
            padding_top: None,
            padding_right: None,
            padding_bottom: None,
            padding_left: None,
            fills: None,
            strokes: None,
            stroke_weight: None,
            stroke_align: None,
            corner_radius: None,
            top_left_radius: None,
            top_right_radius: None,
            bottom_right_radius: None,
            bottom_left_radius: None,
            effects: None,
            opacity: None,
            blend_mode: None,
            characters: None,
            font_size: None,
            font_name: None,
            text_align_horizontal: None,
            text_align_vertical: None,
            line_height: None,
            letter_spacing: None,
            text_decoration: None,
            text_case: None,
            is_instance: None,
            main_component_name: None,
            variant_properties: None,
            constraints: None,
            annotation: None,
            children: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_text(mut self, characters: impl Into<String>) -> Self {
        self.characters = Some(characters.into());
        self
    }

    pub fn with_children(mut self, children: Vec<NodeRecord>) -> Self {
        self.children = children;
        self
    }

    pub fn is_text(&self) -> bool {
        self.node_type == "TEXT"
    }

    /// Find a node by id anywhere in this subtree (pre-order).
    pub fn find(&self, id: &str) -> Option<&NodeRecord> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}
