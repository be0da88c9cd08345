use std::collections::HashMap;

use crate::font_face::Font;
use crate::properties::PropertyId;
use crate::stylesheet::PseudoType;
use crate::values::{CssValue, ValueId, VariableData};

/// Computed `display`, materialized because nearly every consumer asks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Display {
    None,
    #[default]
    Inline,
    Block,
    InlineBlock,
    Flex,
    InlineFlex,
    FlowRoot,
    Contents,
    ListItem,
    Table,
    InlineTable,
    TableRowGroup,
    TableHeaderGroup,
    TableFooterGroup,
    TableRow,
    TableColumnGroup,
    TableColumn,
    TableCell,
    TableCaption,
}

impl Display {
    pub fn from_value(value: &CssValue) -> Option<Display> {
        let display = match value.as_ident()? {
            ValueId::None => Display::None,
            ValueId::Inline => Display::Inline,
            ValueId::Block => Display::Block,
            ValueId::InlineBlock => Display::InlineBlock,
            ValueId::Flex => Display::Flex,
            ValueId::InlineFlex => Display::InlineFlex,
            ValueId::FlowRoot => Display::FlowRoot,
            ValueId::Contents => Display::Contents,
            ValueId::ListItem => Display::ListItem,
            ValueId::Table => Display::Table,
            ValueId::InlineTable => Display::InlineTable,
            ValueId::TableRowGroup => Display::TableRowGroup,
            ValueId::TableHeaderGroup => Display::TableHeaderGroup,
            ValueId::TableFooterGroup => Display::TableFooterGroup,
            ValueId::TableRow => Display::TableRow,
            ValueId::TableColumnGroup => Display::TableColumnGroup,
            ValueId::TableColumn => Display::TableColumn,
            ValueId::TableCell => Display::TableCell,
            ValueId::TableCaption => Display::TableCaption,
            _ => return None,
        };
        Some(display)
    }

    pub fn is_flex_container(self) -> bool {
        matches!(self, Display::Flex | Display::InlineFlex)
    }

    /// The blockified form used for floated, positioned, root and
    /// flex-child boxes.
    pub fn blockified(self) -> Display {
        match self {
            Display::Inline | Display::InlineBlock => Display::Block,
            Display::InlineTable => Display::Table,
            Display::InlineFlex => Display::Flex,
            Display::TableRowGroup
            | Display::TableHeaderGroup
            | Display::TableFooterGroup
            | Display::TableRow
            | Display::TableColumnGroup
            | Display::TableColumn
            | Display::TableCell
            | Display::TableCaption => Display::Block,
            other => other,
        }
    }
}

/// Computed `position`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PositionMode {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
}

impl PositionMode {
    pub fn from_value(value: &CssValue) -> Option<PositionMode> {
        let position = match value.as_ident()? {
            ValueId::Static => PositionMode::Static,
            ValueId::Relative => PositionMode::Relative,
            ValueId::Absolute => PositionMode::Absolute,
            ValueId::Fixed => PositionMode::Fixed,
            _ => return None,
        };
        Some(position)
    }

    pub fn is_positioned(self) -> bool {
        self != PositionMode::Static
    }

    pub fn is_out_of_flow(self) -> bool {
        matches!(self, PositionMode::Absolute | PositionMode::Fixed)
    }
}

/// Computed `float`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FloatMode {
    #[default]
    None,
    Left,
    Right,
}

impl FloatMode {
    pub fn from_value(value: &CssValue) -> Option<FloatMode> {
        let float = match value.as_ident()? {
            ValueId::None => FloatMode::None,
            ValueId::Left => FloatMode::Left,
            ValueId::Right => FloatMode::Right,
            _ => return None,
        };
        Some(float)
    }

    pub fn is_floating(self) -> bool {
        self != FloatMode::None
    }
}

/// The resolved style of one element (or pseudo-element). Built by the
/// cascade, read-only for the rest of the layout pass.
#[derive(Clone, Debug, Default)]
pub struct BoxStyle {
    pub pseudo: PseudoType,
    /// Resolved property values; relative lengths are already rewritten
    /// to px
    properties: HashMap<PropertyId, CssValue>,
    /// Custom property values visible on this element (own plus inherited)
    pub custom_properties: HashMap<String, VariableData>,
    // the most-queried properties, materialized eagerly
    pub display: Display,
    pub position: PositionMode,
    pub float: FloatMode,
    pub font: Font,
}

impl BoxStyle {
    pub fn new(pseudo: PseudoType) -> Self {
        Self {
            pseudo,
            ..Default::default()
        }
    }

    pub fn get(&self, id: PropertyId) -> Option<&CssValue> {
        self.properties.get(&id)
    }

    /// The declared value or the property's initial value.
    pub fn get_or_initial(&self, id: PropertyId) -> Option<CssValue> {
        self.properties.get(&id).cloned().or_else(|| id.initial_value())
    }

    pub fn set(&mut self, id: PropertyId, value: CssValue) {
        self.properties.insert(id, value);
    }

    pub fn remove(&mut self, id: PropertyId) -> Option<CssValue> {
        self.properties.remove(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn properties(&self) -> impl Iterator<Item = (&PropertyId, &CssValue)> {
        self.properties.iter()
    }

    pub fn properties_mut(&mut self) -> impl Iterator<Item = (&PropertyId, &mut CssValue)> {
        self.properties.iter_mut()
    }

    /// The computed color, with `currentcolor` resolved (to this element's
    /// own color, which is what the color property itself inherits).
    pub fn color(&self) -> crate::colors::RgbaColor {
        match self.get(PropertyId::Color) {
            Some(CssValue::Color(color)) => *color,
            _ => crate::colors::RgbaColor::default(),
        }
    }

    /// Refreshes the materialized display/position/float fields from the
    /// property map.
    pub(crate) fn materialize(&mut self) {
        if let Some(value) = self.properties.get(&PropertyId::Display) {
            if let Some(display) = Display::from_value(value) {
                self.display = display;
            }
        }
        if let Some(value) = self.properties.get(&PropertyId::Position) {
            if let Some(position) = PositionMode::from_value(value) {
                self.position = position;
            }
        }
        if let Some(value) = self.properties.get(&PropertyId::Float) {
            if let Some(float) = FloatMode::from_value(value) {
                self.float = float;
            }
        }
    }

    /// Writes the materialized fields back into the property map, keeping
    /// the two views consistent after fix-ups.
    pub(crate) fn sync_materialized(&mut self) {
        let display_id = match self.display {
            Display::None => ValueId::None,
            Display::Inline => ValueId::Inline,
            Display::Block => ValueId::Block,
            Display::InlineBlock => ValueId::InlineBlock,
            Display::Flex => ValueId::Flex,
            Display::InlineFlex => ValueId::InlineFlex,
            Display::FlowRoot => ValueId::FlowRoot,
            Display::Contents => ValueId::Contents,
            Display::ListItem => ValueId::ListItem,
            Display::Table => ValueId::Table,
            Display::InlineTable => ValueId::InlineTable,
            Display::TableRowGroup => ValueId::TableRowGroup,
            Display::TableHeaderGroup => ValueId::TableHeaderGroup,
            Display::TableFooterGroup => ValueId::TableFooterGroup,
            Display::TableRow => ValueId::TableRow,
            Display::TableColumnGroup => ValueId::TableColumnGroup,
            Display::TableColumn => ValueId::TableColumn,
            Display::TableCell => ValueId::TableCell,
            Display::TableCaption => ValueId::TableCaption,
        };
        self.properties.insert(PropertyId::Display, CssValue::Ident(display_id));

        let position_id = match self.position {
            PositionMode::Static => ValueId::Static,
            PositionMode::Relative => ValueId::Relative,
            PositionMode::Absolute => ValueId::Absolute,
            PositionMode::Fixed => ValueId::Fixed,
        };
        self.properties.insert(PropertyId::Position, CssValue::Ident(position_id));

        let float_id = match self.float {
            FloatMode::None => ValueId::None,
            FloatMode::Left => ValueId::Left,
            FloatMode::Right => ValueId::Right,
        };
        self.properties.insert(PropertyId::Float, CssValue::Ident(float_id));
    }
}
