//! Drawing entities
//!
//! Four entity kinds are modelled with typed fields; every other entity type
//! is an [`UnknownEntity`] that only exposes the common properties. Entities
//! read from a file keep their original group-code sequence so the writer can
//! patch modelled values in place.

pub mod insert;
pub mod lwpolyline;
pub mod text;
pub mod unknown;
pub mod viewport;

pub use insert::Insert;
pub use lwpolyline::LwPolyline;
pub use text::Text;
pub use unknown::UnknownEntity;
pub use viewport::Viewport;

use crate::io::DxfPair;
use crate::types::{Color, Handle};
use crate::xdata::ExtendedData;

/// Linetype name meaning "use the layer's linetype"
pub const LINETYPE_BYLAYER: &str = "BYLAYER";

/// Group codes owned by [`EntityCommon`]
pub(crate) const COMMON_CODES: &[i32] = &[5, 8, 62, 6];

/// The group-code sequence an entity was read from.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawSource {
    /// Pairs after the `0 <TYPE>` line, up to the first XDATA pair
    pub(crate) body: Vec<DxfPair>,
    /// Dependent records (attributes, vertices) up to and including SEQEND
    pub(crate) trailing: Vec<DxfPair>,
}

/// Properties shared by every entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    pub handle: Handle,
    pub layer: String,
    pub color: Color,
    pub linetype: String,
    pub extended_data: ExtendedData,
    pub(crate) source: Option<RawSource>,
}

impl EntityCommon {
    pub fn new() -> Self {
        Self {
            handle: Handle::NULL,
            layer: "0".to_string(),
            color: Color::ByLayer,
            linetype: LINETYPE_BYLAYER.to_string(),
            extended_data: ExtendedData::new(),
            source: None,
        }
    }

    pub fn with_layer(layer: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            ..Self::new()
        }
    }

    /// Whether this entity was read from a file rather than created.
    pub fn is_from_file(&self) -> bool {
        self.source.is_some()
    }

    pub(crate) fn read(body: &[DxfPair]) -> Self {
        let mut common = Self::new();
        if let Some(handle) = first(body, 5).and_then(DxfPair::as_handle) {
            common.handle = handle;
        }
        if let Some(layer) = first(body, 8) {
            common.layer = layer.value.clone();
        }
        if let Some(color) = first(body, 62).and_then(DxfPair::as_i64) {
            common.color = Color::from_index(color as i16);
        }
        if let Some(linetype) = first(body, 6) {
            common.linetype = linetype.value.clone();
        }
        common
    }

    pub(crate) fn pairs(&self) -> Vec<DxfPair> {
        let mut pairs = vec![DxfPair::handle(5, self.handle), DxfPair::new(8, &self.layer)];
        if self.color != Color::ByLayer {
            pairs.push(DxfPair::int(62, self.color.index() as i64));
        }
        if !self.linetype.eq_ignore_ascii_case(LINETYPE_BYLAYER) && !self.linetype.is_empty() {
            pairs.push(DxfPair::new(6, &self.linetype));
        }
        pairs
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-type DXF mapping of the modelled entity kinds.
pub(crate) trait DxfBody: Sized {
    const TYPE_NAME: &'static str;
    /// Codes that repeat as a block (polyline vertices) and are rewritten
    /// as a whole at the position of their first occurrence.
    const GROUPED_CODES: &'static [i32] = &[];

    fn read_body(common: EntityCommon, body: &[DxfPair]) -> Self;

    /// Modelled type-specific pairs in canonical order.
    fn body_pairs(&self) -> Vec<DxfPair>;

    /// Pair skeleton for a newly created entity. Codes present here mark
    /// where modelled values go; their values are placeholders.
    fn template() -> Vec<DxfPair>;
}

/// Any entity of the drawing
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Text(Text),
    Insert(Insert),
    Viewport(Viewport),
    LwPolyline(LwPolyline),
    Unknown(UnknownEntity),
}

impl Entity {
    pub fn common(&self) -> &EntityCommon {
        match self {
            Entity::Text(e) => &e.common,
            Entity::Insert(e) => &e.common,
            Entity::Viewport(e) => &e.common,
            Entity::LwPolyline(e) => &e.common,
            Entity::Unknown(e) => &e.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut EntityCommon {
        match self {
            Entity::Text(e) => &mut e.common,
            Entity::Insert(e) => &mut e.common,
            Entity::Viewport(e) => &mut e.common,
            Entity::LwPolyline(e) => &mut e.common,
            Entity::Unknown(e) => &mut e.common,
        }
    }

    pub fn handle(&self) -> Handle {
        self.common().handle
    }

    pub fn layer(&self) -> &str {
        &self.common().layer
    }

    pub fn extended_data(&self) -> &ExtendedData {
        &self.common().extended_data
    }

    pub fn extended_data_mut(&mut self) -> &mut ExtendedData {
        &mut self.common_mut().extended_data
    }

    /// DXF type name (`TEXT`, `INSERT`, ...)
    pub fn type_name(&self) -> &str {
        match self {
            Entity::Text(_) => Text::TYPE_NAME,
            Entity::Insert(_) => Insert::TYPE_NAME,
            Entity::Viewport(_) => Viewport::TYPE_NAME,
            Entity::LwPolyline(_) => LwPolyline::TYPE_NAME,
            Entity::Unknown(e) => &e.type_name,
        }
    }

    /// Build an entity from the pairs of one `0 <TYPE>` record.
    pub(crate) fn from_record(
        type_name: &str,
        body: Vec<DxfPair>,
        extended_data: ExtendedData,
        trailing: Vec<DxfPair>,
    ) -> Self {
        let mut common = EntityCommon::read(&body);
        common.extended_data = extended_data;
        let mut entity = match type_name {
            "TEXT" => Entity::Text(Text::read_body(common, &body)),
            "INSERT" => Entity::Insert(Insert::read_body(common, &body)),
            "VIEWPORT" => Entity::Viewport(Viewport::read_body(common, &body)),
            "LWPOLYLINE" => Entity::LwPolyline(LwPolyline::read_body(common, &body)),
            other => Entity::Unknown(UnknownEntity::new(other, common)),
        };
        entity.common_mut().source = Some(RawSource { body, trailing });
        entity
    }

    /// Modelled type-specific pairs, grouped codes and creation template.
    pub(crate) fn dxf_parts(&self) -> (Vec<DxfPair>, &'static [i32], Vec<DxfPair>) {
        fn parts<T: DxfBody>(e: &T) -> (Vec<DxfPair>, &'static [i32], Vec<DxfPair>) {
            (e.body_pairs(), T::GROUPED_CODES, T::template())
        }
        match self {
            Entity::Text(e) => parts(e),
            Entity::Insert(e) => parts(e),
            Entity::Viewport(e) => parts(e),
            Entity::LwPolyline(e) => parts(e),
            Entity::Unknown(_) => (Vec::new(), &[], UnknownEntity::template()),
        }
    }
}

impl From<Text> for Entity {
    fn from(e: Text) -> Self {
        Entity::Text(e)
    }
}

impl From<Insert> for Entity {
    fn from(e: Insert) -> Self {
        Entity::Insert(e)
    }
}

impl From<Viewport> for Entity {
    fn from(e: Viewport) -> Self {
        Entity::Viewport(e)
    }
}

impl From<LwPolyline> for Entity {
    fn from(e: LwPolyline) -> Self {
        Entity::LwPolyline(e)
    }
}

pub(crate) fn first(body: &[DxfPair], code: i32) -> Option<&DxfPair> {
    body.iter().find(|p| p.code == code)
}

pub(crate) fn first_f64(body: &[DxfPair], code: i32) -> Option<f64> {
    first(body, code).and_then(DxfPair::as_f64)
}
