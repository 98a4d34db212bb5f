//! The drawing document

use cadsync_fs::{NormalizedPath, io as fs_io};

use crate::entities::Entity;
use crate::io::{DxfPair, parse_dxf, write_dxf};
use crate::types::Handle;
use crate::Result;

/// Lowest handle handed out in a drawing that has none yet
const FIRST_HANDLE: u64 = 0x10;

/// A top-level DXF section
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Section {
    /// Kept as read, from `0 SECTION` through `0 ENDSEC`
    Raw(Vec<DxfPair>),
    /// Placeholder for the ENTITIES section, written from the entity list
    Entities,
}

impl Section {
    pub(crate) fn name(&self) -> Option<&str> {
        match self {
            Section::Raw(pairs) => pairs
                .get(1)
                .filter(|p| p.code == 2)
                .map(|p| p.value.trim()),
            Section::Entities => Some("ENTITIES"),
        }
    }
}

/// An in-memory drawing
///
/// Read once at the start of a run, mutated in memory and written once at
/// the end. Newly added entities always receive a handle above every handle
/// present in the file, so a handle is never reused.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub(crate) sections: Vec<Section>,
    entities: Vec<Entity>,
    next_handle: u64,
}

impl Drawing {
    /// An empty drawing with a minimal header.
    pub fn new() -> Self {
        let header = vec![
            DxfPair::new(0, "SECTION"),
            DxfPair::new(2, "HEADER"),
            DxfPair::new(9, "$ACADVER"),
            DxfPair::new(1, "AC1015"),
            DxfPair::new(9, "$HANDSEED"),
            DxfPair::handle(5, Handle::new(FIRST_HANDLE)),
            DxfPair::new(0, "ENDSEC"),
        ];
        Self {
            sections: vec![Section::Raw(header), Section::Entities],
            entities: Vec::new(),
            next_handle: FIRST_HANDLE,
        }
    }

    pub(crate) fn from_parts(
        mut sections: Vec<Section>,
        entities: Vec<Entity>,
        handle_seed: Option<Handle>,
    ) -> Self {
        if !sections.iter().any(|s| matches!(s, Section::Entities)) {
            let at = sections
                .iter()
                .position(|s| matches!(s.name(), Some("OBJECTS" | "THUMBNAILIMAGE")))
                .unwrap_or(sections.len());
            sections.insert(at, Section::Entities);
        }

        let raw_max = sections
            .iter()
            .filter_map(|s| match s {
                Section::Raw(pairs) => Some(pairs),
                Section::Entities => None,
            })
            .flat_map(|pairs| {
                // The seed itself is not an owned handle
                pairs.iter().enumerate().filter(move |(i, p)| {
                    (p.code == 5 || p.code == 105)
                        && !(*i > 0 && pairs[i - 1].is(9, "$HANDSEED"))
                })
            })
            .map(|(_, p)| p)
            .filter_map(DxfPair::as_handle)
            .map(|h| h.value())
            .max()
            .unwrap_or(0);
        let entity_max = entities
            .iter()
            .flat_map(|e| {
                let common = e.common();
                let trailing = common
                    .source
                    .iter()
                    .flat_map(|s| s.trailing.iter())
                    .filter(|p| p.code == 5)
                    .filter_map(DxfPair::as_handle);
                std::iter::once(common.handle).chain(trailing)
            })
            .map(|h| h.value())
            .max()
            .unwrap_or(0);

        let next_handle = handle_seed
            .map(|h| h.value())
            .unwrap_or(FIRST_HANDLE)
            .max(raw_max + 1)
            .max(entity_max + 1);

        Self {
            sections,
            entities,
            next_handle,
        }
    }

    /// Parse DXF text.
    pub fn parse(content: &str) -> Result<Self> {
        parse_dxf(content)
    }

    /// Read a drawing file. Non-UTF-8 files are decoded as Latin-1.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = fs_io::read_text_lossy(path)?;
        let drawing = parse_dxf(&content)?;
        tracing::debug!(
            path = %path,
            entities = drawing.entities.len(),
            next_handle = %Handle::new(drawing.next_handle),
            "loaded drawing"
        );
        Ok(drawing)
    }

    /// Read a drawing file, or start an empty drawing if it does not exist.
    pub fn load_or_new(path: &NormalizedPath) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path, "drawing does not exist, starting empty");
            Ok(Self::new())
        }
    }

    /// Render the drawing as DXF text.
    pub fn to_dxf(&self) -> String {
        write_dxf(self)
    }

    /// Write the drawing atomically.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        fs_io::write_text(path, &self.to_dxf())?;
        tracing::debug!(path = %path, entities = self.entities.len(), "saved drawing");
        Ok(())
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, handle: Handle) -> Option<&Entity> {
        if handle.is_null() {
            return None;
        }
        self.entities.iter().find(|e| e.handle() == handle)
    }

    pub fn entity_mut(&mut self, handle: Handle) -> Option<&mut Entity> {
        if handle.is_null() {
            return None;
        }
        self.entities.iter_mut().find(|e| e.handle() == handle)
    }

    /// Entities on a layer (layer names compare case-insensitively).
    pub fn entities_on_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a Entity> {
        self.entities
            .iter()
            .filter(move |e| e.layer().eq_ignore_ascii_case(layer))
    }

    /// Add an entity, assigning it a fresh handle.
    pub fn add_entity(&mut self, entity: impl Into<Entity>) -> Handle {
        let mut entity = entity.into();
        let handle = self.allocate_handle();
        entity.common_mut().handle = handle;
        self.entities.push(entity);
        handle
    }

    /// Remove an entity together with its dependent records.
    pub fn remove_entity(&mut self, handle: Handle) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.handle() == handle)?;
        Some(self.entities.remove(idx))
    }

    pub fn allocate_handle(&mut self) -> Handle {
        let handle = Handle::new(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// The handle the next added entity will receive (`$HANDSEED`).
    pub fn next_handle(&self) -> Handle {
        Handle::new(self.next_handle)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}
