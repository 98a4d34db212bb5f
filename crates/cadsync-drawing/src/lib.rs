//! Drawing model for cadsync
//!
//! A deliberately small model of a CAD drawing: the entity kinds the sync
//! engine manages (`TEXT`, `INSERT`, `VIEWPORT`, `LWPOLYLINE`) are typed,
//! everything else is carried through untouched. The DXF codec patches
//! modelled values into the original group-code sequence on write, so a
//! drawing that went through a sync run keeps every property cadsync does
//! not know about.

pub mod document;
pub mod entities;
pub mod error;
pub mod io;
pub mod types;
pub mod xdata;

pub use document::Drawing;
pub use entities::{Entity, EntityCommon, Insert, LwPolyline, Text, UnknownEntity, Viewport};
pub use error::{Error, Result};
pub use types::{Color, Handle, Vector2};
pub use xdata::{ExtendedData, ExtendedDataRecord, XDataValue};
