//! Content definition types contributed by packages.
//!
//! Each type implements [`Definition`](crate::Definition) so it can be stored
//! in the catalogue under its own table.

mod actors;
mod items;
mod maps;

pub use actors::ActorTemplate;
pub use items::{ItemDefinition, ItemKind};
pub use maps::{MapDefinition, MapError};
