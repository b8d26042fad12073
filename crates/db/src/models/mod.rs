//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO and a `Deserialize` update DTO
//! - A validated draft that the repository persists

pub mod footer_page;
pub mod menu;
pub mod product;
