//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod footer_page_repo;
pub mod menu_repo;
pub mod product_repo;

pub use footer_page_repo::FooterPageRepo;
pub use menu_repo::MenuRepo;
pub use product_repo::ProductRepo;
