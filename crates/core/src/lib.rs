//! Domain logic for the Vitalis content service.
//!
//! Everything in this crate is free of I/O: slug handling, the content
//! vocabulary shared by menus, products and footer pages, product
//! enrichment, the block renderer and the page resolution state machine.
//! Persistence plugs in through [`resolution::ContentSource`].

pub mod blocks;
pub mod content;
pub mod enrichment;
pub mod error;
pub mod resolution;
pub mod rules;
pub mod slug;
pub mod types;
