//! Footer page entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use vitalis_core::blocks::Block;
use vitalis_core::content::ContentPage;
use vitalis_core::error::CoreError;
use vitalis_core::rules::validate_blocks;
use vitalis_core::types::{DbId, Timestamp};

/// Publication settings of a footer page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct FooterConfig {
    pub is_active: bool,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self { is_active: true }
    }
}

/// A row from the `footer_pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FooterPage {
    pub id: DbId,
    pub name: String,
    pub blocks: Json<Vec<Block>>,
    #[sqlx(flatten)]
    pub config: FooterConfig,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FooterPage {
    pub fn to_content(&self) -> ContentPage {
        ContentPage {
            name: self.name.clone(),
            blocks: self.blocks.0.clone(),
        }
    }
}

/// Body of `PUT /footer/{name}`: the whole document is replaced.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceFooterPage {
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub config: FooterConfig,
}

impl ReplaceFooterPage {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_blocks(&self.blocks)
    }
}
