//! Notes business logic - the single free-text notes pad.
//!
//! The pad is stored as one `system_state` row under [`NOTES_KEY`]; reading before
//! anything was saved yields empty content.

use crate::{
    entities::{SystemState, system_state},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

/// `system_state` key holding the notes content.
pub const NOTES_KEY: &str = "flavor_junkie_notes";

/// The notes pad. There is only ever one, so its id is always 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notes {
    /// Always 1
    pub id: i64,
    /// Free text
    pub content: String,
    /// When the notes were last saved, `None` if never
    pub last_updated: Option<DateTime<Utc>>,
}

impl Notes {
    const ID: i64 = 1;

    fn empty() -> Self {
        Self {
            id: Self::ID,
            content: String::new(),
            last_updated: None,
        }
    }
}

impl From<system_state::Model> for Notes {
    fn from(state: system_state::Model) -> Self {
        Self {
            id: Self::ID,
            content: state.value,
            last_updated: Some(state.updated_at),
        }
    }
}

/// Returns the saved notes, or empty notes when none were saved yet.
pub async fn get_notes<C>(db: &C) -> Result<Notes>
where
    C: ConnectionTrait,
{
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(NOTES_KEY))
        .one(db)
        .await?;

    Ok(state.map_or_else(Notes::empty, Notes::from))
}

/// Replaces the notes content and stamps the save time.
pub async fn save_notes<C>(db: &C, content: &str) -> Result<Notes>
where
    C: ConnectionTrait,
{
    save_notes_at(db, content, Utc::now()).await
}

#[instrument(skip(db, content), fields(len = content.len()))]
async fn save_notes_at<C>(db: &C, content: &str, now: DateTime<Utc>) -> Result<Notes>
where
    C: ConnectionTrait,
{
    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(NOTES_KEY))
        .one(db)
        .await?;

    let saved = if let Some(state) = existing {
        let mut active: system_state::ActiveModel = state.into();
        active.value = Set(content.to_string());
        active.updated_at = Set(now);
        active.update(db).await?
    } else {
        system_state::ActiveModel {
            key: Set(NOTES_KEY.to_string()),
            value: Set(content.to_string()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?
    };

    info!("Saved notes");
    Ok(saved.into())
}
