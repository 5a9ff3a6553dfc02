use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// The fixed set of post fields eligible for diff recording. Diffs are
/// computed over this allowlist, never by reflecting over the document.
pub const TRACKED_FIELDS: [&str; 3] = ["image", "text", "address"];

/// Before/after pair for a single tracked field at edit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// One historical change: created once per effective update, never mutated.
/// The diff holds only the fields whose supplied value differed from the
/// stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditEntry {
    pub edited_at: DateTime<Utc>,
    pub diff: BTreeMap<String, FieldChange>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author: String,
    pub image: Option<String>,
    pub text: Option<String>,
    pub address: Option<String>,
    pub posted_at: DateTime<Utc>,
    pub edit_count: i32,
    pub edit_history: Json<Vec<EditEntry>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when inserting a post. The author reference and display
/// name come from the authenticated context, never from the client body.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub author: String,
    pub image: Option<String>,
    pub text: Option<String>,
    pub address: Option<String>,
}

/// Tracked-field changes supplied by an update call; `None` means the field
/// was not supplied (a field cannot be cleared through an update).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostChanges {
    pub image: Option<String>,
    pub text: Option<String>,
    pub address: Option<String>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.text.is_none() && self.address.is_none()
    }
}

/// Apply an update to an in-memory post, recording edit history.
///
/// For each tracked field present in `changes` and differing from the stored
/// value, a `{from, to}` pair is added to the diff. A non-empty diff bumps
/// `edit_count` by exactly one and appends exactly one `EditEntry`; an update
/// that changes nothing leaves counter and history untouched. `posted_at` is
/// never modified. Returns whether any tracked field changed.
pub fn apply_update(post: &mut Post, changes: &PostChanges, now: DateTime<Utc>) -> bool {
    let mut diff: BTreeMap<String, FieldChange> = BTreeMap::new();

    {
        let tracked: [(&str, &Option<String>, &Option<String>); 3] = [
            ("image", &post.image, &changes.image),
            ("text", &post.text, &changes.text),
            ("address", &post.address, &changes.address),
        ];
        for (field, stored, supplied) in tracked {
            if let Some(new_value) = supplied {
                if stored.as_deref() != Some(new_value.as_str()) {
                    diff.insert(
                        field.to_string(),
                        FieldChange {
                            from: stored.clone(),
                            to: Some(new_value.clone()),
                        },
                    );
                }
            }
        }
    }

    if let Some(image) = &changes.image {
        post.image = Some(image.clone());
    }
    if let Some(text) = &changes.text {
        post.text = Some(text.clone());
    }
    if let Some(address) = &changes.address {
        post.address = Some(address.clone());
    }
    post.updated_at = now;

    let changed = !diff.is_empty();
    if changed {
        post.edit_count += 1;
        post.edit_history.0.push(EditEntry {
            edited_at: now,
            diff,
        });
    }
    changed
}
