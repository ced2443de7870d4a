//! Font resolution as an ordered list of strategies.
//!
//! Each configured family is tried in sequence against the system font
//! database, then the generic sans-serif family, then the built-in
//! bitmap face. Every attempt yields a typed outcome; the chain never
//! fails and never drives control flow through errors.

use std::sync::Arc;

use ab_glyph::FontVec;
use tracing::{debug, warn};

use super::FontHandle;

/// Outcome of one resolution attempt.
pub enum Resolution {
    Resolved(FontHandle),
    NotFound,
}

pub struct FontResolver {
    db: fontdb::Database,
}

impl FontResolver {
    /// Resolver backed by the system font database.
    pub fn from_system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "system font database loaded");
        FontResolver { db }
    }

    /// Resolver over an explicit database. Used by tests and callers
    /// that bundle their own faces.
    pub fn with_database(db: fontdb::Database) -> Self {
        FontResolver { db }
    }

    /// Resolve the first available face in `families` order, falling
    /// back to generic sans-serif, then the built-in bitmap face.
    ///
    /// Returns the handle plus a degraded flag set when only the
    /// built-in face resolved.
    pub fn resolve(&self, families: &[String]) -> (FontHandle, bool) {
        for family in families {
            match self.try_family(fontdb::Family::Name(family)) {
                Resolution::Resolved(handle) => {
                    debug!(family = %family, "font resolved");
                    return (handle, false);
                }
                Resolution::NotFound => {
                    debug!(family = %family, "font not found, trying next");
                }
            }
        }

        if let Resolution::Resolved(handle) = self.try_family(fontdb::Family::SansSerif) {
            debug!(family = handle.family_name(), "generic sans-serif resolved");
            return (handle, false);
        }

        warn!("no scalable font resolved; using built-in bitmap face");
        (FontHandle::Builtin, true)
    }

    fn try_family(&self, family: fontdb::Family) -> Resolution {
        let query = fontdb::Query {
            families: &[family],
            ..fontdb::Query::default()
        };
        let Some(id) = self.db.query(&query) else {
            return Resolution::NotFound;
        };

        let loaded = self
            .db
            .with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index).ok()
            })
            .flatten();

        match loaded {
            Some(font) => {
                let family_name = self
                    .db
                    .face(id)
                    .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
                    .unwrap_or_else(|| "unknown".to_string());
                Resolution::Resolved(FontHandle::Scalable {
                    family: family_name,
                    font: Arc::new(font),
                })
            }
            None => Resolution::NotFound,
        }
    }
}
