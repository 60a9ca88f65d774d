use std::{collections::HashMap, sync::Arc};

use crate::bitmap::Bitmap;

/// Named bitmaps that markup can embed inline with `&name;`.
///
/// An entity occupies a single character slot in a formatted run and is drawn
/// by compositing its bitmap instead of rasterizing a glyph.
#[derive(Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<Arc<str>, Arc<Bitmap>, fxhash::FxBuildHasher>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the bitmap for `name`.
    pub fn register(&mut self, name: impl Into<Arc<str>>, bitmap: Bitmap) {
        let name = name.into();
        if self.entities.insert(Arc::clone(&name), Arc::new(bitmap)).is_some() {
            log::debug!("Replaced entity {name:?}");
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Bitmap>> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
