use std::{collections::HashMap, path::PathBuf, sync::Arc};

use crate::font_flags::FontFlags;

/// Manages font loading and retrieval using `fontdb` and `fontdue`.
///
/// Text APIs address fonts by a family name plus [`FontFlags`], so besides the
/// database of available faces this keeps two caches: the faces resolved for
/// each `(name, flags)` pair, and the `fontdue` instances loaded for each face.
pub struct FontStorage {
    /// This is the font set that has been loaded by fontdb.
    font_db: fontdb::Database,
    /// This is the font that has been loaded by fontdue.
    /// Not all fonts in fontdb are necessarily loaded here.
    loaded_font: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
    resolved: HashMap<(String, FontFlags), Option<fontdb::ID>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates a new empty font storage.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            resolved: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Loading fonts into fontdb.
///
/// Every change to the database invalidates the name resolution cache, since a
/// newly loaded face may be a better match for a name than the old answer.
impl FontStorage {
    /// Loads a font from binary data.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
        self.resolved.clear();
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.resolved.clear();
        self.font_db.load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir);
        self.resolved.clear();
    }

    /// Loads the system fonts.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
        self.resolved.clear();
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Returns the number of loaded faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }
}

/// Get `Font`
impl FontStorage {
    /// Finds the face best matching a family name and style flags.
    ///
    /// The generic CSS names (`serif`, `sans-serif`, `monospace`, `cursive`,
    /// `fantasy`) map to fontdb's generic families. Unknown names fall back to
    /// the sans-serif family. `BOLD` and `ITALIC` select weight and style;
    /// `UNDERLINE` is a decoration and does not affect the face.
    pub fn resolve(&mut self, name: &str, flags: FontFlags) -> Option<Arc<fontdue::Font>> {
        let face_flags = flags & (FontFlags::BOLD | FontFlags::ITALIC);
        let key = (name.to_owned(), face_flags);

        let id = match self.resolved.get(&key) {
            Some(id) => *id,
            None => {
                let id = self.query_face(name, face_flags);
                if id.is_none() {
                    log::warn!("No font face found for {name:?} ({face_flags:?})");
                }
                self.resolved.insert(key, id);
                id
            }
        };

        self.font(id?)
    }

    fn query_face(&self, name: &str, flags: FontFlags) -> Option<fontdb::ID> {
        let family = match name.to_ascii_lowercase().as_str() {
            "serif" => fontdb::Family::Serif,
            "sans-serif" | "sans serif" => fontdb::Family::SansSerif,
            "monospace" => fontdb::Family::Monospace,
            "cursive" => fontdb::Family::Cursive,
            "fantasy" => fontdb::Family::Fantasy,
            _ => fontdb::Family::Name(name),
        };
        let families = [family, fontdb::Family::SansSerif];

        let query = fontdb::Query {
            families: &families,
            weight: if flags.contains(FontFlags::BOLD) {
                fontdb::Weight::BOLD
            } else {
                fontdb::Weight::NORMAL
            },
            stretch: fontdb::Stretch::Normal,
            style: if flags.contains(FontFlags::ITALIC) {
                fontdb::Style::Italic
            } else {
                fontdb::Style::Normal
            },
        };

        self.font_db
            .query(&query)
            .or_else(|| self.font_db.faces().next().map(|face| face.id))
    }

    /// Retrieves a loaded font by ID, loading it if necessary.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded_font.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            scale: 40.0,
                            load_substitutions: true,
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => {
                        let r: &mut Arc<fontdue::Font> = entry.insert(Arc::new(font));
                        Some(Arc::clone(r))
                    }
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }
}
