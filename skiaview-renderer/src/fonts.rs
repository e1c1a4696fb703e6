use std::path::Path;

use skia_safe::textlayout::TypefaceFontProvider;
use skia_safe::{FontMgr, FontStyle, Typeface};
use walkdir::WalkDir;

const FONT_EXTENSIONS: [&str; 6] = ["ttf", "otf", "ttc", "otc", "pfa", "pfb"];

/// Holds the font service that text drawing looks families up in.
///
/// The library is owned by the application and passed to the scene by reference. It starts out
/// empty, in which case text is drawn with skia's default (empty) typeface.
#[derive(Default)]
pub struct FontLibrary {
    font_mgr: Option<FontMgr>,
}

impl FontLibrary {
    pub fn new() -> Self {
        FontLibrary { font_mgr: None }
    }

    /// Replace the current font service. The last one set wins.
    pub fn set(
        &mut self,
        font_mgr: FontMgr,
    ) {
        self.font_mgr = Some(font_mgr);
    }

    pub fn get(&self) -> Option<&FontMgr> {
        self.font_mgr.as_ref()
    }

    /// Scans `font_directory` (recursively) for font files and installs a font service built
    /// from every face that skia can parse. Returns false if the directory could not be read, in
    /// which case an empty service is installed. Files that fail to load are skipped with a
    /// warning.
    pub fn initialize_from_directory<P: AsRef<Path>>(
        &mut self,
        font_directory: P,
    ) -> bool {
        let font_directory = font_directory.as_ref();
        let mut provider = TypefaceFontProvider::new();

        if !font_directory.is_dir() {
            warn!(
                "Font directory {} does not exist, text will use the default typeface",
                font_directory.display()
            );
            self.set(provider.into());
            return false;
        }

        info!("Loading fonts from {}", font_directory.display());

        // Only used to parse font data, lazily created since an empty directory never needs it
        let mut data_mgr: Option<FontMgr> = None;
        let mut typeface_count = 0;

        for entry in WalkDir::new(font_directory).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in font directory: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_font_file(entry.path()) {
                continue;
            }

            let bytes = match std::fs::read(entry.path()) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Could not read font file {}: {}", entry.path().display(), e);
                    continue;
                }
            };

            let data_mgr = data_mgr.get_or_insert_with(FontMgr::new);
            let loaded = register_faces(&mut provider, data_mgr, &bytes);
            if loaded == 0 {
                warn!("No usable font faces in {}", entry.path().display());
            }
            typeface_count += loaded;
        }

        debug!("Registered {} typefaces", typeface_count);
        self.set(provider.into());
        self.log_fonts();
        true
    }

    /// Find a typeface for `family_name` in the normal style
    pub fn match_family(
        &self,
        family_name: &str,
    ) -> Option<Typeface> {
        self.font_mgr
            .as_ref()
            .and_then(|font_mgr| font_mgr.match_family_style(family_name, FontStyle::normal()))
    }

    pub fn family_count(&self) -> usize {
        self.font_mgr
            .as_ref()
            .map(|font_mgr| font_mgr.count_families())
            .unwrap_or(0)
    }

    pub fn family_names(&self) -> Vec<String> {
        match self.font_mgr {
            Some(ref font_mgr) => (0..font_mgr.count_families())
                .map(|index| font_mgr.family_name(index))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Logs every family with its styles and glyph counts
    pub fn log_fonts(&self) {
        let font_mgr = match self.font_mgr {
            Some(ref font_mgr) => font_mgr,
            None => return,
        };

        for index in 0..font_mgr.count_families() {
            info!("Font family: {}", font_mgr.family_name(index));

            let mut style_set = font_mgr.new_style_set(index);
            for style_index in 0..style_set.count() {
                let (style, style_name) = style_set.style(style_index);
                info!(
                    "  Style: {} {:?} {:?}",
                    style_name.unwrap_or_default(),
                    style.width(),
                    style.weight()
                );

                if let Some(typeface) = style_set.new_typeface(style_index) {
                    info!("  Glyphs: {}", typeface.count_glyphs());
                }
            }
        }
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            FONT_EXTENSIONS
                .iter()
                .any(|known| extension.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

// Collections (ttc/otc) hold several faces, single font files stop after index 0
fn register_faces(
    provider: &mut TypefaceFontProvider,
    data_mgr: &FontMgr,
    bytes: &[u8],
) -> usize {
    let mut face_index = 0;
    while let Some(typeface) = data_mgr.new_from_data(bytes, face_index) {
        provider.register_typeface(typeface, None::<&str>);
        face_index += 1;
    }
    face_index
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn starts_empty() {
        let library = FontLibrary::new();
        assert!(library.get().is_none());
        assert_eq!(library.family_count(), 0);
        assert!(library.match_family("FreeSans").is_none());
    }

    #[test]
    fn empty_directory_yields_empty_service() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"not a font").unwrap();

        let mut library = FontLibrary::new();
        assert!(library.initialize_from_directory(dir.path()));
        assert!(library.get().is_some());
        assert_eq!(library.family_count(), 0);
        assert!(library.family_names().is_empty());
    }

    #[test]
    fn invalid_font_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.ttf"), b"definitely not truetype").unwrap();

        let mut library = FontLibrary::new();
        assert!(library.initialize_from_directory(dir.path()));
        assert_eq!(library.family_count(), 0);
    }

    #[test]
    fn missing_directory_installs_empty_service() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-fonts");

        let mut library = FontLibrary::new();
        assert!(!library.initialize_from_directory(&missing));
        assert!(library.get().is_some());
        assert_eq!(library.family_count(), 0);
    }

    fn test_fonts_dir() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/test-data/fonts"))
    }

    #[test]
    fn loads_fonts_from_directory() {
        let mut library = FontLibrary::new();
        assert!(library.initialize_from_directory(test_fonts_dir()));
        assert!(library.family_count() >= 1);

        let names = library.family_names();
        assert!(names.iter().any(|name| name == "Cantarell"), "{:?}", names);
        assert!(names.iter().any(|name| name == "Test TTF"), "{:?}", names);

        let typeface = library.match_family("Cantarell").unwrap();
        assert_eq!(typeface.family_name(), "Cantarell");
        assert!(typeface.count_glyphs() > 0);
        assert!(library.match_family("FreeSans").is_none());

        library.log_fonts();
    }

    #[test]
    fn collection_registers_every_face() {
        let bytes = std::fs::read(test_fonts_dir().join("TestTTF.ttc")).unwrap();
        let mut provider = TypefaceFontProvider::new();
        assert_eq!(register_faces(&mut provider, &FontMgr::new(), &bytes), 2);

        let bytes = std::fs::read(test_fonts_dir().join("Cantarell-Regular.ttf")).unwrap();
        let mut provider = TypefaceFontProvider::new();
        assert_eq!(register_faces(&mut provider, &FontMgr::new(), &bytes), 1);
    }

    #[test]
    fn nested_font_files_are_found() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sans").join("regular");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::copy(
            test_fonts_dir().join("Cantarell-Regular.ttf"),
            nested.join("Cantarell-Regular.TTF"),
        )
        .unwrap();

        let mut library = FontLibrary::new();
        assert!(library.initialize_from_directory(dir.path()));
        assert_eq!(library.family_count(), 1);
        assert!(library.match_family("Cantarell").is_some());
    }

    #[test]
    fn recognizes_font_extensions() {
        assert!(is_font_file(Path::new("fonts/FreeSans.ttf")));
        assert!(is_font_file(Path::new("fonts/Noto.OTF")));
        assert!(is_font_file(Path::new("collection.ttc")));
        assert!(!is_font_file(Path::new("fonts/LICENSE")));
        assert!(!is_font_file(Path::new("fonts/readme.txt")));
    }
}
