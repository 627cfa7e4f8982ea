//! Translation catalogs.
//!
//! Catalogs are Fluent resources at `<locale_dir>/<lang>/<app id>.ftl`, one
//! bundle per language. They are loaded once at startup; lookups never touch
//! the filesystem. A missing catalog or message falls back to the text the
//! caller supplies.
//!
//! The active translator is chosen per request (see
//! `http::middleware::locale`) and carried in the request's extensions.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use fluent_bundle::{concurrent::FluentBundle, FluentResource};
use thiserror::Error;
use unic_langid::LanguageIdentifier;

use crate::config::schema::LocalizationConfig;

/// Message id of the app name shown in the host's top menu.
pub const APP_DISPLAY_NAME: &str = "app-display-name";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid catalog: {0}")]
    Syntax(String),

    #[error("invalid language tag {0:?}")]
    Language(String),
}

/// Messages for a single language.
pub struct Translator {
    language: LanguageIdentifier,
    bundle: Option<FluentBundle<FluentResource>>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("language", &self.language)
            .field("has_catalog", &self.bundle.is_some())
            .finish()
    }
}

impl Translator {
    /// Translator with no messages; every lookup returns its fallback.
    pub fn fallback(language: LanguageIdentifier) -> Self {
        Self {
            language,
            bundle: None,
        }
    }

    pub fn from_ftl(language: LanguageIdentifier, source: String) -> Result<Self, CatalogError> {
        let resource = FluentResource::try_new(source)
            .map_err(|(_, errors)| CatalogError::Syntax(format!("{:?}", errors)))?;

        let mut bundle = FluentBundle::new_concurrent(vec![language.clone()]);
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| CatalogError::Syntax(format!("{:?}", errors)))?;

        Ok(Self {
            language,
            bundle: Some(bundle),
        })
    }

    pub fn language(&self) -> &LanguageIdentifier {
        &self.language
    }

    /// Formatted message `id`, or `None` if the catalog lacks it.
    pub fn tr(&self, id: &str) -> Option<String> {
        let bundle = self.bundle.as_ref()?;
        let pattern = bundle.get_message(id)?.value()?;
        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, None, &mut errors);
        if !errors.is_empty() {
            tracing::warn!(id, language = %self.language, ?errors, "Message failed to format");
            return None;
        }
        Some(value.into_owned())
    }

    pub fn tr_or(&self, id: &str, fallback: &str) -> String {
        self.tr(id).unwrap_or_else(|| fallback.to_string())
    }
}

/// All catalogs known to the process.
#[derive(Debug, Clone)]
pub struct Localizer {
    default: Arc<Translator>,
    catalogs: HashMap<LanguageIdentifier, Arc<Translator>>,
}

impl Localizer {
    pub fn new(default: Translator, catalogs: Vec<Translator>) -> Self {
        let catalogs = catalogs
            .into_iter()
            .map(|t| (t.language.clone(), Arc::new(t)))
            .collect::<HashMap<_, _>>();
        let default = catalogs
            .get(&default.language)
            .cloned()
            .unwrap_or_else(|| Arc::new(default));
        Self { default, catalogs }
    }

    /// Load every `<lang>/<app_id>.ftl` below the configured directory.
    /// Unreadable catalogs and directories that are not language tags are
    /// logged and skipped.
    pub fn load(config: &LocalizationConfig, app_id: &str) -> Self {
        let default_language = config
            .default_language
            .parse::<LanguageIdentifier>()
            .unwrap_or_default();
        let mut catalogs = Vec::new();
        let dir = Path::new(&config.locale_dir);

        match fs::read_dir(dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path().join(format!("{}.ftl", app_id));
                    if !path.is_file() {
                        continue;
                    }
                    let name = entry.file_name().to_string_lossy().into_owned();
                    match load_catalog(&name, &path) {
                        Ok(t) => catalogs.push(t),
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "Skipping catalog")
                        }
                    }
                }
            }
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "No locale directory");
            }
        }

        tracing::debug!(catalogs = catalogs.len(), "Catalogs loaded");
        Self::new(Translator::fallback(default_language), catalogs)
    }

    pub fn default_translator(&self) -> Arc<Translator> {
        self.default.clone()
    }

    /// Translator for an `Accept-Language` value. Ranges are tried in
    /// preference order; each matches an exact catalog first, then one with
    /// the same language subtag. Nothing matching yields the default.
    pub fn for_accept_language(&self, header: Option<&str>) -> Arc<Translator> {
        header
            .map(requested_languages)
            .unwrap_or_default()
            .iter()
            .find_map(|wanted| self.lookup(wanted))
            .unwrap_or_else(|| self.default.clone())
    }

    fn lookup(&self, wanted: &LanguageIdentifier) -> Option<Arc<Translator>> {
        if let Some(t) = self.catalogs.get(wanted) {
            return Some(t.clone());
        }
        let mut same_language: Vec<&LanguageIdentifier> = self
            .catalogs
            .keys()
            .filter(|have| have.language == wanted.language)
            .collect();
        // Prefer the bare language ("de" over "de-CH"), then a stable order.
        same_language.sort_by_key(|have| (have.region.is_some(), have.to_string()));
        same_language
            .first()
            .and_then(|have| self.catalogs.get(*have))
            .cloned()
    }
}

fn load_catalog(name: &str, path: &Path) -> Result<Translator, CatalogError> {
    let language = name
        .parse::<LanguageIdentifier>()
        .map_err(|_| CatalogError::Language(name.to_string()))?;
    let source = fs::read_to_string(path)?;
    Translator::from_ftl(language, source)
}

/// Language ranges of an `Accept-Language` header, most preferred first.
/// Wildcards, unparsable tags and `q=0` entries are dropped.
pub fn requested_languages(header: &str) -> Vec<LanguageIdentifier> {
    let mut ranges: Vec<(LanguageIdentifier, f32)> = header
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';').map(str::trim);
            let tag = parts.next()?;
            let quality = parts
                .find_map(|param| param.strip_prefix("q="))
                .map_or(Some(1.0), |q| q.parse::<f32>().ok())?;
            if tag == "*" || quality <= 0.0 {
                return None;
            }
            let language = tag.parse::<LanguageIdentifier>().ok()?;
            Some((language, quality))
        })
        .collect();
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranges.into_iter().map(|(language, _)| language).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langid(tag: &str) -> LanguageIdentifier {
        tag.parse().unwrap()
    }

    fn catalog(tag: &str, name: &str) -> Translator {
        Translator::from_ftl(langid(tag), format!("{} = {}\n", APP_DISPLAY_NAME, name)).unwrap()
    }

    fn localizer() -> Localizer {
        Localizer::new(
            Translator::fallback(langid("en")),
            vec![catalog("de", "Visionatrix DE"), catalog("pt-BR", "Visionatrix BR")],
        )
    }

    #[test]
    fn missing_message_falls_back() {
        let t = Translator::fallback(langid("en"));
        assert_eq!(t.tr(APP_DISPLAY_NAME), None);
        assert_eq!(t.tr_or(APP_DISPLAY_NAME, "Visionatrix"), "Visionatrix");
    }

    #[test]
    fn invalid_ftl_is_rejected() {
        let err = Translator::from_ftl(langid("de"), "= no id".to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::Syntax(_)));
    }

    #[test]
    fn picks_exact_then_same_language() {
        let l = localizer();
        assert_eq!(
            l.for_accept_language(Some("pt-BR,pt;q=0.9")).tr_or(APP_DISPLAY_NAME, ""),
            "Visionatrix BR"
        );
        assert_eq!(
            l.for_accept_language(Some("de-AT;q=0.8")).tr_or(APP_DISPLAY_NAME, ""),
            "Visionatrix DE"
        );
        assert_eq!(
            l.for_accept_language(Some("pt")).tr_or(APP_DISPLAY_NAME, ""),
            "Visionatrix BR"
        );
        assert_eq!(l.for_accept_language(Some("fr")).language(), &langid("en"));
        assert_eq!(l.for_accept_language(None).language(), &langid("en"));
    }

    #[test]
    fn quality_order_is_honoured() {
        let l = localizer();
        let t = l.for_accept_language(Some("fr;q=0.9, de;q=0.5, pt-BR;q=0.7"));
        assert_eq!(t.language(), &langid("pt-BR"));
    }

    #[test]
    fn requested_languages_skips_junk() {
        assert_eq!(
            requested_languages("*, en;q=0, de-DE;q=0.4, !!, fr;q=0.6"),
            vec![langid("fr"), langid("de-DE")]
        );
    }

    #[test]
    fn loads_catalogs_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("de")).unwrap();
        fs::write(dir.path().join("de").join("myapp.ftl"), "open = Öffnen\n").unwrap();
        fs::create_dir_all(dir.path().join("fr")).unwrap();
        fs::write(dir.path().join("fr").join("myapp.ftl"), "= broken\n").unwrap();
        fs::create_dir_all(dir.path().join("not a tag")).unwrap();
        fs::write(dir.path().join("not a tag").join("myapp.ftl"), "open = x\n").unwrap();

        let config = LocalizationConfig {
            locale_dir: dir.path().to_string_lossy().into_owned(),
            default_language: "en".into(),
            per_request: true,
        };
        let l = Localizer::load(&config, "myapp");

        assert_eq!(l.for_accept_language(Some("de")).tr("open").as_deref(), Some("Öffnen"));
        assert_eq!(l.for_accept_language(Some("fr")).language(), &langid("en"));
    }
}
