//! # Localization Module
//!
//! Bot replies rendered from Fluent resources. English and Russian bundles
//! are compiled into the binary; the user's Telegram language code selects
//! one, with English as the fallback.

use std::collections::HashMap;
use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use unic_langid::LanguageIdentifier;

/// Language used when the user's language is unknown or unsupported
pub const DEFAULT_LANGUAGE: &str = "en";

const RESOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en/main.ftl")),
    ("ru", include_str!("../locales/ru/main.ftl")),
];

/// Localization manager for the shopping list bot
#[derive(Default)]
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a manager with every embedded language loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();
        for (language, source) in RESOURCES {
            bundles.insert(language.to_string(), Self::create_bundle(language, source)?);
        }
        Ok(Self { bundles })
    }

    fn create_bundle(language: &str, source: &str) -> Result<FluentBundle<FluentResource>> {
        let locale: LanguageIdentifier = language.parse()?;
        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid {language} resource: {errors:?}"))?;

        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Replies are plain text; isolation marks would leak into messages.
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate {language} messages: {errors:?}"))?;
        Ok(bundle)
    }

    /// Get a message in the requested language, falling back to English
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&FluentArgs>,
    ) -> String {
        let Some(bundle) = self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        else {
            return format!("Missing translation: {key}");
        };

        let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
            return format!("Missing translation: {key}");
        };

        let mut errors = Vec::new();
        bundle.format_pattern(pattern, args, &mut errors).into_owned()
    }
}

/// Map a Telegram language code such as `ru-RU` to a supported language
pub fn detect_language(language_code: Option<&str>) -> &'static str {
    let primary = language_code
        .and_then(|code| code.split(['-', '_']).next())
        .map(str::to_ascii_lowercase);

    RESOURCES
        .iter()
        .map(|(language, _)| *language)
        .find(|language| primary.as_deref() == Some(*language))
        .unwrap_or(DEFAULT_LANGUAGE)
}

static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager
pub fn init_localization() -> Result<()> {
    let manager = LocalizationManager::new()?;
    let _ = LOCALIZATION_MANAGER.set(manager);
    Ok(())
}

fn manager() -> &'static LocalizationManager {
    LOCALIZATION_MANAGER.get_or_init(|| LocalizationManager::new().unwrap_or_default())
}

/// Localized message for the given Telegram language code
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    manager().get_message_in_language(key, detect_language(language_code), None)
}

/// Localized message with arguments for the given Telegram language code.
///
/// Counts must be passed as numbers for plural selection; user text is
/// passed as strings and rendered unchanged.
pub fn t_args_lang<'a>(
    key: &str,
    args: impl IntoIterator<Item = (&'a str, FluentValue<'a>)>,
    language_code: Option<&str>,
) -> String {
    let args: FluentArgs = args.into_iter().collect();
    manager().get_message_in_language(key, detect_language(language_code), Some(&args))
}
