//! Simulate a page load and an optional language switch from the command line.
//!
//! Usage:
//!   deephand-i18n <path> [ja|en]
//!
//! Browser languages come from `DEEPHAND_ACCEPT_LANGUAGE` (an Accept-Language
//! header value) or, failing that, `LANG`. Set `DEEPHAND_PREFERENCE_FILE` to
//! keep the stored preference between runs.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use deephand_i18n::config::Config;
use deephand_i18n::i18n::{DictionaryValidator, Interpolations, Locale, TranslationStore};
use deephand_i18n::platform::{FileStore, Location, MemoryLocation, MemoryStore, Platform};
use deephand_i18n::routing::parse_accept_language;
use deephand_i18n::LanguageService;

fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deephand_i18n=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "/".to_string());
    let switch_to = args
        .next()
        .map(|code| Locale::from_code(&code))
        .transpose()
        .context("second argument must be 'ja' or 'en'")?;

    let config = Config::from_env()?;

    let translations = TranslationStore::embedded();
    let report = DictionaryValidator::validate(translations);
    for error in &report.errors {
        warn!("Dictionary error: {}", error);
    }
    for warning in &report.warnings {
        warn!("Dictionary warning: {}", warning);
    }

    let location = Arc::new(MemoryLocation::new(path));
    let mut platform = Platform::headless()
        .with_session_storage(Arc::new(MemoryStore::new()))
        .with_location(location.clone())
        .with_languages(browser_languages());
    if let Some(file) = &config.preference_file {
        info!("Using preference file {}", file.display());
        platform = platform.with_local_storage(Arc::new(FileStore::new(file)));
    }

    let service = LanguageService::install_global(Arc::new(LanguageService::init(
        config,
        platform,
        Arc::new(translations.clone()),
    )));

    let resolution = service.resolution();
    println!("Resolved language: {} ({:?})", resolution.locale, resolution.source);

    let decision = service.bootstrap();
    if decision.redirect {
        println!("Redirected to: {}", decision.target_path);
    }

    for (locale, href) in service.alternate_links() {
        println!(
            "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}\">",
            locale.config().hreflang,
            href
        );
    }
    print_sample(&service);

    if let Some(target) = switch_to {
        let _feed = service.subscribe(|locale| info!("Re-rendering in '{}'", locale));
        match service.switch_language(target) {
            Ok(()) => println!("Switched to {} at {}", target, location.path()),
            Err(e) => println!("Switch fell back to full navigation: {}", e),
        }
        print_sample(&service);
        println!(
            "{}",
            serde_json::to_string_pretty(&service.metrics().report())?
        );
    }

    Ok(())
}

fn browser_languages() -> Vec<String> {
    if let Ok(header) = std::env::var("DEEPHAND_ACCEPT_LANGUAGE") {
        return parse_accept_language(&header);
    }
    std::env::var("LANG")
        .ok()
        .filter(|lang| !lang.is_empty() && lang != "C" && lang != "POSIX")
        .map(|lang| vec![lang.replace('_', "-")])
        .unwrap_or_default()
}

fn print_sample(service: &LanguageService) {
    println!("  {}", service.t("hero.title"));
    println!("  {}", service.t("contact.title"));
    let year = chrono::Utc::now().format("%Y").to_string();
    let values = Interpolations::from([("year", year)]);
    println!("  {}", service.translate("footer.copyright", Some(&values)));
}
