//! Locale tables for the feed endpoint: language/country name-to-code lookup
//! and the fixed set of topic sections the endpoint serves.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const DEFAULT_BASE_URL: &str = "https://news.google.com/rss";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; news-aggregator/0.1)";

/// Topic sections the endpoint exposes under `/headlines/section/topic/`.
pub const TOPICS: &[&str] = &[
    "WORLD",
    "NATION",
    "BUSINESS",
    "TECHNOLOGY",
    "ENTERTAINMENT",
    "SPORTS",
    "SCIENCE",
    "HEALTH",
];

static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("english", "en"),
        ("indonesian", "id"),
        ("czech", "cs"),
        ("german", "de"),
        ("spanish", "es-419"),
        ("french", "fr"),
        ("italian", "it"),
        ("latvian", "lv"),
        ("lithuanian", "lt"),
        ("hungarian", "hu"),
        ("dutch", "nl"),
        ("norwegian", "no"),
        ("polish", "pl"),
        ("portuguese brasil", "pt-419"),
        ("portuguese portugal", "pt-150"),
        ("romanian", "ro"),
        ("slovak", "sk"),
        ("slovenian", "sl"),
        ("swedish", "sv"),
        ("vietnamese", "vi"),
        ("turkish", "tr"),
        ("greek", "el"),
        ("bulgarian", "bg"),
        ("russian", "ru"),
        ("serbian", "sr"),
        ("ukrainian", "uk"),
        ("hebrew", "he"),
        ("arabic", "ar"),
        ("marathi", "mr"),
        ("hindi", "hi"),
        ("bengali", "bn"),
        ("tamil", "ta"),
        ("telugu", "te"),
        ("malayalam", "ml"),
        ("thai", "th"),
        ("chinese simplified", "zh-Hans"),
        ("chinese traditional", "zh-Hant"),
        ("japanese", "ja"),
        ("korean", "ko"),
    ])
});

static COUNTRIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("australia", "AU"),
        ("botswana", "BW"),
        ("canada", "CA"),
        ("ethiopia", "ET"),
        ("ghana", "GH"),
        ("india", "IN"),
        ("indonesia", "ID"),
        ("ireland", "IE"),
        ("israel", "IL"),
        ("kenya", "KE"),
        ("latvia", "LV"),
        ("malaysia", "MY"),
        ("namibia", "NA"),
        ("new zealand", "NZ"),
        ("nigeria", "NG"),
        ("pakistan", "PK"),
        ("philippines", "PH"),
        ("singapore", "SG"),
        ("south africa", "ZA"),
        ("tanzania", "TZ"),
        ("uganda", "UG"),
        ("united kingdom", "GB"),
        ("united states", "US"),
        ("zimbabwe", "ZW"),
        ("czech republic", "CZ"),
        ("germany", "DE"),
        ("austria", "AT"),
        ("switzerland", "CH"),
        ("argentina", "AR"),
        ("chile", "CL"),
        ("colombia", "CO"),
        ("cuba", "CU"),
        ("mexico", "MX"),
        ("peru", "PE"),
        ("venezuela", "VE"),
        ("belgium", "BE"),
        ("france", "FR"),
        ("morocco", "MA"),
        ("senegal", "SN"),
        ("italy", "IT"),
        ("lithuania", "LT"),
        ("hungary", "HU"),
        ("netherlands", "NL"),
        ("norway", "NO"),
        ("poland", "PL"),
        ("brazil", "BR"),
        ("portugal", "PT"),
        ("romania", "RO"),
        ("slovakia", "SK"),
        ("slovenia", "SI"),
        ("sweden", "SE"),
        ("vietnam", "VN"),
        ("turkey", "TR"),
        ("greece", "GR"),
        ("bulgaria", "BG"),
        ("russia", "RU"),
        ("ukraine", "UA"),
        ("serbia", "RS"),
        ("united arab emirates", "AE"),
        ("saudi arabia", "SA"),
        ("lebanon", "LB"),
        ("egypt", "EG"),
        ("bangladesh", "BD"),
        ("thailand", "TH"),
        ("china", "CN"),
        ("taiwan", "TW"),
        ("hong kong", "HK"),
        ("japan", "JP"),
        ("republic of korea", "KR"),
    ])
});

/// Resolve a human language name to its feed code, passing unknown input
/// through unchanged so raw codes keep working.
pub fn language_code(language: &str) -> String {
    LANGUAGES
        .get(language.trim().to_lowercase().as_str())
        .map(|c| c.to_string())
        .unwrap_or_else(|| language.to_string())
}

/// Resolve a human country name to its feed code, passing unknown input
/// through unchanged.
pub fn country_code(country: &str) -> String {
    COUNTRIES
        .get(country.trim().to_lowercase().as_str())
        .map(|c| c.to_string())
        .unwrap_or_else(|| country.to_string())
}

/// Look up a topic case-insensitively, returning its canonical section name.
pub fn canonical_topic(topic: &str) -> Option<&'static str> {
    let upper = topic.trim().to_uppercase();
    TOPICS.iter().find(|t| **t == upper).copied()
}
