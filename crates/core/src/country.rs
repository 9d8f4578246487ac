//! Country name table and country filter construction
//!
//! The upstream index stores countries as multilingual-encoded strings and only
//! matches them exactly. Users type country names in English, Portuguese,
//! Spanish or French; this table maps every accepted spelling to the indexed
//! form. It is the single copy shared by every query builder.

pub const BRAZIL: &str = "pt-br^Brasil|es^Brasil|en^Brazil|fr^Brésil";
pub const ARGENTINA: &str = "pt-br^Argentina|es^Argentina|en^Argentina|fr^Argentine";
pub const CHILE: &str = "pt-br^Chile|es^Chile|en^Chile|fr^Chili";
pub const COLOMBIA: &str = "pt-br^Colômbia|es^Colombia|en^Colombia|fr^Colombie";
pub const MEXICO: &str = "pt-br^México|es^México|en^Mexico|fr^Mexique";
pub const PERU: &str = "pt-br^Peru|es^Perú|en^Peru|fr^Pérou";
pub const SPAIN: &str = "pt-br^Espanha|es^España|en^Spain|fr^Espagne";
pub const PORTUGAL: &str = "pt-br^Portugal|es^Portugal|en^Portugal|fr^Portugal";
pub const UNITED_STATES: &str =
    "pt-br^Estados Unidos|es^Estados Unidos|en^United States|fr^États-Unis";
pub const CUBA: &str = "pt-br^Cuba|es^Cuba|en^Cuba|fr^Cuba";
pub const URUGUAY: &str = "pt-br^Uruguai|es^Uruguay|en^Uruguay|fr^Uruguay";

/// Accepted spellings and the indexed value each one resolves to
pub const COUNTRY_ALIASES: [(&str, &str); 30] = [
    ("Brasil", BRAZIL),
    ("Brazil", BRAZIL),
    ("Brésil", BRAZIL),
    ("Argentina", ARGENTINA),
    ("Argentine", ARGENTINA),
    ("Chile", CHILE),
    ("Chili", CHILE),
    ("Colombia", COLOMBIA),
    ("Colômbia", COLOMBIA),
    ("Colombie", COLOMBIA),
    ("Mexico", MEXICO),
    ("México", MEXICO),
    ("Mexique", MEXICO),
    ("Peru", PERU),
    ("Perú", PERU),
    ("Pérou", PERU),
    ("Perou", PERU),
    ("Spain", SPAIN),
    ("Espanha", SPAIN),
    ("España", SPAIN),
    ("Espagne", SPAIN),
    ("Portugal", PORTUGAL),
    ("United States", UNITED_STATES),
    ("Estados Unidos", UNITED_STATES),
    ("États-Unis", UNITED_STATES),
    ("USA", UNITED_STATES),
    ("EUA", UNITED_STATES),
    ("Cuba", CUBA),
    ("Uruguay", URUGUAY),
    ("Uruguai", URUGUAY),
];

/// First letter upper-cased, the rest lower-cased (`"bRASIL"` -> `"Brasil"`)
pub fn normalize_country_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Indexed multilingual value for a country name, if the spelling is known
pub fn lookup_country(name: &str) -> Option<&'static str> {
    let wanted = normalize_country_name(name);
    COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| normalize_country_name(alias) == wanted)
        .map(|(_, indexed)| *indexed)
}

/// Quoted filter term for one country; unknown names are quoted as typed
pub fn country_term(name: &str) -> String {
    match lookup_country(name) {
        Some(indexed) => quote(indexed),
        None => quote(name.trim()),
    }
}

/// Filter expression for a comma-separated list of countries
///
/// One country yields a single quoted term, several are OR-ed inside
/// parentheses. Returns `None` when the input names no country.
pub fn build_country_filter(input: &str) -> Option<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in input
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(country_term)
    {
        if !terms.contains(&term) {
            terms.push(term);
        }
    }

    match terms.len() {
        0 => None,
        1 => terms.pop(),
        _ => Some(format!("({})", terms.join(" OR "))),
    }
}

/// `field:<expr>` filter query for a comma-separated list of countries
pub fn country_fq(field: &str, input: &str) -> Option<String> {
    build_country_filter(input).map(|expr| format!("{field}:{expr}"))
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}
