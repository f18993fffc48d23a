//! Name canonicalization.
//!
//! Turns noisy registry text ("Dr. María R(odríguez") into the canonical form
//! used for blocking and scoring ("maria rodriguez").
//!
//! CHANGELOG:
//! - 10/16/2026 - Nickname table and NormalizeOptions
//! - 10/14/2026 - Initial pipeline: sanitize, titles, accents, particles

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Characters that show up as transcription corruption in the registry.
static RE_CORRUPTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()~$@&]").expect("invalid RE_CORRUPTED"));
static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid RE_WHITESPACE"));

/// Whole-word particle patterns, in `SPANISH_PARTICLES` order.
static RE_PARTICLES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SPANISH_PARTICLES
        .iter()
        .map(|p| {
            Regex::new(&format!(r"\b{}\b", regex::escape(p))).expect("invalid particle pattern")
        })
        .collect()
});

/// Spanish honorifics dropped before comparison (matched on lowercase tokens).
pub const SPANISH_TITLES: &[&str] = &[
    "lic", "lic.", "licenciado", "licenciada",
    "dr", "dr.", "doctor", "doctora",
    "mg", "mg.", "magister",
    "col", "col.", "coronel", "coronela",
    "sr", "sr.", "señor",
    "sra", "sra.", "señora",
    "srta", "srta.", "señorita",
];

/// Linking particles removed when `strip_particles` is set. Multi-word
/// particles come first so "de la" never leaves a stray "la".
pub const SPANISH_PARTICLES: &[&str] = &["de las", "de los", "de la", "del", "de", "y"];

static TITLES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| SPANISH_TITLES.iter().copied().collect());

/// Nickname → canonical given name. Keys are already in canonical form.
static NICKNAMES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("pepe", "jose"),
        ("pepa", "josefa"),
        ("chema", "jose maria"),
        ("paco", "francisco"),
        ("pancho", "francisco"),
        ("curro", "francisco"),
        ("nacho", "ignacio"),
        ("lupe", "guadalupe"),
        ("chucho", "jesus"),
        ("concha", "concepcion"),
        ("lola", "dolores"),
        ("memo", "guillermo"),
        ("tono", "antonio"),
        ("quique", "enrique"),
        ("kike", "enrique"),
        ("charo", "rosario"),
        ("pili", "pilar"),
        ("rafa", "rafael"),
        ("manolo", "manuel"),
        ("beto", "alberto"),
    ])
});

/// Which optional stages of the pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Drop standalone linking particles ("de", "del", "de la", "y", ...).
    pub strip_particles: bool,
    /// Map known nicknames to their full given name. Runs after particles.
    pub resolve_nicknames: bool,
}

impl NormalizeOptions {
    /// Plain comparison pipeline: no particles, no nicknames.
    pub const PLAIN: Self = Self {
        strip_particles: false,
        resolve_nicknames: false,
    };

    /// Spanish-aware pipeline: particles removed and nicknames resolved.
    pub const SPANISH: Self = Self {
        strip_particles: true,
        resolve_nicknames: true,
    };
}

/// Remove corrupted characters and collapse whitespace.
pub fn sanitize_name(text: &str) -> String {
    let cleaned = RE_CORRUPTED.replace_all(text, "");
    collapse_whitespace(&cleaned)
}

/// Lowercase and drop honorific tokens.
pub fn strip_titles(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .filter(|token| !is_title(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Also catches tokens that only become a title once accents are folded
/// ("dŕ"), otherwise a second pass would strip what the first one kept.
fn is_title(token: &str) -> bool {
    TITLES.contains(token) || TITLES.contains(strip_accents(token).as_str())
}

/// NFD-decompose and drop combining marks.
pub fn strip_accents(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn collapse_whitespace(text: &str) -> String {
    RE_WHITESPACE.replace_all(text, " ").trim().to_string()
}

fn remove_particles(text: &str) -> String {
    let stripped = RE_PARTICLES
        .iter()
        .fold(text.to_string(), |acc, re| re.replace_all(&acc, "").into_owned());
    collapse_whitespace(&stripped)
}

fn resolve_nicknames(text: &str) -> String {
    text.split_whitespace()
        .map(|token| NICKNAMES.get(token).copied().unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the full pipeline with explicit options.
///
/// Total over any input: empty, whitespace-only and title-only names all
/// come back as an empty string.
pub fn normalize_with(text: &str, options: NormalizeOptions) -> String {
    if text.is_empty() {
        return String::new();
    }

    let sanitized = sanitize_name(text);
    let untitled = strip_titles(&sanitized);
    let folded = strip_accents(&untitled.to_lowercase());
    let mut canonical = collapse_whitespace(&folded);

    if options.strip_particles {
        canonical = remove_particles(&canonical);
    }
    if options.resolve_nicknames {
        canonical = resolve_nicknames(&canonical);
    }

    canonical
}

/// Canonical form used for blocking and scoring.
pub fn normalize(text: &str, remove_particles: bool) -> String {
    normalize_with(
        text,
        NormalizeOptions {
            strip_particles: remove_particles,
            resolve_nicknames: false,
        },
    )
}

/// Spanish-aware canonical form: particles removed, nicknames resolved.
pub fn normalize_spanish(text: &str) -> String {
    normalize_with(text, NormalizeOptions::SPANISH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_conversion() {
        assert_eq!(normalize("JUAN GARCIA", false), "juan garcia");
    }

    #[test]
    fn test_accent_removal() {
        assert_eq!(normalize("María García", false), "maria garcia");
        assert_eq!(normalize("José Núñez", false), "jose nunez");
        assert_eq!(normalize("MARÍA JOSÉ GARCÍA", false), "maria jose garcia");
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(normalize("Juan   García", false), "juan garcia");
        assert_eq!(normalize("  Juan García  ", false), "juan garcia");
        assert_eq!(normalize("Juan\t María \n López", false), "juan maria lopez");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(normalize("", false), "");
        assert_eq!(normalize("   ", false), "");
        assert_eq!(normalize("", true), "");
    }

    #[test]
    fn test_preserves_digits_hyphens_apostrophes() {
        assert_eq!(normalize("Juan García 3rd", false), "juan garcia 3rd");
        assert_eq!(normalize("Juan-García", false), "juan-garcia");
        assert_eq!(normalize("Ana O'Neill", false), "ana o'neill");
    }

    #[test]
    fn test_sanitize_corrupted_characters() {
        assert_eq!(normalize("Isabel R(odríguez García", false), "isabel rodriguez garcia");
        assert_eq!(normalize("Pablo Góme&z", false), "pablo gomez");
        assert_eq!(normalize("Javier Ruiz Rome~ro", false), "javier ruiz romero");
        assert_eq!(normalize("Isabel M@oreno", false), "isabel moreno");
        assert_eq!(normalize("Tere$sa Romero", false), "teresa romero");
    }

    #[test]
    fn test_strip_titles() {
        assert_eq!(normalize("Dr. María José García", false), "maria jose garcia");
        assert_eq!(normalize("Lic. María López", false), "maria lopez");
        assert_eq!(normalize("Col. Pedro Martínez", false), "pedro martinez");
        assert_eq!(normalize("Sra. Ana Fernández", false), "ana fernandez");
        assert_eq!(normalize("Mg. Carlos Díaz", false), "carlos diaz");
        assert_eq!(normalize("Sr. Luis Rodríguez", false), "luis rodriguez");
        assert_eq!(normalize("SEÑORITA Inés Vega", false), "ines vega");
    }

    #[test]
    fn test_title_only_is_empty() {
        assert_eq!(normalize("Dr.", false), "");
        assert_eq!(normalize("  Sra.  Lic. ", false), "");
    }

    #[test]
    fn test_title_inside_parens_is_stripped() {
        assert_eq!(normalize("(Dr.) Juan García", false), "juan garcia");
    }

    #[test]
    fn test_accented_title_token_is_stable() {
        let once = normalize("Dŕ Juan", false);
        assert_eq!(once, "juan");
        assert_eq!(normalize(&once, false), once);
    }

    #[test]
    fn test_particles() {
        assert_eq!(normalize("Juan de la Cruz", true), "juan cruz");
        assert_eq!(normalize("Juan de la Cruz", false), "juan de la cruz");
        assert_eq!(normalize("María de los Ángeles", true), "maria angeles");
        assert_eq!(normalize("Pedro del Río y Soto", true), "pedro rio soto");
        assert_eq!(normalize("Ana de las Heras", true), "ana heras");
    }

    #[test]
    fn test_particles_are_whole_words() {
        assert_eq!(normalize("Delia Yáñez", true), "delia yanez");
        assert_eq!(normalize("Adela Reyes", true), "adela reyes");
    }

    #[test]
    fn test_spanish_nicknames() {
        assert_eq!(normalize_spanish("Pepe García"), "jose garcia");
        assert_eq!(normalize_spanish("Paco de la Vega"), "francisco vega");
        assert_eq!(normalize_spanish("Nacho Ruiz"), "ignacio ruiz");
        assert_eq!(normalize_spanish("Lupe y Toño"), "guadalupe antonio");
    }

    #[test]
    fn test_nicknames_off_by_default() {
        assert_eq!(normalize("Pepe García", true), "pepe garcia");
    }

    #[test]
    fn test_spanish_is_superset_of_plain() {
        let plain = normalize("Sra. Concepción Ruiz", true);
        assert_eq!(normalize_spanish("Sra. Concepción Ruiz"), plain);
    }
}
