//! Canton name normalization
//!
//! Maps free-form names ("Zürich", "zurich", "ZH", "Kanton Zürich", "Genf")
//! to a `Canton`. Unknown names return `None`; the cantonal engine turns that
//! into `UnsupportedCanton`.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::model::Canton;

/// Official names, abbreviations and German/French/Italian/English spellings
const ALIASES: &[(Canton, &[&str])] = &[
    (
        Canton::Zurich,
        &["ZH", "Zürich", "Zurich", "Zuerich", "Zurigo", "Turitg"],
    ),
    (Canton::Bern, &["BE", "Bern", "Berne", "Berna"]),
    (
        Canton::Geneva,
        &["GE", "Genève", "Geneva", "Genf", "Ginevra", "Genevra"],
    ),
    (Canton::Ticino, &["TI", "Ticino", "Tessin", "Tessin/Ticino"]),
    (Canton::Vaud, &["VD", "Vaud", "Waadt", "Waadtland"]),
    (Canton::Valais, &["VS", "Valais", "Wallis", "Vallese"]),
    (
        Canton::StGallen,
        &[
            "SG",
            "St. Gallen",
            "Sankt Gallen",
            "Saint-Gall",
            "St-Gall",
            "San Gallo",
            "Son Gagl",
        ],
    ),
    (Canton::Lucerne, &["LU", "Luzern", "Lucerne", "Lucerna"]),
    (Canton::Fribourg, &["FR", "Fribourg", "Freiburg", "Friburgo"]),
    (Canton::Aargau, &["AG", "Aargau", "Argovie", "Argovia"]),
];

/// Leading words dropped before lookup ("Kanton Zürich", "Canton de Genève")
const PREFIX_WORDS: &[&str] = &["kanton", "canton", "cantone", "chantun"];
const LINK_WORDS: &[&str] = &["of", "de", "du", "des", "di", "del", "dal", "the"];

static ALIAS_TABLE: LazyLock<HashMap<String, Canton>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    for (canton, aliases) in ALIASES {
        for alias in aliases.iter() {
            m.insert(fold_key(alias), *canton);
        }
    }
    m
});

/// Resolve a free-form canton name
pub fn normalize_canton(name: &str) -> Option<Canton> {
    let key = fold_key(name);
    if key.is_empty() {
        return None;
    }
    ALIAS_TABLE.get(&key).copied()
}

/// Accepted spellings for one canton, as listed in the alias table
pub fn aliases(canton: Canton) -> &'static [&'static str] {
    ALIASES
        .iter()
        .find(|(c, _)| *c == canton)
        .map(|(_, a)| *a)
        .unwrap_or(&[])
}

/// Lookup key: diacritics folded, lower-cased, administrative prefix dropped,
/// only ASCII letters and digits kept
pub fn fold_key(name: &str) -> String {
    let folded: String = name.to_lowercase().chars().map(fold_char).collect();

    let mut words: Vec<&str> = folded
        .split(|c: char| c.is_whitespace() || c == '\'' || c == '’')
        .filter(|w| !w.is_empty())
        .collect();

    if words.len() > 1 && PREFIX_WORDS.contains(&words[0]) {
        words.remove(0);
        if words.len() > 1 && LINK_WORDS.contains(&words[0]) {
            words.remove(0);
        }
    }

    words
        .concat()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn fold_char(c: char) -> char {
    match c {
        'ä' | 'à' | 'á' | 'â' | 'ã' | 'å' => 'a',
        'ö' | 'ò' | 'ó' | 'ô' | 'õ' => 'o',
        'ü' | 'ù' | 'ú' | 'û' => 'u',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'ï' | 'î' | 'ì' | 'í' => 'i',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}
