//! Translations for the user facing labels of the breakpoint list.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    English,
    French,
    German,
    Spanish,
}

impl Locale {
    /// Pick a locale from a POSIX style tag such as `fr_FR.UTF-8`, falling
    /// back to English for anything unrecognised.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or_default()
    }

    /// Translate a message id. Unknown ids are returned unchanged.
    pub fn translate(self, msgid: &'static str) -> &'static str {
        match (self, msgid) {
            (Locale::English, _) => msgid,
            (Locale::French, "File") => "Fichier",
            (Locale::French, "Line") => "Ligne",
            (Locale::French, "Condition") => "Condition",
            (Locale::French, "Breakpoints") => "Points d'arrêt",
            (Locale::German, "File") => "Datei",
            (Locale::German, "Line") => "Zeile",
            (Locale::German, "Condition") => "Bedingung",
            (Locale::German, "Breakpoints") => "Haltepunkte",
            (Locale::Spanish, "File") => "Archivo",
            (Locale::Spanish, "Line") => "Línea",
            (Locale::Spanish, "Condition") => "Condición",
            (Locale::Spanish, "Breakpoints") => "Puntos de interrupción",
            (_, other) => other,
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let language = s
            .split(['_', '-', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "en" | "c" | "posix" => Ok(Locale::English),
            "fr" => Ok(Locale::French),
            "de" => Ok(Locale::German),
            "es" => Ok(Locale::Spanish),
            _ => Err(format!("unsupported locale '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Locale;

    #[test]
    fn parses_posix_tags() {
        assert_eq!(Locale::from_tag("fr_FR.UTF-8"), Locale::French);
        assert_eq!(Locale::from_tag("de-DE"), Locale::German);
        assert_eq!(Locale::from_tag("es"), Locale::Spanish);
        assert_eq!(Locale::from_tag("C"), Locale::English);
        assert_eq!(Locale::from_tag("ja_JP.UTF-8"), Locale::English);
        assert_eq!(Locale::from_tag(""), Locale::English);
    }

    #[test]
    fn empty_and_unknown_ids_pass_through() {
        assert_eq!(Locale::German.translate(""), "");
        assert_eq!(Locale::French.translate("Something else"), "Something else");
        assert_eq!(Locale::English.translate("File"), "File");
    }
}
