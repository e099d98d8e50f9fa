//! Prebuilt speech voices
//!
//! The TTS endpoint only accepts the provider's published voice names. Requests
//! naming anything else are rejected locally, before a request is sent.

const VOICES: [&str; 30] = [
    "Zephyr",
    "Puck",
    "Charon",
    "Kore",
    "Fenrir",
    "Leda",
    "Orus",
    "Aoede",
    "Callirrhoe",
    "Autonoe",
    "Enceladus",
    "Iapetus",
    "Umbriel",
    "Algieba",
    "Despina",
    "Erinome",
    "Algenib",
    "Rasalgethi",
    "Laomedeia",
    "Achernar",
    "Alnilam",
    "Schedar",
    "Gacrux",
    "Pulcherrima",
    "Achird",
    "Zubenelgenubi",
    "Vindemiatrix",
    "Sadachbia",
    "Sadaltager",
    "Sulafat",
];

pub struct VoiceCatalog;

impl VoiceCatalog {
    pub fn names() -> &'static [&'static str] {
        &VOICES
    }

    /// Exact, case-sensitive membership check.
    pub fn contains(name: &str) -> bool {
        VOICES.contains(&name)
    }

    /// Returns the catalog's canonical `&'static str` for `name`.
    pub fn validate(name: &str) -> crate::Result<&'static str> {
        VOICES
            .iter()
            .copied()
            .find(|voice| *voice == name)
            .ok_or_else(|| crate::Error::InvalidVoice(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_no_duplicates() {
        let unique: HashSet<_> = VoiceCatalog::names().iter().collect();
        assert_eq!(unique.len(), VoiceCatalog::names().len());
    }

    #[test]
    fn test_known_voice_validates() {
        assert_eq!(VoiceCatalog::validate("Kore").unwrap(), "Kore");
        assert!(VoiceCatalog::contains("Sulafat"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(!VoiceCatalog::contains("kore"));
        let err = VoiceCatalog::validate("kore").unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidVoice);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(VoiceCatalog::validate("").is_err());
    }
}
