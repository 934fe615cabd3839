//! City reference entity.

use serde::Serialize;
use uuid::Uuid;

use crate::error::{require_text, DomainResult};

/// City with its French, Arabic and English names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct City {
    id: Uuid,
    name_fr: String,
    name_ar: String,
    name_en: String,
}

impl City {
    pub fn create(
        name_fr: impl Into<String>,
        name_ar: impl Into<String>,
        name_en: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::restore(Uuid::new_v4(), name_fr, name_ar, name_en)
    }

    pub fn restore(
        id: Uuid,
        name_fr: impl Into<String>,
        name_ar: impl Into<String>,
        name_en: impl Into<String>,
    ) -> DomainResult<Self> {
        let name_fr = name_fr.into();
        let name_en = name_en.into();
        require_text("French name", &name_fr)?;
        require_text("English name", &name_en)?;
        Ok(Self {
            id,
            name_fr,
            name_ar: name_ar.into(),
            name_en,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name_fr(&self) -> &str {
        &self.name_fr
    }

    pub fn name_ar(&self) -> &str {
        &self.name_ar
    }

    pub fn name_en(&self) -> &str {
        &self.name_en
    }

    /// Case-insensitive match against any localized name.
    pub fn matches_name(&self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        [&self.name_fr, &self.name_ar, &self.name_en]
            .iter()
            .any(|candidate| candidate.to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_any_localized_name() {
        let city = City::create("Marseille", "مرسيليا", "Marseilles").unwrap();
        assert!(city.matches_name("marseille"));
        assert!(city.matches_name("MARSEILLES"));
        assert!(city.matches_name("مرسيليا"));
        assert!(city.matches_name(" Marseille "));
        assert!(!city.matches_name("Lyon"));
    }
}
