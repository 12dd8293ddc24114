use serde::{Deserialize, Serialize};

use stockroom_core::validate::required_text;
use stockroom_core::{CategoryId, DomainResult, Entity};

pub const NAME_MAX: usize = 100;

/// Item category (e.g. "Fasteners"). Names are globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
}

impl Category {
    pub fn new(id: CategoryId, name: &str) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: required_text("name", name, NAME_MAX)?,
        })
    }

    pub fn renamed(&self, name: &str) -> DomainResult<Self> {
        Self::new(self.id, name)
    }

    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Entity for Category {
    type Id = CategoryId;
    const KIND: &'static str = "category";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::DomainError;

    #[test]
    fn new_category_trims_name() {
        let category = Category::new(CategoryId::new(), "  Fasteners ").unwrap();
        assert_eq!(category.name(), "Fasteners");
        assert_eq!(category.to_string(), "Fasteners");
    }

    #[test]
    fn rename_keeps_identity() {
        let category = Category::new(CategoryId::new(), "Electronics").unwrap();
        let renamed = category.renamed("Electrical").unwrap();
        assert_eq!(renamed.id_typed(), category.id_typed());
        assert_eq!(renamed.name(), "Electrical");
    }

    #[test]
    fn name_length_boundary() {
        assert!(Category::new(CategoryId::new(), &"x".repeat(NAME_MAX)).is_ok());
        let err = Category::new(CategoryId::new(), &"x".repeat(NAME_MAX + 1)).unwrap_err();
        assert!(matches!(err, DomainError::RangeViolation { field: "name", .. }));
    }
}
