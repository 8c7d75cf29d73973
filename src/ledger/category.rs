use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::entry::{CategoryId, Direction};

/// Categorises ledger entries for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub direction: Direction,
    pub icon: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, direction: Direction) -> Self {
        Self {
            id,
            name: name.into(),
            direction,
            icon: String::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// Read-only lookup of categories by id, supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    by_id: HashMap<CategoryId, Category>,
}

impl CategoryCatalog {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            by_id: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.by_id.get(&id)
    }

    pub fn name_of(&self, id: CategoryId) -> Option<&str> {
        self.get(id).map(|category| category.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<Category> for CategoryCatalog {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self::new(iter)
    }
}
