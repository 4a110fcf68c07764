use uuid::Uuid;

use crate::core::errors::FinanceError;
use crate::domain::{category::Category, ledger::Ledger};

use super::{ServiceError, ServiceResult};

pub struct CategoryService;

impl CategoryService {
    pub fn add(ledger: &mut Ledger, category: Category) -> ServiceResult<Uuid> {
        Self::validate_name(ledger, &category.name)?;
        let id = ledger.add_category(category);
        tracing::info!(%id, "added category");
        Ok(id)
    }

    pub fn list(ledger: &Ledger) -> Vec<&Category> {
        let mut categories: Vec<&Category> = ledger.categories.iter().collect();
        categories.sort_by_key(|category| category.name.to_ascii_lowercase());
        categories
    }

    /// Looks a category up by name, ignoring case and surrounding whitespace.
    pub fn resolve_name(ledger: &Ledger, name: &str) -> ServiceResult<Uuid> {
        let normalized = name.trim().to_ascii_lowercase();
        ledger
            .categories
            .iter()
            .find(|category| category.name.trim().to_ascii_lowercase() == normalized)
            .map(|category| category.id)
            .ok_or_else(|| FinanceError::CategoryNotFound(name.to_string()).into())
    }

    fn validate_name(ledger: &Ledger, candidate: &str) -> ServiceResult<()> {
        let normalized = candidate.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ServiceError::Invalid("Category name is required".into()));
        }
        let duplicate = ledger
            .categories
            .iter()
            .any(|category| category.name.trim().to_ascii_lowercase() == normalized);
        if duplicate {
            Err(ServiceError::Invalid(format!(
                "Category `{}` already exists",
                candidate
            )))
        } else {
            Ok(())
        }
    }
}
