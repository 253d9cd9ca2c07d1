use crate::domain::access_grant::AccessGrant;
use crate::domain::company::Company;
use std::collections::HashSet;

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Field validation failed: {field} - {message}")]
    FieldValidation { field: String, message: String },
    #[error("Duplicate company in access list: {0}")]
    DuplicateCompany(i64),
    #[error("Company {0} is not available to this tenant")]
    UnknownCompany(i64),
}

/// Company directory validation rules
pub struct CompanyValidator;

impl CompanyValidator {
    /// Validates a company display name
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::FieldValidation {
                field: "name".to_string(),
                message: "Company name cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Checks an initial grant list before it is loaded into a draft.
///
/// The draft itself trusts its caller, so the host rejects lists that reference
/// unknown companies or repeat a company.
pub struct InitialGrantsValidator;

impl InitialGrantsValidator {
    pub fn validate(companies: &[Company], grants: &[AccessGrant]) -> Result<(), ValidationError> {
        let known: HashSet<i64> = companies.iter().map(|c| c.id).collect();
        let mut seen = HashSet::new();
        for grant in grants {
            if !known.contains(&grant.company_id) {
                return Err(ValidationError::UnknownCompany(grant.company_id));
            }
            if !seen.insert(grant.company_id) {
                return Err(ValidationError::DuplicateCompany(grant.company_id));
            }
        }
        Ok(())
    }
}
