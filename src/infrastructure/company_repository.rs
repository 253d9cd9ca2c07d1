use super::{CompanyRepository, RepoResult};
use crate::domain::company::Company;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Tenant company directory held in memory. Ids are assigned sequentially from 1.
pub struct InMemoryCompanyRepository {
    companies: RwLock<Vec<Company>>,
}

impl InMemoryCompanyRepository {
    pub fn new() -> Self {
        Self::with_companies(vec![])
    }

    pub fn with_companies(companies: Vec<Company>) -> Self {
        Self {
            companies: RwLock::new(companies),
        }
    }
}

impl Default for InMemoryCompanyRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn create_company(&self, name: &str) -> RepoResult<Company> {
        let mut companies = self.companies.write().await;
        let next_id = companies.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let company = Company::new(next_id, name.trim());
        companies.push(company.clone());
        tracing::info!(company_id = company.id, name = %company.name, "Company registered");
        Ok(company)
    }

    async fn list_companies(&self) -> RepoResult<Vec<Company>> {
        Ok(self.companies.read().await.clone())
    }
}
