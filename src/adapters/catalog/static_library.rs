//! Static Use-Case Library - a fixed in-memory catalog.

use async_trait::async_trait;

use crate::domain::catalog::UseCase;
use crate::ports::{LibraryError, UseCaseLibrary};

use super::parse_library;

/// Catalog used when no library file is configured.
const BUILT_IN_LIBRARY: &str = r#"
use_cases:
  - id: fin-invoice-automation
    title: Invoice Processing Automation
    domain: Finance
    process: Accounts Payable
    description: Capture supplier invoices, match them to purchase orders and route approvals
  - id: fin-expense-audit
    title: Expense Audit
    domain: Finance
    process: Controlling
    description: Flag unusual or out-of-policy employee expenses
  - id: fin-close
    title: Month-End Close Assistant
    domain: Finance
    process: Accounting
    description: Reconcile ledgers and draft close checklists
  - id: sal-lead-scoring
    title: Lead Scoring
    domain: Sales
    process: Pipeline Management
    description: Rank inbound leads by fit and intent signals
  - id: sal-quote-generation
    title: Quote Generation
    domain: Sales
    process: Deal Desk
    description: Draft quotes and proposals from CRM opportunity data
  - id: hr-resume-screening
    title: Resume Screening
    domain: HR
    process: Recruiting
    description: Shortlist candidates against role requirements
  - id: hr-onboarding
    title: Employee Onboarding Assistant
    domain: HR
    process: Onboarding
    description: Answer new-hire policy questions and track onboarding tasks
  - id: ops-demand-forecast
    title: Demand Forecasting
    domain: Operations
    process: Supply Chain
    description: Forecast inventory demand from sales history and seasonality
  - id: ops-vendor-risk
    title: Vendor Risk Monitoring
    domain: Operations
    process: Procurement
    description: Track supplier compliance, contracts and risk signals
  - id: cs-ticket-triage
    title: Support Ticket Triage
    domain: Customer Service
    process: Support
    description: Classify and route incoming support tickets
"#;

/// Library holding a fixed list of use-cases.
#[derive(Debug, Clone, Default)]
pub struct StaticUseCaseLibrary {
    use_cases: Vec<UseCase>,
}

impl StaticUseCaseLibrary {
    pub fn new(use_cases: Vec<UseCase>) -> Self {
        Self { use_cases }
    }

    /// The catalog shipped with the application.
    pub fn built_in() -> Result<Self, LibraryError> {
        Ok(Self::new(parse_library(BUILT_IN_LIBRARY)?))
    }
}

#[async_trait]
impl UseCaseLibrary for StaticUseCaseLibrary {
    async fn list(&self) -> Result<Vec<UseCase>, LibraryError> {
        Ok(self.use_cases.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn built_in_library_parses_and_covers_several_domains() {
        let library = StaticUseCaseLibrary::built_in().unwrap();
        let use_cases = library.list().await.unwrap();

        assert_eq!(use_cases.len(), 10);
        let domains: std::collections::HashSet<&str> =
            use_cases.iter().map(|uc| uc.domain.as_str()).collect();
        assert!(domains.len() >= 5);
    }
}
