use super::{Dashboard, secondary};
use crate::client::models::{CompanyProfile, CompanyResponse, UserProfile};
use crate::client::{Credential, paths};
use crate::error::Result;
use crate::models::{CompanyDetailRecord, CompanyRecord, EmployeeRecord};

/// Company id from the owner's job, `None` when unemployed.
fn job_company(profile: UserProfile) -> Option<u64> {
    profile
        .job
        .and_then(|job| job.company_id)
        .filter(|id| *id != 0)
}

impl Dashboard {
    /// The key owner's company, or [`CompanyRecord::none`] without a job.
    pub async fn get_company_data(&self, credential: &Credential) -> Result<CompanyRecord> {
        let Some(company_id) = job_company(self.owner(credential, "profile").await?) else {
            return Ok(CompanyRecord::none());
        };
        match self.company_profile(credential, company_id).await? {
            Some(profile) => Ok(self.company_record(credential, profile, company_id).await),
            None => Ok(CompanyRecord::none()),
        }
    }

    /// Company profile plus the director-only figures and the full roster.
    ///
    /// The profile call decides the outcome; the employees and detailed
    /// calls fall back to the public roster and zeroed figures when they
    /// fail (most commonly because the key owner is not the director).
    pub async fn get_company_detailed_data(&self, credential: &Credential) -> Result<CompanyDetailRecord> {
        let Some(company_id) = job_company(self.owner(credential, "profile").await?) else {
            return Ok(CompanyDetailRecord::none());
        };
        let Some(mut profile) = self.company_profile(credential, company_id).await? else {
            return Ok(CompanyDetailRecord::none());
        };

        let employees_path = paths::company(None, "employees");
        let detailed_path = paths::company(None, "detailed");
        let (employees, detailed) = futures::join!(
            self.get::<CompanyResponse>(&employees_path, credential),
            self.get::<CompanyResponse>(&detailed_path, credential),
        );
        let employees = secondary("Company employees", employees).and_then(|r| r.company_employees);
        let detailed = secondary("Company details", detailed).and_then(|r| r.company_detailed);

        let roster = employees
            .or_else(|| profile.employees.take())
            .map(EmployeeRecord::roster)
            .unwrap_or_default();
        let company = self.company_record(credential, profile, company_id).await;

        Ok(CompanyDetailRecord::assemble(company, detailed, roster))
    }

    async fn company_profile(&self, credential: &Credential, company_id: u64) -> Result<Option<CompanyProfile>> {
        let path = paths::company(Some(company_id), "profile");
        let response: Option<CompanyResponse> = self.get_entity(&path, credential).await?;
        Ok(response.map(|r| r.company.unwrap_or_default()))
    }

    async fn company_record(&self, credential: &Credential, profile: CompanyProfile, company_id: u64) -> CompanyRecord {
        let type_name = match profile.company_type {
            Some(type_id) => self.company_types.name_of(credential, type_id).await,
            None => None,
        };
        CompanyRecord::from_profile(profile, company_id, type_name)
    }
}
