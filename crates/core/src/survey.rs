use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::capital_tax::pays_capital_tax;
use crate::feature::FeatureRow;
use crate::money::Gbp;
use crate::record::CreatedAccount;
use crate::tenure::elapsed_months;

/// Probability above which a respondent is offered the product.
pub const DEFAULT_THRESHOLD: f64 = 0.36;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SurveyError {
    #[error("Unknown job title: {0}")]
    UnknownJob(String),
    #[error("Unknown education level: {0}")]
    UnknownEducation(String),
    #[error("Employment start date {0} is in the future")]
    StartInFuture(NaiveDate),
    #[error("Salary is not a finite amount: {0}")]
    InvalidSalary(f64),
}

/// Job-title and education scoring tables. Built once at startup and
/// handed to whatever turns survey answers into features.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyLookups {
    #[serde(default)]
    pub jobs: BTreeMap<String, i32>,
    #[serde(default)]
    pub education: BTreeMap<String, i32>,
}

impl SurveyLookups {
    pub fn occupation_level(&self, job_title: &str) -> Result<i32, SurveyError> {
        self.jobs
            .get(job_title)
            .copied()
            .ok_or_else(|| SurveyError::UnknownJob(job_title.to_string()))
    }

    pub fn education_num(&self, education: &str) -> Result<i32, SurveyError> {
        self.education
            .get(education)
            .copied()
            .ok_or_else(|| SurveyError::UnknownEducation(education.to_string()))
    }
}

/// A single respondent's answers as collected by the survey form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyAnswers {
    pub age: i32,
    pub marital_status: String,
    pub education: String,
    pub workclass: String,
    pub job_title: String,
    /// Yearly, in pounds.
    pub salary: f64,
    pub hours_per_week: i32,
    pub employment_start: NaiveDate,
    pub familiarity_fb: i32,
    pub view_fb: i32,
    pub interested_insurance: bool,
    pub pays_capital_tax: bool,
}

impl SurveyAnswers {
    pub fn to_feature_row(
        &self,
        lookups: &SurveyLookups,
        today: NaiveDate,
    ) -> Result<FeatureRow, SurveyError> {
        let months = elapsed_months(&today, &self.employment_start);
        let total_months_with_employer =
            u32::try_from(months).map_err(|_| SurveyError::StartInFuture(self.employment_start))?;
        let salary = Gbp::from_f64(self.salary).ok_or(SurveyError::InvalidSalary(self.salary))?;

        Ok(FeatureRow {
            participant_id: None,
            full_name: None,
            age: self.age,
            marital_status: Some(self.marital_status.clone()),
            occupation_level: lookups.occupation_level(&self.job_title)?,
            education_num: lookups.education_num(&self.education)?,
            familiarity_fb: self.familiarity_fb,
            view_fb: self.view_fb,
            interested_insurance: i32::from(self.interested_insurance),
            created_account: CreatedAccount::Raw(None),
            salary_band: Some(salary),
            hours_per_week: self.hours_per_week,
            workclass: Some(self.workclass.clone()),
            total_months_with_employer,
            pays_capital_tax: pays_capital_tax(i64::from(self.pays_capital_tax), 0),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Offer,
    NoOffer,
}

/// Strictly above `threshold` is an offer.
pub fn decide(probability: f64, threshold: f64) -> Decision {
    if probability > threshold {
        Decision::Offer
    } else {
        Decision::NoOffer
    }
}
