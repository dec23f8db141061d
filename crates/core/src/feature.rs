use serde::Serialize;

use crate::money::Gbp;
use crate::record::{CampaignRecord, CreatedAccount, MortgageRecord, ParticipantId};

/// Column order of an exported feature table.
pub const FEATURE_COLUMNS: [&str; 15] = [
    "participant_id",
    "full_name",
    "age",
    "marital_status",
    "occupation_level",
    "education_num",
    "familiarity_FB",
    "view_FB",
    "interested_insurance",
    "created_account",
    "salary_band",
    "hours_per_week",
    "workclass",
    "total_months_with_employer",
    "pays_captial_tax",
];

/// Columns the classifier is fitted on. A row with a null in any of
/// these is not usable for training or scoring.
pub const MODEL_FEATURES: [&str; 12] = [
    "age",
    "marital_status",
    "occupation_level",
    "education_num",
    "familiarity_FB",
    "view_FB",
    "interested_insurance",
    "salary_band",
    "hours_per_week",
    "workclass",
    "total_months_with_employer",
    "pays_captial_tax",
];

/// One participant's campaign answers joined with their mortgage data.
///
/// Rows built from a survey submission have no participant id, name or label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub participant_id: Option<ParticipantId>,
    pub full_name: Option<String>,
    pub age: i32,
    pub marital_status: Option<String>,
    pub occupation_level: i32,
    pub education_num: i32,
    #[serde(rename = "familiarity_FB")]
    pub familiarity_fb: i32,
    #[serde(rename = "view_FB")]
    pub view_fb: i32,
    pub interested_insurance: i32,
    pub created_account: CreatedAccount,
    pub salary_band: Option<Gbp>,
    pub hours_per_week: i32,
    pub workclass: Option<String>,
    pub total_months_with_employer: u32,
    #[serde(rename = "pays_captial_tax")]
    pub pays_capital_tax: u8,
}

impl FeatureRow {
    pub fn join(campaign: &CampaignRecord, mortgage: &MortgageRecord) -> Self {
        FeatureRow {
            participant_id: Some(campaign.participant_id.clone()),
            full_name: Some(campaign.full_name.clone()),
            age: campaign.age,
            marital_status: campaign.marital_status.clone(),
            occupation_level: campaign.occupation_level,
            education_num: campaign.education_num,
            familiarity_fb: campaign.familiarity_fb,
            view_fb: campaign.view_fb,
            interested_insurance: campaign.interested_insurance,
            created_account: campaign.created_account.clone(),
            salary_band: mortgage.salary_band,
            hours_per_week: mortgage.hours_per_week,
            workclass: mortgage.workclass.clone(),
            total_months_with_employer: mortgage.total_months_with_employer,
            pays_capital_tax: mortgage.pays_capital_tax,
        }
    }

    /// No nulls in any of [`MODEL_FEATURES`].
    pub fn is_complete(&self) -> bool {
        self.marital_status.is_some() && self.salary_band.is_some() && self.workclass.is_some()
    }
}
