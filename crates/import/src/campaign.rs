use propensity_core::{combine_name_parts, AccountLabel, CampaignRecord, CreatedAccount, ParticipantId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use tracing::info;

use crate::table::{read_rows, ImportError, TableProfile};

pub const CAMPAIGN_COLUMNS: [&str; 12] = [
    "participant_id",
    "name_title",
    "first_name",
    "last_name",
    "age",
    "marital_status",
    "occupation_level",
    "education_num",
    "familiarity_FB",
    "view_FB",
    "interested_insurance",
    "created_account",
];

/// How the `created_account` column comes out of the import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// Keep the response text as read.
    #[default]
    Raw,
    /// Recode to -1/0/1 so unanswered rows can stay in a self-training set.
    SemiSupervised,
}

#[derive(Debug, Deserialize)]
struct CampaignRow {
    participant_id: String,
    name_title: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    age: i32,
    marital_status: Option<String>,
    occupation_level: i32,
    education_num: i32,
    #[serde(rename = "familiarity_FB")]
    familiarity_fb: i32,
    #[serde(rename = "view_FB")]
    view_fb: i32,
    interested_insurance: i32,
    created_account: Option<String>,
}

pub fn import_campaign<R: Read>(
    data: R,
    profile: &TableProfile,
    labels: LabelMode,
) -> Result<Vec<CampaignRecord>, ImportError> {
    let rows: Vec<CampaignRow> = read_rows(data, profile, &CAMPAIGN_COLUMNS)?;

    let mut seen = HashSet::with_capacity(rows.len());
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        if !seen.insert(row.participant_id.clone()) {
            return Err(ImportError::DuplicateParticipant(row.participant_id));
        }
        let created_account = match labels {
            LabelMode::Raw => CreatedAccount::Raw(row.created_account),
            LabelMode::SemiSupervised => CreatedAccount::Encoded(
                AccountLabel::from_response(row.created_account.as_deref())
                    .map_err(ImportError::InvalidLabel)?,
            ),
        };
        records.push(CampaignRecord {
            participant_id: ParticipantId(row.participant_id),
            full_name: combine_name_parts(
                row.name_title.as_deref(),
                row.first_name.as_deref(),
                row.last_name.as_deref(),
            ),
            age: row.age,
            marital_status: row.marital_status,
            occupation_level: row.occupation_level,
            education_num: row.education_num,
            familiarity_fb: row.familiarity_fb,
            view_fb: row.view_fb,
            interested_insurance: row.interested_insurance,
            created_account,
        });
    }

    info!(rows = records.len(), ?labels, "imported campaign table");
    Ok(records)
}
