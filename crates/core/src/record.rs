use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::money::Gbp;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        ParticipantId(s.to_string())
    }
}

/// Ternary encoding of the `created_account` response used for
/// semi-supervised training: unanswered rows are kept but marked unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountLabel {
    Unknown,
    No,
    Yes,
}

impl AccountLabel {
    pub fn code(self) -> i8 {
        match self {
            AccountLabel::Unknown => -1,
            AccountLabel::No => 0,
            AccountLabel::Yes => 1,
        }
    }

    /// `Yes`/`No` map to 1/0; a blank or absent response is unknown.
    /// Anything else is rejected.
    pub fn from_response(response: Option<&str>) -> Result<Self, String> {
        match response.map(str::trim) {
            None | Some("") => Ok(AccountLabel::Unknown),
            Some("Yes") => Ok(AccountLabel::Yes),
            Some("No") => Ok(AccountLabel::No),
            Some(other) => Err(format!("Unknown created_account response: '{other}'")),
        }
    }
}

impl fmt::Display for AccountLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The `created_account` column, either as read or recoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatedAccount {
    Raw(Option<String>),
    Encoded(AccountLabel),
}

impl CreatedAccount {
    pub fn is_labelled(&self) -> bool {
        match self {
            CreatedAccount::Raw(value) => value.is_some(),
            CreatedAccount::Encoded(label) => *label != AccountLabel::Unknown,
        }
    }
}

impl Serialize for CreatedAccount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CreatedAccount::Raw(Some(value)) => serializer.serialize_str(value),
            CreatedAccount::Raw(None) => serializer.serialize_none(),
            CreatedAccount::Encoded(label) => serializer.serialize_i8(label.code()),
        }
    }
}

/// One survey participant from the campaign table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRecord {
    pub participant_id: ParticipantId,
    pub full_name: String,
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
}

/// One cleaned mortgage-table row. Salary is annual GBP, tenure is in
/// months and the capital gain/loss pair is folded into a flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MortgageRecord {
    pub full_name: String,
    pub salary_band: Option<Gbp>,
    pub hours_per_week: i32,
    pub workclass: Option<String>,
    pub total_months_with_employer: u32,
    #[serde(rename = "pays_captial_tax")]
    pub pays_capital_tax: u8,
}

/// A mortgage row with the participant it was matched to, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedRecord {
    pub participant_id: Option<ParticipantId>,
    #[serde(flatten)]
    pub mortgage: MortgageRecord,
}

/// Full name as the campaign table spells it: title, first and last name,
/// single-spaced. Missing parts are skipped.
pub fn combine_name_parts(title: Option<&str>, first: Option<&str>, last: Option<&str>) -> String {
    [title, first, last]
        .into_iter()
        .flatten()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_codes() {
        assert_eq!(AccountLabel::Unknown.code(), -1);
        assert_eq!(AccountLabel::No.code(), 0);
        assert_eq!(AccountLabel::Yes.code(), 1);
        assert_eq!(AccountLabel::Yes.to_string(), "1");
    }

    #[test]
    fn label_from_response() {
        assert_eq!(AccountLabel::from_response(Some("Yes")), Ok(AccountLabel::Yes));
        assert_eq!(AccountLabel::from_response(Some("No")), Ok(AccountLabel::No));
        assert_eq!(AccountLabel::from_response(None), Ok(AccountLabel::Unknown));
        assert_eq!(AccountLabel::from_response(Some("  ")), Ok(AccountLabel::Unknown));
        assert!(AccountLabel::from_response(Some("Maybe")).is_err());
    }

    #[test]
    fn created_account_is_labelled() {
        assert!(CreatedAccount::Encoded(AccountLabel::No).is_labelled());
        assert!(!CreatedAccount::Encoded(AccountLabel::Unknown).is_labelled());
        assert!(CreatedAccount::Raw(Some("Yes".into())).is_labelled());
        assert!(!CreatedAccount::Raw(None).is_labelled());
    }

    #[test]
    fn created_account_serializes_code_or_text() {
        let encoded = serde_json::to_string(&CreatedAccount::Encoded(AccountLabel::Unknown)).unwrap();
        assert_eq!(encoded, "-1");
        let raw = serde_json::to_string(&CreatedAccount::Raw(Some("Yes".into()))).unwrap();
        assert_eq!(raw, "\"Yes\"");
        let missing = serde_json::to_string(&CreatedAccount::Raw(None)).unwrap();
        assert_eq!(missing, "null");
    }

    #[test]
    fn combine_name_parts_single_spaces() {
        assert_eq!(
            combine_name_parts(Some("Mr."), Some("Dale"), Some("Coles")),
            "Mr. Dale Coles"
        );
        assert_eq!(combine_name_parts(None, Some(" Joel "), Some("Allen")), "Joel Allen");
        assert_eq!(
            combine_name_parts(Some("Mr."), Some("Craig  Marc"), Some("Davis")),
            "Mr. Craig Marc Davis"
        );
        assert_eq!(combine_name_parts(None, None, None), "");
    }
}
