pub mod capital_tax;
pub mod feature;
pub mod money;
pub mod rates;
pub mod record;
pub mod survey;
pub mod tenure;

pub use capital_tax::pays_capital_tax;
pub use feature::{FeatureRow, FEATURE_COLUMNS, MODEL_FEATURES};
pub use money::Gbp;
pub use rates::ExchangeRates;
pub use record::{
    combine_name_parts, AccountLabel, CampaignRecord, CreatedAccount, LinkedRecord,
    MortgageRecord, ParticipantId,
};
pub use survey::{decide, Decision, SurveyAnswers, SurveyError, SurveyLookups, DEFAULT_THRESHOLD};
pub use tenure::{elapsed_months, total_months};
