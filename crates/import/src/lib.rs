pub mod campaign;
pub mod config;
pub mod features;
pub mod linker;
pub mod mortgage;
pub mod pipeline;
pub mod rates;
pub mod salary;
pub mod table;
pub(crate) mod util;

pub use campaign::{import_campaign, LabelMode, CAMPAIGN_COLUMNS};
pub use config::{ConfigError, PipelineConfig, API_KEY_ENV};
pub use features::{assemble, labelled, write_features};
pub use linker::{LinkError, NameScorer, RecordLinker};
pub use mortgage::{import_mortgage, normalize_workclass, MORTGAGE_COLUMNS};
pub use pipeline::build_feature_table;
pub use rates::{convert_salaries, ExchangeRateClient, RateError, RateSource, DEFAULT_RATES_URL};
pub use salary::{parse_salary, SalaryBand};
pub use table::{ImportError, TableProfile};
