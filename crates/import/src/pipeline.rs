use propensity_core::FeatureRow;
use std::fs::File;
use std::io::BufReader;
use tracing::info;

use crate::campaign::import_campaign;
use crate::config::PipelineConfig;
use crate::features::assemble;
use crate::mortgage::import_mortgage;
use crate::rates::RateSource;
use crate::table::ImportError;

/// campaign + mortgage files → linked, de-nulled feature rows.
///
/// The two tables are imported independently; the fixed rate table from
/// the config is used when present, otherwise `source` is asked once.
pub async fn build_feature_table(
    config: &PipelineConfig,
    source: &impl RateSource,
) -> Result<Vec<FeatureRow>, ImportError> {
    let profile = config.table_profile();

    info!(path = %config.sources.campaign.display(), "reading campaign table");
    let campaign = import_campaign(
        BufReader::new(File::open(&config.sources.campaign)?),
        &profile,
        config.sources.labels,
    )?;

    info!(path = %config.sources.mortgage.display(), "reading mortgage table");
    let mortgage = import_mortgage(
        BufReader::new(File::open(&config.sources.mortgage)?),
        &profile,
        Some(&config.rates.fixed),
        source,
    )
    .await?;

    let linked = config.linker().link_mortgage(&campaign, mortgage);
    Ok(assemble(&campaign, &linked))
}
