use propensity_core::{CampaignRecord, FeatureRow, LinkedRecord, ParticipantId, FEATURE_COLUMNS};
use std::collections::HashMap;
use std::io::Write;
use tracing::info;

/// Joins campaign rows to their linked mortgage rows and keeps the rows
/// with every model feature present. Campaign order is preserved; when
/// several mortgage rows share a participant the first one is used.
pub fn assemble(campaign: &[CampaignRecord], linked: &[LinkedRecord]) -> Vec<FeatureRow> {
    let mut by_participant: HashMap<&ParticipantId, &LinkedRecord> = HashMap::new();
    for record in linked {
        if let Some(id) = &record.participant_id {
            by_participant.entry(id).or_insert(record);
        }
    }

    let joined: Vec<FeatureRow> = campaign
        .iter()
        .filter_map(|c| {
            by_participant
                .get(&c.participant_id)
                .map(|l| FeatureRow::join(c, &l.mortgage))
        })
        .collect();
    let joined_count = joined.len();

    let rows: Vec<FeatureRow> = joined.into_iter().filter(FeatureRow::is_complete).collect();
    info!(
        campaign = campaign.len(),
        joined = joined_count,
        kept = rows.len(),
        "assembled feature table"
    );
    rows
}

/// Rows with a known label, i.e. the supervised training set.
pub fn labelled(rows: Vec<FeatureRow>) -> Vec<FeatureRow> {
    rows.into_iter()
        .filter(|r| r.created_account.is_labelled())
        .collect()
}

/// Writes the table as CSV with a `FEATURE_COLUMNS` header, even when
/// there are no rows.
pub fn write_features<W: Write>(rows: &[FeatureRow], writer: W) -> Result<(), csv::Error> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(FEATURE_COLUMNS)?;
    for row in rows {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}
