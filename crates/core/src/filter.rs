use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::error::{NgramError, Result};
use crate::model::{CampaignSkuMap, SearchTermRecord};

/// Keeps records whose campaign is mapped to one of `selected_skus`.
///
/// SKUs compare case-insensitively; blank entries are ignored. When no
/// campaign matches, the error carries every selected SKU that does not appear
/// in the mapping at all.
pub fn filter_by_sku<S: AsRef<str>>(
    records: &[SearchTermRecord],
    campaign_to_sku: &CampaignSkuMap,
    selected_skus: &[S],
) -> Result<Vec<SearchTermRecord>> {
    let selected: BTreeSet<String> = selected_skus
        .iter()
        .map(|sku| sku.as_ref().trim().to_uppercase())
        .filter(|sku| !sku.is_empty())
        .collect();
    let campaigns: HashSet<&str> = campaign_to_sku
        .iter()
        .filter(|(_, sku)| selected.contains(&sku.to_uppercase()))
        .map(|(campaign, _)| campaign)
        .collect();

    if campaigns.is_empty() {
        let mapped: HashSet<String> = campaign_to_sku
            .iter()
            .map(|(_, sku)| sku.to_uppercase())
            .collect();
        let unmatched_skus = selected
            .into_iter()
            .filter(|sku| !mapped.contains(sku))
            .collect();
        return Err(NgramError::NoMatchingCampaigns {
            unmatched_skus,
            mapping: campaign_to_sku.clone(),
        });
    }

    let kept: Vec<SearchTermRecord> = records
        .iter()
        .filter(|record| campaigns.contains(record.campaign_name.as_str()))
        .cloned()
        .collect();
    debug!(
        campaigns = campaigns.len(),
        kept = kept.len(),
        dropped = records.len() - kept.len(),
        "sku filter applied"
    );
    Ok(kept)
}

/// Drops records whose search term contains any exclusion term as a
/// case-insensitive substring. Blank terms are ignored.
pub fn exclude_brand_terms<S: AsRef<str>>(
    records: &[SearchTermRecord],
    exclusion_terms: &[S],
) -> Vec<SearchTermRecord> {
    let terms: Vec<String> = exclusion_terms
        .iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect();
    if terms.is_empty() {
        return records.to_vec();
    }
    let kept: Vec<SearchTermRecord> = records
        .iter()
        .filter(|record| {
            let lowered = record.search_term.to_lowercase();
            !terms.iter().any(|term| lowered.contains(term.as_str()))
        })
        .cloned()
        .collect();
    debug!(
        terms = terms.len(),
        excluded = records.len() - kept.len(),
        "brand terms excluded"
    );
    kept
}
