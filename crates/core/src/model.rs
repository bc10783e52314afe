use std::ops::AddAssign;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::bulk::{CAMPAIGN_COLUMN, SKU_COLUMN};
use crate::sheet::{Cell, Sheet};

/// Summable performance metrics carried by a search-term row.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    pub impressions: f64,
    pub clicks: f64,
    pub spend: f64,
    pub sales: f64,
    pub units: f64,
}

impl AddAssign<&Metrics> for Metrics {
    fn add_assign(&mut self, rhs: &Metrics) {
        self.impressions += rhs.impressions;
        self.clicks += rhs.clicks;
        self.spend += rhs.spend;
        self.sales += rhs.sales;
        self.units += rhs.units;
    }
}

/// One row of the search-term report.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTermRecord {
    pub campaign_name: String,
    pub search_term: String,
    pub metrics: Metrics,
}

impl SearchTermRecord {
    pub fn new(
        campaign_name: impl Into<String>,
        search_term: impl Into<String>,
        metrics: Metrics,
    ) -> Self {
        Self {
            campaign_name: campaign_name.into(),
            search_term: search_term.into(),
            metrics,
        }
    }
}

/// How to resolve a campaign name that appears with more than one SKU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    #[default]
    LastWriteWins,
    FirstWriteWins,
}

/// Campaign name to advertised SKU, in first-seen campaign order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignSkuMap {
    policy: MergePolicy,
    entries: IndexMap<String, String>,
}

impl CampaignSkuMap {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            entries: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, campaign: impl Into<String>, sku: impl Into<String>) {
        let campaign = campaign.into();
        let sku = sku.into();
        match self.entries.get_mut(&campaign) {
            Some(existing) if *existing != sku => {
                debug!(
                    campaign = %campaign,
                    kept = %existing,
                    other = %sku,
                    policy = ?self.policy,
                    "campaign mapped to more than one SKU"
                );
                if self.policy == MergePolicy::LastWriteWins {
                    *existing = sku;
                }
            }
            Some(_) => {}
            None => {
                self.entries.insert(campaign, sku);
            }
        }
    }

    pub fn sku_for(&self, campaign: &str) -> Option<&str> {
        self.entries.get(campaign).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(campaign, sku)| (campaign.as_str(), sku.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_sheet(&self) -> Sheet {
        let mut sheet = Sheet::new("SKU to Campaign Mapping", [CAMPAIGN_COLUMN, SKU_COLUMN]);
        for (campaign, sku) in self.iter() {
            sheet.push_row(vec![Cell::text(campaign), Cell::text(sku)]);
        }
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins_by_default() {
        let mut map = CampaignSkuMap::default();
        map.insert("Camp", "A");
        map.insert("Other", "B");
        map.insert("Camp", "C");
        assert_eq!(map.sku_for("Camp"), Some("C"));
        let order: Vec<_> = map.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec!["Camp", "Other"]);
    }

    #[test]
    fn first_write_wins_keeps_original() {
        let mut map = CampaignSkuMap::new(MergePolicy::FirstWriteWins);
        map.insert("Camp", "A");
        map.insert("Camp", "C");
        assert_eq!(map.sku_for("Camp"), Some("A"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn metrics_add_fieldwise() {
        let mut total = Metrics::default();
        let row = Metrics {
            impressions: 10.0,
            clicks: 2.0,
            spend: 1.5,
            sales: 4.0,
            units: 1.0,
        };
        total += &row;
        total += &row;
        assert_eq!(total.impressions, 20.0);
        assert_eq!(total.spend, 3.0);
        assert_eq!(total.units, 2.0);
    }

    #[test]
    fn mapping_sheet_has_named_columns() {
        let mut map = CampaignSkuMap::default();
        map.insert("Camp", "A");
        let sheet = map.to_sheet();
        assert_eq!(sheet.headers, vec![CAMPAIGN_COLUMN, SKU_COLUMN]);
        assert_eq!(sheet.rows, vec![vec![Cell::text("Camp"), Cell::text("A")]]);
    }
}
