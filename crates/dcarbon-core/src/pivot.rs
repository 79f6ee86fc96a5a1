//! Tier × mode pivot of flat commission structures.
//!
//! The server returns one record per (property type, mode, tier). Screens show
//! them as a matrix: one row per (property type, mode), one column per tier.
//! Partner-finance and EPC-assisted rows are tied together: EPC legs are a
//! view over the partner-finance record of the same property type and tier,
//! which drives the derived totals, delete cascades and edit redirection here.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::format::format_percent;
use crate::{
    CommissionMode, CommissionStructure, CommissionTier, PropertyType, ShareField, ValidationError,
    sort_tiers,
};

/// Lookup over a flat record list, built once per render.
///
/// When the input holds several records for the same key, [`get`](Self::get)
/// returns the first one; [`all`](Self::all) returns every one of them.
pub struct CommissionIndex<'a> {
    by_key: HashMap<(PropertyType, CommissionMode, &'a str), Vec<&'a CommissionStructure>>,
    by_id: HashMap<&'a str, &'a CommissionStructure>,
}

impl<'a> CommissionIndex<'a> {
    pub fn build(records: &'a [CommissionStructure]) -> Self {
        let mut by_key: HashMap<_, Vec<_>> = HashMap::with_capacity(records.len());
        let mut by_id = HashMap::with_capacity(records.len());
        for record in records {
            by_key
                .entry((record.property_type, record.mode, record.tier_id.as_str()))
                .or_default()
                .push(record);
            by_id.entry(record.id.as_str()).or_insert(record);
        }
        Self { by_key, by_id }
    }

    pub fn get(
        &self,
        property_type: PropertyType,
        mode: CommissionMode,
        tier_id: &str,
    ) -> Option<&'a CommissionStructure> {
        self.all(property_type, mode, tier_id).first().copied()
    }

    /// Every record for a key, in input order.
    pub fn all<'b>(
        &'b self,
        property_type: PropertyType,
        mode: CommissionMode,
        tier_id: &'b str,
    ) -> &'b [&'a CommissionStructure] {
        self.by_key
            .get(&(property_type, mode, tier_id))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn by_id(&self, id: &str) -> Option<&'a CommissionStructure> {
        self.by_id.get(id).copied()
    }

    /// The `PARTNER_FINANCE` record sharing a property type and tier.
    pub fn partner_finance(
        &self,
        property_type: PropertyType,
        tier_id: &str,
    ) -> Option<&'a CommissionStructure> {
        self.get(property_type, CommissionMode::PartnerFinance, tier_id)
    }

    /// Derived total shown next to a record's shares, if its mode has one.
    pub fn derived_total(&self, record: &CommissionStructure) -> Option<DerivedTotal> {
        if record.mode == CommissionMode::PartnerFinance {
            let total = record.partner_finance_total();
            return Some(DerivedTotal::PartnerFinanceTotal(total));
        }
        let leg_field = record.mode.epc_leg_field()?;
        let leg = record.share(leg_field).unwrap_or(0.0);
        if let Some(sibling) = self.partner_finance(record.property_type, &record.tier_id) {
            return Some(DerivedTotal::PartOfPartnerFinance {
                leg,
                total: sibling.partner_finance_total(),
                from_sibling: true,
            });
        }
        // No partner-finance record: combine with the opposite leg instead.
        let opposite = record
            .mode
            .epc_counterpart()
            .and_then(|mode| self.get(record.property_type, mode, &record.tier_id))
            .and_then(|other| other.share(other.mode.epc_leg_field()?))
            .unwrap_or(0.0);
        Some(DerivedTotal::PartOfPartnerFinance {
            leg,
            total: leg + opposite,
            from_sibling: false,
        })
    }
}

/// A computed value displayed alongside the raw shares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DerivedTotal {
    /// finance + installer of a `PARTNER_FINANCE` record.
    PartnerFinanceTotal(f64),
    /// An EPC leg's share and the partner-finance total it is part of.
    PartOfPartnerFinance {
        leg: f64,
        total: f64,
        from_sibling: bool,
    },
}

impl DerivedTotal {
    pub fn total(&self) -> f64 {
        match *self {
            Self::PartnerFinanceTotal(total) => total,
            Self::PartOfPartnerFinance { total, .. } => total,
        }
    }

    pub fn display(&self) -> String {
        match *self {
            Self::PartnerFinanceTotal(total) => format!("Total {}", format_percent(total)),
            Self::PartOfPartnerFinance { leg, total, .. } => {
                format!("{} of {}", format_percent(leg), format_percent(total))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShareCell {
    pub field: ShareField,
    pub value: Option<f64>,
}

/// One populated cell of the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct TierCell {
    pub structure_id: String,
    pub shares: Vec<ShareCell>,
    pub derived: Option<DerivedTotal>,
}

impl TierCell {
    /// `Finance 30% / Installer 20% (Total 50%)`
    pub fn display(&self) -> String {
        let shares: Vec<String> = self
            .shares
            .iter()
            .map(|cell| match cell.value {
                Some(v) => format!("{} {}", cell.field.label(), format_percent(v)),
                None => format!("{} -", cell.field.label()),
            })
            .collect();
        let mut out = shares.join(" / ");
        if let Some(derived) = &self.derived {
            out.push_str(&format!(" ({})", derived.display()));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommissionRow {
    pub property_type: PropertyType,
    pub mode: CommissionMode,
    /// Aligned with [`CommissionMatrix::tiers`]; `None` where no record exists.
    pub cells: Vec<Option<TierCell>>,
}

/// Render-ready commission table.
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionMatrix {
    pub tiers: Vec<CommissionTier>,
    pub rows: Vec<CommissionRow>,
}

impl CommissionMatrix {
    /// Pivot flat records into one row per (property type, mode) present.
    ///
    /// Rows are ordered by property type, then mode declaration order. A
    /// record whose tier is not in `tiers` keeps its row but fills no cell.
    pub fn build(records: &[CommissionStructure], tiers: &[CommissionTier]) -> Self {
        let mut tiers = tiers.to_vec();
        sort_tiers(&mut tiers);
        let index = CommissionIndex::build(records);

        let groups: BTreeSet<(PropertyType, CommissionMode)> = records
            .iter()
            .map(|r| (r.property_type, r.mode))
            .collect();

        let rows = groups
            .into_iter()
            .map(|(property_type, mode)| {
                let cells = tiers
                    .iter()
                    .map(|tier| {
                        index
                            .get(property_type, mode, &tier.id)
                            .map(|record| tier_cell(&index, record))
                    })
                    .collect();
                CommissionRow {
                    property_type,
                    mode,
                    cells,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            records = records.len(),
            rows = rows.len(),
            tiers = tiers.len(),
            "built commission matrix"
        );
        Self { tiers, rows }
    }

    pub fn row(&self, property_type: PropertyType, mode: CommissionMode) -> Option<&CommissionRow> {
        self.rows
            .iter()
            .find(|r| r.property_type == property_type && r.mode == mode)
    }
}

fn tier_cell(index: &CommissionIndex<'_>, record: &CommissionStructure) -> TierCell {
    let shares = record
        .mode
        .display_fields()
        .iter()
        .map(|&field| ShareCell {
            field,
            value: record.share(field),
        })
        .collect();
    TierCell {
        structure_id: record.id.clone(),
        shares,
        derived: index.derived_total(record),
    }
}

/// Structures to delete for one user action, and the confirmation to show.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletePlan {
    /// The target first, then any cascaded records.
    pub ids: Vec<String>,
    pub prompt: String,
}

impl DeletePlan {
    pub fn is_cascade(&self) -> bool {
        self.ids.len() > 1
    }
}

const EPC_LEGS: [CommissionMode; 2] = [
    CommissionMode::EpcAssistedFinance,
    CommissionMode::EpcAssistedInstaller,
];

const LINKED_EPC_PROMPT: &str = "This EPC Assisted structure is linked to a Partner Finance \
    structure for the same tier. Only this structure will be deleted. Continue?";

const PLAIN_DELETE_PROMPT: &str = "Are you sure you want to delete this commission structure?";

/// Work out what deleting structure `id` removes.
///
/// Deleting a `PARTNER_FINANCE` record also removes every EPC-assisted leg
/// for the same property type and tier, duplicates included. Deleting an EPC
/// leg removes only that leg; the prompt warns when a partner-finance sibling
/// exists.
pub fn plan_delete(
    records: &[CommissionStructure],
    id: &str,
) -> Result<DeletePlan, ValidationError> {
    let index = CommissionIndex::build(records);
    let target = index
        .by_id(id)
        .ok_or_else(|| ValidationError::UnknownRecord(id.to_string()))?;

    let mut ids = vec![target.id.clone()];
    let prompt = if target.mode == CommissionMode::PartnerFinance {
        for mode in EPC_LEGS {
            let legs = index.all(target.property_type, mode, &target.tier_id);
            ids.extend(legs.iter().map(|leg| leg.id.clone()));
        }
        if ids.len() > 1 {
            format!(
                "Deleting this Partner Finance structure will also delete {} dependent \
                 EPC Assisted structure(s) for the same tier. Continue?",
                ids.len() - 1
            )
        } else {
            PLAIN_DELETE_PROMPT.to_string()
        }
    } else if target.mode.is_epc_assisted()
        && index
            .partner_finance(target.property_type, &target.tier_id)
            .is_some()
    {
        LINKED_EPC_PROMPT.to_string()
    } else {
        PLAIN_DELETE_PROMPT.to_string()
    };

    Ok(DeletePlan { ids, prompt })
}

/// The record an edit of `id` should open.
///
/// EPC-assisted shares are a view over the partner-finance record, so editing
/// an EPC leg opens its partner-finance sibling when there is one.
pub fn edit_target<'a>(
    records: &'a [CommissionStructure],
    id: &str,
) -> Result<&'a CommissionStructure, ValidationError> {
    let index = CommissionIndex::build(records);
    let target = index
        .by_id(id)
        .ok_or_else(|| ValidationError::UnknownRecord(id.to_string()))?;
    if target.mode.is_epc_assisted()
        && let Some(sibling) = index.partner_finance(target.property_type, &target.tier_id)
    {
        return Ok(sibling);
    }
    Ok(target)
}
