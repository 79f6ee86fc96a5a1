//! Tables and detail cards for each admin screen.

use dcarbon_core::format::{format_currency, format_number, format_percent, or_dash};
use dcarbon_core::names::humanize;
use dcarbon_core::{
    BonusGroup, CommissionMatrix, CommissionStructure, CommissionTier, DocumentChecklist,
    Installer, Page, Partner, PayoutRequest, PayoutSummary, ResidentialGroup,
    UtilityAuthorization, UtilityProvider, UtilityProviderRequest,
};

use crate::table::Table;

const TIMESTAMP: &str = "%Y-%m-%d %H:%M UTC";

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

// ── Commission ──

/// Tier × (property type, mode) matrix. Empty cells stay blank.
pub fn commission_matrix(matrix: &CommissionMatrix) -> Table {
    let mut headers = vec!["Property".to_string(), "Mode".to_string()];
    headers.extend(
        matrix
            .tiers
            .iter()
            .map(|t| format!("{} ({})", t.label, t.range_label())),
    );
    let mut table = Table::new(headers);
    for row in &matrix.rows {
        let mut cells = vec![humanize(&row.property_type.to_string()), row.mode.label()];
        for cell in &row.cells {
            cells.push(cell.as_ref().map(|c| c.display()).unwrap_or_default());
        }
        table.push(cells);
    }
    table
}

pub fn tiers(tiers: &[CommissionTier]) -> Table {
    let mut table = Table::new(["Id", "Label", "Range", "Order"]);
    for tier in tiers {
        table.push(vec![
            tier.id.clone(),
            tier.label.clone(),
            tier.range_label(),
            tier.order.to_string(),
        ]);
    }
    table
}

pub fn structures(structures: &[CommissionStructure]) -> Table {
    let mut table = Table::new([
        "Id",
        "Property",
        "Mode",
        "Tier",
        "Customer",
        "Installer",
        "Sales Agent",
        "Finance",
        "Max Duration",
        "Agreement (yrs)",
        "Cancellation Fee",
        "Annual Cap",
    ]);
    for s in structures {
        table.push(vec![
            s.id.clone(),
            s.property_type.to_string(),
            s.mode.to_string(),
            s.tier_id.clone(),
            or_dash(s.customer_share, format_percent),
            or_dash(s.installer_share, format_percent),
            or_dash(s.sales_agent_share, format_percent),
            or_dash(s.finance_share, format_percent),
            or_dash(s.max_duration, format_number),
            or_dash(s.agreement_yrs, format_number),
            or_dash(s.cancellation_fee, format_currency),
            or_dash(s.annual_cap, format_currency),
        ]);
    }
    table
}

// ── Bonus ──

pub fn bonus_groups(groups: &[BonusGroup<'_>]) -> Table {
    let mut table = Table::new(["Type", "Id", "Range", "Value", "Description"]);
    for group in groups {
        if group.rows.is_empty() {
            let label = group.bonus_type.label();
            table.push(vec![label, String::new(), "(none)".into()]);
            continue;
        }
        for bonus in &group.rows {
            table.push(vec![
                group.bonus_type.label(),
                bonus.id.clone(),
                bonus.range_label(),
                bonus.value_label(),
                text(bonus.description.as_deref()),
            ]);
        }
    }
    table
}

// ── Payouts ──

pub fn payouts(requests: &[PayoutRequest]) -> Table {
    let mut table = Table::new(["Id", "Requester", "Amount", "Status", "Requested"]);
    for r in requests {
        table.push(vec![
            r.id.clone(),
            r.requester().to_string(),
            format_currency(r.amount),
            r.status.to_string(),
            r.created_at.format("%Y-%m-%d").to_string(),
        ]);
    }
    table
}

pub fn print_payout_summary(summary: &PayoutSummary) {
    println!(
        "Pending: {} ({})   Paid: {} ({})   Rejected: {}",
        summary.pending_count,
        format_currency(summary.pending_amount),
        summary.paid_count,
        format_currency(summary.paid_amount),
        summary.rejected_count
    );
}

pub fn print_payout_card(r: &PayoutRequest) {
    println!("=== Payout {} ===", r.id);
    println!("  {:<18} {}", "Requester", r.requester());
    if let Some(email) = &r.user_email {
        println!("  {:<18} {}", "Email", email);
    }
    println!("  {:<18} {}", "Amount", format_currency(r.amount));
    println!("  {:<18} {}", "Status", r.status);
    println!("  {:<18} {}", "Requested", r.created_at.format(TIMESTAMP));
    if let Some(updated) = r.updated_at {
        println!("  {:<18} {}", "Updated", updated.format(TIMESTAMP));
    }
    match &r.invoice_url {
        Some(url) => println!("  {:<18} {}", "Invoice", url),
        None => println!("  {:<18} (not uploaded)", "Invoice"),
    }
    if let Some(reason) = &r.rejection_reason {
        println!("  {:<18} {}", "Rejection reason", reason);
    }
}

// ── Groups ──

pub fn groups(groups: &[ResidentialGroup]) -> Table {
    let mut table = Table::new([
        "Id",
        "Name",
        "WREGIS Id",
        "DCarbon Id",
        "Facilities",
        "Capacity (kW)",
    ]);
    for g in groups {
        table.push(vec![
            g.id.clone(),
            g.name.clone(),
            text(g.wregis_id.as_deref()),
            text(g.dcarbon_id.as_deref()),
            g.facilities.len().to_string(),
            format_number(g.aggregate_capacity()),
        ]);
    }
    table
}

pub fn print_group_card(group: &ResidentialGroup) -> anyhow::Result<()> {
    println!("=== {} ===", group.name);
    println!("  {:<18} {}", "Id", group.id);
    if let Some(wregis) = &group.wregis_id {
        println!("  {:<18} {}", "WREGIS Id", wregis);
    }
    if let Some(dcarbon) = &group.dcarbon_id {
        println!("  {:<18} {}", "DCarbon Id", dcarbon);
    }
    println!(
        "  {:<18} {} kW",
        "Total capacity",
        format_number(group.aggregate_capacity())
    );
    println!();

    let mut members = Table::new(["Facility Id", "Name", "Capacity (kW)", "Address"]);
    for f in &group.facilities {
        members.push(vec![
            f.id.clone(),
            f.name.clone(),
            or_dash(f.system_capacity, format_number),
            text(f.address.as_deref()),
        ]);
    }
    members.print()
}

// ── Facility documents ──

pub fn checklist(checklist: &DocumentChecklist) -> Table {
    let mut table = Table::new([
        "Key",
        "Document",
        "Mandatory",
        "Status",
        "URL",
        "Rejection Reason",
    ]);
    for e in &checklist.entries {
        table.push(vec![
            e.slot.key.to_string(),
            e.slot.label.to_string(),
            if e.slot.mandatory { "yes" } else { "no" }.to_string(),
            e.status.to_string(),
            text(e.url.as_deref()),
            text(e.rejection_reason.as_deref()),
        ]);
    }
    table
}

pub fn print_gate(checklist: &DocumentChecklist) {
    match checklist.check_verifiable() {
        Ok(()) => println!("Verify facility: enabled"),
        Err(e) => println!("Verify facility: disabled ({e})"),
    }
}

// ── Directory ──

pub fn print_page_footer<T>(page: &Page<T>, shown: usize) {
    println!(
        "Page {} of {} ({} total, {} shown)",
        page.page,
        page.total_pages.max(1),
        page.total,
        shown
    );
}

pub fn partners(partners: &[&Partner]) -> Table {
    let mut table = Table::new(["Id", "Name", "Email", "Phone", "Type", "Status"]);
    for p in partners {
        table.push(vec![
            p.id.clone(),
            p.name.clone(),
            p.email.clone(),
            text(p.phone.as_deref()),
            humanize(&p.partner_type.to_string()),
            humanize(&p.status.to_string()),
        ]);
    }
    table
}

pub fn installers(installers: &[&Installer]) -> Table {
    let mut table = Table::new([
        "Id",
        "Name",
        "Email",
        "License",
        "Service Areas",
        "Status",
    ]);
    for i in installers {
        table.push(vec![
            i.id.clone(),
            i.name.clone(),
            i.email.clone(),
            text(i.license_number.as_deref()),
            i.service_areas.join(", "),
            humanize(&i.status.to_string()),
        ]);
    }
    table
}

// ── Utility ──

pub fn providers(providers: &[UtilityProvider]) -> Table {
    let mut table = Table::new(["Id", "Name", "Website", "Documentation", "Status"]);
    for p in providers {
        table.push(vec![
            p.id.clone(),
            p.name.clone(),
            text(p.website.as_deref()),
            text(p.documentation.as_deref()),
            humanize(&p.status.to_string()),
        ]);
    }
    table
}

pub fn provider_requests(requests: &[UtilityProviderRequest]) -> Table {
    let mut table = Table::new(["Id", "Name", "Website", "Requested By", "Status"]);
    for r in requests {
        table.push(vec![
            r.id.clone(),
            r.name.clone(),
            text(r.website.as_deref()),
            text(r.requested_by.as_deref()),
            r.status.to_string(),
        ]);
    }
    table
}

pub fn authorizations(auths: &[UtilityAuthorization]) -> Table {
    let mut table = Table::new([
        "Id",
        "Customer",
        "Utility",
        "Status",
        "Created",
        "Authorization URL",
    ]);
    for a in auths {
        table.push(vec![
            a.id.clone(),
            a.customer_email.clone(),
            a.utility.clone(),
            a.status.to_string(),
            a.created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            a.external_url(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcarbon_core::{CommissionMode, PropertyType};

    #[test]
    fn matrix_has_a_column_per_tier() {
        let tiers = vec![CommissionTier {
            id: "t1".into(),
            label: "Tier 1".into(),
            min_amount: 0.0,
            max_amount: Some(50_000.0),
            order: 1,
        }];
        let mut pf = CommissionStructure::new(
            PropertyType::Commercial,
            CommissionMode::PartnerFinance,
            "t1",
        );
        pf.id = "pf".into();
        pf.finance_share = Some(30.0);
        pf.installer_share = Some(20.0);
        let records = vec![pf];

        let table = commission_matrix(&CommissionMatrix::build(&records, &tiers));
        let out = table.render().unwrap();

        assert_eq!(table.to_batch().unwrap().num_rows(), 1);
        assert!(out.contains("Tier 1 ($0 - $50,000)"));
        assert!(out.contains("Finance 30% / Installer 20% (Total 50%)"));
        assert!(out.contains("Partner Finance"));
    }
}
