//! Runs one parsed command against the screens and prints the result.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use dcarbon_admin::{
    BonusScreen, CommissionScreen, FacilityReviewScreen, GroupScreen, InstallerScreen,
    NotificationBadge, PartnerScreen, PayoutScreen, Ui, UtilityAuthScreen, UtilityProviderScreen,
};
use dcarbon_api::{AdminClient, PollEvent};
use dcarbon_core::{
    AccountStatus, BonusStructure, CommissionStructure, CommissionTier, DirectoryFilter,
    GreenButtonRequest, Installer, PageRequest, Partner, ResidentialGroup, UtilityProvider,
};

use crate::args::{
    AuthCommand, BonusCommand, Command, CommissionCommand, FacilityCommand, GroupCommand,
    InstallerCommand, ListArgs, PartnerCommand, PayoutCommand, ShareArgs, UtilityCommand,
};
use crate::display;

type Api = Arc<AdminClient>;

pub async fn run(command: Command, api: Api, ui: Ui) -> anyhow::Result<()> {
    match command {
        Command::Commission { command } => commission(command, api, ui).await,
        Command::Bonus { command } => bonus(command, api, ui).await,
        Command::Payout { command } => payout(command, api, ui).await,
        Command::Group { command } => group(command, api, ui).await,
        Command::Facility { command } => facility(command, api, ui).await,
        Command::Partner { command } => partner(command, api, ui).await,
        Command::Installer { command } => installer(command, api, ui).await,
        Command::Utility { command } => utility(command, api, ui).await,
        Command::Auth { command } => auth(command, api, ui).await,
        Command::Notifications {
            watch,
            interval_secs,
        } => notifications(api, watch, interval_secs).await,
    }
}

/// Replace `slot` when a value was given on the command line.
fn overwrite<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Overwrite only the values given on the command line.
fn apply_shares(structure: &mut CommissionStructure, shares: &ShareArgs) {
    let overrides = [
        (&mut structure.customer_share, shares.customer),
        (&mut structure.installer_share, shares.installer),
        (&mut structure.sales_agent_share, shares.sales_agent),
        (&mut structure.finance_share, shares.finance),
        (&mut structure.max_duration, shares.max_duration),
        (&mut structure.agreement_yrs, shares.agreement_yrs),
        (&mut structure.cancellation_fee, shares.cancellation_fee),
        (&mut structure.annual_cap, shares.annual_cap),
    ];
    for (slot, value) in overrides {
        if value.is_some() {
            *slot = value;
        }
    }
}

async fn commission(command: CommissionCommand, api: Api, ui: Ui) -> anyhow::Result<()> {
    let mut screen = CommissionScreen::new(api, ui);
    match command {
        CommissionCommand::Matrix => {
            screen.load().await?;
            display::commission_matrix(&screen.matrix()?).print()?;
        }
        CommissionCommand::List {
            mode,
            property_type,
        } => {
            let structures = if mode.is_some() || property_type.is_some() {
                screen.filter(mode, property_type).await?
            } else {
                screen.reload_structures().await?;
                screen
                    .structures()
                    .require("commission structures")?
                    .clone()
            };
            display::structures(&structures).print()?;
        }
        CommissionCommand::Tiers => {
            screen.reload_tiers().await?;
            display::tiers(screen.tiers().require("commission tiers")?).print()?;
        }
        CommissionCommand::Create {
            property_type,
            mode,
            tier,
            shares,
        } => {
            let mut structure = CommissionStructure::new(property_type, mode, &tier);
            apply_shares(&mut structure, &shares);
            let created = screen.create_structure(&structure).await?;
            println!("{}", created.id);
        }
        CommissionCommand::Edit { id, shares } => {
            screen.reload_structures().await?;
            let mut target = screen.edit_target(&id)?.clone();
            if target.id != id {
                eprintln!(
                    "{id} is part of a Partner Finance structure; editing {} instead",
                    target.id
                );
            }
            apply_shares(&mut target, &shares);
            let target_id = target.id.clone();
            screen.update_structure(&target_id, &target).await?;
        }
        CommissionCommand::Delete { id } => {
            screen.reload_structures().await?;
            screen.delete_structure(&id).await?;
        }
        CommissionCommand::CreateTier {
            label,
            min,
            max,
            order,
        } => {
            let tier = CommissionTier {
                id: String::new(),
                label,
                min_amount: min,
                max_amount: max,
                order,
            };
            let created = screen.create_tier(&tier).await?;
            println!("{}", created.id);
        }
        CommissionCommand::EditTier {
            id,
            label,
            min,
            max,
            order,
        } => {
            screen.reload_tiers().await?;
            let mut tier = screen.tier(&id)?.clone();
            overwrite(&mut tier.label, label);
            overwrite(&mut tier.min_amount, min);
            overwrite(&mut tier.max_amount, max.map(Some));
            overwrite(&mut tier.order, order);
            screen.update_tier(&id, &tier).await?;
        }
        CommissionCommand::DeleteTier { id } => screen.delete_tier(&id).await?,
    }
    Ok(())
}

async fn bonus(command: BonusCommand, api: Api, ui: Ui) -> anyhow::Result<()> {
    let mut screen = BonusScreen::new(api, ui);
    match command {
        BonusCommand::List => {
            screen.load().await?;
            display::bonus_groups(&screen.groups()?).print()?;
        }
        BonusCommand::Lookup { bonus_type, value } => {
            screen.load().await?;
            let label = bonus_type.label();
            match screen.lookup(bonus_type, value)? {
                Some(b) => println!("{label} {} ({})", b.value_label(), b.range_label()),
                None => println!("No {label} bonus covers {value}"),
            }
        }
        BonusCommand::Create {
            bonus_type,
            min,
            max,
            percent,
            flat,
            description,
        } => {
            let bonus = BonusStructure {
                id: String::new(),
                bonus_type,
                min_value: min,
                max_value: max,
                percent,
                flat_amount: flat,
                description,
            };
            let created = screen.create(&bonus).await?;
            println!("{}", created.id);
        }
        BonusCommand::Edit {
            id,
            min,
            max,
            percent,
            flat,
            description,
        } => {
            screen.load().await?;
            let mut bonus = screen.bonus(&id)?.clone();
            overwrite(&mut bonus.min_value, min);
            overwrite(&mut bonus.max_value, max.map(Some));
            overwrite(&mut bonus.percent, percent.map(Some));
            overwrite(&mut bonus.flat_amount, flat.map(Some));
            overwrite(&mut bonus.description, description.map(Some));
            screen.update(&id, &bonus).await?;
        }
        BonusCommand::Delete { id } => screen.delete(&id).await?,
    }
    Ok(())
}

async fn payout(command: PayoutCommand, api: Api, ui: Ui) -> anyhow::Result<()> {
    let mut screen = PayoutScreen::new(api, ui);
    match command {
        PayoutCommand::List { status } => {
            screen.set_status_filter(status).await?;
            let requests = screen.requests().require("payout requests")?;
            display::payouts(requests).print()?;
            display::print_payout_summary(&screen.summary()?);
        }
        PayoutCommand::Show { id } => {
            screen.open(&id).await?;
            display::print_payout_card(screen.detail().require("payout request")?);
        }
        PayoutCommand::Approve { id } => {
            let updated = screen.approve(&id).await?;
            display::print_payout_card(&updated);
        }
        PayoutCommand::Reject { id, reason } => {
            let updated = screen.reject(&id, &reason).await?;
            display::print_payout_card(&updated);
        }
    }
    Ok(())
}

async fn group(command: GroupCommand, api: Api, ui: Ui) -> anyhow::Result<()> {
    let mut screen = GroupScreen::new(api, ui);
    match command {
        GroupCommand::List => {
            screen.load().await?;
            display::groups(screen.groups().require("groups")?).print()?;
        }
        GroupCommand::Show { id } => {
            screen.open(&id).await?;
            display::print_group_card(screen.detail().require("group")?)?;
        }
        GroupCommand::Create {
            name,
            wregis_id,
            dcarbon_id,
        } => {
            let mut group = ResidentialGroup::new(&name);
            group.wregis_id = wregis_id;
            group.dcarbon_id = dcarbon_id;
            let created = screen.create(&group).await?;
            println!("{}", created.id);
        }
        GroupCommand::Rename { id, name } => {
            screen.open(&id).await?;
            let mut group = screen.detail().require("group")?.clone();
            group.name = name;
            screen.update(&id, &group).await?;
        }
        GroupCommand::Delete { id } => screen.delete(&id).await?,
        GroupCommand::Add { id, facility_ids } => {
            screen.open(&id).await?;
            let added = screen.add_facilities(&facility_ids).await?;
            if added == 0 {
                eprintln!("All facilities are already in the group");
            }
            display::print_group_card(screen.detail().require("group")?)?;
        }
        GroupCommand::Remove { id, facility_id } => {
            screen.open(&id).await?;
            screen.remove_facility(&facility_id).await?;
        }
    }
    Ok(())
}

async fn facility(command: FacilityCommand, api: Api, ui: Ui) -> anyhow::Result<()> {
    let (kind, id) = match &command {
        FacilityCommand::Checklist { kind, id }
        | FacilityCommand::Approve { kind, id, .. }
        | FacilityCommand::Reject { kind, id, .. }
        | FacilityCommand::Verify { kind, id } => (*kind, id.clone()),
    };
    let mut screen = FacilityReviewScreen::new(api, ui, kind, &id);
    screen
        .load()
        .await
        .with_context(|| format!("loading {kind} facility {id}"))?;

    match command {
        FacilityCommand::Checklist { .. } => {}
        FacilityCommand::Approve { document, .. } => screen.approve_document(&document).await?,
        FacilityCommand::Reject {
            document, reason, ..
        } => screen.reject_document(&document, &reason).await?,
        FacilityCommand::Verify { .. } => {
            screen.verify().await?;
        }
    }

    let checklist = screen.checklist()?;
    display::checklist(&checklist).print()?;
    display::print_gate(&checklist);
    Ok(())
}

fn filter(list: &ListArgs) -> DirectoryFilter {
    DirectoryFilter {
        query: list.query.clone(),
        status: list.status,
        partner_type: None,
    }
}

fn page_request(list: &ListArgs) -> PageRequest {
    PageRequest {
        page: list.page.max(1),
        limit: list.limit.max(1),
    }
}

async fn partner(command: PartnerCommand, api: Api, ui: Ui) -> anyhow::Result<()> {
    let mut screen = PartnerScreen::new(api, ui);
    match command {
        PartnerCommand::List { list, partner_type } => {
            screen.set_filter(DirectoryFilter {
                partner_type,
                ..filter(&list)
            });
            screen.go_to(page_request(&list)).await?;
            let visible = screen.visible();
            display::partners(&visible).print()?;
            if let Some(page) = screen.state().page().data() {
                display::print_page_footer(page, visible.len());
            }
        }
        PartnerCommand::Create {
            name,
            email,
            partner_type,
            phone,
            address,
        } => {
            let partner = Partner {
                id: String::new(),
                name,
                email,
                phone,
                partner_type,
                status: AccountStatus::Active,
                address,
            };
            let created = screen.create(&partner).await?;
            println!("{}", created.id);
        }
        PartnerCommand::Edit {
            id,
            name,
            email,
            partner_type,
            phone,
            address,
            status,
        } => {
            let mut partner = screen.find(&id).await?;
            overwrite(&mut partner.name, name);
            overwrite(&mut partner.email, email);
            overwrite(&mut partner.partner_type, partner_type);
            overwrite(&mut partner.phone, phone.map(Some));
            overwrite(&mut partner.address, address.map(Some));
            overwrite(&mut partner.status, status);
            screen.update(&id, &partner).await?;
        }
        PartnerCommand::Delete { id } => screen.delete(&id).await?,
    }
    Ok(())
}

async fn installer(command: InstallerCommand, api: Api, ui: Ui) -> anyhow::Result<()> {
    let mut screen = InstallerScreen::new(api, ui);
    match command {
        InstallerCommand::List { list } => {
            screen.set_filter(filter(&list));
            screen.go_to(page_request(&list)).await?;
            let visible = screen.visible();
            display::installers(&visible).print()?;
            if let Some(page) = screen.state().page().data() {
                display::print_page_footer(page, visible.len());
            }
        }
        InstallerCommand::Create {
            name,
            email,
            phone,
            license,
            service_areas,
        } => {
            let installer = Installer {
                id: String::new(),
                name,
                email,
                phone,
                license_number: license,
                service_areas,
                status: AccountStatus::Active,
            };
            let created = screen.create(&installer).await?;
            println!("{}", created.id);
        }
        InstallerCommand::Edit {
            id,
            name,
            email,
            phone,
            license,
            service_areas,
            status,
        } => {
            let mut installer = screen.find(&id).await?;
            overwrite(&mut installer.name, name);
            overwrite(&mut installer.email, email);
            overwrite(&mut installer.phone, phone.map(Some));
            overwrite(&mut installer.license_number, license.map(Some));
            if !service_areas.is_empty() {
                installer.service_areas = service_areas;
            }
            overwrite(&mut installer.status, status);
            screen.update(&id, &installer).await?;
        }
        InstallerCommand::Delete { id } => screen.delete(&id).await?,
    }
    Ok(())
}

async fn utility(command: UtilityCommand, api: Api, ui: Ui) -> anyhow::Result<()> {
    let mut screen = UtilityProviderScreen::new(api, ui);
    match command {
        UtilityCommand::Providers => {
            screen.load().await?;
            display::providers(screen.providers().require("utility providers")?).print()?;
        }
        UtilityCommand::Requests => {
            screen.load().await?;
            display::provider_requests(screen.requests().require("provider requests")?).print()?;
        }
        UtilityCommand::CreateProvider {
            name,
            website,
            documentation,
        } => {
            let provider = UtilityProvider {
                id: String::new(),
                name,
                website,
                documentation,
                status: AccountStatus::Active,
            };
            let created = screen.create(&provider).await?;
            println!("{}", created.id);
        }
        UtilityCommand::EditProvider {
            id,
            name,
            website,
            documentation,
            status,
        } => {
            screen.load().await?;
            let mut provider = screen.provider(&id)?.clone();
            overwrite(&mut provider.name, name);
            overwrite(&mut provider.website, website.map(Some));
            overwrite(&mut provider.documentation, documentation.map(Some));
            overwrite(&mut provider.status, status);
            screen.update(&id, &provider).await?;
        }
        UtilityCommand::DeleteProvider { id } => screen.delete(&id).await?,
        UtilityCommand::ApproveRequest { id } => {
            screen.approve_request(&id).await?;
        }
        UtilityCommand::RejectRequest { id } => {
            screen.reject_request(&id).await?;
        }
    }
    Ok(())
}

async fn auth(command: AuthCommand, api: Api, ui: Ui) -> anyhow::Result<()> {
    let mut screen = UtilityAuthScreen::new(api, ui);
    match command {
        AuthCommand::List => {
            screen.load().await?;
            display::authorizations(screen.authorizations().require("authorizations")?).print()?;
        }
        AuthCommand::Start {
            email,
            utility,
            facility_id,
            watch,
            interval_secs,
        } => {
            let request = GreenButtonRequest {
                customer_email: email,
                utility,
                facility_id,
            };
            let (auth, url) = screen.start_green_button(&request).await?;
            println!("Authorization {} started.", auth.id);
            println!("Open this link to complete it: {url}");
            if watch {
                watch_authorization(&screen, &auth.id, interval_secs).await?;
            }
        }
        AuthCommand::Watch { id, interval_secs } => {
            watch_authorization(&screen, &id, interval_secs).await?;
        }
        AuthCommand::Delete { id } => screen.delete(&id).await?,
    }
    Ok(())
}

async fn watch_authorization(
    screen: &UtilityAuthScreen<AdminClient>,
    id: &str,
    interval_secs: u64,
) -> anyhow::Result<()> {
    let mut sub = screen.watch(id, Duration::from_secs(interval_secs.max(1)));
    let mut last = None;
    while let Some(event) = sub.next().await {
        match event {
            PollEvent::Value(auth) => {
                if last != Some(auth.status) {
                    println!("{}: {}", auth.id, auth.status);
                    last = Some(auth.status);
                }
            }
            PollEvent::Failed(message) => eprintln!("status check failed: {message}"),
        }
    }
    Ok(())
}

async fn notifications(api: Api, watch: bool, interval_secs: u64) -> anyhow::Result<()> {
    let mut badge = NotificationBadge::new(api);
    if !watch {
        badge.refresh().await?;
        println!("{}", badge.unread());
        return Ok(());
    }

    let mut sub = badge.subscribe(Duration::from_secs(interval_secs.max(1)));
    let mut last = None;
    loop {
        tokio::select! {
            event = sub.next() => match event {
                Some(PollEvent::Value(count)) if last != Some(count) => {
                    println!("{count} unread");
                    last = Some(count);
                }
                Some(PollEvent::Value(_)) => {}
                Some(PollEvent::Failed(message)) => eprintln!("unread count failed: {message}"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
