//! Command-line surface of the `dcarbon` binary.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use dcarbon_api::DEFAULT_BASE_URL;
use dcarbon_core::{
    AccountStatus, BonusType, CommissionMode, FacilityKind, PartnerType, PayoutStatus, PropertyType,
};

#[derive(Parser)]
#[command(name = "dcarbon", version)]
#[command(about = "DCarbon admin tools: commissions, payouts, facilities, partners and utilities")]
pub struct Cli {
    /// API host, without the `/api` suffix.
    #[arg(long, global = true, env = "DCARBON_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Bearer token for the admin session.
    #[arg(long, global = true, env = "DCARBON_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File holding the bearer token; re-read before every request.
    #[arg(long, global = true, env = "DCARBON_TOKEN_FILE", conflicts_with = "token")]
    pub token_file: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Answer yes to every confirmation.
    #[arg(long, short = 'y', global = true, default_value_t = false)]
    pub yes: bool,

    /// More log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Commission tiers and structures.
    Commission {
        #[command(subcommand)]
        command: CommissionCommand,
    },
    /// Bonus structures.
    Bonus {
        #[command(subcommand)]
        command: BonusCommand,
    },
    /// Payout requests.
    Payout {
        #[command(subcommand)]
        command: PayoutCommand,
    },
    /// Residential facility groups.
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },
    /// Facility document review.
    Facility {
        #[command(subcommand)]
        command: FacilityCommand,
    },
    Partner {
        #[command(subcommand)]
        command: PartnerCommand,
    },
    Installer {
        #[command(subcommand)]
        command: InstallerCommand,
    },
    /// Utility providers and provider requests.
    Utility {
        #[command(subcommand)]
        command: UtilityCommand,
    },
    /// Customer utility-data authorizations.
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
    /// Unread notification count.
    Notifications {
        /// Keep polling and print every change.
        #[arg(long, default_value_t = false)]
        watch: bool,
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
    },
}

#[derive(Args)]
pub struct ShareArgs {
    #[arg(long)]
    pub customer: Option<f64>,
    #[arg(long)]
    pub installer: Option<f64>,
    #[arg(long)]
    pub sales_agent: Option<f64>,
    #[arg(long)]
    pub finance: Option<f64>,
    #[arg(long)]
    pub max_duration: Option<f64>,
    #[arg(long)]
    pub agreement_yrs: Option<f64>,
    #[arg(long)]
    pub cancellation_fee: Option<f64>,
    #[arg(long)]
    pub annual_cap: Option<f64>,
}

#[derive(Subcommand)]
pub enum CommissionCommand {
    /// Tier × mode matrix.
    Matrix,
    /// Flat list of structures, optionally filtered by the server.
    List {
        #[arg(long)]
        mode: Option<CommissionMode>,
        #[arg(long)]
        property_type: Option<PropertyType>,
    },
    Tiers,
    Create {
        #[arg(long)]
        property_type: PropertyType,
        #[arg(long)]
        mode: CommissionMode,
        #[arg(long)]
        tier: String,
        #[command(flatten)]
        shares: ShareArgs,
    },
    /// Edit a structure. EPC-assisted legs edit their partner-finance record.
    Edit {
        id: String,
        #[command(flatten)]
        shares: ShareArgs,
    },
    Delete {
        id: String,
    },
    CreateTier {
        label: String,
        #[arg(long)]
        min: f64,
        #[arg(long)]
        max: Option<f64>,
        #[arg(long, default_value_t = 0)]
        order: i32,
    },
    /// Change a tier; only the given fields are overwritten.
    EditTier {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        min: Option<f64>,
        #[arg(long)]
        max: Option<f64>,
        #[arg(long)]
        order: Option<i32>,
    },
    DeleteTier {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum BonusCommand {
    List,
    /// Which range a value falls in.
    Lookup {
        bonus_type: BonusType,
        value: f64,
    },
    Create {
        bonus_type: BonusType,
        #[arg(long)]
        min: f64,
        #[arg(long)]
        max: Option<f64>,
        #[arg(long)]
        percent: Option<f64>,
        #[arg(long)]
        flat: Option<f64>,
        #[arg(long)]
        description: Option<String>,
    },
    Edit {
        id: String,
        #[arg(long)]
        min: Option<f64>,
        #[arg(long)]
        max: Option<f64>,
        #[arg(long)]
        percent: Option<f64>,
        #[arg(long)]
        flat: Option<f64>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum PayoutCommand {
    List {
        #[arg(long)]
        status: Option<PayoutStatus>,
    },
    Show {
        id: String,
    },
    Approve {
        id: String,
    },
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand)]
pub enum GroupCommand {
    List,
    Show {
        id: String,
    },
    Create {
        name: String,
        #[arg(long)]
        wregis_id: Option<String>,
        #[arg(long)]
        dcarbon_id: Option<String>,
    },
    Rename {
        id: String,
        name: String,
    },
    Delete {
        id: String,
    },
    /// Add facilities to a group; ids already present are skipped.
    Add {
        id: String,
        #[arg(required = true)]
        facility_ids: Vec<String>,
    },
    Remove {
        id: String,
        facility_id: String,
    },
}

#[derive(Subcommand)]
pub enum FacilityCommand {
    /// Document checklist and whether the facility can be verified.
    Checklist {
        kind: FacilityKind,
        id: String,
    },
    Approve {
        kind: FacilityKind,
        id: String,
        document: String,
    },
    Reject {
        kind: FacilityKind,
        id: String,
        document: String,
        #[arg(long)]
        reason: String,
    },
    Verify {
        kind: FacilityKind,
        id: String,
    },
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = 10)]
    pub limit: u32,
    /// Case-insensitive match on name, email and contact fields.
    #[arg(long)]
    pub query: Option<String>,
    #[arg(long)]
    pub status: Option<AccountStatus>,
}

#[derive(Subcommand)]
pub enum PartnerCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long = "type")]
        partner_type: Option<PartnerType>,
    },
    Create {
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long = "type")]
        partner_type: PartnerType,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long = "type")]
        partner_type: Option<PartnerType>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        status: Option<AccountStatus>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum InstallerCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    Create {
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        license: Option<String>,
        #[arg(long = "area")]
        service_areas: Vec<String>,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        license: Option<String>,
        /// Replaces the service areas when given.
        #[arg(long = "area")]
        service_areas: Vec<String>,
        #[arg(long)]
        status: Option<AccountStatus>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum UtilityCommand {
    Providers,
    Requests,
    CreateProvider {
        name: String,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        documentation: Option<String>,
    },
    EditProvider {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        documentation: Option<String>,
        #[arg(long)]
        status: Option<AccountStatus>,
    },
    DeleteProvider {
        id: String,
    },
    ApproveRequest {
        id: String,
    },
    RejectRequest {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum AuthCommand {
    List,
    /// Start a Green Button authorization and print the URL to open.
    Start {
        #[arg(long)]
        email: String,
        #[arg(long)]
        utility: String,
        #[arg(long)]
        facility_id: Option<String>,
        /// Poll until the authorization completes.
        #[arg(long, default_value_t = false)]
        watch: bool,
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
    },
    Watch {
        id: String,
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
    },
    Delete {
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_wire_and_kebab_enum_names() {
        let cli = Cli::try_parse_from([
            "dcarbon",
            "--token",
            "t",
            "commission",
            "list",
            "--mode",
            "epc-assisted-finance",
            "--property-type",
            "COMMERCIAL",
        ])
        .unwrap();
        match cli.command {
            Command::Commission {
                command:
                    CommissionCommand::List {
                        mode,
                        property_type,
                    },
            } => {
                assert_eq!(mode, Some(CommissionMode::EpcAssistedFinance));
                assert_eq!(property_type, Some(PropertyType::Commercial));
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn partner_edit_takes_optional_fields() {
        let cli = Cli::try_parse_from([
            "dcarbon",
            "partner",
            "edit",
            "p7",
            "--status",
            "INACTIVE",
            "--type",
            "finance-company",
        ])
        .unwrap();
        match cli.command {
            Command::Partner {
                command:
                    PartnerCommand::Edit {
                        id,
                        name,
                        partner_type,
                        status,
                        ..
                    },
            } => {
                assert_eq!(id, "p7");
                assert_eq!(name, None);
                assert_eq!(partner_type, Some(PartnerType::FinanceCompany));
                assert_eq!(status, Some(AccountStatus::Inactive));
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn reject_needs_a_reason_flag() {
        let cli = Cli::try_parse_from(["dcarbon", "payout", "reject", "p1"]);
        assert!(cli.is_err());
    }
}
