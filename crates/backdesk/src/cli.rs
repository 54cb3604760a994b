//! Clap derive structures for the `backdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// backdesk -- back-office console for the Backdesk CRM
#[derive(Debug, Parser)]
#[command(
    name = "backdesk",
    version,
    about = "Manage Backdesk CRM records from the command line",
    long_about = "Query and act on the Backdesk CRM back-office:\n\
        compliance call reviews, customer records with bulk label and\n\
        announcement actions, and IB reward configurations.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "BACKDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 's', env = "BACKDESK_SERVER", global = true)]
    pub server: Option<String>,

    /// API token
    #[arg(long, env = "BACKDESK_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BACKDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "BACKDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "BACKDESK_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

// ── Shared list options ──────────────────────────────────────────────

/// Pagination, search, and sorting flags shared by every list command.
#[derive(Debug, Clone, Args)]
pub struct ListOpts {
    /// Page to fetch (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Rows per page
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Free-text search
    #[arg(long, short = 'Q')]
    pub query: Option<String>,

    /// Sort column, optionally suffixed ':desc' (repeatable)
    #[arg(long = "sort")]
    pub sort: Vec<String>,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Review compliance calls
    #[command(alias = "comp", alias = "c")]
    Compliance(ComplianceArgs),

    /// Manage customer records
    #[command(alias = "cus")]
    Customers(CustomersArgs),

    /// Inspect IB reward configurations
    #[command(alias = "rew", alias = "r")]
    Rewards(RewardsArgs),

    /// List customer labels
    Labels,

    /// List announcements
    Announcements,

    /// Export a filtered view to CSV
    Export(ExportArgs),

    /// Manage configuration and stored tokens
    Config(ConfigArgs),
}

// ── Compliance ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ComplianceArgs {
    #[command(subcommand)]
    pub command: ComplianceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ComplianceCommand {
    /// List compliance call reviews
    #[command(alias = "ls")]
    List(ComplianceListArgs),

    /// Delete compliance records
    #[command(alias = "rm")]
    Delete(ComplianceDeleteArgs),
}

#[derive(Debug, Args)]
pub struct ComplianceListArgs {
    #[command(flatten)]
    pub list: ListOpts,

    #[command(flatten)]
    pub filter: ComplianceFilterArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ComplianceFilterArgs {
    /// Filter by review status (pending, approved, rejected, escalated)
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by reviewing agent
    #[arg(long)]
    pub agent: Option<String>,

    /// Only flagged calls
    #[arg(long)]
    pub flagged: bool,

    /// Minimum score (exclusive)
    #[arg(long)]
    pub score_gt: Option<f64>,

    /// Maximum score (exclusive)
    #[arg(long)]
    pub score_lt: Option<f64>,
}

#[derive(Debug, Args)]
pub struct ComplianceDeleteArgs {
    /// Record ids to delete
    #[arg(long = "id", required_unless_present = "all_matching")]
    pub ids: Vec<String>,

    /// Delete every record matching the filters instead of listed ids
    #[arg(long, conflicts_with = "ids")]
    pub all_matching: bool,

    /// Free-text search scoping --all-matching
    #[arg(long, short = 'Q')]
    pub query: Option<String>,

    #[command(flatten)]
    pub filter: ComplianceFilterArgs,
}

// ── Customers ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommand,
}

#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List customers
    #[command(alias = "ls")]
    List(CustomersListArgs),

    /// Assign/remove labels on customers in bulk
    Label(CustomersLabelArgs),

    /// Attach an announcement to customers in bulk
    Announce(CustomersAnnounceArgs),

    /// Delete customers
    #[command(alias = "rm")]
    Delete(CustomersDeleteArgs),
}

#[derive(Debug, Args)]
pub struct CustomersListArgs {
    #[command(flatten)]
    pub list: ListOpts,

    #[command(flatten)]
    pub filter: CustomerFilterArgs,
}

#[derive(Debug, Clone, Args)]
pub struct CustomerFilterArgs {
    /// Filter by lifecycle status (lead, active, dormant, closed)
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by country code
    #[arg(long)]
    pub country: Option<String>,

    /// Require a label id (repeatable)
    #[arg(long = "label")]
    pub labels: Vec<String>,

    /// Exclude a label id (repeatable)
    #[arg(long = "exclude-label")]
    pub exclude_labels: Vec<String>,
}

/// Bulk scope flags shared by the customer mutation commands.
#[derive(Debug, Clone, Args)]
pub struct BulkScopeArgs {
    /// Customer ids to target
    #[arg(long = "id", required_unless_present = "all_matching")]
    pub ids: Vec<String>,

    /// Target every customer matching the filters instead of listed ids
    #[arg(long, conflicts_with = "ids")]
    pub all_matching: bool,

    /// Free-text search scoping --all-matching
    #[arg(long, short = 'Q')]
    pub query: Option<String>,

    /// With --all-matching: only the first N rows of the filtered order
    #[arg(long)]
    pub first_n: Option<u32>,
}

#[derive(Debug, Args)]
pub struct CustomersLabelArgs {
    #[command(flatten)]
    pub scope: BulkScopeArgs,

    #[command(flatten)]
    pub filter: CustomerFilterArgs,

    /// Label id to assign (repeatable)
    #[arg(long = "assign")]
    pub assign: Vec<u64>,

    /// Label id to remove (repeatable)
    #[arg(long = "remove")]
    pub remove: Vec<u64>,
}

#[derive(Debug, Args)]
pub struct CustomersAnnounceArgs {
    #[command(flatten)]
    pub scope: BulkScopeArgs,

    #[command(flatten)]
    pub filter: CustomerFilterArgs,

    /// Announcement id to attach
    #[arg(long)]
    pub announcement: u64,
}

#[derive(Debug, Args)]
pub struct CustomersDeleteArgs {
    #[command(flatten)]
    pub scope: BulkScopeArgs,

    #[command(flatten)]
    pub filter: CustomerFilterArgs,
}

// ── Rewards ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RewardsArgs {
    #[command(subcommand)]
    pub command: RewardsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RewardsCommand {
    /// List IB reward configurations
    #[command(alias = "ls")]
    List(RewardsListArgs),
}

#[derive(Debug, Args)]
pub struct RewardsListArgs {
    #[command(flatten)]
    pub list: ListOpts,

    /// Filter by tier name
    #[arg(long)]
    pub tier: Option<String>,

    /// Only active reward configurations
    #[arg(long)]
    pub active: bool,
}

// ── Export ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportEntity {
    Compliance,
    Customers,
    Rewards,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Which view to export
    pub entity: ExportEntity,

    /// Output file (defaults to `{entity}.csv`)
    #[arg(long, short = 'f')]
    pub file: Option<std::path::PathBuf>,

    /// Free-text search
    #[arg(long, short = 'Q')]
    pub query: Option<String>,

    /// Stop after this many rows
    #[arg(long, default_value = "10000")]
    pub limit: u32,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the resolved configuration
    Show,

    /// Store an API token in the OS keyring for a profile
    SetToken {
        /// Profile name
        profile: String,
    },
}
