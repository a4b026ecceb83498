// crates/fa_cli/src/args.rs
//
// Argument surface of `fee-alloc`. Global flags select the data directory and
// configuration overrides; each subcommand maps onto one engine operation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use fa_core::variables::UtilityRule;

/// Parsed CLI arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "fee-alloc",
    version,
    disable_help_subcommand = true,
    about = "Fee allocation for a multi-block residential complex"
)]
pub struct Args {
    /// Data directory holding units.json, expenses.json, blocks.json, ...
    #[arg(long, global = true, env = "FEE_ALLOC_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Override the utility rule for electricity, water and miscellaneous.
    #[arg(long, global = true, value_parser = parse_utility_rule)]
    pub utility_rule: Option<UtilityRule>,

    /// Override the exemplar unit number used by the expense detail table.
    #[arg(long, global = true)]
    pub exemplar_unit: Option<u32>,

    /// Only log warnings and errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compute fees for a block and period and cache the result.
    Compute {
        /// Block letter, e.g. `A`.
        block: String,
        /// Billing period `YYYY-MM`; defaults to the current month.
        #[arg(long)]
        period: Option<String>,
        /// Restrict the response to one unit (not cached).
        #[arg(long)]
        unit: Option<u32>,
    },

    /// List block descriptors with complex statistics.
    Blocks,

    /// Export a report as CSV.
    Export {
        /// unit-detail | block-summary | expense-detail
        kind: String,
        /// Billing period `YYYY-MM`.
        period: String,
        #[arg(long)]
        block: Option<String>,
        /// Write the CSV here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Report whether expense data exists for a period.
    Check {
        period: Option<String>,
        #[arg(long)]
        block: Option<String>,
    },

    /// Submit a resident notification registration.
    Register {
        phone: String,
        apartment: String,
        building: String,
        #[arg(long)]
        source: Option<String>,
    },
}

pub fn parse_utility_rule(s: &str) -> Result<UtilityRule, String> {
    s.trim()
        .parse::<UtilityRule>()
        .map_err(|_| format!("unknown utility rule {s:?} (expected equal_split or floor_area)"))
}
