use clap::{Parser, Subcommand};

pub fn parse_lookback_days(value: &str) -> Result<u32, String> {
    zuno_client::config::parse_lookback_days(value)
        .ok_or_else(|| "lookback must be a positive whole number of days".to_string())
}

/// Extended help shown after `zuno audit --help`.
pub const AUDIT_AFTER_HELP: &str = "\
How the audit works:
  Transactions are grouped by merchant, or by merchant plus the first
  product's external_id when one is present. Any group charged at least
  twice is reported with its average gap, cadence, and risk level.

  Accepted formats:
    JSON  one top-level array of transaction objects
    JSON  an object with a `transactions` (or `data.transactions`) array
    CSV   one header row with the field names below

  <path> is a local file path. Use `-` to read stdin.
  Example: cat purchases.json | zuno audit - --json

Transaction schema:
  JSON example:
  [
    {
      \"datetime\": \"2026-01-15T09:30:00Z\",
      \"merchant\": { \"id\": 44, \"name\": \"Amazon\" },
      \"price\": { \"total\": \"24.50\" },
      \"products\": [{ \"external_id\": \"B07COFFEE\", \"name\": \"Coffee\" }]
    }
  ]

  CSV example:
  datetime,merchant_id,merchant_name,price_total,product_external_id,product_name
  2026-01-15T09:30:00Z,44,Amazon,24.50,B07COFFEE,Coffee

  Required: datetime (or `ts` in JSON), merchant name.
  Rows missing either are skipped and counted, never fatal.

Cadence and risk:
  average gap <= 7 days Weekly, <= 14 Bi-weekly, <= 35 Monthly,
  <= 70 Bi-monthly, otherwise Quarterly.
  6+ charges at <= 35 days is high risk, 3+ is medium, anything else low.

Settings (flags win over environment):
  ZUNO_LOOKBACK_DAYS           default 90, or `all`
  ZUNO_COST_STRATEGY           flat (default) or observed
  ZUNO_MERCHANT_NORMALIZATION  verbatim (default) or canonical
";

#[derive(Debug, Parser)]
#[command(
    name = "zuno",
    version,
    about = "subscription audit for purchase history",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Log analyzer decisions to stderr (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find recurring charges in a transaction export
    #[command(after_help = AUDIT_AFTER_HELP)]
    Audit {
        /// Transaction file (JSON or CSV), or `-` for stdin
        path: Option<String>,
        /// Only consider charges from the last N days
        #[arg(long, value_parser = parse_lookback_days, conflicts_with = "all_history")]
        lookback_days: Option<u32>,
        /// Consider every charge regardless of age
        #[arg(long)]
        all_history: bool,
        /// Reference instant for the lookback window (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        now: Option<String>,
        /// Group merchants case- and whitespace-insensitively
        #[arg(long)]
        normalize_merchants: bool,
        /// How monthly cost is estimated per subscription
        #[arg(long, value_parser = ["flat", "observed"])]
        cost_strategy: Option<String>,
        /// Order of reported subscriptions
        #[arg(long, value_parser = ["input", "first-seen", "occurrences", "risk", "merchant"])]
        sort: Option<String>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
    /// Preview the audit using bundled sample purchases
    #[command(arg_required_else_help = true)]
    Demo {
        #[command(subcommand)]
        command: DemoCommand,
    },
    /// Draft a cancellation email for a subscription
    Cancel {
        /// Merchant to contact
        merchant: String,
        /// Product being cancelled, when it differs from the merchant
        #[arg(long)]
        product: Option<String>,
        /// Name to sign the request with
        #[arg(long)]
        user: Option<String>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum DemoCommand {
    /// Run the subscription audit over sample purchases
    Audit {
        /// Reference instant the sample data is dated against
        #[arg(long)]
        now: Option<String>,
        /// Emit structured JSON object output for machine parsing
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
