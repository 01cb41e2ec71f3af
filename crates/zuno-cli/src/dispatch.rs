use zuno_client::commands;
use zuno_client::commands::audit::AuditRunOptions;
use zuno_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, DemoCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Audit {
            path,
            lookback_days,
            all_history,
            now,
            normalize_merchants,
            cost_strategy,
            sort,
            json: _,
        } => commands::audit::run_with_options(AuditRunOptions {
            path: path.clone(),
            now: now.clone(),
            lookback_days: *lookback_days,
            all_history: *all_history,
            cost_strategy: cost_strategy.clone(),
            normalize_merchants: *normalize_merchants,
            sort: sort.clone(),
            stdin_override: None,
            env_override: None,
        }),
        Commands::Demo { command } => match command {
            DemoCommand::Audit { now, .. } => commands::demo::run_at(now.as_deref()),
        },
        Commands::Cancel {
            merchant,
            product,
            user,
            ..
        } => commands::cancel::run(merchant, product.as_deref(), user.as_deref()),
    }
}
