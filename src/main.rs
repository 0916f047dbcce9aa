use std::sync::Arc;

use anyhow::Context;

use survey_funnel::config::FunnelConfig;
use survey_funnel::terminal::{self, TerminalNavigator};
use survey_funnel::wizard::{BudgetRule, StepCatalog, WizardDeps, WizardManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = FunnelConfig::from_env().context("Failed to read funnel configuration")?;
    let host = config.host_context();

    let catalog = Arc::new(StepCatalog::funnel_default());
    let budget_rule =
        BudgetRule::funnel_default(&catalog).context("Default catalog has no budget tiers")?;
    let transport = config.build_transport();

    eprintln!("📋 Survey Funnel v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Host: {} ({})", host, config.host_path);
    match config.relay {
        Some(ref relay) => eprintln!("   Relay: {} (event {})", relay.endpoint, config.event_name),
        None => eprintln!("   Relay: disabled (set FUNNEL_RELAY_URL)"),
    }
    eprintln!("   Booking: {}", config.redirects.booking);
    eprintln!("   Soft landing: {}", config.redirects.soft_landing);
    eprintln!("   Type a number to pick an option, /next to continue, /quit to exit.\n");

    let deps = WizardDeps {
        catalog,
        budget_rule,
        targets: config.redirects.clone(),
        event_name: config.event_name.clone(),
        transport,
        navigator: Arc::new(TerminalNavigator),
    };
    let manager = WizardManager::new(deps, host, config.identity.as_ref());

    match terminal::run(manager).await.context("Terminal host failed")? {
        Some(report) => eprintln!(
            "   Submitted ({}, delivered: {})",
            report.destination, report.delivered
        ),
        None => eprintln!("   Survey aborted, nothing was sent."),
    }

    Ok(())
}
