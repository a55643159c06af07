//! Operator CLI for the stakeholder policy
//!
//! Validates a rules file and dry-runs permission checks without a host
//! application, so rule edits can be verified before deployment.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use stakeholder_policy::config::load_rules;
use stakeholder_policy::policy::{Decision, Realm, StakeholderResolver, StaticGroups};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Stakeholder policy - glob-scoped access rules for project stakeholders
#[derive(Parser, Debug)]
#[command(name = "stakeholder-policy")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the stakeholder rules file
    #[arg(short, long, env = "STAKEHOLDER_RULES")]
    rules: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "STAKEHOLDER_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the rules file and print a per-group summary
    Validate,

    /// Dry-run a single permission check against the rules file
    Check {
        /// Identity to check
        #[arg(long)]
        identity: String,

        /// Group the identity belongs to (repeatable)
        #[arg(long = "group")]
        groups: Vec<String>,

        /// Realm of the resource (milestone, wiki, ticket, ...)
        #[arg(long)]
        realm: Realm,

        /// Resource identifier: milestone title, wiki path, or the title of
        /// a ticket's milestone (omit for an unassigned ticket)
        #[arg(long)]
        resource: Option<String>,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    identity: &'a str,
    realm: Realm,
    resource: Option<&'a str>,
    decision: Decision,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let rules_path = shellexpand::tilde(&args.rules).into_owned();

    let config = load_rules(&rules_path)
        .inspect_err(|e| error!(error = %e, path = %rules_path, "failed to load rules"))
        .with_context(|| format!("loading rules from {rules_path}"))?;

    let resolver = StakeholderResolver::new(&config).context("compiling rules")?;

    match args.command {
        Command::Validate => {
            println!("{rules_path}: {} group(s)", config.groups.len());
            for group in &config.groups {
                println!("  [{}]", group.name);
                print_patterns("milestone", &group.milestone);
                print_patterns("wiki", &group.wiki);
            }
        }
        Command::Check {
            identity,
            groups,
            realm,
            resource,
            json,
        } => {
            let membership = StaticGroups::for_identity(&identity, groups);
            let decision = resolver.check(&membership, &identity, realm, resource.as_deref());

            if json {
                let output = CheckOutput {
                    identity: &identity,
                    realm,
                    resource: resource.as_deref(),
                    decision,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{decision}");
            }
        }
    }

    Ok(())
}

fn print_patterns(key: &str, patterns: &[String]) {
    if patterns.is_empty() {
        println!("    {key}: (not configured, abstains)");
    } else {
        println!("    {key} = {}", patterns.join(", "));
    }
}
