//! llm-cost: estimate and compare LLM API costs from a price sheet.
//!
//! Every command prints JSON on stdout; logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use llm_cost_core::config::CostConfig;
use llm_cost_core::observability::setup_logging;
use llm_cost_core::pricing::{PriceSheet, PriceTable};
use llm_cost_core::strategy::{Allocation, AllocationBuilder, MultiModelStrategy};
use llm_cost_core::tokens::analyze;
use llm_cost_core::{
    estimate_tokens, CostCalculator, DailyCost, Strategy, StrategyComparator, UsagePattern,
};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "llm-cost", version, about = "LLM API cost estimation and strategy comparison")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON price sheet (overrides `prices.path` from the config)
    #[arg(long, global = true)]
    prices: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate the token count of a text
    Tokens { text: String },
    /// List priced models in sheet order
    Models,
    /// Price explicit token counts
    Cost {
        #[arg(long)]
        model: String,
        #[arg(long)]
        input: u64,
        #[arg(long)]
        output: u64,
    },
    /// Price a single message
    Message {
        #[arg(long)]
        model: String,
        text: String,
        /// Expected output tokens (defaults to a model-based suggestion)
        #[arg(long)]
        output: Option<u64>,
    },
    /// Project the daily cost of one strategy
    Project {
        /// `model` or `classifier:modelA=60,modelB`
        #[arg(long)]
        strategy: String,
        #[command(flatten)]
        usage: UsageArgs,
    },
    /// Compare two strategies; a positive difference means B is cheaper
    Compare {
        #[arg(long)]
        a: String,
        #[arg(long)]
        b: String,
        #[command(flatten)]
        usage: UsageArgs,
    },
}

#[derive(Args)]
struct UsageArgs {
    #[arg(long, default_value_t = 100)]
    queries: u64,
    #[arg(long, default_value_t = 500)]
    input_tokens: u64,
    #[arg(long, default_value_t = 1.5)]
    ratio: f64,
}

impl UsageArgs {
    fn pattern(&self) -> Result<UsagePattern> {
        Ok(UsagePattern::new(self.queries, self.input_tokens, self.ratio)?)
    }
}

/// Parse `model` or `classifier:modelA=60,modelB=30,modelC`.
///
/// A trailing specialist without `=` takes the remaining share.
fn parse_strategy(text: &str) -> Result<Strategy> {
    let Some((classifier, routes)) = text.split_once(':') else {
        let model = text.trim();
        if model.is_empty() {
            bail!("empty strategy");
        }
        return Ok(Strategy::single(model));
    };

    let items: Vec<&str> = routes.split(',').map(str::trim).collect();
    let (last, prefix) = match items.split_last() {
        Some(split) => split,
        None => bail!("strategy '{}' has no specialist models", text),
    };

    if last.contains('=') {
        let allocations = items
            .iter()
            .map(|item| parse_route(item))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Strategy::Multi(MultiModelStrategy::new(classifier.trim(), allocations)));
    }

    let mut builder = AllocationBuilder::new(classifier.trim());
    for item in prefix {
        let route = parse_route(item)?;
        builder = builder.route(route.model, route.percentage)?;
    }
    Ok(Strategy::Multi(builder.finish(*last)))
}

fn parse_route(item: &str) -> Result<Allocation> {
    let (model, pct) = item
        .split_once('=')
        .with_context(|| format!("expected model=percentage, got '{}'", item))?;
    let percentage = pct
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid percentage in '{}'", item))?;
    Ok(Allocation::new(model.trim(), percentage))
}

fn load_prices(path: &Path) -> Result<PriceTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading price sheet {}", path.display()))?;
    let sheet = PriceSheet::from_json_str(&content)?;
    Ok(PriceTable::from_sheet(&sheet)?)
}

fn projection_json(projection: &impl DailyCost, days_per_year: u32) -> Value {
    json!({
        "daily_cost": projection.daily_total(),
        "annual_cost": projection.annual_cost(days_per_year),
        "cost_per_query": projection.cost_per_query().ok(),
    })
}

/// Execute one command. The price sheet is only read by commands that price.
fn run(cli: Cli) -> Result<Value> {
    let config = match &cli.config {
        Some(path) => CostConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CostConfig::default(),
    };
    setup_logging(&config.logging);

    let prices = cli.prices.clone().or_else(|| config.prices.path.clone());
    let calculator = || -> Result<CostCalculator> {
        let path = prices
            .as_deref()
            .context("no price sheet given; pass --prices or set prices.path in the config")?;
        Ok(CostCalculator::new(Arc::new(load_prices(path)?)))
    };
    let days = config.comparator.days_per_year;

    let output = match cli.command {
        Command::Tokens { text } => {
            json!({ "tokens": estimate_tokens(&text), "breakdown": analyze(&text) })
        }
        Command::Models => json!(calculator()?.pricing_table().models()),
        Command::Cost {
            model,
            input,
            output,
        } => json!(calculator()?.calculate_cost(&model, input, output)?),
        Command::Message {
            model,
            text,
            output,
        } => json!(calculator()?.estimate_message(&model, &text, output)?),
        Command::Project { strategy, usage } => {
            let comparator = StrategyComparator::new(calculator()?, config.comparator.clone());
            let projection = comparator.project(&parse_strategy(&strategy)?, &usage.pattern()?)?;
            json!({
                "projection": projection,
                "summary": projection_json(&projection, days),
            })
        }
        Command::Compare { a, b, usage } => {
            let comparator = StrategyComparator::new(calculator()?, config.comparator.clone());
            let usage = usage.pattern()?;
            let (pa, pb, cmp) =
                comparator.compare(&parse_strategy(&a)?, &parse_strategy(&b)?, &usage)?;
            json!({
                "a": { "projection": pa, "summary": projection_json(&pa, days) },
                "b": { "projection": pb, "summary": projection_json(&pb, days) },
                "difference": cmp.difference,
                "difference_pct": cmp.difference_pct().ok(),
                "annual_difference": cmp.annual_difference(days),
                "difference_per_query": cmp.difference_per_query(usage.queries_per_day).ok(),
                "b_is_cheaper": cmp.candidate_is_cheaper(),
            })
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    let output = run(Cli::parse())?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single() {
        assert_eq!(parse_strategy("gpt-4").unwrap(), Strategy::single("gpt-4"));
        assert!(parse_strategy("  ").is_err());
    }

    #[test]
    fn test_parse_multi_derives_last_share() {
        let strategy = parse_strategy("gpt-4o-mini:gpt-4=60,claude-3-haiku").unwrap();
        match strategy {
            Strategy::Multi(multi) => {
                assert_eq!(multi.classifier, "gpt-4o-mini");
                assert_eq!(
                    multi.allocations,
                    vec![Allocation::new("gpt-4", 60), Allocation::new("claude-3-haiku", 40)]
                );
            }
            other => panic!("expected multi strategy, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_multi_explicit_shares() {
        let strategy = parse_strategy("c:a=70,b=20").unwrap();
        match strategy {
            Strategy::Multi(multi) => assert_eq!(multi.total_percentage().unwrap(), 90),
            other => panic!("expected multi strategy, got {:?}", other),
        }
    }

    #[test]
    fn test_tokens_needs_no_price_sheet() {
        let output = run(Cli::parse_from(["llm-cost", "tokens", "Hello, world!"])).unwrap();
        assert_eq!(output["tokens"], 3);
        assert_eq!(output["breakdown"]["punctuation"], 2);
    }

    #[test]
    fn test_pricing_commands_need_a_price_sheet() {
        let result = run(Cli::parse_from(["llm-cost", "models"]));
        assert!(result.unwrap_err().to_string().contains("no price sheet"));
    }

    #[test]
    fn test_parse_rejects_bad_routes() {
        assert!(parse_strategy("c:a=abc,b").is_err());
        assert!(parse_strategy("c:a=80,b=30,d").is_err());
        assert!(parse_strategy("c:a,b").is_err());
    }
}
