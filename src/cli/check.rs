use std::path::Path;

use crate::cli::output;
use crate::config::Config;
use crate::error::Result;

/// Validate configuration file without starting any workers.
pub fn execute_config<P: AsRef<Path>>(config_path: P) -> Result<Config> {
    let path = config_path.as_ref();
    let config = Config::load(path)?;

    output::section("Configuration Check");
    output::field("Config", path.display());
    output::success("Configuration file is valid");

    let strategy = &config.strategy;
    output::section("Strategy");
    output::field("Buy amount", strategy.buy_amount);
    output::field("Profit target", strategy.profit_target);
    output::field("Max loss", strategy.max_loss);
    output::field("Min trade", strategy.min_trade_amount);
    output::field("Gate history", strategy.gate.min_history);
    output::field("Entry history", strategy.entry.min_history);

    let timing = &config.timing;
    output::section("Timing");
    output::field("Gate throttle", format!("{}s", timing.gate_throttle_secs));
    output::field("Buy timeout", format!("{}s", timing.buy_timeout_secs));
    output::field("Buy retry", format!("{}s", timing.buy_retry_secs));
    output::field("Sell retry", format!("{}s", timing.sell_retry_secs));
    output::field("Chart max age", format!("{}s", timing.chart_max_age_secs));

    output::section("Pairs");
    for pair in &config.pairs {
        output::field("Pair", pair);
    }
    if strategy.buy_amount < strategy.min_trade_amount * rust_decimal::Decimal::TWO {
        output::warning("Buy amount leaves little room above the minimum trade size");
    }

    output::success("Configuration check complete");
    Ok(config)
}
