//! One-shot run of the macro pipeline. Prints the report the `/macro` endpoint would serve.
//!
//! Unlike the endpoint, failures are reported as errors here instead of the neutral fallback.

use anyhow::Context;
use macro_feed_lib::config::Config;
use macro_feed_lib::routes::macro_feed::compute_macro;
use macro_feed_lib::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    macro_feed_lib::init_tracing();

    let config = Config::from_env();
    println!("FRED key loaded: {} chars", config.fred_api_key.as_deref().map_or(0, str::len));

    let state = AppState::new(config);
    let report = compute_macro(&state)
        .await
        .context("computing macro report")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
