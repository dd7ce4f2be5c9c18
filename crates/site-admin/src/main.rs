//! site-admin - manage a site configuration store from the terminal.

use clap::Parser;
use site_admin::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_with_filter("site-admin", "warn");

    run(Cli::parse()).await
}
