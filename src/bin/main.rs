//! Fractional Wallet CLI - session and transaction interface
//!
//! Session:
//!   fractional-wallet connect              → {"account": {...}, "connecting": false, "lastError": null}
//!   fractional-wallet status               → restored session state
//!   fractional-wallet disconnect           → cleared session state
//!
//! Transactions:
//!   fractional-wallet submit <json>        → {"success": true, "digest": "0x...", ...}
//!   fractional-wallet invest <asset> <amount>
//!   fractional-wallet contribute <pool> <amount>
//!
//! Catalog:
//!   fractional-wallet assets | pools
//!
//! Server:
//!   fractional-wallet serve --port 8080
//!
//! A native process has no injected wallet, so everything past `connect`
//! needs `--simulated` (or FRACTIONAL_SIMULATED=1).

use anyhow::{anyhow, bail, Context};
use fractional_wallet::catalog;
use fractional_wallet::logging::init_logging;
use fractional_wallet::runtime::shutdown_signal;
use fractional_wallet::server::create_router_with_name;
use fractional_wallet::{FileFlag, InjectedBindings, MinorUnits, SessionContext, TransactionRequest, WalletConfig};
use serde_json::{json, Value};
use std::env;
use std::future::Future;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::{debug, info};

const APP_NAME: &str = "fractional-wallet";

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("connect") => cmd_connect(&opts),
        Some("disconnect") => cmd_disconnect(&opts),
        Some("status") => cmd_status(&opts),
        Some("submit") => cmd_submit(&opts),
        Some("invest") => cmd_invest(&opts),
        Some("contribute") => cmd_contribute(&opts),
        Some("assets") => Ok(json!(catalog::asset_classes())),
        Some("pools") => Ok(json!(catalog::investment_pools())),
        Some("serve") => cmd_serve(&opts),
        Some(cmd) => Err(anyhow!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = opts.pretty || std::io::stdout().is_terminal();
    match result {
        Ok(output) => println!("{}", render(&output, pretty)),
        Err(e) => {
            eprintln!("{}", render(&json!({"error": format!("{:#}", e)}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    let rendered = if pretty { serde_json::to_string_pretty(value) } else { serde_json::to_string(value) };
    rendered.unwrap_or_else(|_| value.to_string())
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    positional: Vec<String>,
    port: Option<u16>,
    simulated: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            match arg.as_str() {
                "--help" | "-h" => opts.help = true,
                "--version" | "-V" => opts.version = true,
                "--pretty" => opts.pretty = true,
                "--simulated" | "-s" => opts.simulated = true,
                "--port" | "-p" => {
                    if i + 1 < args.len() {
                        opts.port = args[i + 1].parse().ok();
                        i += 1;
                    }
                }
                _ if !arg.starts_with('-') => positional.push(arg.clone()),
                _ => {} // Ignore unknown flags
            }
            i += 1;
        }

        if !positional.is_empty() {
            opts.command = Some(positional.remove(0));
        }
        opts.positional = positional;

        if opts.port.is_none() {
            opts.port = env::var("FRACTIONAL_PORT").ok().and_then(|s| s.parse().ok());
        }

        opts
    }

    fn config(&self) -> WalletConfig {
        let config = WalletConfig::from_env();
        if self.simulated { config.with_simulated_fallback(true) } else { config }
    }
}

fn print_usage() {
    println!(
        r#"fractional-wallet - wallet session and transaction interface

USAGE:
    fractional-wallet <command> [args] [options]

COMMANDS:
    connect                         Connect a wallet (persists simulated sessions)
    status                          Restore and print the session
    disconnect                      Clear the session
    submit <json>                   Submit a transaction request
    invest <asset-id> <amount>      Invest in an asset class (amount in SUI)
    contribute <pool-id> <amount>   Contribute to a pool (amount in SUI)
    assets                          List asset classes
    pools                           List investment pools
    serve                           Start HTTP server

OPTIONS:
    --simulated, -s         Allow the simulated wallet (env: FRACTIONAL_SIMULATED)
    --port, -p <port>       Server port (default: 8080, env: FRACTIONAL_PORT)
    --pretty                Pretty-print JSON
    --version, -V           Print version

REQUESTS:
    {{"kind": "registerUser", "riskProfile": 2}}
    {{"kind": "investInAsset", "assetId": "0x123", "amountMinorUnits": 1000000000}}
    {{"kind": "contributeToPool", "poolId": "0xabc", "amountMinorUnits": 500000000}}

EXAMPLES:
    fractional-wallet connect --simulated
    fractional-wallet invest 0x123 1.5 --simulated
    fractional-wallet submit '{{"kind":"registerUser","riskProfile":1}}' --simulated
    fractional-wallet serve --simulated --port 3000
"#
    );
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to create runtime")
}

fn context(opts: &ParsedArgs) -> Arc<SessionContext> {
    let config = opts.config();
    debug!(simulated = config.allow_simulated_fallback, "building session context");
    SessionContext::install(SessionContext::new(
        config,
        Arc::new(InjectedBindings::new()),
        Arc::new(FileFlag::open(APP_NAME)),
    ))
}

/// Run `f` against a restored session.
fn with_session<F, Fut>(opts: &ParsedArgs, f: F) -> anyhow::Result<Value>
where
    F: FnOnce(Arc<SessionContext>) -> Fut,
    Fut: Future<Output = anyhow::Result<Value>>,
{
    let ctx = context(opts);
    runtime()?.block_on(async move {
        ctx.restore_once().await;
        f(ctx).await
    })
}

fn cmd_connect(opts: &ParsedArgs) -> anyhow::Result<Value> {
    with_session(opts, |ctx| async move {
        let state = ctx.connect().await;
        if let Some(err) = &state.last_error {
            bail!("{}", err);
        }
        Ok(json!(state))
    })
}

fn cmd_disconnect(opts: &ParsedArgs) -> anyhow::Result<Value> {
    with_session(opts, |ctx| async move { Ok(json!(ctx.disconnect().await)) })
}

fn cmd_status(opts: &ParsedArgs) -> anyhow::Result<Value> {
    with_session(opts, |ctx| async move { Ok(json!(ctx.state())) })
}

async fn submit(ctx: Arc<SessionContext>, request: TransactionRequest) -> anyhow::Result<Value> {
    let result = ctx.submit(&request).await.context("Transaction failed")?;
    Ok(json!(result))
}

fn cmd_submit(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let raw = opts.positional.join(" ");
    if raw.is_empty() {
        bail!("Request JSON required: fractional-wallet submit <json>");
    }
    let value: Value = serde_json::from_str(&raw).context("Invalid JSON")?;
    let request = TransactionRequest::from_json(value)?;
    with_session(opts, |ctx| submit(ctx, request))
}

fn amount_arg(opts: &ParsedArgs, usage: &str) -> anyhow::Result<(String, MinorUnits)> {
    let [id, amount] = opts.positional.as_slice() else {
        bail!("Usage: fractional-wallet {}", usage);
    };
    Ok((id.clone(), MinorUnits::parse_decimal(amount)?))
}

fn cmd_invest(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let (id, amount) = amount_arg(opts, "invest <asset-id> <amount>")?;
    let asset = catalog::find_asset(&id).ok_or_else(|| anyhow!("Unknown asset: {}", id))?;
    let request = asset.check_investment(amount)?;
    with_session(opts, |ctx| submit(ctx, request))
}

fn cmd_contribute(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let (id, amount) = amount_arg(opts, "contribute <pool-id> <amount>")?;
    let pool = catalog::find_pool(&id).ok_or_else(|| anyhow!("Unknown pool: {}", id))?;
    let request = pool.check_contribution(amount)?;
    with_session(opts, |ctx| submit(ctx, request))
}

fn cmd_serve(opts: &ParsedArgs) -> anyhow::Result<Value> {
    let port = opts.port.unwrap_or(8080);
    let ctx = context(opts);

    runtime()?.block_on(async move {
        ctx.start();

        let router = create_router_with_name(ctx, APP_NAME);
        let addr = format!("0.0.0.0:{}", port);

        info!("Fractional wallet server listening on http://{}", addr);
        info!("Endpoints:");
        info!("  GET  /health              - Health check");
        info!("  GET  /session             - Session state");
        info!("  POST /session/connect     - Connect wallet");
        info!("  POST /transactions        - Submit transaction");
        debug!("  POST /session/disconnect  - Disconnect wallet");
        debug!("  GET  /assets, /pools      - Catalog");

        let listener = tokio::net::TcpListener::bind(&addr).await
            .with_context(|| format!("Failed to bind {}", addr))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        info!("Server stopped");
        Ok(json!({"status": "stopped"}))
    })
}
