//! Operator tooling for the SIM payment gateway.
//!
//! `simtools` is the stand-in for the conversational UI: it collects new orders step by step, generates pay
//! links, and gives the operator set a terminal for the manual payment flow (inspecting orders, confirming or
//! rejecting receipts). It talks to the same SQLite store as the server, through the same flow API.
mod cli;
mod display;
mod order_draft;

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use log::debug;
use prettytable::{row, Table};
use sim_catalog::Catalog;
use sim_payment_engine::{
    db_types::{FulfilmentMode, Order, OrderId, OrderStatus, TariffSnapshot},
    db_url,
    events::EventProducers,
    helpers::payment_link,
    traits::OrderDatabase,
    OrderFlowApi,
    SqliteDatabase,
};
use sim_payment_server::config::ServerConfig;

use crate::{
    cli::{Cli, Commands},
    display::{print_order_details, print_orders},
    order_draft::OrderDraft,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();
    let config = ServerConfig::from_env_or_default();
    match cli.command {
        Commands::NewOrder => new_order(&config).await,
        Commands::Orders { limit, buyer } => list_orders(&config, limit, buyer).await,
        Commands::Show { order_id } => show_order(&config, order_id).await,
        Commands::Paylink { order_id } => paylink(&config, order_id).await,
        Commands::Receipt { order_id, receipt_ref, method } => receipt(&config, order_id, &receipt_ref, &method).await,
        Commands::Confirm { order_id, operator } => resolve(&config, order_id, operator, true).await,
        Commands::Reject { order_id, operator } => resolve(&config, order_id, operator, false).await,
        Commands::SetStatus { order_id, status } => set_status(&config, order_id, &status).await,
        Commands::Methods => methods(),
    }
}

async fn open_api(config: &ServerConfig) -> Result<OrderFlowApi<SqliteDatabase>> {
    let url = if config.database_url.is_empty() { db_url() } else { config.database_url.clone() };
    let db = SqliteDatabase::new_with_url(&url, 5).await.context("Could not open the orders database")?;
    db.migrate().await.context("Could not migrate the orders database")?;
    Ok(OrderFlowApi::new(db, EventProducers::default(), &config.operator_ids))
}

fn load_catalog() -> Result<Catalog> {
    let path = std::env::var("SPG_CATALOG_PATH").unwrap_or_else(|_| "data/catalog.json".to_string());
    debug!("Loading catalog from {path}");
    Catalog::load(&path).context("Could not load the product catalog")
}

async fn new_order(config: &ServerConfig) -> Result<()> {
    let catalog = load_catalog()?;
    let theme = ColorfulTheme::default();

    let operators = catalog.operators();
    ensure!(!operators.is_empty(), "The catalog has no operators");
    let names = operators.iter().map(|o| o.name.as_str()).collect::<Vec<_>>();
    let idx = Select::with_theme(&theme).with_prompt("Operator").items(&names).default(0).interact()?;
    let operator = &operators[idx];

    let tariffs = catalog.public_tariffs_for_operator(operator.id);
    ensure!(!tariffs.is_empty(), "{} has no public tariffs", operator.name);
    let labels = tariffs
        .iter()
        .map(|t| {
            let fee = t.monthly_fee.map(|f| format!("{f}/mo")).unwrap_or_else(|| "no monthly fee".to_string());
            format!("{} — {fee}, connection {}", t.name, t.connection_price)
        })
        .collect::<Vec<_>>();
    let idx = Select::with_theme(&theme).with_prompt("Tariff").items(&labels).default(0).interact()?;
    let tariff = tariffs[idx];

    let mut draft = OrderDraft::new();
    let buyer_id: i64 = Input::with_theme(&theme).with_prompt("Buyer id").interact_text()?;
    let username: String =
        Input::with_theme(&theme).with_prompt("Username (empty for none)").allow_empty(true).interact_text()?;
    draft.buyer(buyer_id, (!username.is_empty()).then_some(username));
    draft.tariff(TariffSnapshot {
        tariff_id: tariff.id,
        tariff_name: tariff.name.clone(),
        operator_id: operator.id,
        operator_name: operator.name.clone(),
        monthly_fee: tariff.monthly_fee,
        connection_price: tariff.connection_price,
    });

    let modes = ["Transfer an existing number", "Issue a new number"];
    let idx = Select::with_theme(&theme).with_prompt("Fulfilment").items(&modes).default(0).interact()?;
    draft.mode(if idx == 0 { FulfilmentMode::Transfer } else { FulfilmentMode::New });
    if draft.needs_transfer_phone() {
        let phone: String = Input::with_theme(&theme).with_prompt("Phone number to transfer").interact_text()?;
        draft.transfer_phone(&phone);
    }

    let full_name: String = Input::with_theme(&theme).with_prompt("Full name").interact_text()?;
    let region_city: String = Input::with_theme(&theme).with_prompt("Region / city").interact_text()?;
    draft.identity(&full_name, &region_city);
    let photo_1: String =
        Input::with_theme(&theme).with_prompt("Document photo reference (main page)").interact_text()?;
    let photo_2: String =
        Input::with_theme(&theme).with_prompt("Document photo reference (registration page)").interact_text()?;
    draft.documents(&photo_1, &photo_2);

    let order = draft.complete()?;
    let prompt = format!("Create order for {} ({}) at {}?", order.tariff_name, order.operator_name, order.connection_price);
    if !Confirm::with_theme(&theme).with_prompt(prompt).default(true).interact()? {
        println!("Aborted. Nothing was created.");
        return Ok(());
    }

    let api = open_api(config).await?;
    let order = api.create_order(order).await?;
    println!("Created order {}.", order.order_id);
    print_pay_link(config, &order);
    println!("For a manual bank transfer, run `simtools methods` to list the settlement channels.");
    Ok(())
}

async fn list_orders(config: &ServerConfig, limit: i64, buyer: Option<i64>) -> Result<()> {
    let api = open_api(config).await?;
    let orders = match buyer {
        Some(buyer_id) => api.orders_for_buyer(buyer_id).await?,
        None => api.recent_orders(limit).await?,
    };
    print_orders(&orders);
    Ok(())
}

async fn show_order(config: &ServerConfig, order_id: i64) -> Result<()> {
    let api = open_api(config).await?;
    match api.order_by_id(OrderId(order_id)).await? {
        Some(order) => print_order_details(&order),
        None => bail!("Order #{order_id} does not exist"),
    }
    Ok(())
}

async fn paylink(config: &ServerConfig, order_id: i64) -> Result<()> {
    let api = open_api(config).await?;
    let Some(order) = api.order_by_id(OrderId(order_id)).await? else {
        bail!("Order #{order_id} does not exist");
    };
    print_pay_link(config, &order);
    Ok(())
}

fn print_pay_link(config: &ServerConfig, order: &Order) {
    let credentials = config.robokassa.credentials();
    // The provider echoes these back on the result callback
    let passthrough = vec![
        ("Shp_tariff".to_string(), order.tariff_id.to_string()),
        ("Shp_user".to_string(), order.buyer_id.to_string()),
    ];
    let description = format!("{}: {} connection", order.operator_name, order.tariff_name);
    let url = payment_link(&credentials, order.order_id, order.connection_price, &description, &passthrough);
    println!("Pay link for order {}:\n{url}", order.order_id);
}

async fn receipt(config: &ServerConfig, order_id: i64, receipt_ref: &str, method: &str) -> Result<()> {
    let api = open_api(config).await?;
    let order = api.submit_receipt(OrderId(order_id), receipt_ref, method).await?;
    println!("Receipt recorded. Order {} is now {}.", order.order_id, order.status);
    Ok(())
}

async fn resolve(config: &ServerConfig, order_id: i64, operator: Option<i64>, approve: bool) -> Result<()> {
    let operator_id = operator
        .or_else(|| config.operator_ids.first().copied())
        .context("No operator id given and SPG_OPERATOR_IDS is empty")?;
    let api = open_api(config).await?;
    let order = if approve {
        api.confirm_order(OrderId(order_id), operator_id).await?
    } else {
        api.reject_order(OrderId(order_id), operator_id).await?
    };
    println!("Order {} is now {}.", order.order_id, order.status);
    Ok(())
}

async fn set_status(config: &ServerConfig, order_id: i64, status: &str) -> Result<()> {
    let status: OrderStatus = status.parse()?;
    let api = open_api(config).await?;
    let updated = api.db().set_order_status(OrderId(order_id), status).await?;
    ensure!(updated, "Order #{order_id} does not exist");
    println!("Order #{order_id} forced to {status}.");
    Ok(())
}

fn methods() -> Result<()> {
    let catalog = load_catalog()?;
    let methods = catalog.active_payment_methods();
    if methods.is_empty() {
        println!("No active payment methods in the catalog.");
        return Ok(());
    }
    let mut table = Table::new();
    table.add_row(row!["Id", "Name", "Details"]);
    for method in methods {
        table.add_row(row![method.id, method.name, method.details]);
    }
    table.printstd();
    Ok(())
}
