//! Storefront CLI

use std::{
    io::{self, Write},
    process::ExitCode,
    sync::Arc,
};

use clap::{Args, Parser, Subcommand};
use jiff::Timestamp;
use tabled::{builder::Builder, settings::Style};
use thiserror::Error;
use tracing::error;

use storefront::{
    cart::CartError,
    catalog::{Catalog, CatalogError},
    checkout::{
        CheckoutError, SharedCheckout, Transition,
        form::Field,
        payment::{PaymentReference, WidgetOptions},
    },
    config::{LoggingConfig, OrderLogConfig, PaymentConfig, StoreConfig},
    observability::init_logging,
    order_log::{OrderLogError, OrderLogger, SpreadsheetOrderLogger},
    pricing::TotalPriceError,
    views::{DisplayOptions, Storefront, ViewError},
};

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront catalog and checkout tools", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreConfig,

    #[command(flatten)]
    payment: PaymentConfig,

    #[command(flatten)]
    order_log: OrderLogConfig,

    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn load() -> Self {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::parse()
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the products on sale
    Catalog,

    /// Price a cart
    Quote(CartArgs),

    /// Validate the checkout form and print the payment widget options
    WidgetOptions(OrderArgs),

    /// Send a completed order to the order log
    ReportOrder(ReportArgs),
}

#[derive(Debug, Args)]
struct CartArgs {
    /// Cart line as `ID` or `ID=QTY`; repeat for more products
    #[arg(short, long = "item", value_parser = parse_item, required = true)]
    items: Vec<(String, i64)>,
}

#[derive(Debug, Args)]
struct BuyerArgs {
    /// Buyer name
    #[arg(long, default_value = "")]
    name: String,

    /// Buyer phone number
    #[arg(long, default_value = "")]
    phone: String,

    /// Buyer email
    #[arg(long, default_value = "")]
    email: String,

    /// Delivery address
    #[arg(long, default_value = "")]
    address: String,

    /// Coupon code
    #[arg(long, default_value = "")]
    coupon: String,
}

#[derive(Debug, Args)]
struct OrderArgs {
    #[command(flatten)]
    cart: CartArgs,

    #[command(flatten)]
    buyer: BuyerArgs,
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// Payment reference issued by the provider
    #[arg(long)]
    reference: String,

    #[command(flatten)]
    order: OrderArgs,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Pricing(#[from] TotalPriceError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    OrderLog(#[from] OrderLogError),

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("ORDER_LOG_URL is not configured")]
    OrderLogNotConfigured,

    #[error("payment was not accepted by the checkout")]
    NotCompleted,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::load();

    if let Err(error) = init_logging(&cli.logging) {
        _ = writeln!(io::stderr(), "{error}");

        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "command failed");
            _ = writeln!(io::stderr(), "{error}");

            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let catalog = Arc::new(cli.store.catalog()?);
    let mut out = io::stdout().lock();

    match &cli.command {
        Command::Catalog => write_catalog(&catalog, &mut out)?,
        Command::Quote(args) => quote(&catalog, args, &mut out)?,
        Command::WidgetOptions(args) => widget_options(&cli, catalog, args, &mut out).await?,
        Command::ReportOrder(args) => report_order(&cli, catalog, args, &mut out).await?,
    }

    Ok(())
}

fn write_catalog(catalog: &Catalog, out: &mut impl Write) -> Result<(), CliError> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Price"]);

    for product in catalog.iter() {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.price.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());

    writeln!(out, "{table}")?;

    Ok(())
}

fn quote(catalog: &Arc<Catalog>, args: &CartArgs, out: &mut impl Write) -> Result<(), CliError> {
    let mut storefront = Storefront::new(Arc::clone(catalog), DisplayOptions::default());
    fill_cart(&mut storefront, args)?;

    let summary = storefront
        .catalog_view()
        .map(|view| view.cart().summary(catalog))
        .transpose()?
        .ok_or(ViewError::NotOnCatalog)?;

    summary.write_to(out)?;

    Ok(())
}

async fn widget_options(
    cli: &Cli,
    catalog: Arc<Catalog>,
    args: &OrderArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut storefront = open_storefront(cli, catalog);
    let session = open_checkout(&mut storefront, args).await?;

    let pending = session.lock().await.begin_submit()?;
    let options = WidgetOptions::new(&pending.request, &cli.payment.widget_settings(&cli.store));

    writeln!(out, "{}", options.to_json()?)?;

    Ok(())
}

async fn report_order(
    cli: &Cli,
    catalog: Arc<Catalog>,
    args: &ReportArgs,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let config = cli
        .order_log
        .spreadsheet()
        .ok_or(CliError::OrderLogNotConfigured)?;
    let logger = SpreadsheetOrderLogger::new(config)?;

    let mut storefront = open_storefront(cli, catalog);
    let session = open_checkout(&mut storefront, &args.order).await?;

    let report = {
        let mut checkout = session.lock().await;
        let pending = checkout.begin_submit()?;
        let reference = PaymentReference::new(args.reference.clone());

        if checkout.payment_succeeded(pending.attempt, reference) == Transition::Ignored {
            return Err(CliError::NotCompleted);
        }

        checkout
            .order_report(Timestamp::now())
            .ok_or(CliError::NotCompleted)?
    };

    logger.log_order(report).await?;

    writeln!(out, "order {} logged", args.reference)?;

    Ok(())
}

fn open_storefront(cli: &Cli, catalog: Arc<Catalog>) -> Storefront {
    Storefront::new(
        catalog,
        DisplayOptions {
            form: cli.store.form_options(),
            ..DisplayOptions::default()
        },
    )
}

fn fill_cart(storefront: &mut Storefront, args: &CartArgs) -> Result<(), CliError> {
    let view = storefront.catalog_view().ok_or(ViewError::NotOnCatalog)?;

    for (product, quantity) in &args.items {
        view.set_quantity(product, *quantity)?;
    }

    Ok(())
}

async fn open_checkout(
    storefront: &mut Storefront,
    args: &OrderArgs,
) -> Result<SharedCheckout, CliError> {
    fill_cart(storefront, &args.cart)?;

    let session = storefront.proceed_to_checkout()?;

    {
        let mut checkout = session.lock().await;
        let buyer = &args.buyer;

        for (field, value) in [
            (Field::Name, &buyer.name),
            (Field::Phone, &buyer.phone),
            (Field::Email, &buyer.email),
            (Field::Address, &buyer.address),
            (Field::Coupon, &buyer.coupon),
        ] {
            checkout.update_field(field, value.as_str())?;
        }

        checkout.apply_coupon()?;
    }

    Ok(session)
}

fn parse_item(s: &str) -> Result<(String, i64), String> {
    let Some((id, quantity)) = s.split_once('=') else {
        return Ok((s.to_string(), 1));
    };

    let quantity = quantity
        .parse::<i64>()
        .map_err(|error| format!("invalid quantity in '{s}': {error}"))?;

    if quantity < 0 {
        return Err(format!("quantity must not be negative in '{s}'"));
    }

    Ok((id.to_string(), quantity))
}
