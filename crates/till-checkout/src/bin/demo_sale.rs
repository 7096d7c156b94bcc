//! # Demo Sale
//!
//! Rings up one sale against the in-memory backend and prints the receipt.
//!
//! ## Usage
//! ```bash
//! # Cash sale with the default basket
//! cargo run -p till-checkout --bin demo-sale
//!
//! # UPI sale with a 10% store discount
//! cargo run -p till-checkout --bin demo-sale -- --method upi --reference UPI-7731 --percent 10
//!
//! # Use a specific config file
//! cargo run -p till-checkout --bin demo-sale -- --config ./checkout.toml
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use till_checkout::{init_tracing, CheckoutConfig, CheckoutSession, InMemoryBackend};
use till_core::{
    AuthenticatedOperator, DiscountKind, Money, PaymentMethod, Receipt, Role, SessionContext,
};

const DEMO_STORE: &str = "store-demo";

/// Codes scanned by the demo, with quantities.
const BASKET: &[(&str, i64)] = &[
    ("5449000000996", 2),  // Coca-Cola 330ml
    ("SNK-LAYS-52", 3),    // Lays Classic
    ("8906001200113", 1),  // Basmati Rice 5kg
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut method = PaymentMethod::Cash;
    let mut reference: Option<String> = None;
    let mut percent: i64 = 0;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--method" | "-m" => {
                if i + 1 < args.len() {
                    method = parse_method(&args[i + 1])
                        .ok_or_else(|| format!("Unknown payment method: {}", args[i + 1]))?;
                    i += 1;
                }
            }
            "--reference" | "-r" => {
                if i + 1 < args.len() {
                    reference = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--percent" | "-p" => {
                if i + 1 < args.len() {
                    percent = args[i + 1].parse().unwrap_or(0);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Till POS Demo Sale");
                println!();
                println!("Usage: demo-sale [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>       checkout.toml to load");
                println!("  -m, --method <METHOD>     cash | upi | credit_card | debit_card | wallet");
                println!("  -r, --reference <REF>     Payment reference (required for non-cash)");
                println!("  -p, --percent <N>         Store-wide discount in whole percent");
                println!("  -h, --help                Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = CheckoutConfig::load_or_default(config_path);
    let operator = AuthenticatedOperator {
        operator_id: "op-demo".to_string(),
        store_id: DEMO_STORE.to_string(),
        role: Role::Staff,
    };
    let ctx = SessionContext::new(operator, config.store.name.clone());
    let backend = Arc::new(InMemoryBackend::seeded(DEMO_STORE));
    let mut session = CheckoutSession::new(ctx, backend, &config);

    println!("Till POS Demo Sale");
    println!("==================");
    println!("Store: {}", config.store.name);
    println!();

    let listed = session.search_stock("").await?.len();
    println!("Catalog: {} items", listed);

    for (code, qty) in BASKET {
        match session.scan_and_add(code, *qty).await {
            Ok(line) => println!("  + {} x{} @ {}", line.name, line.quantity, line.unit_price),
            Err(e) => println!("  ! {}: {}", code, e),
        }
    }

    if percent > 0 {
        session.set_discount_kind(DiscountKind::Percentage)?;
        session.set_discount_value(percent.saturating_mul(100))?;
    }

    let totals = session.totals();
    println!();
    println!("Subtotal: {}", totals.subtotal);
    println!("Discount: {}", totals.total_discount);
    println!("Total:    {}", totals.grand_total);

    session.begin_checkout()?;
    session.select_payment(method, reference.as_deref())?;
    let receipt = session.submit().await?;

    print_receipt(&receipt);
    Ok(())
}

fn parse_method(value: &str) -> Option<PaymentMethod> {
    PaymentMethod::ALL
        .into_iter()
        .find(|m| m.to_string() == value.to_lowercase())
}

fn print_receipt(receipt: &Receipt) {
    println!();
    println!("{}", receipt.store_name);
    println!("Receipt {}  {}", receipt.receipt_number, receipt.timestamp.format("%Y-%m-%d %H:%M"));
    println!("----------------------------------------");
    for line in &receipt.lines {
        println!(
            "{:<24} {:>3} x {:>7} {:>8}",
            line.name,
            line.quantity,
            Money::from_cents(line.unit_price_cents).to_string(),
            Money::from_cents(line.line_total_cents).to_string()
        );
    }
    println!("----------------------------------------");
    println!("{:<36} {:>8}", "Subtotal", Money::from_cents(receipt.subtotal_cents).to_string());
    println!("{:<36} {:>8}", "Discount", Money::from_cents(receipt.discount_cents).to_string());
    println!("{:<36} {:>8}", "Total", Money::from_cents(receipt.total_cents).to_string());
    println!("Paid by {}", receipt.payment.method);
}
