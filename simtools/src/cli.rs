use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "simtools", about = "Operator tooling for the SIM payment gateway", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect a new order interactively and print its pay link
    NewOrder,
    /// List the most recent orders
    Orders {
        /// Maximum number of orders to show
        #[arg(short, long, default_value_t = 25)]
        limit: i64,
        /// Only show orders for this buyer id
        #[arg(short, long)]
        buyer: Option<i64>,
    },
    /// Show one order in full
    Show {
        /// The provider-facing order id
        order_id: i64,
    },
    /// Print the hosted-payment-page link for an existing order
    Paylink {
        order_id: i64,
    },
    /// Record an uploaded transfer receipt against an order
    Receipt {
        order_id: i64,
        /// Opaque reference of the receipt image
        receipt_ref: String,
        /// Name of the settlement channel the buyer used
        #[arg(short, long, default_value = "manual transfer")]
        method: String,
    },
    /// Approve the uploaded receipt: the order becomes paid
    Confirm {
        order_id: i64,
        /// Operator id to act as; defaults to the first configured operator
        #[arg(short, long)]
        operator: Option<i64>,
    },
    /// Reject the uploaded receipt: the buyer may resubmit
    Reject {
        order_id: i64,
        /// Operator id to act as; defaults to the first configured operator
        #[arg(short, long)]
        operator: Option<i64>,
    },
    /// Force an order into a specific status, bypassing the transition guards. Last resort for cleaning up after
    /// provider incidents; the regular confirm/reject commands are almost always what you want.
    SetStatus {
        order_id: i64,
        /// One of: pending, awaiting_confirmation, paid, payment_rejected
        status: String,
    },
    /// List the active manual payment methods from the catalog
    Methods,
}
