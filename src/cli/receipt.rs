use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::common::info;
use crate::config::Context;
use crate::resource::Receipts;
use crate::Result;

#[derive(Args, Debug)]
pub struct ReceiptCommand {
    #[command(subcommand)]
    command: ReceiptSubcommand,
}

#[derive(Subcommand, Debug)]
enum ReceiptSubcommand {
    /// Download the pdf receipt of an order
    Download {
        /// Order id
        order_id: i64,
        /// Output file, defaults to receipt-<order-id>.pdf
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Email the receipt of an order to its buyer
    Send {
        /// Order id
        order_id: i64,
    },
}

impl ReceiptCommand {
    pub async fn run(self, context: &Context) -> Result<()> {
        let receipts = context.client.resource::<Receipts>();

        match self.command {
            ReceiptSubcommand::Download { order_id, output } => {
                let pdf = receipts.download(order_id).await?;
                let output =
                    output.unwrap_or_else(|| PathBuf::from(format!("receipt-{}.pdf", order_id)));
                tokio::fs::write(&output, &pdf).await?;
                info!(path = %output.display(), bytes = pdf.len(), "Receipt saved");
                println!("{}", output.display());
            }
            ReceiptSubcommand::Send { order_id } => {
                let message = receipts.send(order_id).await?;
                println!("{}", message);
            }
        }
        Ok(())
    }
}
