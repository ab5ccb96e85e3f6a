//! Shipping commands.

use anyhow::{bail, Result};
use storefront_commerce::checkout::ShippingOutcome;
use storefront_commerce::CartController;

use super::{ShippingArgs, ShippingCommand};
use crate::context::Context;

/// Run the shipping command.
pub async fn run(args: ShippingArgs, ctx: &Context) -> Result<()> {
    let mut controller = ctx.controller();

    let outcome = match args.command {
        ShippingCommand::Quote { cep } => {
            let spinner = ctx.output.spinner("Calculating shipping...");
            let outcome = controller.calculate_shipping(&cep).await;
            spinner.finish_and_clear();
            outcome
        }
        ShippingCommand::Replay => {
            let spinner = ctx.output.spinner("Calculating shipping...");
            let outcome = controller.replay_shipping().await;
            spinner.finish_and_clear();
            match outcome {
                Some(outcome) => outcome,
                None => {
                    ctx.output.info("No saved postal code. Run `storefront shipping quote <CEP>` first.");
                    return Ok(());
                }
            }
        }
    };

    report(&outcome, &controller, ctx)
}

fn report(outcome: &ShippingOutcome, controller: &CartController, ctx: &Context) -> Result<()> {
    let totals = controller.totals();

    if ctx.output.is_json() {
        let (status, error) = match outcome {
            ShippingOutcome::Invalid { .. } => ("invalid", None),
            ShippingOutcome::Quoted { .. } => ("quoted", None),
            ShippingOutcome::Failed { error, .. } => ("failed", Some(error.as_str())),
        };
        ctx.output.json(&serde_json::json!({
            "status": status,
            "error": error,
            "shipping": controller.shipping(),
            "totals": totals,
        }));
        if matches!(outcome, ShippingOutcome::Invalid { .. }) {
            bail!("Invalid postal code");
        }
        return Ok(());
    }

    match outcome {
        ShippingOutcome::Invalid { input } => {
            bail!("Invalid postal code: {:?}. Enter the 8 digits, e.g. 01310-100.", input)
        }
        ShippingOutcome::Quoted {
            postal_code, quote, ..
        } => {
            ctx.output.success(&format!("Delivery available to {}", postal_code));
            ctx.output.kv("Distance", &format!("{:.1} km", quote.distance_km));
            ctx.output.kv("Cost", &quote.cost.display());
            if let Some(message) = &quote.message {
                ctx.output.kv("Note", message);
            }
        }
        ShippingOutcome::Failed { postal_code, error } => {
            ctx.output.warn(error);
            ctx.output.info(&format!("Store pickup selected for {}", postal_code));
        }
    }

    ctx.output.header("Totals");
    ctx.output.kv("Subtotal", &totals.subtotal.display());
    ctx.output.kv("Shipping", &controller.shipping().label());
    ctx.output.kv("Total", &totals.total.display());
    Ok(())
}
