//! Cart commands.

use anyhow::{bail, Result};
use dialoguer::Confirm;
use storefront_commerce::cart::{CartEvent, CartItem};
use storefront_commerce::checkout::ShippingOutcome;
use storefront_commerce::{Currency, Money, ProductId, VariantId};

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CartCommand::Show { offline } => show_cart(offline, ctx).await,
        CartCommand::Add {
            variant,
            name,
            price,
            size,
            color,
            qty,
            max,
            image,
            product,
        } => {
            let mut item = CartItem::new(
                VariantId::new(variant),
                name,
                Money::from_decimal(price, Currency::BRL),
                qty,
                size,
            );
            item.color = color;
            item.max = max;
            item.image = image;
            item.product_id = product.map(ProductId::new);

            let event = ctx.store().add_item(item);
            ctx.output.event(&event);
            print_count(ctx);
            Ok(())
        }
        CartCommand::Set { variant, qty } => {
            let event = ctx.store().set_quantity(VariantId::new(variant), qty);
            report(event, variant, ctx)
        }
        CartCommand::Inc { variant } => {
            let event = ctx.store().change_quantity(VariantId::new(variant), 1);
            report(event, variant, ctx)
        }
        CartCommand::Dec { variant } => {
            let event = ctx.store().change_quantity(VariantId::new(variant), -1);
            report(event, variant, ctx)
        }
        CartCommand::Remove { variant } => {
            let event = ctx.store().remove_item(VariantId::new(variant));
            report(event, variant, ctx)
        }
        CartCommand::Clear { yes } => clear_cart(yes, ctx),
    }
}

async fn show_cart(offline: bool, ctx: &Context) -> Result<()> {
    let mut controller = ctx.controller();
    ctx.output.debug(&format!("Backend: {}", ctx.config.api.base_url));

    let view = if offline {
        controller.view()
    } else {
        let spinner = ctx.output.spinner("Checking stock...");
        let pass = controller.open().await;
        spinner.finish_and_clear();

        if !pass.reconciled && !pass.view.is_empty {
            ctx.output.warn("Could not check stock; showing the cart as saved");
        }
        for event in &pass.events {
            ctx.output.event(event);
        }
        match &pass.shipping {
            Some(ShippingOutcome::Quoted { postal_code, .. }) => {
                ctx.output.debug(&format!("Delivery quoted for {}", postal_code));
            }
            Some(ShippingOutcome::Failed { error, .. }) => ctx.output.warn(error),
            _ => {}
        }
        pass.view
    };

    ctx.output.cart(&view);
    Ok(())
}

fn clear_cart(yes: bool, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    if store.load().is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt("Remove every item from the cart?")
            .default(false)
            .interact()?;
        if !confirmed {
            bail!("Aborted");
        }
    }

    store.clear();
    ctx.output.success("Cart cleared");
    Ok(())
}

fn report(event: Option<CartEvent>, variant: u64, ctx: &Context) -> Result<()> {
    let store = ctx.store();
    match event {
        Some(event) => ctx.output.event(&event),
        None if store.load().get(VariantId::new(variant)).is_none() => {
            ctx.output.warn(&format!("Variant {} is not in the cart", variant));
        }
        None => ctx.output.info("Nothing to change"),
    }
    print_count(ctx);
    Ok(())
}

fn print_count(ctx: &Context) {
    let count = ctx.store().item_count();
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "item_count": count }));
    } else {
        ctx.output.kv("Items in cart", &count.to_string());
    }
}
