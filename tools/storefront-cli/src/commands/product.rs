//! Product variant selection commands.

use anyhow::{Context as _, Result};
use storefront_commerce::catalog::{Product, SelectionState, VariantSelector};
use storefront_commerce::CommerceError;

use super::{ProductArgs, ProductCommand};
use crate::context::Context;

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ProductCommand::Show { file, size } => show_product(&file, size, ctx),
        ProductCommand::Add {
            file,
            size,
            color,
            qty,
        } => add_product(&file, size, color, qty, ctx),
    }
}

fn load_product(file: &str, ctx: &Context) -> Result<Product> {
    let path = ctx.resolve_path(file);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read product file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse product file: {}", path.display()))
}

fn show_product(file: &str, size: Option<String>, ctx: &Context) -> Result<()> {
    let product = load_product(file, ctx)?;
    let mut selector = VariantSelector::new(product);
    if let Some(size) = size {
        selector.select_size(size);
    }

    if ctx.output.is_json() {
        let variants: Vec<_> = selector
            .product()
            .variants
            .iter()
            .map(|v| {
                serde_json::json!({
                    "variant_id": v.variant_id,
                    "size": v.size,
                    "color": v.color,
                    "quantity": v.quantity,
                })
            })
            .collect();
        ctx.output.json(&serde_json::json!({
            "id": selector.product().id,
            "name": selector.product().name,
            "price": selector.price().to_decimal(),
            "variants": variants,
        }));
        return Ok(());
    }

    let product = selector.product();
    ctx.output.header(&product.name);
    ctx.output.kv("Price", &selector.price().display());
    ctx.output.kv("In stock", &product.total_stock().to_string());

    let mark = |available: bool| if available { "" } else { " (sold out)" };
    ctx.output.info("Sizes:");
    for size in selector.available_sizes() {
        ctx.output.list_item(&format!("{}{}", size.value, mark(size.available)));
    }
    ctx.output.info("Colors:");
    for color in selector.available_colors() {
        ctx.output.list_item(&format!("{}{}", color.value, mark(color.available)));
    }
    Ok(())
}

fn add_product(file: &str, size: String, color: String, qty: i64, ctx: &Context) -> Result<()> {
    let product = load_product(file, ctx)?;
    let mut selector = VariantSelector::new(product);

    selector.select_size(size.clone());
    match selector.select_color(color.clone()) {
        SelectionState::Ready { stock, .. } => ctx.output.debug(&format!("{} in stock", stock)),
        SelectionState::Cleared(_) => {
            return Err(CommerceError::VariantUnavailable { size, color }.into());
        }
        SelectionState::Incomplete => {}
    }

    selector.quantity_mut().set(qty);
    if selector.quantity().value() != qty && selector.quantity().is_enabled() {
        ctx.output.warn(&format!(
            "Quantity adjusted to {} (stock limit)",
            selector.quantity().value()
        ));
    }

    let item = selector.to_cart_item()?;
    let event = ctx.store().add_item(item);
    ctx.output.event(&event);
    Ok(())
}
