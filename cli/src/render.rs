//! Terminal output

use serde::Serialize;

use ms_core::errors::DomainResult;
use ms_core::{AdminSnapshot, BuyerSnapshot, DashboardSnapshot, SellerSnapshot};

/// Print a value as pretty JSON on stdout
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn dashboard(snapshot: &DashboardSnapshot) -> anyhow::Result<()> {
    match snapshot {
        DashboardSnapshot::Buyer(s) => buyer(s)?,
        DashboardSnapshot::Seller(s) => seller(s)?,
        DashboardSnapshot::Admin(s) => admin(s)?,
    }
    Ok(())
}

fn buyer(s: &BuyerSnapshot) -> anyhow::Result<()> {
    section("Products", &s.products)?;
    section("Cart", &s.cart)?;
    section("Wishlist", &s.wishlist)?;
    section("Orders", &s.orders)?;
    for (id, error) in &s.details.failed {
        eprintln!("Details of {} unavailable: {}", id, error);
    }
    Ok(())
}

fn seller(s: &SellerSnapshot) -> anyhow::Result<()> {
    section("My products", &s.products)?;
    match &s.reviews {
        Some(reviews) => section("Reviews", reviews),
        None => {
            println!("== Reviews ==\n(skipped, products unavailable)");
            Ok(())
        }
    }
}

fn admin(s: &AdminSnapshot) -> anyhow::Result<()> {
    section("Users", &s.users)?;
    section("Inventory", &s.inventory)?;
    section("Pending reviews", &s.pending_reviews)
}

fn section<T: Serialize>(title: &str, data: &DomainResult<T>) -> anyhow::Result<()> {
    println!("== {} ==", title);
    match data {
        Ok(value) => json(value),
        Err(e) => {
            println!("(unavailable: {})", e);
            Ok(())
        }
    }
}
