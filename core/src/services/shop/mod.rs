//! Resource service clients
//!
//! One `ShopClient` covers every resource service; each submodule adds the
//! operations of one service.

mod cart;
mod client;
mod detail_cache;
mod inventory;
mod orders;
mod payments;
mod products;
mod reviews;
mod users;
mod wishlist;

#[cfg(test)]
mod tests;

pub use client::ShopClient;
pub use detail_cache::{DetailFetchReport, ProductDetailCache};
