//! Command line definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ms_shared::Role;

/// Micro-Shop storefront client
#[derive(Parser, Debug)]
#[command(name = "micro-shop")]
#[command(about = "Command line client for the Micro-Shop services")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to micro-shop.toml when present)
    #[arg(short, long, env = "MICRO_SHOP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, overriding the configured level
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in; asks for the OTP when the service requires one
    Login {
        username: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "MICRO_SHOP_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// One-time code, if already known
        #[arg(long)]
        otp: Option<String>,
    },
    /// Create an account
    Register {
        username: String,
        #[arg(long, env = "MICRO_SHOP_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// buyer or seller
        #[arg(long, default_value = "buyer")]
        role: Role,
        #[arg(long)]
        email: Option<String>,
    },
    /// Complete a staged registration
    VerifyRegistration {
        /// Token printed by `register`
        token: String,
        otp: String,
    },
    /// Show the current session
    Whoami,
    /// Load the dashboard of the logged-in role
    Dashboard,
    /// List or search products
    Products {
        #[arg(long)]
        search: Option<String>,
    },
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Wishlist operations
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Order history
    Orders,
    /// Turn the cart into an order
    Checkout,
    /// End the session
    Logout,
}

#[derive(Subcommand, Debug)]
pub enum CartAction {
    Show,
    Add {
        product_id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Take one unit out of the cart
    Remove { product_id: String },
    Clear,
}

#[derive(Subcommand, Debug)]
pub enum WishlistAction {
    Show,
    /// Add the product, or remove it when already wishlisted
    Toggle { product_id: String },
}
