//! Command handlers

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use serde_json::json;

use ms_core::domain::entities::account::{CaptchaAnswer, RegisterRequest};
use ms_core::{Dashboard, LoginOutcome, RegisterOutcome};

use crate::app::App;
use crate::args::{CartAction, Command, WishlistAction};
use crate::render;

pub async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login {
            username,
            password,
            otp,
        } => login(app, &username, password, otp).await,
        Command::Register {
            username,
            password,
            role,
            email,
        } => {
            let password = password_or_prompt(password)?;
            let mut request = RegisterRequest::new(username, password, role)
                .with_captcha(captcha(app).await?);
            if let Some(email) = email {
                request = request.with_email(email);
            }
            match app.auth.register(request).await? {
                RegisterOutcome::Completed { message } => println!("{}", message),
                RegisterOutcome::OtpRequired(step) => {
                    println!("{}", step.message);
                    let token = step
                        .continuation_token
                        .context("Registration step answered without a token")?;
                    let code = prompt("Verification code: ")?;
                    println!("{}", app.auth.verify_registration(&token, &code).await?);
                }
            }
            Ok(())
        }
        Command::VerifyRegistration { token, otp } => {
            println!("{}", app.auth.verify_registration(&token, &otp).await?);
            Ok(())
        }
        Command::Whoami => {
            let session = app.auth.session().snapshot().await;
            match session {
                Some(session) => render::json(&json!({
                    "username": session.username,
                    "role": session.role,
                    "state": app.auth.session().state().await,
                })),
                None => {
                    println!("Not logged in");
                    Ok(())
                }
            }
        }
        Command::Dashboard => {
            let snapshot = Dashboard::load_for_session(&app.shop).await?;
            render::dashboard(&snapshot)?;
            if snapshot.session_expired() {
                bail!("Session expired. Please log in again.");
            }
            Ok(())
        }
        Command::Products { search } => {
            let products = match search {
                Some(query) => app.shop.search_products(&query).await?,
                None => app.shop.list_products().await?,
            };
            render::json(&products)
        }
        Command::Cart { action } => cart(app, action).await,
        Command::Wishlist { action } => wishlist(app, action).await,
        Command::Orders => {
            let username = app.username().await?;
            render::json(&app.shop.orders(&username).await?)
        }
        Command::Checkout => {
            let username = app.username().await?;
            let placed = app.shop.place_order(&username).await?;
            println!("{} (order {})", placed.message, placed.order_id);
            Ok(())
        }
        Command::Logout => {
            let outcome = app.auth.logout().await;
            if !outcome.is_success() {
                tracing::debug!(?outcome, "Server logout not confirmed");
            }
            println!("Logged out");
            Ok(())
        }
    }
}

async fn login(app: &App, username: &str, password: Option<String>, otp: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    let captcha = captcha(app).await?;

    let session = match app.auth.login(username, &password, captcha).await? {
        LoginOutcome::Authenticated(session) => session,
        LoginOutcome::OtpRequired(step) => {
            eprintln!("{}", step.message);
            let token = step
                .continuation_token
                .context("Login step answered without a pre-auth token")?;
            let code = match otp {
                Some(code) => code,
                None => prompt("One-time code: ")?,
            };
            app.auth.verify_login_otp(&token, &code).await?
        }
    };
    println!("Logged in as {} ({})", session.username, session.role);
    Ok(())
}

async fn cart(app: &App, action: CartAction) -> Result<()> {
    let username = app.username().await?;
    match action {
        CartAction::Show => {
            let items = app.shop.cart(&username).await?;
            let ids: Vec<String> = items.iter().map(|i| i.product_id.clone()).collect();
            app.shop.ensure_product_details(&ids).await;

            let mut lines = Vec::with_capacity(items.len());
            for item in &items {
                let product = app.shop.details().get(&item.product_id).await;
                lines.push(json!({
                    "product_id": item.product_id,
                    "name": product.as_ref().map(|p| p.name.clone()),
                    "quantity": item.quantity,
                    "price": product.as_ref().map(|p| p.price),
                }));
            }
            render::json(&lines)
        }
        CartAction::Add {
            product_id,
            quantity,
        } => {
            println!("{}", app.shop.add_to_cart(&username, &product_id, quantity).await?);
            Ok(())
        }
        CartAction::Remove { product_id } => {
            println!("{}", app.shop.remove_from_cart(&username, &product_id).await?);
            Ok(())
        }
        CartAction::Clear => {
            println!("{}", app.shop.clear_cart(&username).await?);
            Ok(())
        }
    }
}

async fn wishlist(app: &App, action: WishlistAction) -> Result<()> {
    let username = app.username().await?;
    let current = app.shop.wishlist(&username).await?;
    match action {
        WishlistAction::Show => render::json(&current),
        WishlistAction::Toggle { product_id } => {
            let listed = current.contains(&product_id);
            let now_listed = app
                .shop
                .toggle_wishlist(&username, &product_id, listed)
                .await?;
            if now_listed {
                println!("Added {} to wishlist", product_id);
            } else {
                println!("Removed {} from wishlist", product_id);
            }
            Ok(())
        }
    }
}

/// Ask for a CAPTCHA answer when the service requires one
async fn captcha(app: &App) -> Result<Option<CaptchaAnswer>> {
    if !app.config.auth.captcha_enabled {
        return Ok(None);
    }
    let challenge = app.auth.new_captcha().await?;
    eprintln!("CAPTCHA image: {}", challenge.image);
    let answer = prompt("CAPTCHA: ")?;
    Ok(Some(CaptchaAnswer {
        captcha_id: challenge.captcha_id,
        answer,
    }))
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt("Password: "),
    }
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let value = line.trim().to_string();
    if value.is_empty() {
        bail!("No input given for {}", label.trim_end_matches(": "));
    }
    Ok(value)
}
