//! Sign in, sign up, sign out and profile edits.

use clap::Args;
use fruit_mall_storefront::api::{RegisterRequest, UpdateMemberRequest};
use fruit_mall_storefront::{AppContext, Result};
use secrecy::SecretString;

use crate::render;

/// Fields for a new account.
#[derive(Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    username: String,

    #[arg(short, long)]
    email: String,

    #[arg(short, long)]
    password: String,

    /// Full name
    #[arg(short, long)]
    name: String,

    #[arg(long)]
    phone: String,

    /// `YYYY-MM-DD`
    #[arg(long)]
    birth_date: Option<String>,

    #[arg(long)]
    address: Option<String>,
}

/// New member details. Omitted phone number or address clears it.
#[derive(Args)]
pub struct ProfileArgs {
    /// Full name
    #[arg(short, long)]
    name: String,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    address: Option<String>,
}

/// Current and new password.
#[derive(Args)]
pub struct PasswordArgs {
    #[arg(long)]
    current: String,

    #[arg(long)]
    new: String,

    /// The new password again
    #[arg(long)]
    confirm: String,
}

pub async fn login(ctx: &mut AppContext, username: &str, password: String) -> Result<()> {
    let password = SecretString::from(password);
    let user = ctx.login(username, &password).await?;
    render::success(&format!("Welcome back, {}.", user.name));
    Ok(())
}

pub async fn register(ctx: &mut AppContext, args: RegisterArgs) -> Result<()> {
    let request = RegisterRequest {
        username: args.username,
        email: args.email,
        password: args.password,
        name: args.name,
        phone_number: args.phone,
        birth_date: args.birth_date,
        address: args.address,
    };
    let user = ctx.register(request).await?;
    render::success(&format!(
        "Account {} created. Sign in with `fruitmall login`.",
        user.username
    ));
    Ok(())
}

pub fn logout(ctx: &mut AppContext) -> Result<()> {
    ctx.logout()?;
    render::success("Signed out.");
    Ok(())
}

pub async fn whoami(ctx: &mut AppContext) -> Result<()> {
    let user = ctx.fetch_current_user().await?;
    render::user(&user);
    Ok(())
}

pub async fn update_profile(ctx: &mut AppContext, args: ProfileArgs) -> Result<()> {
    let request = UpdateMemberRequest {
        name: args.name,
        phone_number: args.phone,
        address: args.address,
    };
    let user = ctx.update_profile(request).await?;
    render::success("Profile updated.");
    render::user(&user);
    Ok(())
}

pub async fn change_password(ctx: &mut AppContext, args: PasswordArgs) -> Result<()> {
    ctx.change_password(
        &SecretString::from(args.current),
        &SecretString::from(args.new),
        &SecretString::from(args.confirm),
    )
    .await?;
    render::success("Password changed.");
    Ok(())
}
