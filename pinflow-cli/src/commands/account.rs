use std::sync::Arc;

use pinflow_common::models::RegisterRequest;
use pinflow_core::ApiClient;

use super::prompt_line;
use crate::token_store;

pub async fn login(api: &Arc<ApiClient>, email: &str) -> anyhow::Result<()> {
    let password = prompt_line("Password")?;
    let resp = api.login(email, &password).await?;
    token_store::store(&resp.token);
    println!("Signed in as {} <{}>.", resp.user.name, resp.user.email);
    Ok(())
}

pub async fn register(api: &Arc<ApiClient>) -> anyhow::Result<()> {
    let name = prompt_line("Name")?;
    let email = prompt_line("Email")?;
    let password = prompt_line("Password")?;
    let business_name = prompt_line("Business name")?;
    let timezone = prompt_line("Timezone (e.g. Europe/Berlin)")?;

    let resp = api
        .register(&RegisterRequest {
            name,
            email,
            password,
            business_name,
            timezone,
        })
        .await?;
    token_store::store(&resp.token);
    println!("Account created; signed in as {}.", resp.user.email);
    Ok(())
}

pub fn me(api: &Arc<ApiClient>) -> anyhow::Result<()> {
    if !api.session().is_active() {
        println!("Not signed in. Run `pinflow login --email <email>`.");
        return Ok(());
    }
    match api.session().current_user() {
        Some(user) => {
            println!("{} <{}>", user.name, user.email);
            if let Some(business) = user.business_name {
                println!("Business: {business}");
            }
        }
        // A keyring-restored session carries only the token.
        None => println!("Signed in (account details refresh on next login)."),
    }
    Ok(())
}

pub fn logout(api: &Arc<ApiClient>) -> anyhow::Result<()> {
    api.session().invalidate();
    token_store::clear();
    println!("Signed out.");
    Ok(())
}
