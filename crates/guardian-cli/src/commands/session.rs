use anyhow::{Context, Result, bail};
use colored::Colorize;
use guardian_application::auth_usecase::DEFAULT_ACCOUNT_PLAN;
use guardian_core::auth::Role;
use guardian_core::session::{Credentials, Plan};
use guardian_core::store::Command;
use guardian_core::wizard::{SetupWizard, WizardProgress};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{AppContext, session_present};
use crate::views;

pub struct LoginArgs {
    pub plan: Option<Plan>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub sign_up: bool,
}

pub async fn login(ctx: &AppContext, args: LoginArgs) -> Result<()> {
    let LoginArgs {
        plan,
        email,
        password,
        sign_up,
    } = args;

    match (email, password, plan) {
        (Some(email), Some(password), plan) if sign_up => {
            let plan = plan.unwrap_or(DEFAULT_ACCOUNT_PLAN);
            ctx.auth
                .sign_up(&email, &password, plan)
                .await
                .context("Sign-up failed")?;
        }
        (Some(email), Some(password), _) => {
            ctx.auth
                .login(Credentials::Password { email, password })
                .await
                .context("Login failed")?;
        }
        (None, None, Some(plan)) => {
            ctx.auth
                .login(Credentials::Plan(plan))
                .await
                .context("Login failed")?;
        }
        _ => bail!("Choose a plan with --plan, or sign in with --email and --password"),
    }

    let (session, role, wizard_done) = ctx
        .store
        .store()
        .read(|s| (s.session().clone(), s.user_role(), s.has_completed_wizard()))
        .await;

    let plan = session.plan.map(Plan::display_name).unwrap_or("unknown plan");
    let who = session.email.as_deref().unwrap_or("demo user");
    println!(
        "{}",
        format!("✅ Signed in as {who} on {plan} ({})", role.to_string().to_uppercase()).green()
    );
    if !wizard_done {
        print!("{}", views::wizard::pending_notice());
    }
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth.logout().await.context("Logout failed")?;
    println!("{}", "👋 Signed out.".green());
    Ok(())
}

pub async fn set_role(ctx: &AppContext, role: Role) -> Result<()> {
    if !session_present(ctx).await {
        return Ok(());
    }
    ctx.auth.set_role(role).await?;
    println!(
        "{}",
        format!("Now acting as {}", role.to_string().to_uppercase()).cyan().bold()
    );
    println!(
        "{}",
        "Role switching simulates permissions and is not itself access-controlled.".dimmed()
    );
    Ok(())
}

/// Walks the onboarding steps, waiting for Enter between them.
pub async fn wizard(ctx: &AppContext, skip: bool) -> Result<()> {
    if !session_present(ctx).await {
        return Ok(());
    }
    if ctx.store.store().read(|s| s.has_completed_wizard()).await {
        println!("{}", "Setup already complete.".green());
        return Ok(());
    }

    let mut wizard = SetupWizard::new();
    if skip {
        wizard.skip();
    } else {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("{}", views::wizard::render(&wizard));
            println!("{}", "Press Enter to continue...".dimmed());
            // EOF counts as Enter so the wizard can run unattended
            lines
                .next_line()
                .await
                .context("Failed to read from stdin")?;
            if wizard.next() == WizardProgress::Completed {
                break;
            }
        }
    }

    ctx.store.execute(Command::CompleteWizard).await?;
    println!("{}", "✅ System Active. Run `guardian dashboard` to open the console.".green().bold());
    Ok(())
}
