use super::*;

pub(super) fn handle_login_command(ctx: &CliContext, token: &str) -> Result<()> {
    ctx.store
        .set_token(token)
        .context("store token in state.json")?;
    println!("Logged in");
    Ok(())
}

pub(super) fn handle_logout_command(ctx: &CliContext) -> Result<()> {
    ctx.store.clear_token().context("clear token")?;
    println!("Logged out");
    Ok(())
}

pub(super) fn handle_config_command(
    ctx: &CliContext,
    target: &TargetArgs,
    command: ConfigCommands,
) -> Result<()> {
    match command {
        ConfigCommands::Show { json } => {
            if json {
                print_json(&ctx.cfg, "config")?;
            } else {
                println!("api: {}", ctx.cfg.api_base);
                println!("owner: {}", ctx.cfg.owner.as_deref().unwrap_or("(unset)"));
                println!("repo: {}", ctx.cfg.repo.as_deref().unwrap_or("(unset)"));
                println!(
                    "branch: {}",
                    ctx.cfg.branch.as_deref().unwrap_or("(default branch)")
                );
                println!("subtree: {}", ctx.cfg.subtree);
                println!("budget_bytes: {}", ctx.cfg.budget_bytes);
            }
        }
        ConfigCommands::Set { budget } => {
            // Start from the file, not the flag-overridden view.
            let mut cfg = ctx.store.read_config()?;
            if let Some(api) = &target.api_url {
                cfg.api_base = api.trim().to_string();
            }
            if let Some(owner) = &target.owner {
                cfg.owner = Some(owner.trim().to_string()).filter(|v| !v.is_empty());
            }
            if let Some(repo) = &target.repo {
                cfg.repo = Some(repo.trim().to_string()).filter(|v| !v.is_empty());
            }
            if let Some(branch) = &target.branch {
                cfg.branch = Some(branch.trim().to_string()).filter(|v| !v.is_empty());
            }
            if let Some(subtree) = &target.subtree {
                treeward::subtree::Subtree::new(subtree).context("invalid subtree root")?;
                cfg.subtree = subtree.trim_matches('/').to_string();
            }
            if let Some(budget) = budget {
                cfg.budget_bytes = budget;
            }
            ctx.store.write_config(&cfg)?;
            println!("Configuration saved");
        }
    }
    Ok(())
}
