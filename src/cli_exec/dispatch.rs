use super::browse::{
    handle_address_command, handle_cat_command, handle_ls_command, handle_open_command,
    handle_size_command, handle_status_command,
};
use super::edit::{
    handle_mkdir_command, handle_mv_command, handle_rm_command, handle_rm_many_command,
};
use super::session::{handle_config_command, handle_login_command, handle_logout_command};
use super::upload::handle_put_command;
use super::*;

pub(super) fn handle_command(target: &TargetArgs, command: Commands) -> Result<()> {
    let ctx = CliContext::load(target)?;
    match command {
        Commands::Login(args) => handle_login_command(&ctx, &args.token)?,
        Commands::Logout => handle_logout_command(&ctx)?,
        Commands::Status(args) => handle_status_command(&ctx, args.json)?,
        Commands::Config { command } => handle_config_command(&ctx, target, command)?,
        Commands::Ls(args) => handle_ls_command(&ctx, args)?,
        Commands::Size(args) => handle_size_command(&ctx, args.json)?,
        Commands::Cat(args) => handle_cat_command(&ctx, &args.path)?,
        Commands::Put(args) => handle_put_command(&ctx, &args.local, &args.remote, &args.exclude)?,
        Commands::Mkdir(args) => handle_mkdir_command(&ctx, &args.path)?,
        Commands::Mv(args) => handle_mv_command(&ctx, &args.from, &args.to, args.json)?,
        Commands::Rm(args) => handle_rm_command(&ctx, &args.path, args.recursive, args.json)?,
        Commands::RmMany(args) => handle_rm_many_command(&ctx, args.paths, args.yes, args.json)?,
        Commands::Address(args) => handle_address_command(&ctx, args.search, args.ext)?,
        Commands::Open(args) => handle_open_command(&ctx, &args.fragment, args.no_save)?,
        Commands::Tui => anyhow::bail!("`tui` is handled before dispatch"),
    }
    Ok(())
}
