//! `users blocks` subcommands: list and clear brute-force protection blocks.

use clap::{Args, Subcommand};
use userblocks::{Action, ManagementClient, resolve, run_batch};
use v_utils::prelude::*;

use crate::{prompt, render, spinner};

#[derive(Args)]
pub struct UsersArgs {
	#[command(subcommand)]
	command: UsersCommands,
}

#[derive(Subcommand)]
enum UsersCommands {
	/// Manage brute-force protection user blocks
	Blocks(BlocksArgs),
}

#[derive(Args)]
struct BlocksArgs {
	#[command(subcommand)]
	command: BlocksCommands,
}

#[derive(Subcommand)]
enum BlocksCommands {
	/// List brute-force protection blocks for a given user by user ID, username, phone number or email.
	///```sh
	///userblocks users blocks list "auth0|61b5b6e90783fa19f7c57dad"
	///userblocks users blocks list frederik@travel0.com --json
	///```
	List(ListArgs),
	/// Remove brute-force protection blocks for users by user ID, username, phone number or email.
	///```sh
	///userblocks users blocks unblock "auth0|61b5b6e90783fa19f7c57dad"
	///userblocks users blocks unblock frederik@travel0.com poovam@travel0.com
	///```
	Unblock(UnblockArgs),
}

#[derive(Args)]
struct ListArgs {
	/// User ID, username, email or phone number. Prompted for if omitted.
	identifier: Option<String>,
	/// Output in JSON format
	#[arg(long)]
	json: bool,
}

#[derive(Args)]
struct UnblockArgs {
	/// User IDs, usernames, emails or phone numbers. One is prompted for if none are given.
	identifiers: Vec<String>,
}

#[derive(Clone, Copy, Debug)]
pub struct RunOptions {
	pub spinner: bool,
}

pub async fn main(client: &dyn ManagementClient, args: UsersArgs, opts: RunOptions) -> Result<()> {
	let UsersCommands::Blocks(blocks_args) = args.command;
	match blocks_args.command {
		BlocksCommands::List(args) => list(client, args, opts).await,
		BlocksCommands::Unblock(args) => unblock(client, args, opts).await,
	}
}

async fn list(client: &dyn ManagementClient, args: ListArgs, opts: RunOptions) -> Result<()> {
	let identifier = match args.identifier {
		Some(identifier) if identifier.is_empty() => bail!("a user identifier is required"),
		Some(identifier) => identifier,
		None => prompt::ask_identifier()?,
	};
	let cancel = &crate::cancel_on_ctrl_c();

	let lookup = resolve(&identifier, Action::List, cancel, |id| client.blocks_by_id(id), |id| client.blocks_by_identifier(id));
	let blocks = spinner::waiting("Loading user blocks...", opts.spinner && !args.json, lookup).await?;

	render::user_blocks_list(&blocks, args.json)
}

async fn unblock(client: &dyn ManagementClient, args: UnblockArgs, opts: RunOptions) -> Result<()> {
	let identifiers = collect_identifiers(args.identifiers, prompt::ask_identifier)?;
	let cancel = &crate::cancel_on_ctrl_c();

	let batch = run_batch(identifiers.iter().map(String::as_str), |identifier| {
		resolve(identifier, Action::Unblock, cancel, |id| client.unblock_by_id(id), |id| client.unblock_by_identifier(id))
	});
	spinner::waiting("Unblocking user(s)...", opts.spinner, batch).await?;

	let unblocked = identifiers.iter().filter(|id| !id.is_empty()).count();
	eprintln!("Unblocked {unblocked} user(s).");
	Ok(())
}

/// Exactly the identifiers given on the command line, or a single prompted one when there are none.
fn collect_identifiers(args: Vec<String>, ask: impl FnOnce() -> Result<String>) -> Result<Vec<String>> {
	if args.is_empty() {
		return Ok(vec![ask()?]);
	}
	Ok(args)
}
