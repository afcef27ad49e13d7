//! Explicit pull/push between the local draft and the published document.

use clap::{Args, Subcommand};
use shopdraft_core::{
    Confirm, DraftCache, DraftStore, Operation, RemoteStore, RemoteSync, StatusSink, SyncOutcome,
    SyncStatus,
};
use std::io::{self, BufRead, Write};

use crate::config::Config;

/// Publish or restore the product list
#[derive(Debug, Args)]
pub struct CloudCommand {
    #[command(subcommand)]
    command: CloudSubcommand,
}

#[derive(Debug, Subcommand)]
enum CloudSubcommand {
    /// Replace the local draft with the published products
    Pull {
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Publish the local draft, replacing the remote products
    Push {
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Show remote configuration and reachability
    Status,
}

impl CloudCommand {
    pub fn run<C: DraftCache>(
        &self,
        draft: DraftStore<C>,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let remote = config.remote()?;
        let rt = tokio::runtime::Runtime::new()?;

        match &self.command {
            CloudSubcommand::Pull { yes } => {
                let mut sync = RemoteSync::new(draft, remote);
                let mut confirm = PromptConfirm::new(*yes);
                let outcome = rt.block_on(sync.pull(&mut confirm, &mut ConsoleSink))?;
                finish(Operation::Pull, outcome)
            }
            CloudSubcommand::Push { yes } => {
                let mut sync = RemoteSync::new(draft, remote);
                let mut confirm = PromptConfirm::new(*yes);
                let outcome = rt.block_on(sync.push(&mut confirm, &mut ConsoleSink))?;
                finish(Operation::Push, outcome)
            }
            CloudSubcommand::Status => {
                println!("Remote");
                println!("======");
                println!();
                println!("URL:         {}", remote.url());
                println!("Local draft: {} product(s)", draft.len());
                println!();

                print!("Remote status: ");
                io::stdout().flush()?;
                match rt.block_on(remote.fetch()) {
                    Ok(values) => println!("✓ reachable ({} record(s))", values.len()),
                    Err(e) => println!("✗ {}", e),
                }
                Ok(())
            }
        }
    }
}

fn finish(operation: Operation, outcome: SyncOutcome) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        SyncOutcome::Failed(_) => Err(format!("{} failed", operation).into()),
        SyncOutcome::Cancelled | SyncOutcome::Completed { .. } => Ok(()),
    }
}

/// Asks on stdin unless the user already said yes on the command line.
struct PromptConfirm {
    assume_yes: bool,
}

impl PromptConfirm {
    fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for PromptConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        read_answer(io::stdin().lock())
    }
}

fn read_answer(mut input: impl BufRead) -> bool {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// Prints status updates as they arrive.
struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn report(&mut self, status: SyncStatus) {
        match &status {
            SyncStatus::InProgress { message, .. } => println!("{}", message),
            SyncStatus::Success { message, .. } => println!("✓ {}", message),
            SyncStatus::Failure { message, .. } => eprintln!("✗ {}", message),
            SyncStatus::Cancelled { operation } => {
                println!("{} cancelled.", capitalize(operation))
            }
        }
    }
}

fn capitalize(operation: &Operation) -> String {
    let name = operation.to_string();
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
