use std::path::PathBuf;

use colored::Colorize;
use dep_sdk::{
    format_local_time, DiffLine, DiffReport, FileStatus, Repository, ResetOutcome, StashOutcome,
    WorkdirStatus,
};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::Clone(args) => cmd_clone(args).await,
        Command::Config(args) => cmd_config(args),
        Command::Status => cmd_status(),
        Command::Add(args) => cmd_add(args),
        Command::Rm(args) => cmd_rm(args),
        Command::Commit(args) => cmd_commit(args),
        Command::Log => cmd_log(),
        Command::Diff => cmd_diff(),
        Command::Branch(args) => cmd_branch(args),
        Command::Checkout(args) => cmd_checkout(args),
        Command::Merge(args) => cmd_merge(args),
        Command::Remote(args) => cmd_remote(args),
        Command::Fetch => cmd_fetch().await,
        Command::Pull => cmd_pull().await,
        Command::Push => cmd_push().await,
        Command::Stash(args) => cmd_stash(args),
        Command::Reset(args) => cmd_reset(args),
    }
}

fn open() -> anyhow::Result<Repository> {
    Ok(Repository::open(std::env::current_dir()?)?)
}

fn format_time(ms: u64) -> String {
    format_local_time(ms).unwrap_or_else(|| ms.to_string())
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let path = args.path.map(PathBuf::from).unwrap_or(std::env::current_dir()?);
    let repo = Repository::init(&path)?;
    println!(
        "{} Initialized dep repository in {}",
        "✓".green().bold(),
        repo.control().path().display().to_string().bold()
    );
    Ok(())
}

async fn cmd_clone(args: CloneArgs) -> anyhow::Result<()> {
    let (_, result) = Repository::clone_remote(&args.slug, &std::env::current_dir()?).await?;
    println!(
        "{} Cloned {} into {} ({} commits)",
        "✓".green().bold(),
        args.slug.bold(),
        result.root.display(),
        result.commits
    );
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let repo = open()?;
    match (&args.key, &args.value) {
        (Some(key), Some(value)) => {
            repo.config_set(key, value)?;
            println!("Set {} = {}", key.bold(), value);
        }
        (Some(key), None) => match repo.config_get(key)? {
            Some(value) => println!("{value}"),
            None => println!("{} = (not set)", key.bold()),
        },
        _ => {
            for (key, value) in repo.config_entries()? {
                println!("{} = {}", key.bold(), value);
            }
        }
    }
    Ok(())
}

fn cmd_status() -> anyhow::Result<()> {
    let repo = open()?;
    let status = repo.status()?;
    print_status(&status);
    Ok(())
}

fn print_status(status: &WorkdirStatus) {
    println!("On branch {}", status.branch.yellow().bold());
    match &status.parent {
        Some(hash) => println!("Last commit: {}", hash.short().dimmed()),
        None => println!("Last commit: None"),
    }

    if !status.staged.is_empty() {
        println!("\nChanges to be committed:");
        for entry in &status.staged {
            let label = match entry.status {
                FileStatus::New => "new file:",
                FileStatus::Modified => "modified:",
                FileStatus::Deleted => "deleted: ",
            };
            println!("\t{}", format!("{label} {}", entry.path).green());
        }
    }

    if !status.modified.is_empty() || !status.deleted.is_empty() {
        println!("\nChanges not staged for commit:");
        for path in &status.modified {
            println!("\t{}", format!("modified: {path}").red());
        }
        for path in &status.deleted {
            println!("\t{}", format!("deleted:  {path}").red());
        }
    }

    if !status.untracked.is_empty() {
        println!("\nUntracked files:");
        for path in &status.untracked {
            println!("\t{}", path.red());
        }
    }

    if status.is_clean() {
        println!("\nNothing to commit, working directory clean.");
    }
}

fn cmd_add(args: PathArgs) -> anyhow::Result<()> {
    let repo = open()?;
    for path in repo.add(&args.path)? {
        println!("  {} {}", "staged:".green(), path);
    }
    Ok(())
}

fn cmd_rm(args: PathArgs) -> anyhow::Result<()> {
    let repo = open()?;
    for path in repo.rm(&args.path)? {
        println!("  {} {}", "removed:".red(), path);
    }
    Ok(())
}

fn cmd_commit(args: CommitArgs) -> anyhow::Result<()> {
    let repo = open()?;
    let commit = repo.commit(&args.message)?;
    println!(
        "[{} {}] {}",
        repo.current_branch()?.yellow(),
        commit.hash.short().dimmed(),
        commit.message
    );
    println!("  {} file(s) changed", commit.changes.len());
    Ok(())
}

fn cmd_log() -> anyhow::Result<()> {
    let repo = open()?;
    let branch = repo.current_branch()?;
    let commits = repo.log()?;
    if commits.is_empty() {
        println!("No commits found.");
        return Ok(());
    }

    println!("Branch: {}\n", branch.green());
    for commit in commits {
        println!("{}", format!("commit {}", commit.hash).yellow());
        println!("Date: {}", format_time(commit.timestamp));
        println!("\n    {}\n", commit.message);
    }
    Ok(())
}

fn cmd_diff() -> anyhow::Result<()> {
    let repo = open()?;
    let report = repo.diff()?;
    print_diff(&report);
    Ok(())
}

fn print_diff(report: &DiffReport) {
    if report.is_empty() {
        println!("No changes detected.");
        return;
    }

    for file in &report.files {
        println!("{}", format!("diff --dep a/{0} b/{0}", file.path).bold());
        for hunk in &file.diff.hunks {
            println!("{}", hunk.header().cyan());
            for line in &hunk.lines {
                match line {
                    DiffLine::Context(text) => println!(" {text}"),
                    DiffLine::Added(text) => {
                        println!("{}", format!("+{text}").green())
                    }
                    DiffLine::Removed(text) => {
                        println!("{}", format!("-{text}").red())
                    }
                }
            }
        }
        println!();
    }

    if !report.staged.is_empty() {
        println!("--- Staged Changes ---");
        for path in &report.staged {
            println!("staged: {}", path.green());
        }
    }
}

fn cmd_branch(args: BranchArgs) -> anyhow::Result<()> {
    let repo = open()?;
    match (&args.name, args.delete) {
        (Some(name), true) => {
            repo.delete_branch(name)?;
            println!("Deleted branch {}", name.yellow());
        }
        (None, true) => anyhow::bail!("specify a branch name to delete"),
        (Some(name), false) => {
            repo.create_branch(name)?;
            println!("Created branch {}", name.yellow());
        }
        (None, false) => {
            let active = repo.current_branch()?;
            for name in repo.branches()? {
                if name == active {
                    println!("* {}", name.green().bold());
                } else {
                    println!("  {name}");
                }
            }
        }
    }
    Ok(())
}

fn cmd_checkout(args: CheckoutArgs) -> anyhow::Result<()> {
    let repo = open()?;
    let report = if args.create {
        repo.checkout_new(&args.branch, args.force)?
    } else {
        repo.checkout(&args.branch, args.force)?
    };
    let verb = if args.create { "Created and switched to" } else { "Switched to" };
    println!("{verb} branch {}", report.branch.yellow().bold());
    Ok(())
}

fn cmd_merge(args: MergeArgs) -> anyhow::Result<()> {
    let repo = open()?;
    let report = repo.merge(&args.branch)?;
    if report.is_noop() {
        println!("Already up to date with {}.", args.branch.yellow());
        return Ok(());
    }
    for path in &report.taken {
        println!("  {} {}", "updated:".green(), path);
    }
    for path in &report.conflicts {
        println!("  {} {}", "CONFLICT:".red().bold(), path);
    }
    if report.is_clean() {
        println!("{} Merged {}; review and commit.", "✓".green(), args.branch.yellow());
    } else {
        println!(
            "Merged {} with {} conflict(s); fix them and commit.",
            args.branch.yellow(),
            report.conflicts.len()
        );
    }
    Ok(())
}

fn cmd_remote(args: RemoteArgs) -> anyhow::Result<()> {
    let repo = open()?;
    match args.url {
        Some(input) => {
            let url = repo.set_remote(&input)?;
            println!("Remote set to {}", url.blue());
        }
        None => {
            let url = repo.remote()?;
            if url.is_empty() {
                println!("No remote configured.");
            } else {
                println!("{}", url.blue());
            }
        }
    }
    Ok(())
}

async fn cmd_fetch() -> anyhow::Result<()> {
    let repo = open()?;
    let result = repo.fetch().await?;
    println!(
        "Fetched {}: {} remote commit(s), {} new",
        result.branch.yellow(),
        result.remote_commits,
        result.downloaded
    );
    Ok(())
}

async fn cmd_pull() -> anyhow::Result<()> {
    let repo = open()?;
    let result = repo.pull().await?;
    if result.is_up_to_date() {
        println!("{} is {}", result.fetch.branch.yellow(), "up to date".green());
    } else {
        println!(
            "{} Pulled {} commit(s) into {}",
            "✓".green(),
            result.applied.len(),
            result.fetch.branch.yellow()
        );
    }
    Ok(())
}

async fn cmd_push() -> anyhow::Result<()> {
    let repo = open()?;
    let result = repo.push().await?;
    if result.pushed.is_empty() {
        println!("{} is {}", result.branch.yellow(), "up to date".green());
    } else {
        println!(
            "{} Pushed {} commit(s) to {}",
            "✓".green(),
            result.pushed.len(),
            result.branch.yellow()
        );
    }
    Ok(())
}

fn cmd_stash(args: StashArgs) -> anyhow::Result<()> {
    let repo = open()?;
    match args.action {
        None => match repo.stash_push()? {
            StashOutcome::Clean => println!("No local changes to save."),
            StashOutcome::Saved { name, changes } => {
                println!("Saved {changes} change(s) to {}", name.yellow())
            }
        },
        Some(StashAction::Pop) => {
            let report = repo.stash_pop()?;
            println!(
                "Restored {} ({} written, {} deleted)",
                report.name.yellow(),
                report.written.len(),
                report.deleted.len()
            );
        }
        Some(StashAction::List) => {
            let entries = repo.stash_list()?;
            if entries.is_empty() {
                println!("No stashes found.");
            }
            for entry in entries.iter().rev() {
                let date = entry.date.as_deref().unwrap_or("unknown date");
                println!("{}: WIP ({})", entry.label().yellow(), date);
            }
        }
    }
    Ok(())
}

fn cmd_reset(args: ResetArgs) -> anyhow::Result<()> {
    let repo = open()?;
    match repo.reset(args.hash.as_deref())? {
        ResetOutcome::StageCleared => println!("Stage cleared."),
        ResetOutcome::Moved { hash, dropped } => println!(
            "HEAD is now at {} ({} commit(s) dropped)",
            hash.short().yellow(),
            dropped
        ),
    }
    Ok(())
}
