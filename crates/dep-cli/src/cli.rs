use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dep", about = "dep: lightweight version control", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new repository
    Init(InitArgs),
    /// Clone a remote repository into ./<repo>
    Clone(CloneArgs),
    /// Get or set configuration
    Config(ConfigArgs),
    /// Show working directory status
    Status,
    /// Stage a file or directory
    Add(PathArgs),
    /// Stage a deletion and remove the file
    Rm(PathArgs),
    /// Commit the staged changes
    Commit(CommitArgs),
    /// Show commit history of the active branch
    Log,
    /// Show working directory changes
    Diff,
    /// List, create, or delete branches
    Branch(BranchArgs),
    /// Switch to a different branch
    Checkout(CheckoutArgs),
    /// Merge a branch into the working directory
    Merge(MergeArgs),
    /// Show or set the remote URL
    Remote(RemoteArgs),
    /// Fetch the active branch from the remote
    Fetch,
    /// Fetch and apply remote commits
    Pull,
    /// Upload local commits
    Push,
    /// Save, restore, or list working directory changes
    Stash(StashArgs),
    /// Clear the stage, optionally rewinding to a commit
    Reset(ResetArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub path: Option<String>,
}

#[derive(Args)]
pub struct CloneArgs {
    /// `handle/repo`
    pub slug: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    pub key: Option<String>,
    pub value: Option<String>,
}

#[derive(Args)]
pub struct PathArgs {
    pub path: String,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,
}

#[derive(Args)]
pub struct BranchArgs {
    pub name: Option<String>,
    #[arg(short = 'd', long, visible_short_alias = 'D')]
    pub delete: bool,
}

#[derive(Args)]
pub struct CheckoutArgs {
    pub branch: String,
    /// Create the branch from the active one first
    #[arg(short = 'b')]
    pub create: bool,
    /// Discard uncommitted changes
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct MergeArgs {
    pub branch: String,
}

#[derive(Args)]
pub struct RemoteArgs {
    /// URL or `handle/repo`
    pub url: Option<String>,
}

#[derive(Args)]
pub struct StashArgs {
    #[command(subcommand)]
    pub action: Option<StashAction>,
}

#[derive(Subcommand)]
pub enum StashAction {
    /// Restore the newest entry
    Pop,
    /// List entries
    List,
}

#[derive(Args)]
pub struct ResetArgs {
    pub hash: Option<String>,
}
