use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sticker",
    bin_name = "sticker",
    version,
    disable_help_subcommand = true,
    about = "Generate, store and organize AI stickers",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (also STICKER_DATA_DIR; defaults to the OS data directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to sticker.toml in the config directory)
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Generate a sticker from a photo and a prompt
    Generate {
        /// What the sticker should say or show
        #[arg(short, long)]
        prompt: String,

        /// Photo to build the sticker from
        #[arg(short, long, value_name = "FILE")]
        image: PathBuf,
    },

    /// Ask the backend for a caption idea
    Suggest {
        /// What the caption is about
        context: Option<String>,
    },

    /// Watch a rewarded ad to unlock more generations
    Reward,

    /// Show today's generation quota
    Limit,

    /// List stickers, newest first
    #[command(alias = "ls")]
    Stickers,

    /// Show one sticker
    Show { id: String },

    /// Save local image files (or directories of them) as stickers
    Import {
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Pack to put the imported stickers in
        #[arg(long, value_name = "PACK_ID")]
        pack: Option<String>,
    },

    /// Copy a sticker image to a file or directory
    Export {
        id: String,
        #[arg(value_name = "DEST")]
        dest: PathBuf,
    },

    /// Move a sticker into a pack
    Add {
        #[arg(value_name = "STICKER_ID")]
        sticker: String,
        #[arg(value_name = "PACK_ID")]
        pack: String,
    },

    /// Delete a sticker and its image
    #[command(alias = "rm")]
    Delete { id: String },

    /// List packs, newest first
    Packs,

    /// Manage one pack
    Pack {
        #[command(subcommand)]
        action: PackCommands,
    },

    /// Show (creating if needed) today's pack
    Today,

    /// Verify and fix sticker/pack references
    Doctor,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum PackCommands {
    /// Show a pack and its stickers
    Show { id: String },

    /// Create a named pack
    Create { name: String },

    /// Delete a pack, keeping its stickers
    Delete { id: String },
}
