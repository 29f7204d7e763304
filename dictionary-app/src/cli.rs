use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "dictionary-app",
    version,
    about = "Look up English word definitions"
)]
pub struct Args {
    /// Word to look up once, starts the interactive prompt when omitted
    pub word: Option<String>,

    /// Dictionary endpoint the word is appended to
    #[arg(long)]
    pub base_url: Option<String>,

    /// Config file to use instead of the one in the user config directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
