use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tocadora")]
#[command(author, version, about = "Interactive media fetch pipeline with a diagnostic CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a source URL and download it into a verified artifact
    Fetch {
        /// Source URL (e.g. a YouTube watch URL)
        url: String,

        /// Output format: audio or video
        #[arg(short, long, default_value = "audio")]
        format: String,

        /// Directory the artifact lands in (defaults to DOWNLOAD_DIR)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the direct media URL the provider resolves, without downloading
    Resolve {
        /// Source URL to resolve
        url: String,

        /// Output format: audio or video
        #[arg(short, long, default_value = "audio")]
        format: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
