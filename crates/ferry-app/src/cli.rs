use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ferry_translator::Provider;

#[derive(Parser, Debug)]
#[command(name = "ferry", version, about = "Translate text through web translation front-ends")]
pub struct Cli {
    /// JSON config file, defaults to ./ferry.json when present
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Print translations as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a single text
    Translate {
        text: String,
        #[arg(long, default_value = "en")]
        from: String,
        #[arg(long)]
        to: String,
        /// Use only this provider instead of falling back through all of them
        #[arg(long)]
        provider: Option<Provider>,
    },
    /// Translate every non-blank line of a file, or of stdin
    Batch {
        #[arg(long, default_value = "en")]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Manage the translation archive
    Archive {
        #[command(subcommand)]
        command: ArchiveCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ArchiveCommand {
    /// Remove every archived translation
    Clear,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn provider_is_parsed_by_name() {
        let cli = Cli::parse_from([
            "ferry", "translate", "Hello", "--to", "fr", "--provider", "deepl",
        ]);

        match cli.command {
            Commands::Translate { text, from, to, provider } => {
                assert_eq!(text, "Hello");
                assert_eq!(from, "en");
                assert_eq!(to, "fr");
                assert_eq!(provider, Some(Provider::DeepL));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
