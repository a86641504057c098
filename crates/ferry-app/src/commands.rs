use std::io::Write;
use std::path::Path;

use anyhow::Context;
use ferry_translator::TranslationService;
use ferry_types::{LanguagePair, Translation, TranslationInput};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::cli::{ArchiveCommand, Commands};

pub async fn execute(
    command: Commands,
    json: bool,
    service: &TranslationService,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Translate { text, from, to, provider } => {
            let input = TranslationInput::new(text);
            let pair = LanguagePair::new(from, to);
            let translation = match provider {
                Some(provider) => service.translate_with(input, pair, provider).await?,
                None => service.translate(input, pair).await?,
            };
            print_translations(out, json, &[translation])?;
        }
        Commands::Batch { from, to, file } => {
            let inputs = read_inputs(file.as_deref()).await?;
            let translations = service
                .translate_batch(inputs, LanguagePair::new(from, to))
                .await?;
            print_translations(out, json, &translations)?;
        }
        Commands::Archive { command: ArchiveCommand::Clear } => {
            service.context().archiver.clear().await;
            tracing::info!("Cleared translation archive");
        }
    }

    Ok(())
}

async fn read_inputs(file: Option<&Path>) -> anyhow::Result<Vec<TranslationInput>> {
    match file {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            read_lines(file).await
        }
        None => read_lines(tokio::io::stdin()).await,
    }
}

async fn read_lines(reader: impl AsyncRead + Unpin) -> anyhow::Result<Vec<TranslationInput>> {
    let mut lines = BufReader::new(reader).lines();
    let mut inputs = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if !line.trim().is_empty() {
            inputs.push(TranslationInput::new(line));
        }
    }
    Ok(inputs)
}

fn print_translations(
    out: &mut impl Write,
    json: bool,
    translations: &[Translation],
) -> anyhow::Result<()> {
    for translation in translations {
        if json {
            writeln!(out, "{}", serde_json::to_string(translation)?)?;
        } else {
            writeln!(out, "{}", translation.output)?;
        }
    }
    Ok(())
}
