use crate::cmd::ParseArgs;
use crate::config::load_wiki;
use anyhow::Context;
use serde::Serialize;
use tokio::fs;
use tw_bbcode_parser::RuleName;
use tw_types::Token;

#[derive(Debug, Serialize)]
struct ParsedToken<'a> {
    id: usize,

    #[serde(flatten)]
    token: &'a Token,
}

/// Parsed document dumped as json.
#[derive(Debug, Serialize)]
struct ParsedDocument<'a> {
    source: &'a str,
    tokens: Vec<ParsedToken<'a>>,
}

pub async fn run_parse_command(args: ParseArgs) -> anyhow::Result<()> {
    let filter = args
        .rules
        .iter()
        .map(|x| x.parse::<RuleName>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid rule filter")?;

    let mut wiki = load_wiki(args.config.config.as_deref()).await?;
    let content = fs::read_to_string(args.file)
        .await
        .context("when reading content file")?;
    wiki.parse(content.as_str())
        .context("failed to parse content")?;

    let document = ParsedDocument {
        source: wiki.source(),
        tokens: wiki
            .tokens(filter.as_slice())
            .into_iter()
            .map(|(id, token)| ParsedToken { id, token })
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
