use crate::cmd::RulesArgs;
use crate::config::load_wiki;
use anyhow::Context;

pub async fn run_rules_command(args: RulesArgs) -> anyhow::Result<()> {
    let wiki = load_wiki(args.config.config.as_deref()).await?;
    let text = toml::to_string(&wiki.config()).context("failed to serialize rules config")?;
    print!("{text}");
    Ok(())
}
