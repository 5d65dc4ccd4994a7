use crate::cmd::RenderArgs;
use crate::config::load_wiki;
use anyhow::Context;
use tokio::fs;
use tracing::debug;
use tw_bbcode::BBCodeRender;

pub async fn run_render_command(args: RenderArgs) -> anyhow::Result<()> {
    let mut wiki = load_wiki(args.config.config.as_deref()).await?;
    let content = fs::read_to_string(args.file)
        .await
        .context("when reading content file")?;
    let output = wiki
        .transform(content.as_str(), &BBCodeRender)
        .context("failed to render content")?;
    debug!("rendered {} tokens", wiki.store().len());

    match args.output {
        Some(path) => fs::write(&path, output)
            .await
            .with_context(|| format!("failed to save rendered content to {path}")),
        None => {
            print!("{output}");
            Ok(())
        }
    }
}
