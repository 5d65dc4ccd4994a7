use crate::parse::run_parse_command;
use crate::render::run_render_command;
use crate::rules::run_rules_command;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};

///////// Args /////////

#[derive(Clone, Debug, Args)]
pub struct ConfigArgs {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to the toml file configuring rules. Use defaults when absent"
    )]
    pub config: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ParseArgs {
    #[arg(help = "File path to parse content")]
    pub file: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(
        short = 'r',
        long = "rule",
        help = "Only print tokens of this rule. Can be repeated"
    )]
    pub rules: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct RenderArgs {
    #[arg(help = "File path to render content")]
    pub file: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[arg(short = 'o', long = "output", help = "File to save rendered bbcode")]
    pub output: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct RulesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

///////// Subcommand /////////

#[derive(Clone, Debug, Parser)]
#[command(name = "tw")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    #[command(about = "parse bbcode file into source and tokens, print as json")]
    Parse(ParseArgs),

    #[command(about = "parse bbcode file and render the tokens back to bbcode")]
    Render(RenderArgs),

    #[command(about = "print configuration of all rules as toml")]
    Rules(RulesArgs),
}

/// Main entry of all subcommands.
pub async fn run_command_with_args(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Parse(parse_args) => run_parse_command(parse_args).await,
        Command::Render(render_args) => run_render_command(render_args).await,
        Command::Rules(rules_args) => run_rules_command(rules_args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from(["tw", "parse", "a.txt", "-c", "wiki.toml", "-r", "url", "-r", "image"]);
        let Command::Parse(args) = cli.command else {
            panic!("expected parse command");
        };
        assert_eq!(args.file, "a.txt");
        assert_eq!(args.config.config.as_deref(), Some("wiki.toml"));
        assert_eq!(args.rules, vec!["url".to_owned(), "image".to_owned()]);
    }

    #[test]
    fn test_rules_args() {
        let cli = Cli::parse_from(["tw", "rules"]);
        assert!(matches!(cli.command, Command::Rules(RulesArgs { config: ConfigArgs { config: None } })));
    }
}
