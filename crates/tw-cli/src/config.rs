use anyhow::{Context, Result};
use tokio::fs;
use tw_wiki::{Wiki, WikiConfig};

/// Parse wiki configuration in toml format.
pub(crate) fn parse_config(data: &str) -> Result<WikiConfig> {
    toml::from_str(data).context("invalid config")
}

/// Build the wiki from the config file at `path`, or the default one.
pub(crate) async fn load_wiki(path: Option<&str>) -> Result<Wiki> {
    let config = match path {
        Some(path) => {
            let data = fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read config file {path}"))?;
            parse_config(data.as_str())?
        }
        None => WikiConfig::default(),
    };
    Wiki::from_config(&config).context("invalid wiki config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tw_bbcode_parser::{ConfValue, RuleName};

    #[test]
    fn test_parse_config() {
        let config = parse_config(
            r#"
token_limit = 100
disabled = ["subscript"]

[rules.url]
inline_enable = false
schemes = ["http", "https"]

[rules.blockquote]
max_depth = 5
"#,
        )
        .unwrap();
        assert_eq!(config.delimiter, None);
        assert_eq!(config.token_limit, Some(100));
        assert_eq!(config.disabled, vec!["subscript".to_owned()]);
        assert_eq!(
            config.rules["url"].get("schemes"),
            Some(&ConfValue::List(vec!["http".to_owned(), "https".to_owned()]))
        );
        assert_eq!(config.rules["blockquote"].get("max_depth"), Some(&ConfValue::Number(5)));

        let wiki = Wiki::from_config(&config).unwrap();
        assert!(!wiki.is_enabled(RuleName::Subscript));
    }

    #[test]
    fn test_unknown_rule_in_config() {
        let config = parse_config("[rules.italic]\nenable = true\n").unwrap();
        assert!(Wiki::from_config(&config).is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let config = Wiki::new().config();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(parse_config(text.as_str()).unwrap(), config);
    }
}
