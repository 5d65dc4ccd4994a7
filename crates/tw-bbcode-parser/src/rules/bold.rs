use crate::conf::{MergedConf, RuleConf};
use crate::error::ConfigError;
use crate::rules::paired::Paired;
use crate::rules::Rule;
use tw_types::{SinkError, TokenSink};

pub(crate) const NAME: &str = "bold";

/// Tag `[b]...[/b]`. Bold text.
#[derive(Debug)]
pub struct Bold(Paired);

impl Bold {
    pub fn new(conf: &RuleConf, delimiter: char) -> Result<Self, ConfigError> {
        MergedConf::merge(NAME, vec![], conf);
        Ok(Self(Paired::new(NAME, "b", delimiter)?))
    }
}

impl Rule for Bold {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, source: &str, sink: &mut dyn TokenSink) -> Result<String, SinkError> {
        self.0.apply(source, sink)
    }
}
