use std::{
    collections::HashSet,
    fmt::{Display, Formatter},
    fs::File,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    error::{ContextExt, SiteErr},
    schema::SchemaVersion,
};

pub const CONFIG_FILE: &str = "config.yaml";

/// Build plugins the site registers. They are only declared here; the render pipeline runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Integration {
    Tailwind,
    Mdx,
    Sitemap,
}

impl Display for Integration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Integration::Tailwind => write!(f, "tailwind"),
            Integration::Mdx => write!(f, "mdx"),
            Integration::Sitemap => write!(f, "sitemap"),
        }
    }
}

fn default_content_path() -> PathBuf {
    PathBuf::from("src/content")
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Deployed origin, needed to build absolute sitemap URLs.
    #[serde(default)]
    pub site: Option<Url>,
    #[serde(default = "default_content_path")]
    pub content_path: PathBuf,
    #[serde(default)]
    pub schema: SchemaVersion,
    #[serde(default)]
    pub integrations: Vec<Integration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: None,
            content_path: default_content_path(),
            schema: SchemaVersion::default(),
            integrations: vec![],
        }
    }
}

impl TryFrom<&Path> for Config {
    type Error = SiteErr;
    fn try_from(value: &Path) -> Result<Self, SiteErr> {
        let config_path = value.join(CONFIG_FILE);
        let f = File::open(&config_path)
            .with_context(|| format!("config file: {}", config_path.display()))?;
        let config: Config = serde_yaml::from_reader(f)
            .with_context(|| format!("config file: {}", config_path.display()))?;
        config.check()?;
        Ok(config)
    }
}

impl Config {
    pub fn has(&self, integration: Integration) -> bool {
        self.integrations.contains(&integration)
    }

    pub fn check(&self) -> Result<(), SiteErr> {
        let mut seen = HashSet::new();
        for integration in self.integrations.iter() {
            if !seen.insert(integration) {
                return Err(SiteErr::Config(format!(
                    "integration `{integration}` is registered more than once"
                )));
            }
        }
        if self.has(Integration::Sitemap) && self.site.is_none() {
            return Err(SiteErr::Config(
                "the `sitemap` integration requires `site` to be set".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn loads_fixture_config() {
        let config = Config::try_from(Path::new("./test/fixtures")).unwrap();
        assert_eq!(
            config.site,
            Some(Url::parse("https://www.webry.com").unwrap())
        );
        assert_eq!(config.content_path, PathBuf::from("src/content"));
        assert_eq!(config.schema, SchemaVersion::V3);
        assert_eq!(
            config.integrations,
            vec![Integration::Tailwind, Integration::Mdx, Integration::Sitemap]
        );
    }

    #[test]
    fn defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.site, None);
        assert_eq!(config.content_path, PathBuf::from("src/content"));
        assert_eq!(config.schema, SchemaVersion::V3);
        assert!(config.integrations.is_empty());
        assert!(config.check().is_ok());
    }

    #[test]
    fn sitemap_needs_site() {
        let config: Config = serde_yaml::from_str("integrations: [sitemap]").unwrap();
        assert!(matches!(config.check(), Err(SiteErr::Config(_))));
    }

    #[test]
    fn duplicate_integration() {
        let config: Config = serde_yaml::from_str("integrations: [mdx, tailwind, mdx]").unwrap();
        assert_eq!(
            config.check().unwrap_err().to_string(),
            "config error: integration `mdx` is registered more than once"
        );
    }

    #[test]
    fn unknown_integration_or_key() {
        assert!(serde_yaml::from_str::<Config>("integrations: [react]").is_err());
        assert!(serde_yaml::from_str::<Config>("title: blog").is_err());
    }

    #[test]
    fn missing_config_file() {
        let err = Config::try_from(Path::new("./test/missing")).unwrap_err();
        assert!(err.to_string().starts_with("config file: ./test/missing/config.yaml"));
    }
}
