use crate::transport::Presence;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use toml_edit::{value, Array, DocumentMut};

trait ConfigSerializeDefault {
    fn fix_config(self, name: &str, doc: &mut DocumentMut);
}

macro_rules! impl_simple_default {
    ( $( $type:ty ),* ) => {
        $(
            impl ConfigSerializeDefault for $type {
                fn fix_config(self, name: &str, doc: &mut DocumentMut) {
                    doc.entry(name).or_insert_with(|| value(self));
                }
            }
        )*
    }
}

impl_simple_default!(String, bool);

impl<T> ConfigSerializeDefault for Option<T> {
    fn fix_config(self, _: &str, _: &mut DocumentMut) {
        debug_assert!(self.is_none(), "`Some` as default is unimplemented");
    }
}

/// `master` may be written as a single identity or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Masters {
    One(String),
    Many(Vec<String>),
}

impl Masters {
    pub fn identities(&self) -> Vec<String> {
        match self {
            Masters::One(identity) => vec![identity.clone()],
            Masters::Many(identities) => identities.clone(),
        }
    }
}

impl Default for Masters {
    fn default() -> Self {
        Masters::Many(Vec::new())
    }
}

impl ConfigSerializeDefault for Masters {
    fn fix_config(self, name: &str, doc: &mut DocumentMut) {
        doc.entry(name).or_insert_with(|| match self {
            Masters::One(identity) => value(identity),
            Masters::Many(identities) => value(identities.into_iter().collect::<Array>()),
        });
    }
}

macro_rules! gen_config {
    (
        $( $name:ident: $type:ty = $default:expr),*
    ) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct BotConfig {
            $(
                pub $name: $type,
            )*
        }

        impl Default for BotConfig {
            fn default() -> Self {
                Self {
                    $(
                        $name: $default,
                    )*
                }
            }
        }

        impl BotConfig {
            /// Reads `config_file`, writing back any keys that were missing with
            /// their default values.
            pub fn load(config_file: impl AsRef<Path>) -> Result<BotConfig> {
                let config_file = config_file.as_ref();
                let str = if config_file.exists() {
                    fs::read_to_string(config_file)
                        .with_context(|| format!("Failed to read {}", config_file.display()))?
                } else {
                    String::new()
                };

                let patched = Self::patch(&str)?;
                if str != patched {
                    fs::write(config_file, &patched)
                        .with_context(|| format!("Failed to write {}", config_file.display()))?;
                }

                Self::parse(&patched)
            }

            /// Parses a config document, filling in defaults for missing keys.
            pub fn from_toml(source: &str) -> Result<BotConfig> {
                Self::parse(&Self::patch(source)?)
            }

            fn patch(source: &str) -> Result<String> {
                let mut doc = source
                    .parse::<DocumentMut>()
                    .context("Config is not valid TOML")?;

                $(
                    <$type as ConfigSerializeDefault>::fix_config($default, stringify!($name), &mut doc);
                )*

                Ok(doc.to_string())
            }

            fn parse(source: &str) -> Result<BotConfig> {
                toml::from_str(source).context("Config has invalid values")
            }
        }
    };
}

gen_config! {
    name: String = "jabbot".to_string(),
    master: Masters = Masters::default(),
    is_public: bool = false,
    misunderstood_message: bool = true,
    presence: Option<Presence> = None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Show;

    #[test]
    fn empty_document_gets_defaults() {
        let config = BotConfig::from_toml("").unwrap();
        assert_eq!(config.name, "jabbot");
        assert_eq!(config.master, Masters::Many(Vec::new()));
        assert!(!config.is_public);
        assert!(config.misunderstood_message);
        assert!(config.presence.is_none());
    }

    #[test]
    fn patch_inserts_missing_keys_only() {
        let patched = BotConfig::patch("name = \"helper\"\n").unwrap();
        assert!(patched.contains("name = \"helper\""));
        assert!(patched.contains("is_public = false"));
        assert!(patched.contains("misunderstood_message = true"));
        assert!(patched.contains("master = []"));
        assert!(!patched.contains("presence"));
    }

    #[test]
    fn single_master() {
        let config = BotConfig::from_toml("master = \"boss@example.org\"").unwrap();
        assert_eq!(config.master.identities(), ["boss@example.org"]);
    }

    #[test]
    fn many_masters() {
        let config =
            BotConfig::from_toml("master = [\"a@example.org\", \"b@example.org\"]").unwrap();
        assert_eq!(config.master.identities(), ["a@example.org", "b@example.org"]);
    }

    #[test]
    fn presence_table() {
        let source = r#"
            is_public = true

            [presence]
            show = "dnd"
            status = "Busy"
            priority = 3
        "#;
        let config = BotConfig::from_toml(source).unwrap();
        assert!(config.is_public);
        let presence = config.presence.unwrap();
        assert_eq!(presence.show, Show::Dnd);
        assert_eq!(presence.status.as_deref(), Some("Busy"));
        assert_eq!(presence.priority, Some(3));
    }

    #[test]
    fn wrong_type_is_an_error() {
        assert!(BotConfig::from_toml("is_public = \"yes\"").is_err());
    }
}
