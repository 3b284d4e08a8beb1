use crate::headers::{cors_headers, merge_headers, HeaderMap};
use crate::response::Responder;
use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub default_headers: HeaderMap,
    #[serde(default)]
    pub enable_cors: bool,
}

impl Configuration {
    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Configuration::default()))
            // .merge fills in any missing values from the environment
            .merge(Env::prefixed("APP_"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Loads the environment, then lets values from `json` replace it. Used
    /// when the configuration document comes from a parameter store.
    pub fn load_with_json(json: &str) -> Result<Self, figment::Error> {
        Self::figment().merge(Json::string(json)).extract()
    }

    /// Builds a responder whose defaults are the configured headers, laid
    /// over the CORS headers when CORS is enabled.
    pub fn responder(&self) -> Responder {
        if self.enable_cors {
            Responder::new(merge_headers(&[&cors_headers(), &self.default_headers]))
        } else {
            Responder::new(self.default_headers.clone())
        }
    }
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Configuration {{ default_headers: {:?}, enable_cors: {} }}",
            self.default_headers, self.enable_cors
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::configuration::Configuration;

    #[test]
    fn when_nothing_is_set_should_load_defaults() {
        figment::Jail::expect_with(|_jail| {
            let config = Configuration::load()?;

            assert!(config.default_headers.is_empty());
            assert!(!config.enable_cors);

            Ok(())
        });
    }

    #[test]
    fn when_cors_enabled_in_env_should_load() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("APP_ENABLE_CORS", "true");

            let config = Configuration::load()?;

            assert!(config.enable_cors);

            Ok(())
        });
    }

    #[test]
    fn when_json_is_given_should_override_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("APP_ENABLE_CORS", "true");

            let config = Configuration::load_with_json(stringify!({
                "enable_cors": false,
                "default_headers": { "Content-Type": "application/json" }
            }))?;

            assert!(!config.enable_cors);
            assert_eq!(config.default_headers["Content-Type"], "application/json");

            Ok(())
        });
    }

    #[test]
    fn when_cors_enabled_responder_should_carry_cors_under_configured_headers() {
        figment::Jail::expect_with(|_jail| {
            let config = Configuration::load_with_json(stringify!({
                "enable_cors": true,
                "default_headers": { "Access-Control-Allow-Origin": "https://example.com" }
            }))?;

            let resp = config.responder().ok(None, None);

            assert_eq!(
                resp.headers["Access-Control-Allow-Origin"],
                "https://example.com"
            );
            assert_eq!(
                resp.headers["Access-Control-Allow-Methods"],
                "OPTIONS,GET,PUT,POST,PATCH,DELETE"
            );

            Ok(())
        });
    }

    #[test]
    fn when_cors_disabled_responder_should_only_carry_configured_headers() {
        let config = Configuration::default();

        assert!(config.responder().ok(None, None).headers.is_empty());
    }
}
