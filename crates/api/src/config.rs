//! Types for use when configuring courier modules.

use crate::*;
use std::sync::Mutex;

/// helper transcode function
fn tc<S: serde::Serialize, D: serde::de::DeserializeOwned>(
    s: &S,
) -> CourierResult<D> {
    serde_json::from_str(
        &serde_json::to_string(s)
            .map_err(|e| CourierError::other_src("encode", e))?,
    )
    .map_err(|e| CourierError::other_src("decode", e))
}

/// Denotes a type used to configure a specific courier module.
///
/// A module config is a struct with a single field named after the
/// module (for example `coreDispatch`), holding that module's settings.
/// This keeps the modules from stepping on each other inside the shared
/// [Config] map.
///
/// Module configs must be tolerant to missing properties, since the
/// config may have been written by hand. Use `#[serde(default)]`.
pub trait ModConfig:
    'static
    + Sized
    + Default
    + std::fmt::Debug
    + serde::Serialize
    + serde::de::DeserializeOwned
    + Send
    + Sync
{
}

/// Courier configuration.
#[derive(Debug, Default)]
pub struct Config(Mutex<serde_json::Map<String, serde_json::Value>>);

impl serde::Serialize for Config {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&*self.0.lock().unwrap(), serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let map: serde_json::Map<String, serde_json::Value> =
            serde::Deserialize::deserialize(deserializer)?;
        Ok(Self(Mutex::new(map)))
    }
}

impl Config {
    /// Merge the top-level properties of a module config into this config,
    /// replacing any properties that were already set under the same name.
    ///
    /// Module factories call this from `default_config` with the default
    /// value of their module config. Tests call it to override settings.
    pub fn set_module_config<M: ModConfig>(
        &self,
        module_config: &M,
    ) -> CourierResult<()> {
        let value: serde_json::Value = tc(module_config)?;
        let serde_json::Value::Object(map) = value else {
            return Err(CourierError::other(format!(
                "module config must serialize to an object: {module_config:?}"
            )));
        };
        self.0.lock().unwrap().extend(map);
        Ok(())
    }

    /// Extract a module config. Properties missing from this config are
    /// filled in from the module config defaults, extraneous properties
    /// are ignored.
    pub fn get_module_config<M: ModConfig>(&self) -> CourierResult<M> {
        let lock = self.0.lock().unwrap();
        tc(&*lock)
    }
}
