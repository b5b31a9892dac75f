use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use bridge_interfaces::{ConfigConsumer, ConfigProviderInterface};
use toml::{Table, Value};

/// The implementation of a configuration loader that uses the `toml` backend.
#[derive(Default)]
pub struct TomlConfigProvider {
    /// Every section is a top-level key of this table, named by [`ConfigConsumer::KEY`].
    table: Mutex<Table>,
}

impl Clone for TomlConfigProvider {
    fn clone(&self) -> Self {
        Self {
            table: Mutex::new(self.into_inner()),
        }
    }
}

impl TomlConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inject<T: ConfigConsumer>(&self, config: T::Config) -> Result<()> {
        let value = Value::try_from(&config)
            .with_context(|| format!("Could not serialize the '{}' config.", T::KEY))?;
        self.lock().insert(T::KEY.to_owned(), value);
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow!(
                "The configuration file '{}' does not exist.",
                path.to_string_lossy()
            ));
        }

        let content = fs::read_to_string(path).with_context(|| {
            format!(
                "IO: Could not load the configuration file '{}'.",
                path.to_string_lossy()
            )
        })?;

        let table = toml::from_str::<Table>(&content).with_context(|| {
            format!(
                "Could not parse the configuration file '{}' as toml.",
                path.to_string_lossy()
            )
        })?;

        Ok(Self {
            table: table.into(),
        })
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(&path, self.serialize_config()).with_context(|| {
            format!(
                "Could not write the configuration file: {}",
                path.as_ref().to_string_lossy()
            )
        })
    }

    pub fn into_inner(&self) -> Table {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Table> {
        // A poisoned table is still a valid table, every write is a single insert.
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigProviderInterface for TomlConfigProvider {
    fn get<S: ConfigConsumer>(&self) -> Result<S::Config> {
        tracing::trace!("Getting the config for {}", std::any::type_name::<S>());

        let mut table = self.lock();

        let item: S::Config = match table.get(S::KEY) {
            Some(v) => v
                .clone()
                .try_into()
                .with_context(|| format!("Failed to deserialize '{}' config", S::KEY))?,
            None => S::Config::default(),
        };

        // Amend the internal table with the parsed or default item to be serialized later.
        let value = Value::try_from(&item)
            .with_context(|| format!("Could not serialize the '{}' config.", S::KEY))?;
        table.insert(S::KEY.into(), value);

        Ok(item)
    }

    fn serialize_config(&self) -> String {
        // Every value in the table came out of `Value::try_from`, so this cannot fail.
        toml::to_string(&*self.lock()).unwrap_or_default()
    }
}
