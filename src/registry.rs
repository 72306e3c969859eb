/*!
 * Driver registry.
 *
 * Maps driver names to constructors and cast identifiers to driver names,
 * and caches one driver instance per (record type, attribute, driver). The
 * registry is an explicit object built at start-up and passed by reference
 * to whatever binds records to their drivers.
 */

use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::app_config::Config;
use crate::attribute::{AttributeConfig, ModelSchema};
use crate::drivers::base::{DriverInit, DriverSettings};
use crate::drivers::{
    ExtraOnlyColumnDriver, HybridColumnDriver, JsonColumnDriver, TranslationDriver,
    EXTRA_ONLY_CAST, EXTRA_ONLY_DRIVER, HYBRID_CAST, HYBRID_DRIVER, JSON_CAST, JSON_DRIVER,
};
use crate::errors::{Result, TranslatableError};

/// Constructor for a named layout
pub type DriverFactory =
    Arc<dyn Fn(DriverInit) -> Result<Arc<dyn TranslationDriver>> + Send + Sync>;

/// Cache key combining record type, attribute and driver name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DriverKey {
    record_type: String,
    attribute: String,
    driver: String,
}

/// Registry of translation drivers
pub struct DriverRegistry {
    /// Settings handed to every constructed driver
    settings: Arc<DriverSettings>,

    /// Constructors by driver name
    factories: HashMap<String, DriverFactory>,

    /// Driver names by cast identifier
    cast_mappings: HashMap<String, String>,

    /// Resolved instances
    instances: RwLock<HashMap<DriverKey, Arc<dyn TranslationDriver>>>,
}

impl DriverRegistry {
    /// Create a registry with the built-in layouts and cast mappings
    pub fn new(settings: DriverSettings) -> Self {
        let mut registry = Self::empty(settings);

        registry.register(JSON_DRIVER, |init| {
            Ok(Arc::new(JsonColumnDriver::new(init)?) as Arc<dyn TranslationDriver>)
        });
        registry.register(HYBRID_DRIVER, |init| {
            Ok(Arc::new(HybridColumnDriver::new(init)?) as Arc<dyn TranslationDriver>)
        });
        registry.register(EXTRA_ONLY_DRIVER, |init| {
            Ok(Arc::new(ExtraOnlyColumnDriver::new(init)?) as Arc<dyn TranslationDriver>)
        });

        registry.register_cast_mapping(JSON_CAST, JSON_DRIVER);
        registry.register_cast_mapping(HYBRID_CAST, HYBRID_DRIVER);
        registry.register_cast_mapping(EXTRA_ONLY_CAST, EXTRA_ONLY_DRIVER);

        registry
    }

    /// Registry with the built-ins and default settings for `config`
    pub fn with_config(config: Config) -> Self {
        Self::new(DriverSettings::new(config))
    }

    /// Registry without any driver or cast mapping
    pub fn empty(settings: DriverSettings) -> Self {
        Self {
            settings: Arc::new(settings),
            factories: HashMap::new(),
            cast_mappings: HashMap::new(),
            instances: RwLock::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &Arc<DriverSettings> {
        &self.settings
    }

    pub fn config(&self) -> &Config {
        &self.settings.config
    }

    /// Add or replace a named layout.
    ///
    /// Instances built by a previous constructor of the same name are dropped
    /// from the cache.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(DriverInit) -> Result<Arc<dyn TranslationDriver>> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Arc::new(factory)).is_some() {
            self.instances.write().retain(|key, _| key.driver != name);
            info!("Replaced translation driver '{}'", name);
        } else {
            debug!("Registered translation driver '{}'", name);
        }
    }

    /// Let a declared cast imply a driver
    pub fn register_cast_mapping(&mut self, cast: impl Into<String>, driver: impl Into<String>) {
        let cast = cast.into();
        let driver = driver.into();
        debug!("Mapped cast '{}' to driver '{}'", cast, driver);
        self.cast_mappings.insert(cast, driver);
    }

    pub fn has_driver(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered driver names, sorted
    pub fn driver_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn cast_mapping(&self, cast: &str) -> Option<&str> {
        self.cast_mappings.get(cast).map(String::as_str)
    }

    /// Driver name for an attribute: explicit, then cast mapping, then `json`
    pub fn driver_name_for(&self, schema: &ModelSchema, config: &AttributeConfig) -> String {
        if let Some(driver) = config.driver() {
            return driver.to_string();
        }

        schema
            .cast_for(config.attribute())
            .and_then(|cast| self.cast_mapping(cast))
            .unwrap_or(JSON_DRIVER)
            .to_string()
    }

    /// Resolve the shared driver instance for one attribute of a record type
    pub fn resolve(
        &self,
        schema: &ModelSchema,
        config: &AttributeConfig,
    ) -> Result<Arc<dyn TranslationDriver>> {
        let driver = self.driver_name_for(schema, config);
        let key = DriverKey {
            record_type: schema.record_type.clone(),
            attribute: config.attribute().name(),
            driver,
        };

        if let Some(instance) = self.instances.read().get(&key) {
            return Ok(Arc::clone(instance));
        }

        let factory = self
            .factories
            .get(&key.driver)
            .ok_or_else(|| TranslatableError::UnknownDriver(key.driver.clone()))?;

        let instance = (**factory)(DriverInit {
            attribute: config.attribute().clone(),
            options: config.options(),
            settings: Arc::clone(&self.settings),
        })?;

        debug!(
            "Resolved {}.{} to the '{}' driver",
            key.record_type, key.attribute, key.driver
        );

        let mut instances = self.instances.write();
        Ok(Arc::clone(instances.entry(key).or_insert(instance)))
    }

    /// Number of cached driver instances
    pub fn cached_instances(&self) -> usize {
        self.instances.read().len()
    }

    pub fn clear_cache(&self) {
        self.instances.write().clear();
        debug!("Driver instance cache cleared");
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new(DriverSettings::default())
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("settings", &self.settings)
            .field("drivers", &self.driver_names())
            .field("cast_mappings", &self.cast_mappings)
            .field("cached_instances", &self.cached_instances())
            .finish()
    }
}
