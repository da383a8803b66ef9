//! Lectura de la descripcion de la cafetera y de los pedidos desde un archivo JSON
use std::{
    collections::HashSet,
    fmt,
    fs::File,
    io::{BufReader, Read},
    marker::PhantomData,
    path::Path,
    time::Duration,
};

use log::{debug, info};
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::{
    beverage::Beverage,
    constants::{
        DEFAULT_BACKLOG_CAPACITY, DEFAULT_PREPARATION_MS_PER_UNIT, DEFAULT_SHUTDOWN_GRACE_MS,
        DEFAULT_STATISTICS_INTERVAL_MS,
    },
    errors::CoffeeMachineError,
};

/// Parametros opcionales de la cafetera. Los que no vienen en el archivo toman el valor de `constants`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MachineSettings {
    pub backlog_capacity: usize,
    pub shutdown_grace_ms: u64,
    pub preparation_ms_per_unit: u64,
    pub statistics_interval_ms: u64,
}

impl Default for MachineSettings {
    fn default() -> Self {
        MachineSettings {
            backlog_capacity: DEFAULT_BACKLOG_CAPACITY,
            shutdown_grace_ms: DEFAULT_SHUTDOWN_GRACE_MS,
            preparation_ms_per_unit: DEFAULT_PREPARATION_MS_PER_UNIT,
            statistics_interval_ms: DEFAULT_STATISTICS_INTERVAL_MS,
        }
    }
}

impl MachineSettings {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    pub fn preparation_time_per_unit(&self) -> Duration {
        Duration::from_millis(self.preparation_ms_per_unit)
    }

    pub fn statistics_interval(&self) -> Option<Duration> {
        (self.statistics_interval_ms > 0).then(|| Duration::from_millis(self.statistics_interval_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    pub outlets: usize,
    pub ingredients: Vec<(String, u64)>,
    pub settings: MachineSettings,
}

/// Bebidas pedidas, en el orden del archivo
pub type OrderBatch = Vec<Beverage>;

/// Mapa JSON leido como lista de pares para conservar el orden del documento
/// y poder detectar claves repetidas.
struct Entries<V>(Vec<(String, V)>);

impl<V> Default for Entries<V> {
    fn default() -> Self {
        Entries(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[derive(Deserialize)]
struct Outlets {
    #[serde(alias = "count")]
    count_n: usize,
}

#[derive(Deserialize)]
struct JsonMachine {
    outlets: Outlets,
    total_items_quantity: Entries<u64>,
    #[serde(default)]
    beverages: Entries<Entries<u64>>,
}

#[derive(Deserialize)]
struct JsonInput {
    machine: JsonMachine,
    #[serde(default)]
    settings: MachineSettings,
}

pub fn read_machine<P: AsRef<Path>>(
    path: P,
) -> Result<(MachineConfig, OrderBatch), CoffeeMachineError> {
    let file = File::open(path.as_ref())?;
    debug!("[READER] Reading {}", path.as_ref().display());
    parse_machine(BufReader::new(file))
}

pub fn parse_machine<R: Read>(reader: R) -> Result<(MachineConfig, OrderBatch), CoffeeMachineError> {
    let input: JsonInput = serde_json::from_reader(reader)?;
    let (config, batch) = validate(input)?;
    info!(
        "[READER] Machine with {} outlets, {} ingredients and {} beverages ordered",
        config.outlets,
        config.ingredients.len(),
        batch.len()
    );
    Ok((config, batch))
}

fn validate(input: JsonInput) -> Result<(MachineConfig, OrderBatch), CoffeeMachineError> {
    let JsonInput { machine, settings } = input;
    if machine.outlets.count_n == 0 {
        return Err(CoffeeMachineError::InvalidConfiguration(
            "the machine needs at least one outlet".to_string(),
        ));
    }
    if settings.backlog_capacity == 0 {
        return Err(CoffeeMachineError::InvalidConfiguration(
            "the backlog capacity must be positive".to_string(),
        ));
    }

    let ingredients = machine.total_items_quantity.0;
    check_unique(&ingredients)?;

    let beverages = machine.beverages.0;
    check_unique(&beverages)?;
    let batch = beverages
        .into_iter()
        .map(|(name, requirements)| to_beverage(name, requirements.0))
        .collect::<Result<OrderBatch, CoffeeMachineError>>()?;

    let config = MachineConfig {
        outlets: machine.outlets.count_n,
        ingredients,
        settings,
    };
    Ok((config, batch))
}

fn to_beverage(name: String, ingredients: Vec<(String, u64)>) -> Result<Beverage, CoffeeMachineError> {
    check_unique(&ingredients)?;
    if let Some((ingredient, _)) = ingredients.iter().find(|(_, quantity)| *quantity == 0) {
        return Err(CoffeeMachineError::InvalidConfiguration(format!(
            "{} requires a zero quantity of {}",
            name, ingredient
        )));
    }
    Ok(Beverage::new(name, ingredients))
}

fn check_unique<V>(entries: &[(String, V)]) -> Result<(), CoffeeMachineError> {
    let mut seen = HashSet::new();
    for (key, _) in entries {
        if !seen.insert(key.as_str()) {
            return Err(CoffeeMachineError::DuplicateEntry(key.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MACHINE: &str = r#"{
        "machine": {
            "outlets": { "count_n": 3 },
            "total_items_quantity": {
                "hot_water": 500,
                "hot_milk": 500,
                "ginger_syrup": 100
            },
            "beverages": {
                "hot_tea": { "hot_water": 200, "hot_milk": 100, "ginger_syrup": 10 },
                "black_tea": { "hot_water": 300, "ginger_syrup": 30 }
            }
        }
    }"#;

    #[test]
    fn should_read_outlets_ingredients_and_beverages() {
        let (config, batch) = parse_machine(MACHINE.as_bytes()).unwrap();

        assert_eq!(3, config.outlets);
        assert_eq!(
            vec![
                ("hot_water".to_string(), 500),
                ("hot_milk".to_string(), 500),
                ("ginger_syrup".to_string(), 100)
            ],
            config.ingredients
        );
        assert_eq!(2, batch.len());
        assert_eq!("hot_tea", batch[0].name);
        assert_eq!(("hot_milk".to_string(), 100), batch[0].ingredients[1]);
        assert_eq!("black_tea", batch[1].name);
    }

    #[test]
    fn should_use_default_settings_when_missing() {
        let (config, _) = parse_machine(MACHINE.as_bytes()).unwrap();
        assert_eq!(MachineSettings::default(), config.settings);
        assert_eq!(Duration::from_millis(5000), config.settings.shutdown_grace());
        assert_eq!(None, config.settings.statistics_interval());
    }

    #[test]
    fn should_read_partial_settings() {
        let input = r#"{
            "machine": { "outlets": { "count": 1 }, "total_items_quantity": {} },
            "settings": { "backlog_capacity": 5, "statistics_interval_ms": 20 }
        }"#;
        let (config, batch) = parse_machine(input.as_bytes()).unwrap();

        assert_eq!(1, config.outlets);
        assert_eq!(true, batch.is_empty());
        assert_eq!(5, config.settings.backlog_capacity);
        assert_eq!(
            Some(Duration::from_millis(20)),
            config.settings.statistics_interval()
        );
        assert_eq!(DEFAULT_SHUTDOWN_GRACE_MS, config.settings.shutdown_grace_ms);
    }

    #[test]
    fn should_reject_duplicate_beverage_names() {
        let input = r#"{
            "machine": {
                "outlets": { "count_n": 1 },
                "total_items_quantity": { "hot_water": 500 },
                "beverages": {
                    "hot_tea": { "hot_water": 200 },
                    "hot_tea": { "hot_water": 100 }
                }
            }
        }"#;
        let result = parse_machine(input.as_bytes());
        assert_eq!(
            true,
            matches!(result, Err(CoffeeMachineError::DuplicateEntry(name)) if name == "hot_tea")
        );
    }

    #[test]
    fn should_reject_a_machine_without_outlets() {
        let input = r#"{
            "machine": { "outlets": { "count_n": 0 }, "total_items_quantity": {} }
        }"#;
        let result = parse_machine(input.as_bytes());
        assert_eq!(
            true,
            matches!(result, Err(CoffeeMachineError::InvalidConfiguration(_)))
        );
    }

    #[test]
    fn should_reject_zero_requirements() {
        let input = r#"{
            "machine": {
                "outlets": { "count_n": 1 },
                "total_items_quantity": { "hot_water": 500 },
                "beverages": { "hot_tea": { "hot_water": 0 } }
            }
        }"#;
        let result = parse_machine(input.as_bytes());
        assert_eq!(
            true,
            matches!(result, Err(CoffeeMachineError::InvalidConfiguration(_)))
        );
    }

    #[test]
    fn should_reject_malformed_input() {
        let result = parse_machine(r#"{ "machine": { "outlets": 3 } }"#.as_bytes());
        assert_eq!(true, matches!(result, Err(CoffeeMachineError::InvalidInput(_))));
    }

    #[test]
    fn should_fail_when_the_file_does_not_exist() {
        let result = read_machine("this_file_does_not_exist.json");
        assert_eq!(
            true,
            matches!(result, Err(CoffeeMachineError::FileReaderError(_)))
        );
    }
}
