use std::rc::Rc;

use anyhow::{anyhow, Error};
use hashlink::LinkedHashMap;
use saphyr::{Yaml as SaphyrYaml, YamlLoader};

use super::Value;

/// Parses a YAML stream into one value per document.
pub fn parse_data_str(input: &str) -> Result<Vec<Value>, Error> {
    let docs = YamlLoader::load_from_str(input).map_err(|err| anyhow!("invalid data yaml: {}", err))?;
    docs.iter().map(convert_node).collect()
}

fn convert_node(yaml: &SaphyrYaml) -> Result<Value, Error> {
    match yaml {
        SaphyrYaml::Real(value) => Ok(Value::Real(Rc::new(value.clone()))),
        SaphyrYaml::Integer(value) => Ok(Value::Integer(*value)),
        SaphyrYaml::String(value) => Ok(Value::String(Rc::new(value.clone()))),
        SaphyrYaml::Boolean(value) => Ok(Value::Boolean(*value)),
        SaphyrYaml::Array(values) => {
            let values = values.iter().map(convert_node).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(Rc::new(values)))
        }
        SaphyrYaml::Hash(entries) => {
            let mut map = LinkedHashMap::new();
            for (key, value) in entries.iter() {
                map.insert(convert_node(key)?, convert_node(value)?);
            }
            Ok(Value::Hash(Rc::new(map)))
        }
        SaphyrYaml::Null => Ok(Value::Null),
        _ => Err(anyhow!("yaml aliases and invalid scalars are not supported")),
    }
}
