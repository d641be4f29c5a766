//! Command line surface.

use clap::{Parser, Subcommand, ValueEnum};
use model::{Attribute, IntoAttribute, FLOAT_TYPE, INT_TYPE};

/// Inspect and modify entities in a context broker.
#[derive(Debug, Parser)]
#[command(name = "ctxbroker", version)]
pub struct Cli {
    /// Broker base URL (overrides CONTEXT_BROKER_URL).
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Per-request timeout in milliseconds (overrides CONTEXT_BROKER_TIMEOUT_MS).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log output format. Logs are written to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print `true` if the entity exists, `false` otherwise.
    Exists { entity_type: String, id: String },

    /// Print one entity as JSON.
    Get { entity_type: String, id: String },

    /// Print every entity of a type, or a single page with `--page`.
    List {
        entity_type: String,
        #[arg(long)]
        page: Option<u64>,
    },

    /// Create an entity from `name[:type]=value` attributes.
    Create {
        entity_type: String,
        id: String,
        #[arg(value_parser = parse_attribute)]
        attributes: Vec<NamedAttribute>,
    },

    /// Update an entity from `name[:type]=value` attributes.
    Update {
        entity_type: String,
        id: String,
        #[arg(value_parser = parse_attribute)]
        attributes: Vec<NamedAttribute>,
    },

    /// Delete an entity.
    Delete { entity_type: String, id: String },
}

/// One `name[:type]=value` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedAttribute {
    pub name: String,
    pub attribute: Attribute,
}

/// Parses `name=value` (string), `name:int=42`, `name:float=1.5`, or
/// `name:<tag>=value` (custom tag kept verbatim).
pub fn parse_attribute(raw: &str) -> Result<NamedAttribute, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name[:type]=value, got '{raw}'"))?;
    let (name, tag) = match key.split_once(':') {
        Some((name, tag)) => (name, Some(tag)),
        None => (key, None),
    };
    if name.is_empty() {
        return Err(format!("attribute name is empty in '{raw}'"));
    }

    let attribute = match tag {
        None => value.into_attribute(),
        Some(INT_TYPE) => value
            .parse::<i64>()
            .map_err(|e| format!("'{value}' is not an int: {e}"))?
            .into_attribute(),
        Some(FLOAT_TYPE) => value
            .parse::<f32>()
            .map_err(|e| format!("'{value}' is not a float: {e}"))?
            .into_attribute(),
        Some(custom) => Ok(Attribute::new(custom, value)),
    }
    .map_err(|e| e.to_string())?;

    Ok(NamedAttribute {
        name: name.to_string(),
        attribute,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use model::STRING_TYPE;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn untagged_attribute_is_a_string() {
        let parsed = parse_attribute("name=main hall").unwrap();
        assert_eq!(parsed.name, "name");
        assert_eq!(parsed.attribute, Attribute::new(STRING_TYPE, "main hall"));
    }

    #[test]
    fn typed_attributes_are_validated_and_tagged() {
        assert_eq!(
            parse_attribute("floor:int=3").unwrap().attribute,
            Attribute::new(INT_TYPE, "3")
        );
        assert_eq!(
            parse_attribute("temperature:float=21.50").unwrap().attribute,
            Attribute::new(FLOAT_TYPE, "21.5")
        );
        assert!(parse_attribute("floor:int=three").is_err());
        assert!(parse_attribute("temperature:float=warm").is_err());
    }

    #[test]
    fn custom_tags_pass_through() {
        let parsed = parse_attribute("location:geo:point=41.3, 2.1").unwrap();
        assert_eq!(parsed.name, "location");
        assert_eq!(parsed.attribute, Attribute::new("geo:point", "41.3, 2.1"));
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(parse_attribute("no-equals-sign").is_err());
        assert!(parse_attribute("=value").is_err());
        assert!(parse_attribute(":int=1").is_err());
    }

    #[test]
    fn parses_create_with_global_flags() {
        let cli = Cli::try_parse_from([
            "ctxbroker",
            "create",
            "Room",
            "r1",
            "floor:int=2",
            "--url",
            "http://orion:1026",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("http://orion:1026"));
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Command::Create {
                entity_type,
                id,
                attributes,
            } => {
                assert_eq!(entity_type, "Room");
                assert_eq!(id, "r1");
                assert_eq!(attributes.len(), 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_page_is_optional() {
        let cli = Cli::try_parse_from(["ctxbroker", "list", "Room", "--page", "3"]).unwrap();
        assert!(matches!(cli.command, Command::List { page: Some(3), .. }));
    }
}
