//! Pattern command implementation

use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use wafgen_model::{Parameter, SemanticType};
use wafgen_rules::{is_invalid_pattern, resolve_pattern};

pub fn command() -> Command {
    Command::new("pattern")
        .about("Show the validation pattern assigned to a parameter")
        .arg(
            clap::Arg::new("type")
                .short('t')
                .long("type")
                .help("Semantic type (string, integer, long, number, boolean, date, date-time, email, uuid, ...)")
                .value_name("TYPE")
                .required(true),
        )
        .arg(
            clap::Arg::new("required")
                .short('r')
                .long("required")
                .help("Parameter is required")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("min-length")
                .long("min-length")
                .help("Minimum length")
                .value_name("N")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            clap::Arg::new("max-length")
                .long("max-length")
                .help("Maximum length")
                .value_name("N")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            clap::Arg::new("enum")
                .long("enum")
                .help("Allowed value; repeat for each value")
                .value_name("VALUE")
                .action(clap::ArgAction::Append),
        )
        .arg(
            clap::Arg::new("pattern")
                .short('p')
                .long("pattern")
                .help("Supplied pattern, kept unless it uses lookaround")
                .value_name("REGEX"),
        )
}

/// Parameter described by the command line
pub fn parameter_from_matches(matches: &ArgMatches) -> Result<Parameter> {
    let type_name = matches
        .get_one::<String>("type")
        .ok_or_else(|| anyhow!("--type is required"))?;
    let kind = parse_type(type_name)?;

    let mut param = Parameter::new("value", kind);
    param.required = matches.get_flag("required");
    param.constraints.min_length = matches.get_one::<u32>("min-length").copied();
    param.constraints.max_length = matches.get_one::<u32>("max-length").copied();
    param.constraints.pattern = matches.get_one::<String>("pattern").cloned();

    if let Some(values) = matches.get_many::<String>("enum") {
        param.is_enum = true;
        param.enum_values = Some(values.cloned().collect());
    }

    Ok(param)
}

fn parse_type(type_name: &str) -> Result<SemanticType> {
    let normalized = type_name.trim().to_ascii_lowercase();
    let kind = match normalized.as_str() {
        "int" | "int32" => SemanticType::Integer,
        "int64" => SemanticType::Long,
        "bool" => SemanticType::Boolean,
        "datetime" => SemanticType::DateTime,
        _ => serde_yaml::from_str(&normalized)
            .map_err(|e| anyhow!("Unknown type {type_name:?}: {e}"))?,
    };

    // Unrecognized names decode as `other`; only accept it when asked for
    if kind == SemanticType::Other && normalized != "other" {
        return Err(anyhow!("Unknown type {type_name:?}"));
    }
    Ok(kind)
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let param = parameter_from_matches(matches)?;

    if let Some(pattern) = param.constraints.pattern.as_deref() {
        if is_invalid_pattern(pattern) {
            eprintln!("Supplied pattern uses lookaround and was replaced");
        }
    }

    println!("{}", resolve_pattern(&param));
    Ok(())
}
