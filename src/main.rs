use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use xml_preprocessor::config;
use xml_preprocessor::error::{self, XppError, XppResult};
use xml_preprocessor::{RuntimeValues, XmlPreprocessor};

/// Evaluates a conditional expression of the XML preprocessor.
#[derive(Parser, Debug)]
#[command(name = "xpp", version, about)]
struct Args {
    /// Expression to evaluate, e.g. "version GTE 16.4 AND market =~ /^en-/".
    expression: String,

    /// JSON file with runtime values.
    #[arg(long, value_name = "FILE")]
    values: Option<PathBuf>,

    /// Binds a string value.
    #[arg(long = "var", value_name = "NAME=TEXT")]
    vars: Vec<String>,

    /// Binds a version value.
    #[arg(long = "ver", value_name = "NAME=DOTTED")]
    versions: Vec<String>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    let values = match build_values(&args) {
        Ok(values) => values,
        Err(e) => {
            let _ = error::print_errors(&args.expression, &[e]);
            return ExitCode::from(2)
        }
    };

    match run(&args.expression, values, true) {
        Ok(result) => {
            println!("{}", result);
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::from(2),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Collects the values file first, then the command-line bindings.
fn build_values(args: &Args) -> XppResult<RuntimeValues> {
    let mut values = match &args.values {
        Some(path) => config::values_from_json_file(path)?,
        None => RuntimeValues::new(),
    };

    for var in &args.vars {
        let (name, text) = config::parse_assignment(var)?;
        values.add_str(&name, text)?;
    }
    for version in &args.versions {
        let (name, text) = config::parse_assignment(version)?;
        values.add_version(&name, &text)?;
    }
    Ok(values)
}

pub fn run(source: &str, values: RuntimeValues, print_error: bool) -> Result<bool, XppError> {
    let result = XmlPreprocessor::new(values).test(source);

    if let Err(e) = &result {
        if print_error {
            let _ = error::print_errors(source, std::slice::from_ref(e));
        }
    }

    result
}


#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> RuntimeValues {
        let args = Args::try_parse_from([
            "xpp",
            "--var", "product=writer",
            "--var", "market=en-US",
            "--ver", "version=16.4.3528",
            "TRUE",
        ])
        .unwrap();
        build_values(&args).unwrap()
    }

    #[test]
    fn test_valid_input() {
        let cases = vec![
            ("product EQ 'Writer'", true),
            ("version GTE 16.4", true),
            ("market =~ /^en-/ AND NOT version LT 16.0", true),
            ("(product EQ 'mail' OR market EQ 'de-DE')", false),
        ];

        for (case, expected) in cases {
            let result = run(case, values(), false);
            assert_eq!(result, Ok(expected), "Wrong result for valid input {:?}", case);
        }
    }

    #[test]
    fn test_invalid_input() {
        let cases = vec![
            "product == 'writer'",
            "product EQ",
            "(TRUE",
            "undefinedVar EQ 'x'",
            "version EQ 'x'",
        ];

        for case in cases {
            let result = run(case, values(), false);
            assert!(result.is_err(), "Expected evaluation to fail. Input: {}, Got: {:?}", case, result);
        }
    }

    #[test]
    fn test_invalid_bindings() {
        let cases = vec![
            vec!["xpp", "--var", "novalue", "TRUE"],
            vec!["xpp", "--var", "a=1", "--var", "a=2", "TRUE"],
            vec!["xpp", "--ver", "v=1", "TRUE"],
            vec!["xpp", "--values", "/nonexistent/values.json", "TRUE"],
        ];

        for case in cases {
            let args = Args::try_parse_from(case.clone()).unwrap();
            assert!(matches!(build_values(&args), Err(XppError::Config(_))), "Expected failure for {:?}", case);
        }
    }
}
