//! A simple CLI tool for checking a single observer application against
//! reference data, using the same validator as the rest of the system.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::de::DeserializeOwned;

use observer_apps::{
    model::{
        application::{Application, NewApplication, SubmissionContext},
        lookup::Lookups,
        phone::PhoneNormalizer,
        reference::ReferenceData,
        validation::{ApprovalBlocker, Validator, Violation},
    },
    Config,
};

const PROGRAM_NAME: &str = "check-application";

const ABOUT_TEXT: &str = "Check an election observer application.

EXIT CODES:
     0: The application passed every check.
   255: Ran successfully, but the application failed a check.
 Other: Error.";

const APPLICATION_PATH: &str = "APPLICATION_PATH";
const REFERENCE: &str = "reference";
const CONFIG: &str = "config";
const NEW: &str = "new";
const IMPORTED: &str = "imported";
const APPROVAL: &str = "approval";
const LOG_CONFIG: &str = "log-config";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .arg(
            Arg::new(APPLICATION_PATH)
                .help("The path to the application as JSON")
                .action(ArgAction::Set)
                .required(true),
        )
        .arg(
            Arg::new(REFERENCE)
                .long(REFERENCE)
                .value_name("JSON")
                .help("Regions, stations, verified phones and stored applications")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new(CONFIG)
                .long(CONFIG)
                .value_name("TOML")
                .help("Validation settings")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new(NEW)
                .long(NEW)
                .help("Treat the application as a fresh submission without an ID")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(IMPORTED)
                .long(IMPORTED)
                .help("The application came from a bulk import")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(APPROVAL)
                .long(APPROVAL)
                .help("Also check whether the stored application can be approved")
                .action(ArgAction::SetTrue)
                .conflicts_with(NEW),
        )
        .arg(
            Arg::new(LOG_CONFIG)
                .long(LOG_CONFIG)
                .value_name("YAML")
                .help("log4rs configuration; logging is off without one")
                .action(ArgAction::Set),
        )
}

/// Errors that this program may produce.
#[derive(Debug, Eq, PartialEq)]
enum Error {
    /// IO error described by the inner message.
    IO(String),
    /// Failed to decode an input file.
    Format(String),
    /// The checks themselves could not run.
    Check(String),
}

/// Outcome of a successful run.
#[derive(Debug, Eq, PartialEq)]
enum Outcome {
    Valid,
    Invalid(Vec<Violation>),
    Blocked(ApprovalBlocker),
}

fn load_json<T: DeserializeOwned>(path: &str) -> Result<T, Error> {
    let file = BufReader::new(File::open(path).map_err(|e| Error::IO(format!("{path}: {e}")))?);
    serde_json::from_reader(file).map_err(|e| Error::Format(format!("{path}: {e}")))
}

fn load_config(path: Option<&String>) -> Result<Config, Error> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    if !Path::new(path).exists() {
        return Err(Error::IO(format!("{path}: no such file")));
    }
    Config::from_file(path).map_err(|e| Error::Format(e.to_string()))
}

/// Run the checks.
fn check(args: &ArgMatches) -> Result<Outcome, Error> {
    // Required argument is guaranteed to be present.
    let path: &String = args.get_one(APPLICATION_PATH).unwrap();
    let config = load_config(args.get_one(CONFIG))?;
    let reference: ReferenceData = match args.get_one::<String>(REFERENCE) {
        Some(path) => load_json(path)?,
        None => ReferenceData::default(),
    };
    let context = if args.get_flag(IMPORTED) {
        SubmissionContext::imported()
    } else {
        SubmissionContext::default()
    };

    let normalizer = PhoneNormalizer::from_config(&config);
    let validator = Validator::new(config);
    let lookups = Lookups::all(&reference);
    let check_err = |e: observer_apps::Error| Error::Check(e.to_string());

    if args.get_flag(NEW) {
        let mut app: NewApplication = load_json(path)?;
        app.normalize_phone(&normalizer);
        let report = validator
            .validate_new(&mut app, &context, lookups)
            .map_err(check_err)?;
        return Ok(if report.is_valid() {
            Outcome::Valid
        } else {
            Outcome::Invalid(report.into_iter().collect())
        });
    }

    let mut app: Application = load_json(path)?;
    app.normalize_phone(&normalizer);
    let report = validator
        .validate(&app, &context, lookups)
        .map_err(check_err)?;
    if !report.is_valid() {
        return Ok(Outcome::Invalid(report.into_iter().collect()));
    }
    if args.get_flag(APPROVAL) {
        if let Some(blocker) = validator
            .approval_blocker(&app, &context, lookups)
            .map_err(check_err)?
        {
            return Ok(Outcome::Blocked(blocker));
        }
    }
    Ok(Outcome::Valid)
}

/// Run the checks, report the result, and return the exit code.
fn run(args: &ArgMatches) -> u8 {
    match check(args) {
        Ok(Outcome::Valid) => {
            println!("Application is valid.");
            0
        }
        Ok(Outcome::Invalid(violations)) => {
            println!("Application is invalid:");
            for violation in violations {
                println!("  {}", violation);
            }
            255
        }
        Ok(Outcome::Blocked(blocker)) => {
            println!("Application cannot be approved: {}", blocker);
            255
        }
        Err(Error::IO(msg)) => {
            println!("IO error: {}", msg);
            1
        }
        Err(Error::Format(msg)) => {
            println!("Invalid input: {}", msg);
            1
        }
        Err(Error::Check(msg)) => {
            println!("Check failed to run: {}", msg);
            1
        }
    }
}

fn main() {
    let args = cli().get_matches();
    if let Some(path) = args.get_one::<String>(LOG_CONFIG) {
        if let Err(err) = observer_apps::logging::init_from_file(path) {
            println!("Logging disabled: {}", err);
        }
    }
    let exit_code = run(&args);
    std::process::exit(exit_code.into())
}

#[cfg(test)]
mod tests {
    use observer_apps::model::validation::{
        rules::{station_not_found, PHONE_NOT_CONFIRMED},
        Field,
    };

    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        let mut command_line = vec![PROGRAM_NAME];
        command_line.extend_from_slice(args);
        cli().try_get_matches_from(command_line).unwrap()
    }

    #[test]
    fn checks() {
        // This test enters library code, so enable logging.
        log4rs_test_utils::test_logging::init_logging_once_for(["observer_apps"], None, None);

        let reference = "--reference=example_data/reference.json";
        assert_eq!(
            check(&parse(&["example_data/application.json", reference])),
            Ok(Outcome::Valid)
        );
        assert_eq!(
            check(&parse(&["example_data/application.json", "--approval", reference])),
            Ok(Outcome::Blocked(ApprovalBlocker::EmailDuplicate))
        );
        assert_eq!(
            check(&parse(&["example_data/invalid_application.json", reference])),
            Ok(Outcome::Invalid(vec![Violation::new(
                Field::Uic,
                station_not_found("999")
            )]))
        );

        // The new applicant's phone has no verification on record.
        assert_eq!(
            check(&parse(&["example_data/new_application.json", "--new", reference])),
            Ok(Outcome::Invalid(vec![Violation::new(
                Field::Phone,
                PHONE_NOT_CONFIRMED
            )]))
        );
        assert_eq!(
            check(&parse(&[
                "example_data/new_application.json",
                "--new",
                reference,
                "--config=example_data/lenient.toml",
            ])),
            Ok(Outcome::Valid)
        );
    }

    #[test]
    fn input_errors() {
        assert!(matches!(
            check(&parse(&["example_data/malformed.json"])),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            check(&parse(&["not a real file"])),
            Err(Error::IO(_))
        ));
        assert!(matches!(
            check(&parse(&[
                "example_data/application.json",
                "--config=not a real file"
            ])),
            Err(Error::IO(_))
        ));
    }

    #[test]
    fn correct_cli_usage() {
        let reference = "--reference=example_data/reference.json";
        assert_eq!(run(&parse(&["example_data/application.json", reference])), 0);
        assert_eq!(
            run(&parse(&["example_data/invalid_application.json", reference])),
            255
        );
        assert_eq!(run(&parse(&["example_data/malformed.json"])), 1);
        assert_eq!(run(&parse(&["not a real file"])), 1);
    }

    #[test]
    fn bad_cli_usage() {
        // Something very wrong.
        let command_line = [PROGRAM_NAME, "this", "invocation", "is", "incorrect"];
        cli().try_get_matches_from(command_line).unwrap_err();

        // No options at all.
        let command_line = [PROGRAM_NAME];
        cli().try_get_matches_from(command_line).unwrap_err();

        // Approval only applies to stored applications.
        let command_line = [PROGRAM_NAME, "app.json", "--new", "--approval"];
        cli().try_get_matches_from(command_line).unwrap_err();
    }
}
