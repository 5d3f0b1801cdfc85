use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::data::loader::load_data_dir;
use crate::data::repository::{ShipMatch, ShipRepository};
use crate::data::validate::{validate_data_dir, ValidationSeverity};
use crate::data::vocabulary::{parse_attribute_list, Attribute, HullClass, Level, Policy};
use crate::error::StatsError;
use crate::report::ExploreReport;
use crate::stats::compare;

const USAGE: &str = "usage: azur_stats [--data-dir <path>] [menu|explore|compare|tables|validate]\n\
    \x20 explore <ship> <level> <attributes> [--policy class|rarity|above-median] [--class <DD..IX>] [--json]\n\
    \x20 compare <first> <second> <level> <attributes> [--class <DD..IX>] [--json]\n\
    \x20 tables [--json]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Menu,
    Explore,
    Compare,
    Tables,
    Validate,
}

/// Options accepted anywhere on the command line; everything else is positional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub positional: Vec<String>,
    pub data_dir: Option<PathBuf>,
    pub policy: Option<String>,
    pub class: Option<String>,
    pub json: bool,
}

pub fn parse_invocation(args: &[String]) -> Result<Invocation, String> {
    let mut invocation = Invocation::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match arg.as_str() {
            "--data-dir" => invocation.data_dir = Some(PathBuf::from(value_for("--data-dir")?)),
            "--policy" => invocation.policy = Some(value_for("--policy")?),
            "--class" => invocation.class = Some(value_for("--class")?),
            "--json" => invocation.json = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option: {flag}")),
            _ => invocation.positional.push(arg.clone()),
        }
    }
    Ok(invocation)
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        None | Some("menu") => Some(Command::Menu),
        Some("explore") => Some(Command::Explore),
        Some("compare") => Some(Command::Compare),
        Some("tables") => Some(Command::Tables),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let invocation = match parse_invocation(args) {
        Ok(invocation) => invocation,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{USAGE}");
            return 2;
        }
    };

    let mut config = AppConfig::from_env();
    if let Some(dir) = &invocation.data_dir {
        config.data_dir = dir.clone();
    }

    let Some(command) = parse_command(&invocation.positional) else {
        eprintln!("{USAGE}");
        return 2;
    };
    if let Err(err) = check_options(command, &invocation) {
        eprintln!("{err}");
        eprintln!("{USAGE}");
        return 2;
    }

    match command {
        Command::Menu => handle_menu(&config),
        Command::Explore => handle_explore(&config, &invocation),
        Command::Compare => handle_compare(&config, &invocation),
        Command::Tables => handle_tables(&config, &invocation),
        Command::Validate => handle_validate(&config),
    }
}

/// Reject options that `command` does not read; `--data-dir` is always accepted.
pub fn check_options(command: Command, invocation: &Invocation) -> Result<(), String> {
    let given = [
        ("--policy", invocation.policy.is_some()),
        ("--class", invocation.class.is_some()),
        ("--json", invocation.json),
    ];
    let accepted: &[&str] = match command {
        Command::Menu | Command::Validate => &[],
        Command::Explore => &["--policy", "--class", "--json"],
        Command::Compare => &["--class", "--json"],
        Command::Tables => &["--json"],
    };
    match given.iter().find(|(flag, set)| *set && !accepted.contains(flag)) {
        Some((flag, _)) => Err(format!("option {flag} is not supported by this command")),
        None => Ok(()),
    }
}

/// Load the configured tables, printing the failure when there are none.
fn load_repository(config: &AppConfig) -> Option<ShipRepository> {
    match load_data_dir(&config.data_dir, &config.normalizer()) {
        Ok(loaded) => Some(loaded.repository),
        Err(err) => {
            eprintln!("error: {err}");
            None
        }
    }
}

fn handle_menu(config: &AppConfig) -> i32 {
    let Some(repository) = load_repository(config) else {
        return 1;
    };
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(&repository, stdin.lock(), stdout.lock());
    match session.run() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("terminal error: {err}");
            1
        }
    }
}

/// Parse level and attributes shared by the one-shot commands; exit code on failure.
fn parse_request(level: &str, attributes: &str) -> Result<(Level, Vec<Attribute>), i32> {
    let level = level.parse::<Level>().map_err(|err| {
        eprintln!("{err}");
        2
    })?;
    let attributes = parse_attribute_list(attributes).map_err(|err| {
        eprintln!("{err}");
        eprintln!("valid attributes: {}", Attribute::vocabulary());
        2
    })?;
    Ok((level, attributes))
}

fn parse_class(invocation: &Invocation) -> Result<Option<HullClass>, i32> {
    match invocation.class.as_deref().map(str::parse::<HullClass>) {
        None => Ok(None),
        Some(Ok(class)) => Ok(Some(class)),
        Some(Err(err)) => {
            eprintln!("{err}");
            Err(2)
        }
    }
}

/// Look `name` up, limited to `class` when one was given.
fn find_ship<'r>(
    repository: &'r ShipRepository,
    name: &str,
    class: Option<HullClass>,
    level: Level,
) -> Option<ShipMatch<'r>> {
    match class {
        Some(class) => repository.find_in_class(name, class, level),
        None => repository.find(name, level),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize report: {err}");
            1
        }
    }
}

fn handle_explore(config: &AppConfig, invocation: &Invocation) -> i32 {
    let [_, _, name, level, attributes] = invocation.positional.as_slice() else {
        eprintln!("usage: azur_stats explore <ship> <level> <attributes> [--policy <policy>] [--class <class>] [--json]");
        return 2;
    };
    let (level, attributes) = match parse_request(level, attributes) {
        Ok(request) => request,
        Err(code) => return code,
    };
    let policies = match invocation.policy.as_deref().map(str::parse::<Policy>) {
        None => Policy::ALL.to_vec(),
        Some(Ok(policy)) => vec![policy],
        Some(Err(err)) => {
            eprintln!("{err}");
            return 2;
        }
    };
    let class = match parse_class(invocation) {
        Ok(class) => class,
        Err(code) => return code,
    };

    let Some(repository) = load_repository(config) else {
        return 1;
    };
    let Some(ship) = find_ship(&repository, name, class, level) else {
        eprintln!("{}", StatsError::ShipNotFound { name: name.clone(), level });
        return 1;
    };

    let report = ExploreReport::new(&ship, &attributes, &policies);
    if invocation.json {
        print_json(&report)
    } else {
        print!("{report}");
        0
    }
}

fn handle_compare(config: &AppConfig, invocation: &Invocation) -> i32 {
    let [_, _, first, second, level, attributes] = invocation.positional.as_slice() else {
        eprintln!("usage: azur_stats compare <first> <second> <level> <attributes> [--class <class>] [--json]");
        return 2;
    };
    let (level, attributes) = match parse_request(level, attributes) {
        Ok(request) => request,
        Err(code) => return code,
    };
    let class = match parse_class(invocation) {
        Ok(class) => class,
        Err(code) => return code,
    };

    let Some(repository) = load_repository(config) else {
        return 1;
    };
    let mut resolved = Vec::with_capacity(2);
    for name in [first, second] {
        match find_ship(&repository, name, class, level) {
            Some(ship) => resolved.push(ship),
            None => {
                eprintln!("{}", StatsError::ShipNotFound { name: name.clone(), level });
                return 1;
            }
        }
    }

    let report = compare(&resolved[0], &resolved[1], &attributes);
    if invocation.json {
        print_json(&report)
    } else {
        print!("{report}");
        0
    }
}

#[derive(Debug, Serialize)]
struct TableListing {
    table: String,
    ships: usize,
    stat_columns: Vec<Attribute>,
}

fn handle_tables(config: &AppConfig, invocation: &Invocation) -> i32 {
    let Some(repository) = load_repository(config) else {
        return 1;
    };
    if invocation.json {
        let listings: Vec<TableListing> = repository
            .tables()
            .map(|table| TableListing {
                table: table.key.to_string(),
                ships: table.len(),
                stat_columns: table.columns().to_vec(),
            })
            .collect();
        return print_json(&listings);
    }
    println!("table\tships\tstat_columns");
    for table in repository.tables() {
        println!("{}\t{}\t{}", table.key, table.len(), table.columns().len());
    }
    0
}

fn handle_validate(config: &AppConfig) -> i32 {
    match validate_data_dir(&config.data_dir, &config.normalizer()) {
        Ok(report) => {
            for diagnostic in report.sorted() {
                println!("{diagnostic}");
            }
            let errors = report.count(ValidationSeverity::Error);
            let warnings = report.count(ValidationSeverity::Warning);
            if report.has_errors() {
                eprintln!("validation failed: {errors} error(s), {warnings} warning(s)");
                1
            } else {
                println!("validation passed: {} ({warnings} warning(s))", config.data_dir.display());
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

/// Top-level choices of the interactive menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ExploreStats,
    CompareShips,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<MenuChoice> {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "explore" => Some(Self::ExploreStats),
            "2" | "compare" => Some(Self::CompareShips),
            "3" | "exit" | "quit" | "q" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Interactive prompt loop over a loaded repository. Generic over its streams
/// so it can be driven from tests.
pub struct Session<'r, R, W> {
    repository: &'r ShipRepository,
    input: R,
    output: W,
}

impl<'r, R: BufRead, W: Write> Session<'r, R, W> {
    pub fn new(repository: &'r ShipRepository, input: R, output: W) -> Self {
        Session {
            repository,
            input,
            output,
        }
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "Azur Lane stats comparer")?;
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "1. Explore average stats of a ship")?;
            writeln!(self.output, "2. Compare two ships")?;
            writeln!(self.output, "3. Exit")?;
            let Some(line) = self.prompt("Choose an option: ")? else {
                return Ok(());
            };
            match MenuChoice::parse(&line) {
                Some(MenuChoice::ExploreStats) => self.explore()?,
                Some(MenuChoice::CompareShips) => self.compare()?,
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(());
                }
                None => writeln!(self.output, "Please choose 1, 2 or 3.")?,
            }
        }
    }

    fn explore(&mut self) -> io::Result<()> {
        let Some(ship) = self.ask_ship("Ship name: ")? else {
            return Ok(());
        };
        let Some(attributes) = self.ask_attributes()? else {
            return Ok(());
        };
        let report = ExploreReport::new(&ship, &attributes, &Policy::ALL);
        write!(self.output, "{report}")
    }

    fn compare(&mut self) -> io::Result<()> {
        let Some(first) = self.ask_ship("First ship name: ")? else {
            return Ok(());
        };
        let Some(second) = self.ask_ship("Second ship name: ")? else {
            return Ok(());
        };
        let Some(attributes) = self.ask_attributes()? else {
            return Ok(());
        };
        let report = compare(&first, &second, &attributes);
        write!(self.output, "{report}")
    }

    /// Ask for a name and level until they resolve to a ship. `None` on end of input.
    fn ask_ship(&mut self, message: &str) -> io::Result<Option<ShipMatch<'r>>> {
        let repository = self.repository;
        loop {
            let Some(name) = self.prompt(message)? else {
                return Ok(None);
            };
            if name.is_empty() {
                continue;
            }
            let Some(level) = self.ask_level()? else {
                return Ok(None);
            };
            if let Some(ship) = repository.find(&name, level) {
                debug!(ship = %ship.record.name, table = %ship.table.key, "resolved ship");
                return Ok(Some(ship));
            }
            writeln!(self.output, "No ship named '{name}' at level {level}. Try again.")?;
        }
    }

    fn ask_level(&mut self) -> io::Result<Option<Level>> {
        loop {
            let Some(raw) = self.prompt("Level (1, 100, 120, 125): ")? else {
                return Ok(None);
            };
            match raw.parse::<Level>() {
                Ok(level) => return Ok(Some(level)),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }

    fn ask_attributes(&mut self) -> io::Result<Option<Vec<Attribute>>> {
        loop {
            let Some(raw) = self.prompt("Attributes (comma-separated, or 'all'): ")? else {
                return Ok(None);
            };
            match parse_attribute_list(&raw) {
                Ok(attributes) => return Ok(Some(attributes)),
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    writeln!(self.output, "Valid attributes: {}", Attribute::vocabulary())?;
                }
            }
        }
    }

    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
