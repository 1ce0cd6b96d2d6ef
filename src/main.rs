use clap::{App, Arg};
use dpllsat::{dimacs, text, Formula, SatResult, Solver};
use std::fs::File;
use std::io::Read;

fn main() {
    env_logger::init();

    let matches = App::new("dpllsat")
        .about("DPLL satisfiability solver for CNF formulas")
        .arg(
            Arg::with_name("INPUT")
                .help("input file, e.g. (A|~B)&(~A|C); reads stdin if omitted")
                .index(1),
        )
        .arg(
            Arg::with_name("dimacs")
                .long("dimacs")
                .help("parse the input as DIMACS CNF"),
        )
        .arg(
            Arg::with_name("limit")
                .long("limit")
                .takes_value(true)
                .value_name("NODES")
                .help("give up with 'unknown' after this many search nodes"),
        )
        .get_matches();

    let formula = if matches.is_present("dimacs") {
        parse_dimacs(matches.value_of("INPUT"))
    } else {
        parse_text(matches.value_of("INPUT"))
    };

    let formula = match formula {
        Ok(f) => f,
        Err(e) => {
            eprintln!("parse error: {}", e);
            std::process::exit(-1);
        }
    };

    let mut solver = Solver::new(formula);
    if let Some(limit) = matches.value_of("limit") {
        match limit.parse() {
            Ok(n) => solver = solver.with_node_limit(n),
            Err(_) => {
                eprintln!("invalid --limit value: {}", limit);
                std::process::exit(-1);
            }
        }
    }

    let exit_code = match solver.solve() {
        SatResult::Satisfiable(assignment) => {
            println!("sat {}", assignment);
            0
        }
        SatResult::Unsatisfiable => {
            println!("unsat");
            1
        }
        SatResult::Unknown => {
            println!("unknown");
            2
        }
    };
    std::process::exit(exit_code);
}

fn parse_text(path: Option<&str>) -> Result<Formula, String> {
    let input = read_input(path)?;
    text::parse(&input).map_err(|e| format!("{:?}", e))
}

fn parse_dimacs(path: Option<&str>) -> Result<Formula, String> {
    let formula = match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| e.to_string())?;
            dimacs::parse(file)
        }
        None => dimacs::parse(std::io::stdin()),
    };
    formula.map_err(|e| format!("{:?}", e))
}

fn read_input(path: Option<&str>) -> Result<String, String> {
    let mut input = String::new();
    match path {
        Some(path) => {
            File::open(path)
                .and_then(|mut file| file.read_to_string(&mut input))
                .map_err(|e| e.to_string())?;
        }
        None => {
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| e.to_string())?;
        }
    }
    Ok(input)
}
