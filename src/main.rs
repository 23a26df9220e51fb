use cdclsat::checker::verify_model;
use cdclsat::formula::dimacs::{parse, parse_file};
use cdclsat::*;
use clap::{App, Arg};
use log::info;
use std::time::Instant;

const EXIT_SAT: i32 = 0;
const EXIT_UNSAT: i32 = 1;
const EXIT_NOT_VERIFIED: i32 = 2;

fn main() {
    let matches = App::new("cdclsat")
        .version(clap::crate_version!())
        .about("CDCL satisfiability solver for DIMACS CNF formulas")
        .arg(Arg::with_name("INPUT").help("input file (in CNF), stdin if absent").index(1))
        .arg(
            Arg::with_name("verify")
                .long("verify")
                .help("re-check a satisfying assignment against the input clauses"),
        )
        .arg(
            Arg::with_name("check-invariants")
                .long("check-invariants")
                .help("validate the assignment trail after every propagation round"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides"),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    let f = if let Some(path) = matches.value_of("INPUT") {
        parse_file(path)
    } else {
        parse(std::io::stdin())
    };

    let f = match f {
        Ok(f) => f,
        Err(e) => {
            eprintln!("parse error: {}", e);
            std::process::exit(-1);
        }
    };
    info!("parsed {} variables, {} clauses", f.num_variables(), f.num_clauses());

    let original = if matches.is_present("verify") { Some(f.clone()) } else { None };
    let config = SolverConfig {
        check_invariants: matches.is_present("check-invariants"),
    };

    let start = Instant::now();
    let mut solver = Solver::with_config(f, config);
    let result = solver.solve();
    let elapsed = start.elapsed();

    let stats = solver.stats();
    info!(
        "{} decisions, {} propagations, {} conflicts, {} learned clauses",
        stats.decisions, stats.propagations, stats.conflicts, stats.learned_clauses
    );

    let exit_code = match result {
        SatResult::Satisfiable(model) => {
            println!("SAT");
            println!("{}", model);
            println!("time: {:.6}s", elapsed.as_secs_f64());
            match original.map(|f| verify_model(&f, &model)) {
                None => EXIT_SAT,
                Some(Ok(())) => {
                    println!("SATISFIED");
                    EXIT_SAT
                }
                Some(Err(e)) => {
                    println!("NOT SATISFIED: {}", e);
                    EXIT_NOT_VERIFIED
                }
            }
        }
        SatResult::Unsatisfiable => {
            println!("UNSAT");
            println!("time: {:.6}s", elapsed.as_secs_f64());
            EXIT_UNSAT
        }
    };
    std::process::exit(exit_code);
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
