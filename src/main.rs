//! Demand response simulator entry point: CLI wiring and config-driven runs.

use std::path::Path;
use std::process;

use dr_sim::catalog;
use dr_sim::config::ScenarioConfig;
use dr_sim::io::export::export_csv;
use dr_sim::sim::kpi::KpiReport;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    hours_override: Option<usize>,
    telemetry_out: Option<String>,
    print_catalog: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
    #[cfg(feature = "tui")]
    tui: bool,
}

fn print_help() {
    eprintln!("dr-sim: electricity demand response simulator");
    eprintln!();
    eprintln!("Usage: dr-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --hours <usize>          Override number of simulated hours");
    eprintln!("  --telemetry-out <path>   Export hour records to CSV");
    eprintln!("  --catalog                Print customer classes, technologies and rate plans");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after simulation");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    #[cfg(feature = "tui")]
    eprintln!("  --tui                    Play the scenario interactively in the terminal");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the residential_tou preset is used.");
    eprintln!("Set RUST_LOG=info (or debug) for engine logs.");
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &str, what: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v.as_str(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        hours_override: None,
        telemetry_out: None,
        print_catalog: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
        #[cfg(feature = "tui")]
        tui: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                cli.scenario_path = Some(next_value(&args, i, "--scenario", "a path argument").to_string());
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(next_value(&args, i, "--preset", "a name argument").to_string());
            }
            "--seed" => {
                i += 1;
                let v = next_value(&args, i, "--seed", "a u64 argument");
                if let Ok(s) = v.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{v}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--hours" => {
                i += 1;
                let v = next_value(&args, i, "--hours", "a usize argument");
                if let Ok(h) = v.parse::<usize>() {
                    cli.hours_override = Some(h);
                } else {
                    eprintln!("error: --hours value \"{v}\" is not a valid usize");
                    process::exit(1);
                }
            }
            "--telemetry-out" => {
                i += 1;
                cli.telemetry_out =
                    Some(next_value(&args, i, "--telemetry-out", "a path argument").to_string());
            }
            "--catalog" => {
                cli.print_catalog = true;
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let v = next_value(&args, i, "--port", "a u16 argument");
                if let Ok(p) = v.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{v}\" is not a valid u16");
                    process::exit(1);
                }
            }
            #[cfg(feature = "tui")]
            "--tui" => {
                cli.tui = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn print_catalog() {
    println!("Customer classes:");
    for c in catalog::customer_classes() {
        println!(
            "  {:<12} {:<12} peak {:>7.0}-{:<7.0} kW  max curtail {:>4.0}%  technologies: {}",
            c.id,
            c.name,
            c.peak_min_kw,
            c.peak_max_kw,
            c.max_curtail_pct,
            c.technologies.join(", ")
        );
    }
    println!("\nTechnologies:");
    for t in catalog::all_technologies() {
        println!(
            "  {:<24} {:<24} max {:>4.0}%  comfort impact: {}",
            t.id, t.name, t.max_curtail_pct, t.comfort_impact
        );
    }
    println!("\nRate plans:");
    for p in catalog::rate_plans() {
        println!("  {:<5} {}", p.id, p.name);
    }
}

fn main() {
    env_logger::init();
    let cli = parse_args();

    if cli.print_catalog {
        print_catalog();
        return;
    }

    // Load config: --scenario takes priority, then --preset, then the default preset
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::residential_tou()
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(hours) = cli.hours_override {
        scenario.simulation.hours = hours;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    #[cfg(feature = "tui")]
    if cli.tui {
        if let Err(e) = dr_sim::tui::run(&scenario) {
            eprintln!("error: {e}");
            process::exit(1);
        }
        return;
    }

    let mut engine = scenario.engine();
    if let Err(e) = engine.start_simulation(&scenario.customer) {
        eprintln!("error: {e}");
        process::exit(1);
    }
    if let Some(config) = engine.configuration() {
        println!(
            "{} {:.1} kW on {} ({}): technical potential {:.2} kW",
            config.class.name,
            config.peak_demand_kw,
            config.rate_plan.name,
            config
                .technologies
                .iter()
                .map(|t| t.id)
                .collect::<Vec<_>>()
                .join(", "),
            config.technical_potential_kw()
        );
    }
    let mut presenter = scenario.presenter();
    let records = match engine.run(presenter.as_mut(), scenario.simulation.hours) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    let kpi = KpiReport::from_records(&records);

    for r in &records {
        println!("{r}");
    }
    println!("\n{kpi}");

    if let Some(state) = engine.state() {
        for a in &state.unlocked_achievements {
            println!("Achievement: {a}");
        }
    }

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&records, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let (Some(config), Some(state)) = (engine.configuration(), engine.state()) else {
            eprintln!("error: simulation is not running");
            process::exit(1);
        };
        let state = Arc::new(dr_sim::api::AppState {
            config: config.clone(),
            kpi,
            state: state.clone(),
            records,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(dr_sim::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
