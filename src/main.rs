use clap::{arg, command, value_parser, Command};
use eulerian_fluid as fluid;
use rayon::ThreadPoolBuilder;

fn main() {
    env_logger::init();

    let matches = command!()
        .arg(
            arg!(
                -n --number_of_threads <NUMBER_OF_THREADS> "Sets the number of threads used by the post-processing"
            )
            .required(true)
            .value_parser(value_parser!(usize)),
        )
        .subcommand(
            Command::new("run")
                .about("Runs the simulation")
                .arg(
                    arg!(
                        -b --benchmark "Runs the benchmark"
                    )
                    .required(false),
                ),
        )
        .subcommand(
            Command::new("post")
                .about("Runs the post-processing: writes the vtk files")
        )
        .subcommand_required(true)
        .get_matches();

    if let Some(&num_threads) = matches.get_one::<usize>("number_of_threads") {
        if let Err(e) = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            eprintln!("Error while building the thread pool: {e}.");
            std::process::exit(1);
        }
    }

    match matches.subcommand() {
        Some(("run", sub_matches)) => {
            if sub_matches.get_flag("benchmark") {
                fluid::eulerian::run_benchmark();
            } else {
                fluid::eulerian::run();
            }
        }
        Some(("post", _)) => {
            if let Err(e) = fluid::eulerian::post::vtk::run_vtk_post_processing() {
                eprintln!("Error while writing the vtk files: {e}.");
                std::process::exit(1);
            }
        }
        _ => {}
    }
}
