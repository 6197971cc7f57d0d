use clap::Parser;

mod cli;

/*-------------------------------------------------------------------------------------------------
  Main
-------------------------------------------------------------------------------------------------*/

fn main() {
    let args = cli::Args::parse();

    stderrlog::new()
        .module(module_path!())
        .verbosity(args.verbose.log_level_filter())
        .init()
        .unwrap();

    if let Err(error) = cli::run(&args) {
        log::error!("{error}");
        std::process::exit(1);
    }
}
