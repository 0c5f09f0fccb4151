use clap::Parser;

use lineage_graph::cli::{run, Cli};
use lineage_graph::error::ErrorKind;
use lineage_graph::observability::init_logging;

fn main() {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            let code = match e.kind() {
                ErrorKind::ClientInput => 2,
                ErrorKind::DataIntegrity => 3,
                ErrorKind::Interrupted => 4,
                ErrorKind::Internal => 1,
            };
            std::process::exit(code);
        }
    }
}
