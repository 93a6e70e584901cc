// src/main.rs

use herald::{USAGE_EXIT_CODE, cli, logging, run};

#[tokio::main]
async fn main() {
    let args = match cli::try_parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => {
            // --help and --version land here too and are not failures.
            let code = if err.use_stderr() { USAGE_EXIT_CODE } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if let Err(err) = logging::init_logging(args.log_level, args.verbose) {
        eprintln!("herald: {err:?}");
    }

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("herald error: {err:?}");
            std::process::exit(1);
        }
    }
}
