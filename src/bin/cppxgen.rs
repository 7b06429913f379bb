use cppx::console::Console;
use cppx::driver;

const HELP: &str = "\
    cppxgen - converts unified C++ files (.cppx) to standard C++ files (.h and .cpp)

    USAGE:
        cppxgen [BASE_DIR]

    ARGS:
        BASE_DIR            The directory to scan for .cppx files, including its
                            subdirectories. Defaults to the current directory.
";

#[derive(Debug, Eq, PartialEq)]
struct Args {
    base_dir: std::path::PathBuf,
}

fn main() {
    let args = match parse_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            std::process::exit(1);
        }
    };

    let console = Console::new();
    console.output("cppxgen - converts unified C++ files (.cppx) to standard C++ files (.h and .cpp)");
    console.output("Usage: cppxgen [base directory (default current)]");
    console.output("");

    std::process::exit(driver::generate_tree(&args.base_dir, &console));
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    let base_dir = pargs
        .opt_free_from_str()?
        .unwrap_or_else(|| std::path::PathBuf::from("./"));

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Error: unused arguments left: {:?}.", remaining);
        std::process::exit(1);
    }
    Ok(Args { base_dir })
}
