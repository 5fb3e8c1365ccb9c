//! nori demo driver
//!
//! Builds a small literal suite exercising every outcome the harness can
//! report (pass, fail by error, fail by panic, skip) and exits with the
//! run's code.

use clap::Parser;
use nori_core::{ConsoleReporter, TestCase, TestRunner, init_tracing};

#[derive(Parser)]
#[command(name = "nori-demo")]
#[command(about = "Run the nori harness demonstration suite")]
#[command(version = nori_core::VERSION)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "nori=error",
        1 => "nori=warn",
        2 => "nori=info",
        3 => "nori=debug",
        _ => "nori=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    let cases = vec![
        TestCase::blocking("input is not empty", || {
            let input = "nori";
            anyhow::ensure!(!input.is_empty(), "input was empty");
            Ok(())
        }),
        TestCase::blocking("failing assertion", || {
            anyhow::ensure!(1 + 1 == 3, "expected 1 + 1 to equal 3");
            Ok(())
        }),
        TestCase::new("future as test body", async { Ok(()) }),
        TestCase::blocking("test returning an error", || {
            Err(anyhow::anyhow!("example error"))
        }),
        TestCase::blocking("test raising a panic", || panic!("example panic")),
        helper_case(),
        TestCase::new("talks to the registry", async { Ok(()) })
            .skipped("needs a network fixture"),
    ];

    let mut runner = if cli.no_color {
        TestRunner::new(ConsoleReporter::no_colors())
    } else {
        TestRunner::stdout()
    };
    let summary = runner.run(cases).await;
    std::process::exit(summary.exit_code());
}

fn helper_case() -> TestCase {
    TestCase::blocking("case built by a helper function", || Ok(()))
}
