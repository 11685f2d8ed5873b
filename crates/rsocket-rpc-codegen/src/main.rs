//! rsocket-rpc-codegen CLI entry point

#![warn(clippy::all)]

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("Error: CLI feature not enabled. Build with --features cli");
    std::process::exit(1);
}

#[cfg(feature = "cli")]
fn main() {
    use clap::Parser;

    let cli = rsocket_rpc_codegen::cli::Cli::parse();

    if let Err(e) = cli.execute() {
        let exit_code = rsocket_rpc_codegen::cli::error::display_error(&e);
        std::process::exit(exit_code);
    }
}
