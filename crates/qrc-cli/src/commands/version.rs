//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum reservoir computing circuit builder",
        style("qrc").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qrc-ir         Circuit intermediate representation");
    println!("  qrc-reservoir  Reservoir layer and circuit assembly");
    println!("  qrc-qasm3      OpenQASM 3 emitter");
    println!("  qrc-cli        Command-line interface");
    println!();
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
