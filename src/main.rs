//! Kodegen Bundler Split - split-APK bundle pipeline.
//!
//! This binary analyzes, rebuilds and installs a base APK together with its
//! split_config packages, with proper error handling and recovery hints.

use kodegen_bundler_split::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for suggestion in e.recovery_suggestions() {
                eprintln!("  • {}", suggestion);
            }
            if e.is_recoverable() {
                eprintln!("  • Packages processed before the failure are left in place");
            }
            1
        }
    };

    process::exit(exit_code);
}
