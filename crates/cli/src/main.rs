fn main() {
    if let Err(e) = shadowscope_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
