fn main() {
    if let Err(err) = analista::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
