fn main() {
    #[cfg(feature = "cli")]
    segamd::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("segamd: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
