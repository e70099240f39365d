use cosmic_field::CosmicField;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = CosmicField::new().run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
