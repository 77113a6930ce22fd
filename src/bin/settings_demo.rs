use larder::settings::*;

#[derive(Parser, Debug)]
struct DemoCli {
    #[arg(long)]
    settings: Option<String>,
}

fn main() {
    // Load settings from the default location
    let project_settings = parse_settings(None).unwrap();
    println!("Loaded settings: {:?}", project_settings);

    // Attempt to load from an invalid path (expected to fail)
    let is_err = parse_settings(Some("")).is_err();
    println!("Error on invalid path: {:?}", is_err);

    // Environment overrides sit on top of the file
    // $ LARDER_API__BASE_URL=http://10.0.0.2/api cargo run --bin settings_demo -- --settings=settings/dev.toml
    let cli = DemoCli::parse();
    let project_settings = parse_settings(cli.settings.as_deref()).unwrap();
    println!("API base: {}", project_settings.api.base_url);
    println!("Session backend: {}", project_settings.session.backend);
}
