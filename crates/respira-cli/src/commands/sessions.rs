use respira_core::Config;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Config::load()?.catalog()?;
    println!("{}", serde_json::to_string_pretty(catalog.sessions())?);
    Ok(())
}
