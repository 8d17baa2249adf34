use tencents::error::Result;
use tencents::settings::{load_settings, save_settings, settings_path};

pub fn run(assignments: &[String]) -> Result<()> {
    let mut settings = load_settings();

    if !assignments.is_empty() {
        for assignment in assignments {
            settings.apply(assignment)?;
        }
        save_settings(&settings)?;
        println!("Saved {}", settings_path().display());
    }

    println!("data_dir        = {}", settings.data_dir);
    println!("currency_label  = {}", settings.currency_label);
    println!("default_kind    = {}", settings.default_kind);
    println!("strict_amounts  = {}", settings.strict_amounts);
    Ok(())
}
