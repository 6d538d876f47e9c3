//! Settings command

use anyhow::{anyhow, Result};
use fincasal_core::models::{FontFamily, FontSize, Theme};
use fincasal_core::{AppSettings, Language, Storage, TransactionStore};

use crate::cli::SettingsArgs;

/// Apply the given flags on top of `current`
pub fn apply_settings(current: &AppSettings, args: &SettingsArgs) -> Result<AppSettings> {
    let mut settings = current.clone();

    if let Some(ref language) = args.language {
        settings.language = Language::from_tag(language);
    }
    if let Some(ref theme) = args.theme {
        settings.theme = theme.parse::<Theme>().map_err(|e| anyhow!(e))?;
    }
    if let Some(light_mode) = args.light_mode {
        settings.light_mode = light_mode;
    }
    if let Some(ref size) = args.font_size {
        settings.font_size = size.parse::<FontSize>().map_err(|e| anyhow!(e))?;
    }
    if let Some(ref family) = args.font_family {
        settings.font_family = family.parse::<FontFamily>().map_err(|e| anyhow!(e))?;
    }

    Ok(settings)
}

pub fn cmd_settings<S: Storage>(store: &mut TransactionStore<S>, args: &SettingsArgs) -> Result<()> {
    if !args.is_empty() {
        let updated = apply_settings(store.settings(), args)?;
        store.update_settings(updated)?;
        println!("✅ Settings saved");
    }

    let settings = store.settings();
    println!();
    println!("⚙️  Settings");
    println!("   Language:    {}", settings.language);
    println!("   Theme:       {}", settings.theme.as_str());
    println!("   Light mode:  {}", if settings.light_mode { "on" } else { "off" });
    println!("   Font size:   {}", settings.font_size.as_str());
    println!("   Font family: {}", settings.font_family.as_str());

    Ok(())
}
